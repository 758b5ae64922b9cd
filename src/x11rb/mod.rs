//! An [XConn] implementation backed by [x11rb]
use crate::{
    core::bindings::{KeyCombo, LOCK_MASK},
    keysyms::XK_Num_Lock,
    pure::geometry::{Rect, SizeHints},
    x::{
        ButtonGrab, ClientAttr, ClientConfig, MapState, WindowAttributes, XConn, XEvent,
    },
    Error, Result, Xid,
};
use std::collections::HashMap;
use tracing::{debug, trace, warn};
use x11rb::{
    connection::Connection,
    errors::ReplyError,
    protocol::xproto::{
        self, Atom, AtomEnum, ButtonIndex, ChangeWindowAttributesAux, ClientMessageEvent,
        ConfigureWindowAux, ConnectionExt as _, EventMask, GrabMode, InputFocus, Keycode,
        ModMask,
    },
    rust_connection::RustConnection,
    CURRENT_TIME, NONE,
};

pub mod conversions;

use conversions::{convert_event, parse_size_hints, to_x11rb_stack_mode};

/// Enum to store the various ways that operations can fail inside of the
/// x11rb implementation of [XConn].
#[derive(thiserror::Error, Debug)]
pub enum X11rbError {
    /// Unable to establish a connection to the X server
    #[error(transparent)]
    Connect(#[from] ::x11rb::errors::ConnectError),

    /// The X11 connection broke
    #[error(transparent)]
    Connection(#[from] ::x11rb::errors::ConnectionError),

    /// Could not get X11 request reply
    #[error(transparent)]
    ReplyError(#[from] ::x11rb::errors::ReplyError),

    /// Could not get X11 request reply or could not generate_id()
    #[error(transparent)]
    ReplyOrIdError(#[from] ::x11rb::errors::ReplyOrIdError),
}

macro_rules! lift_x11rb_errors {
    ($($err:ty),+) => {
        $(
            impl From<$err> for Error {
                fn from(e: $err) -> Self {
                    Error::X11rb(X11rbError::from(e))
                }
            }
        )+
    };
}

lift_x11rb_errors!(
    ::x11rb::errors::ConnectError,
    ::x11rb::errors::ConnectionError,
    ::x11rb::errors::ReplyError,
    ::x11rb::errors::ReplyOrIdError
);

// The num lock and caps lock combinations that every grab is repeated for
fn lock_variants(mask: u16, numlock: u16) -> [u16; 4] {
    [mask, mask | numlock, mask | LOCK_MASK, mask | numlock | LOCK_MASK]
}

/// Handles communication with an X server via the x11rb crate.
#[derive(Debug)]
pub struct Conn<C: Connection> {
    conn: C,
    root: Xid,
    screen: Rect,
    wm_protocols: Atom,
    wm_delete_window: Atom,
    numlock: u16,
    keysyms: HashMap<Keycode, u32>,
    keycodes: HashMap<u32, Vec<Keycode>>,
}

impl Conn<RustConnection> {
    /// Connect to the X server named by `$DISPLAY` using the pure Rust connection.
    pub fn new() -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(None)?;

        Self::new_for_connection(conn, screen_num)
    }
}

impl<C: Connection> Conn<C> {
    /// Register as the window manager for the given screen of an existing connection.
    ///
    /// Fails with [Error::WmAlreadyRunning] if another client already holds substructure
    /// redirection on the root window.
    pub fn new_for_connection(conn: C, screen_num: usize) -> Result<Self> {
        let (root, screen, min_keycode, max_keycode) = {
            let setup = conn.setup();
            let s = setup
                .roots
                .get(screen_num)
                .ok_or_else(|| crate::custom_error!("no X screen with index {}", screen_num))?;
            let r = Rect::new(0, 0, s.width_in_pixels as u32, s.height_in_pixels as u32);

            (s.root, r, setup.min_keycode, setup.max_keycode)
        };

        let aux = ChangeWindowAttributesAux::new()
            .event_mask(EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY);
        match conn.change_window_attributes(root, &aux)?.check() {
            Ok(()) => (),
            Err(ReplyError::X11Error(e)) => {
                debug!(?e, "unable to set substructure redirect on the root window");
                return Err(Error::WmAlreadyRunning);
            }
            Err(e) => return Err(e.into()),
        }

        let wm_protocols = conn.intern_atom(false, b"WM_PROTOCOLS")?;
        let wm_delete_window = conn.intern_atom(false, b"WM_DELETE_WINDOW")?;
        let wm_protocols = wm_protocols.reply()?.atom;
        let wm_delete_window = wm_delete_window.reply()?.atom;

        let mapping = conn
            .get_keyboard_mapping(min_keycode, max_keycode - min_keycode + 1)?
            .reply()?;
        let per_keycode = mapping.keysyms_per_keycode.max(1) as usize;

        let mut keysyms = HashMap::new();
        let mut keycodes: HashMap<u32, Vec<Keycode>> = HashMap::new();
        for (i, syms) in mapping.keysyms.chunks(per_keycode).enumerate() {
            let code = min_keycode + i as u8;
            if let Some(&sym) = syms.first().filter(|&&s| s != 0) {
                keysyms.insert(code, sym);
            }
            for &sym in syms.iter().filter(|&&s| s != 0) {
                keycodes.entry(sym).or_default().push(code);
            }
        }

        let numlock = numlock_mask(&conn, keycodes.get(&XK_Num_Lock).map(|v| v.as_slice()))?;
        debug!(root, ?screen, numlock, "connected to X server");

        Ok(Self {
            conn,
            root: Xid(root),
            screen,
            wm_protocols,
            wm_delete_window,
            numlock,
            keysyms,
            keycodes,
        })
    }

    /// Get a handle on the underlying connection.
    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub(crate) fn keysym_for(&self, code: Keycode) -> Option<u32> {
        self.keysyms.get(&code).copied()
    }

    fn grab_button(&self, client: Xid, button: ButtonIndex, mask: ModMask) -> Result<()> {
        self.conn.grab_button(
            false,
            *client,
            EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE,
            GrabMode::ASYNC,
            GrabMode::ASYNC,
            NONE,
            NONE,
            button,
            mask,
        )?;

        Ok(())
    }
}

// Find the modifier bit that the num lock key is mapped to, if any
fn numlock_mask<C: Connection>(conn: &C, numlock_codes: Option<&[Keycode]>) -> Result<u16> {
    let codes = match numlock_codes {
        Some(codes) => codes,
        None => return Ok(0),
    };

    let reply = conn.get_modifier_mapping()?.reply()?;
    let per_mod = (reply.keycodes.len() / 8).max(1);

    for (i, mod_codes) in reply.keycodes.chunks(per_mod).enumerate() {
        if mod_codes.iter().any(|c| *c != 0 && codes.contains(c)) {
            return Ok(1 << i);
        }
    }

    Ok(0)
}

/// Pair each key binding with the keycodes that produce its keysym.
///
/// Bindings whose keysym is missing from the keyboard mapping are skipped with a warning. An
/// error is only returned if none of the bindings can be grabbed.
fn grabbable_keys<'a>(
    keycodes: &'a HashMap<u32, Vec<Keycode>>,
    keys: &'a [KeyCombo],
) -> Result<Vec<(&'a KeyCombo, &'a [Keycode])>> {
    let mut grabbable = Vec::with_capacity(keys.len());

    for k in keys {
        match keycodes.get(&k.keysym) {
            Some(codes) if !codes.is_empty() => grabbable.push((k, codes.as_slice())),
            _ => warn!(keysym = k.keysym, "no keycode for bound keysym: skipping"),
        }
    }

    match (grabbable.is_empty(), keys.first()) {
        (true, Some(k)) => Err(Error::UnknownKeysym { keysym: k.keysym }),
        _ => Ok(grabbable),
    }
}

impl<C: Connection> XConn for Conn<C> {
    fn root(&self) -> Xid {
        self.root
    }

    fn screen_size(&self) -> Result<Rect> {
        Ok(self.screen)
    }

    fn numlock_mask(&self) -> u16 {
        self.numlock
    }

    fn grab_keys(&self, keys: &[KeyCombo]) -> Result<()> {
        let root = *self.root;
        self.conn.ungrab_key(0u8, root, ModMask::ANY)?;

        for (k, codes) in grabbable_keys(&self.keycodes, keys)? {
            for &code in codes {
                for mask in lock_variants(k.mask, self.numlock) {
                    self.conn.grab_key(
                        false,
                        root,
                        ModMask::from(mask),
                        code,
                        GrabMode::ASYNC,
                        GrabMode::ASYNC,
                    )?;
                }
            }
        }

        Ok(())
    }

    fn grab_buttons(&self, client: Xid, grab: ButtonGrab<'_>) -> Result<()> {
        self.conn.ungrab_button(ButtonIndex::ANY, *client, ModMask::ANY)?;

        match grab {
            ButtonGrab::Any => self.grab_button(client, ButtonIndex::ANY, ModMask::ANY),

            ButtonGrab::Bindings(states) => {
                for s in states {
                    let button = ButtonIndex::from(u8::from(s.button));
                    for mask in lock_variants(s.mask, self.numlock) {
                        self.grab_button(client, button, ModMask::from(mask))?;
                    }
                }

                Ok(())
            }
        }
    }

    fn grab_pointer(&self) -> Result<()> {
        let reply = self
            .conn
            .grab_pointer(
                false,
                *self.root,
                EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                NONE,
                NONE,
                CURRENT_TIME,
            )?
            .reply()?;

        if reply.status != xproto::GrabStatus::SUCCESS {
            return Err(crate::custom_error!("unable to grab pointer: {:?}", reply.status));
        }

        Ok(())
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.conn.ungrab_pointer(CURRENT_TIME)?;

        Ok(())
    }

    fn next_event(&self) -> Result<XEvent> {
        loop {
            let event = self.conn.wait_for_event()?;
            if let Some(event) = convert_event(self, event) {
                trace!(?event, "received event");
                return Ok(event);
            }
        }
    }

    fn flush(&self) {
        if let Err(e) = self.conn.flush() {
            warn!(%e, "unable to flush X connection");
        }
    }

    fn client_geometry(&self, client: Xid) -> Result<Rect> {
        let g = self.conn.get_geometry(*client)?.reply()?;

        Ok(Rect::new(g.x as i32, g.y as i32, g.width as u32, g.height as u32))
    }

    fn size_hints(&self, client: Xid) -> Result<SizeHints> {
        let reply = self
            .conn
            .get_property(
                false,
                *client,
                AtomEnum::WM_NORMAL_HINTS,
                AtomEnum::WM_SIZE_HINTS,
                0,
                18,
            )?
            .reply()?;

        let raw: Vec<u32> = reply.value32().map(|v| v.collect()).unwrap_or_default();

        Ok(parse_size_hints(&raw))
    }

    fn existing_clients(&self) -> Result<Vec<Xid>> {
        let tree = self.conn.query_tree(*self.root)?.reply()?;

        Ok(tree.children.into_iter().map(Xid).collect())
    }

    fn get_window_attributes(&self, client: Xid) -> Result<WindowAttributes> {
        let r = self.conn.get_window_attributes(*client)?.reply()?;
        let map_state = if r.map_state == xproto::MapState::VIEWABLE {
            MapState::Viewable
        } else if r.map_state == xproto::MapState::UNVIEWABLE {
            MapState::UnViewable
        } else {
            MapState::Unmapped
        };

        Ok(WindowAttributes::new(r.override_redirect, map_state))
    }

    fn map(&self, client: Xid) -> Result<()> {
        self.conn.map_window(*client)?;

        Ok(())
    }

    fn unmap(&self, client: Xid) -> Result<()> {
        self.conn.unmap_window(*client)?;

        Ok(())
    }

    fn kill(&self, client: Xid) -> Result<()> {
        self.conn.kill_client(*client)?;

        Ok(())
    }

    fn focus(&self, client: Xid) -> Result<()> {
        self.conn
            .set_input_focus(InputFocus::POINTER_ROOT, *client, CURRENT_TIME)?;

        Ok(())
    }

    fn set_client_attributes(&self, client: Xid, attrs: &[ClientAttr]) -> Result<()> {
        let aux = attrs
            .iter()
            .fold(ChangeWindowAttributesAux::new(), |aux, a| match a {
                ClientAttr::BorderColor(c) => aux.border_pixel(*c),
            });
        self.conn.change_window_attributes(*client, &aux)?;

        Ok(())
    }

    fn set_client_config(&self, client: Xid, data: &[ClientConfig]) -> Result<()> {
        let aux = data.iter().fold(ConfigureWindowAux::new(), |aux, c| match c {
            ClientConfig::BorderPx(px) => aux.border_width(*px),
            ClientConfig::Position(r) => aux.x(r.x).y(r.y).width(r.w.max(1)).height(r.h.max(1)),
            ClientConfig::X(x) => aux.x(*x),
            ClientConfig::Y(y) => aux.y(*y),
            ClientConfig::Width(w) => aux.width((*w).max(1)),
            ClientConfig::Height(h) => aux.height((*h).max(1)),
            ClientConfig::Sibling(id) => aux.sibling(**id),
            ClientConfig::StackMode(m) => aux.stack_mode(to_x11rb_stack_mode(*m)),
        });
        self.conn.configure_window(*client, &aux)?;

        Ok(())
    }

    fn supports_wm_delete(&self, client: Xid) -> Result<bool> {
        let reply = self
            .conn
            .get_property(false, *client, self.wm_protocols, AtomEnum::ATOM, 0, 1024)?
            .reply()?;

        Ok(reply
            .value32()
            .map(|mut atoms| atoms.any(|a| a == self.wm_delete_window))
            .unwrap_or(false))
    }

    fn send_wm_delete(&self, client: Xid) -> Result<()> {
        let data = [self.wm_delete_window, CURRENT_TIME, 0, 0, 0];
        let event = ClientMessageEvent::new(32, *client, self.wm_protocols, data);
        self.conn
            .send_event(false, *client, EventMask::NO_EVENT, event)?;

        Ok(())
    }
}
