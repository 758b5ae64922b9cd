//! Logic for interacting with the X server
use crate::{
    core::bindings::{KeyCombo, MouseState},
    pure::geometry::{Point, Rect, SizeHints},
    Color, Result, Xid,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

pub mod event;
#[cfg(test)]
pub mod mock;

pub use event::{StackMode, XEvent};

/// On screen configuration options for X clients
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClientConfig {
    /// The border width in pixels
    BorderPx(u32),
    /// Absolute size and position on the screen as a [Rect]
    Position(Rect),
    /// Absolute x coordinate
    X(i32),
    /// Absolute y coordinate
    Y(i32),
    /// Width in pixels, excluding the border
    Width(u32),
    /// Height in pixels, excluding the border
    Height(u32),
    /// The sibling to use when applying a [ClientConfig::StackMode]
    Sibling(Xid),
    /// Restack the window
    StackMode(StackMode),
}

/// Attributes for an X11 client window
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientAttr {
    /// Border color as an rgb hex value
    BorderColor(u32),
}

/// Which pointer buttons should be grabbed on a client window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonGrab<'a> {
    /// Every button with any modifiers so that clicking the window can focus it
    Any,
    /// Only the configured mouse bindings
    Bindings(&'a [MouseState]),
}

/// The map state of an X window
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapState {
    /// The window is not mapped
    Unmapped,
    /// The window is mapped but an ancestor is not
    UnViewable,
    /// The window is mapped and visible
    Viewable,
}

/// The subset of X window attributes that are used when deciding whether to manage a window
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowAttributes {
    /// Whether the window has asked to bypass the window manager
    pub override_redirect: bool,
    /// The current map state of the window
    pub map_state: MapState,
}

impl WindowAttributes {
    /// Create a new [WindowAttributes]
    pub fn new(override_redirect: bool, map_state: MapState) -> Self {
        Self {
            override_redirect,
            map_state,
        }
    }
}

/// A handle on a running X11 connection that we can use for issuing X requests.
///
/// XConn is the only way the window manager talks to the display server, which allows the
/// event handling logic to be driven by a mock connection in tests.
pub trait XConn {
    /// The ID of the window manager root window.
    fn root(&self) -> Xid;
    /// The dimensions of the screen being managed.
    fn screen_size(&self) -> Result<Rect>;
    /// The modifier bit currently assigned to num lock.
    fn numlock_mask(&self) -> u16;

    /// Grab the given key combinations on the root window, intercepting them for processing
    /// within the window manager itself.
    fn grab_keys(&self, keys: &[KeyCombo]) -> Result<()>;
    /// Replace the passive button grabs held on a client window.
    fn grab_buttons(&self, client: Xid, grab: ButtonGrab<'_>) -> Result<()>;
    /// Actively grab the pointer so that motion and release events are delivered to us.
    fn grab_pointer(&self) -> Result<()>;
    /// Release an active pointer grab.
    fn ungrab_pointer(&self) -> Result<()>;

    /// Block and wait for the next event from the X server so it can be processed.
    fn next_event(&self) -> Result<XEvent>;
    /// Flush any pending requests to the X server.
    fn flush(&self);

    /// Look up the current dimensions and position of a given client window.
    fn client_geometry(&self, client: Xid) -> Result<Rect>;
    /// Look up the size constraints a client has set in its `WM_NORMAL_HINTS`.
    fn size_hints(&self, client: Xid) -> Result<SizeHints>;
    /// Ask the X server for the IDs of all current children of the root window.
    fn existing_clients(&self) -> Result<Vec<Xid>>;
    /// Request the [WindowAttributes] for a given client window from the X server.
    fn get_window_attributes(&self, client: Xid) -> Result<WindowAttributes>;

    /// Map the given client window to the screen with its current geometry, making it visible.
    fn map(&self, client: Xid) -> Result<()>;
    /// Unmap the given client window from the screen, hiding it.
    fn unmap(&self, client: Xid) -> Result<()>;
    /// Forcibly disconnect the client owning the given window.
    fn kill(&self, client: Xid) -> Result<()>;
    /// Set X input focus to be held by the given client window.
    fn focus(&self, client: Xid) -> Result<()>;

    /// Set one or more [ClientAttr] for a given client window.
    fn set_client_attributes(&self, client: Xid, attrs: &[ClientAttr]) -> Result<()>;
    /// Set the [ClientConfig] for a given client window.
    fn set_client_config(&self, client: Xid, data: &[ClientConfig]) -> Result<()>;

    /// Whether the client lists `WM_DELETE_WINDOW` in its `WM_PROTOCOLS`.
    fn supports_wm_delete(&self, client: Xid) -> Result<bool>;
    /// Send a `WM_DELETE_WINDOW` client message to the given client.
    fn send_wm_delete(&self, client: Xid) -> Result<()>;
}

/// Extended functionality for [XConn] impls built from the required methods.
pub trait XConnExt: XConn + Sized {
    /// Ask a client to close, falling back to killing it if it does not support
    /// `WM_DELETE_WINDOW`.
    fn close_client(&self, client: Xid) -> Result<()> {
        if self.supports_wm_delete(client)? {
            trace!(%client, "sending WM_DELETE_WINDOW");
            self.send_wm_delete(client)
        } else {
            trace!(%client, "client does not support WM_DELETE_WINDOW: killing");
            self.kill(client)
        }
    }

    /// Update the border color of the given client window.
    fn set_client_border_color<C>(&self, client: Xid, color: C) -> Result<()>
    where
        C: Into<Color>,
    {
        let color = color.into();
        self.set_client_attributes(client, &[ClientAttr::BorderColor(color.rgb_u32())])
    }

    /// Move a client so that its top left corner is at `p`.
    fn move_client(&self, client: Xid, p: Point) -> Result<()> {
        self.set_client_config(client, &[ClientConfig::X(p.x), ClientConfig::Y(p.y)])
    }

    /// Resize a client without moving it.
    fn resize_client(&self, client: Xid, w: u32, h: u32) -> Result<()> {
        self.set_client_config(client, &[ClientConfig::Width(w), ClientConfig::Height(h)])
    }

    /// Raise a client to the top of the stacking order.
    fn raise_client(&self, client: Xid) -> Result<()> {
        self.set_client_config(client, &[ClientConfig::StackMode(StackMode::Above)])
    }
}

impl<T> XConnExt for T where T: XConn {}
