//! A mock implementation of XConn that is easier to implement for
//! use in tests.
//! This module and its contents are only available when testing.
use crate::{
    core::bindings::{KeyCombo, MouseState},
    custom_error,
    pure::geometry::{Rect, SizeHints},
    x::{
        ButtonGrab, ClientAttr, ClientConfig, MapState, WindowAttributes, XConn, XEvent,
    },
    Result, Xid,
};
use std::{
    cell::RefCell,
    collections::{HashMap, HashSet, VecDeque},
};

/// All methods on this trait that return a Result unimplemented by
/// default unless an implementation is provided.
/// The `mock_root` method always returns id 0, `mock_numlock_mask` returns Mod2 and
/// `mock_flush` by default is a no-op.
///
/// Any implementation of `MockXConn` will automatically implement `XConn` by forwarding on
/// calls to `$method` to `mock_$method`.
#[allow(unused_variables)]
pub trait MockXConn {
    fn mock_root(&self) -> Xid {
        Xid(0)
    }

    fn mock_screen_size(&self) -> Result<Rect> {
        unimplemented!("mock_screen_size")
    }

    fn mock_numlock_mask(&self) -> u16 {
        1 << 4
    }

    fn mock_grab_keys(&self, keys: &[KeyCombo]) -> Result<()> {
        unimplemented!("mock_grab_keys")
    }

    fn mock_grab_buttons(&self, client: Xid, grab: ButtonGrab<'_>) -> Result<()> {
        unimplemented!("mock_grab_buttons")
    }

    fn mock_grab_pointer(&self) -> Result<()> {
        unimplemented!("mock_grab_pointer")
    }

    fn mock_ungrab_pointer(&self) -> Result<()> {
        unimplemented!("mock_ungrab_pointer")
    }

    fn mock_next_event(&self) -> Result<XEvent> {
        unimplemented!("mock_next_event")
    }

    fn mock_flush(&self) {}

    fn mock_client_geometry(&self, client: Xid) -> Result<Rect> {
        unimplemented!("mock_client_geometry")
    }

    fn mock_size_hints(&self, client: Xid) -> Result<SizeHints> {
        unimplemented!("mock_size_hints")
    }

    fn mock_existing_clients(&self) -> Result<Vec<Xid>> {
        unimplemented!("mock_existing_clients")
    }

    fn mock_get_window_attributes(&self, client: Xid) -> Result<WindowAttributes> {
        unimplemented!("mock_get_window_attributes")
    }

    fn mock_map(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_map")
    }

    fn mock_unmap(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_unmap")
    }

    fn mock_kill(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_kill")
    }

    fn mock_focus(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_focus")
    }

    fn mock_set_client_attributes(&self, client: Xid, attrs: &[ClientAttr]) -> Result<()> {
        unimplemented!("mock_set_client_attributes")
    }

    fn mock_set_client_config(&self, client: Xid, data: &[ClientConfig]) -> Result<()> {
        unimplemented!("mock_set_client_config")
    }

    fn mock_supports_wm_delete(&self, client: Xid) -> Result<bool> {
        unimplemented!("mock_supports_wm_delete")
    }

    fn mock_send_wm_delete(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_send_wm_delete")
    }
}

impl<T> XConn for T
where
    T: MockXConn,
{
    fn root(&self) -> Xid {
        self.mock_root()
    }

    fn screen_size(&self) -> Result<Rect> {
        self.mock_screen_size()
    }

    fn numlock_mask(&self) -> u16 {
        self.mock_numlock_mask()
    }

    fn grab_keys(&self, keys: &[KeyCombo]) -> Result<()> {
        self.mock_grab_keys(keys)
    }

    fn grab_buttons(&self, client: Xid, grab: ButtonGrab<'_>) -> Result<()> {
        self.mock_grab_buttons(client, grab)
    }

    fn grab_pointer(&self) -> Result<()> {
        self.mock_grab_pointer()
    }

    fn ungrab_pointer(&self) -> Result<()> {
        self.mock_ungrab_pointer()
    }

    fn next_event(&self) -> Result<XEvent> {
        self.mock_next_event()
    }

    fn flush(&self) {
        self.mock_flush()
    }

    fn client_geometry(&self, client: Xid) -> Result<Rect> {
        self.mock_client_geometry(client)
    }

    fn size_hints(&self, client: Xid) -> Result<SizeHints> {
        self.mock_size_hints(client)
    }

    fn existing_clients(&self) -> Result<Vec<Xid>> {
        self.mock_existing_clients()
    }

    fn get_window_attributes(&self, client: Xid) -> Result<WindowAttributes> {
        self.mock_get_window_attributes(client)
    }

    fn map(&self, client: Xid) -> Result<()> {
        self.mock_map(client)
    }

    fn unmap(&self, client: Xid) -> Result<()> {
        self.mock_unmap(client)
    }

    fn kill(&self, client: Xid) -> Result<()> {
        self.mock_kill(client)
    }

    fn focus(&self, client: Xid) -> Result<()> {
        self.mock_focus(client)
    }

    fn set_client_attributes(&self, client: Xid, attrs: &[ClientAttr]) -> Result<()> {
        self.mock_set_client_attributes(client, attrs)
    }

    fn set_client_config(&self, client: Xid, data: &[ClientConfig]) -> Result<()> {
        self.mock_set_client_config(client, data)
    }

    fn supports_wm_delete(&self, client: Xid) -> Result<bool> {
        self.mock_supports_wm_delete(client)
    }

    fn send_wm_delete(&self, client: Xid) -> Result<()> {
        self.mock_send_wm_delete(client)
    }
}

/// A request made against a [RecordingXConn]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GrabKeys(Vec<KeyCombo>),
    GrabAnyButton(Xid),
    GrabBindings(Xid, Vec<MouseState>),
    GrabPointer,
    UngrabPointer,
    Map(Xid),
    Unmap(Xid),
    Kill(Xid),
    Focus(Xid),
    Attrs(Xid, Vec<ClientAttr>),
    Config(Xid, Vec<ClientConfig>),
    WmDelete(Xid),
}

/// An [XConn] that replays a fixed list of events and records every request made against it.
///
/// Windows default to a 100x100 geometry at the origin with no size hints. Once the queued
/// events run out `next_event` returns an error.
#[derive(Debug)]
pub struct RecordingXConn {
    pub screen: Rect,
    pub geometry: HashMap<Xid, Rect>,
    pub hints: HashMap<Xid, SizeHints>,
    pub override_redirect: HashSet<Xid>,
    pub unmapped: HashSet<Xid>,
    pub supports_delete: HashSet<Xid>,
    pub existing: Vec<Xid>,
    pub events: RefCell<VecDeque<XEvent>>,
    pub calls: RefCell<Vec<Call>>,
}

impl Default for RecordingXConn {
    fn default() -> Self {
        Self {
            screen: Rect::new(0, 0, 1920, 1080),
            geometry: HashMap::new(),
            hints: HashMap::new(),
            override_redirect: HashSet::new(),
            unmapped: HashSet::new(),
            supports_delete: HashSet::new(),
            existing: Vec::new(),
            events: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl RecordingXConn {
    pub fn with_events(events: Vec<XEvent>) -> Self {
        Self {
            events: RefCell::new(events.into()),
            ..Default::default()
        }
    }

    /// Take all calls recorded so far, leaving the record empty.
    pub fn take_calls(&self) -> Vec<Call> {
        self.calls.take()
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl MockXConn for RecordingXConn {
    fn mock_screen_size(&self) -> Result<Rect> {
        Ok(self.screen)
    }

    fn mock_grab_keys(&self, keys: &[KeyCombo]) -> Result<()> {
        self.record(Call::GrabKeys(keys.to_vec()))
    }

    fn mock_grab_buttons(&self, client: Xid, grab: ButtonGrab<'_>) -> Result<()> {
        match grab {
            ButtonGrab::Any => self.record(Call::GrabAnyButton(client)),
            ButtonGrab::Bindings(states) => self.record(Call::GrabBindings(client, states.to_vec())),
        }
    }

    fn mock_grab_pointer(&self) -> Result<()> {
        self.record(Call::GrabPointer)
    }

    fn mock_ungrab_pointer(&self) -> Result<()> {
        self.record(Call::UngrabPointer)
    }

    fn mock_next_event(&self) -> Result<XEvent> {
        self.events
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| custom_error!("no more events"))
    }

    fn mock_client_geometry(&self, client: Xid) -> Result<Rect> {
        Ok(self
            .geometry
            .get(&client)
            .copied()
            .unwrap_or(Rect::new(0, 0, 100, 100)))
    }

    fn mock_size_hints(&self, client: Xid) -> Result<SizeHints> {
        Ok(self.hints.get(&client).copied().unwrap_or_default())
    }

    fn mock_existing_clients(&self) -> Result<Vec<Xid>> {
        Ok(self.existing.clone())
    }

    fn mock_get_window_attributes(&self, client: Xid) -> Result<WindowAttributes> {
        let map_state = if self.unmapped.contains(&client) {
            MapState::Unmapped
        } else {
            MapState::Viewable
        };

        Ok(WindowAttributes::new(
            self.override_redirect.contains(&client),
            map_state,
        ))
    }

    fn mock_map(&self, client: Xid) -> Result<()> {
        self.record(Call::Map(client))
    }

    fn mock_unmap(&self, client: Xid) -> Result<()> {
        self.record(Call::Unmap(client))
    }

    fn mock_kill(&self, client: Xid) -> Result<()> {
        self.record(Call::Kill(client))
    }

    fn mock_focus(&self, client: Xid) -> Result<()> {
        self.record(Call::Focus(client))
    }

    fn mock_set_client_attributes(&self, client: Xid, attrs: &[ClientAttr]) -> Result<()> {
        self.record(Call::Attrs(client, attrs.to_vec()))
    }

    fn mock_set_client_config(&self, client: Xid, data: &[ClientConfig]) -> Result<()> {
        self.record(Call::Config(client, data.to_vec()))
    }

    fn mock_supports_wm_delete(&self, client: Xid) -> Result<bool> {
        Ok(self.supports_delete.contains(&client))
    }

    fn mock_send_wm_delete(&self, client: Xid) -> Result<()> {
        self.record(Call::WmDelete(client))
    }
}
