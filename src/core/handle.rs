//! Handlers for the X events that the window manager acts on.
use crate::{
    core::{
        actions,
        bindings::{match_button, match_key, KeyCombo, ModifierKey},
        focus, State,
    },
    pure::{
        sanitize::{sanitize_dimensions, sanitize_position},
        Client,
    },
    x::{
        event::{ButtonEvent, ConfigureMask, ConfigureRequestEvent, UnmapEvent},
        ClientConfig, XConn,
    },
    Error, Result, Xid,
};
use tracing::{debug, info, trace};

/// Run the action bound to a key combination, if there is one.
#[tracing::instrument(level = "trace", skip(state, x))]
pub fn keypress<X: XConn>(key: KeyCombo, state: &mut State, x: &X) -> Result<()> {
    let action = match match_key(&state.config.key_bindings, key, x.numlock_mask()) {
        Some(action) => action.clone(),
        None => {
            trace!(?key, held = ?ModifierKey::held_in(key.mask), "no binding for key");
            return Ok(());
        }
    };

    actions::run(&action, None, state, x)
}

/// Focus the clicked client and then run the action bound to the button, if there is one.
///
/// Clicks on the root window itself are ignored.
#[tracing::instrument(level = "trace", skip(state, x))]
pub fn button_press<X: XConn>(e: &ButtonEvent, state: &mut State, x: &X) -> Result<()> {
    let target = if e.id == x.root() {
        match e.child {
            Some(id) => id,
            None => {
                trace!("ignoring click on the root window");
                return Ok(());
            }
        }
    } else {
        e.id
    };

    let key = state
        .registry
        .find(target, state.current)
        .ok_or(Error::UnknownClient(target))?;
    focus::focus_client(key, state, x)?;

    let action = match_button(&state.config.button_bindings, e.state, x.numlock_mask()).cloned();
    match action {
        Some(action) => actions::run(&action, Some(e.root), state, x),
        None => Ok(()),
    }
}

/// Start managing a window that has asked to be mapped.
///
/// Windows that have set override redirect are left alone. A known client asking to be mapped
/// again is shown if it is on the current workspace, otherwise it stays hidden until its
/// workspace is next switched to.
pub fn map_request<X: XConn>(id: Xid, state: &mut State, x: &X) -> Result<()> {
    if let Some((wix, _)) = state.registry.find_any(id) {
        trace!(%id, wix, "map request for a known client");
        if wix == state.current {
            x.map(id)?;
            focus::apply(wix, state, x)?;
        }
        return Ok(());
    }

    if x.get_window_attributes(id)?.override_redirect {
        trace!(%id, "not managing override redirect window");
        return Ok(());
    }

    manage(id, state, x)
}

/// Add a new client to the current workspace, show it and give it focus.
pub fn manage<X: XConn>(id: Xid, state: &mut State, x: &X) -> Result<()> {
    let r = x.client_geometry(id)?;
    let hints = x.size_hints(id)?;
    let mut client = Client::new(id, r, hints);
    sanitize_dimensions(&mut client, &state.screen, state.config.border_width);
    info!(%id, r = ?client.r, "managing new client");

    x.set_client_config(
        id,
        &[
            ClientConfig::Width(client.r.w),
            ClientConfig::Height(client.r.h),
            ClientConfig::BorderPx(state.config.border_width),
        ],
    )?;
    x.map(id)?;

    let wix = state.current;
    focus::unfocus(wix, state, x)?;
    state.registry.insert(client, wix)?;
    focus::apply(wix, state, x)
}

/// Stop managing a window that has been destroyed.
pub fn destroy<X: XConn>(id: Xid, state: &mut State, x: &X) -> Result<()> {
    remove_client(id, state, x)
}

/// Stop managing a window that has unmapped itself.
///
/// Only unmaps sent by clients themselves are acted on: the window manager unmaps every client
/// of a workspace when switching away from it.
pub fn unmap_notify<X: XConn>(e: &UnmapEvent, state: &mut State, x: &X) -> Result<()> {
    if !e.synthetic {
        trace!(id = %e.id, "ignoring server generated unmap");
        return Ok(());
    }

    remove_client(e.id, state, x)
}

fn remove_client<X: XConn>(id: Xid, state: &mut State, x: &X) -> Result<()> {
    let removed = match state.registry.remove_by_id(id) {
        Some(removed) => removed,
        None => {
            trace!(%id, "window is not a managed client");
            return Ok(());
        }
    };

    info!(%id, wix = removed.wix, "removed client");
    if removed.wix == state.current && removed.was_focused && !state.registry.is_empty(removed.wix) {
        focus::apply(removed.wix, state, x)?;
    }

    Ok(())
}

/// Apply the geometry a window has asked for.
///
/// Requests from managed clients are clamped on to the screen before being applied and are
/// ignored entirely while the client is maximized. Requests from windows we do not manage are
/// passed through except for any change to their border width.
#[tracing::instrument(level = "trace", skip(state, x))]
pub fn configure_request<X: XConn>(
    e: &ConfigureRequestEvent,
    state: &mut State,
    x: &X,
) -> Result<()> {
    let key = match state.registry.find_any(e.id) {
        Some((_, key)) => key,
        None => return pass_through(e, x),
    };

    let (screen, border) = (state.screen, state.config.border_width);
    let c = state
        .registry
        .get_mut(key)
        .ok_or(Error::UnknownClient(e.id))?;

    if c.maximized {
        debug!(id = %e.id, "ignoring configure request for maximized client");
        return Ok(());
    }

    if e.mask.contains(ConfigureMask::X) {
        c.r.x = e.r.x;
    }
    if e.mask.contains(ConfigureMask::Y) {
        c.r.y = e.r.y;
    }
    if e.mask.contains(ConfigureMask::WIDTH) {
        c.r.w = e.r.w;
    }
    if e.mask.contains(ConfigureMask::HEIGHT) {
        c.r.h = e.r.h;
    }

    sanitize_position(c, &screen, border);
    sanitize_dimensions(c, &screen, border);

    x.set_client_config(
        c.id,
        &[
            ClientConfig::X(c.r.x),
            ClientConfig::Y(c.r.y),
            ClientConfig::Width(c.r.w),
            ClientConfig::Height(c.r.h),
        ],
    )
}

fn pass_through<X: XConn>(e: &ConfigureRequestEvent, x: &X) -> Result<()> {
    let mut data = Vec::new();

    if e.mask.contains(ConfigureMask::X) {
        data.push(ClientConfig::X(e.r.x));
    }
    if e.mask.contains(ConfigureMask::Y) {
        data.push(ClientConfig::Y(e.r.y));
    }
    if e.mask.contains(ConfigureMask::WIDTH) {
        data.push(ClientConfig::Width(e.r.w));
    }
    if e.mask.contains(ConfigureMask::HEIGHT) {
        data.push(ClientConfig::Height(e.r.h));
    }
    if let (true, Some(sibling)) = (e.mask.contains(ConfigureMask::SIBLING), e.sibling) {
        data.push(ClientConfig::Sibling(sibling));
    }
    if e.mask.contains(ConfigureMask::STACK_MODE) {
        data.push(ClientConfig::StackMode(e.stack_mode));
    }

    if data.is_empty() {
        return Ok(());
    }

    trace!(id = %e.id, ?data, "passing through configure request for unmanaged window");
    x.set_client_config(e.id, &data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{
            bindings::{MouseButton, MouseState},
            tests::{state_with, FOCUSED, NORMAL},
            Drag,
        },
        keysyms::{XK_Tab, XK_f},
        pure::geometry::{Point, Rect, SizeHints},
        x::{
            mock::{Call, RecordingXConn},
            ClientAttr, StackMode,
        },
    };
    use simple_test_case::test_case;

    const NUMLOCK: u16 = 1 << 4;

    fn click(id: u32, child: Option<u32>, button: MouseButton, mods: &[ModifierKey]) -> ButtonEvent {
        ButtonEvent {
            id: Xid(id),
            child: child.map(Xid),
            root: Point::new(10, 10),
            state: MouseState::new(button, mods),
        }
    }

    fn configure(id: u32, mask: ConfigureMask, r: Rect) -> ConfigureRequestEvent {
        ConfigureRequestEvent {
            id: Xid(id),
            mask,
            r,
            border_width: 7,
            sibling: Some(Xid(99)),
            stack_mode: StackMode::Below,
        }
    }

    #[test]
    fn keypress_runs_the_bound_action_ignoring_numlock() {
        let mut state = state_with(&[1, 2]);
        let x = RecordingXConn::default();
        let mut key = KeyCombo::new(&[ModifierKey::Meta], XK_Tab);
        key.mask |= NUMLOCK;

        keypress(key, &mut state, &x).unwrap();

        assert_eq!(state.registry.focused(0).map(|c| c.id), Some(Xid(1)));
    }

    #[test]
    fn keypress_without_a_binding_is_ignored() {
        let mut state = state_with(&[1]);
        let x = RecordingXConn::default();

        keypress(KeyCombo::new(&[ModifierKey::Ctrl], XK_f), &mut state, &x).unwrap();

        assert!(x.take_calls().is_empty());
        assert!(!state.registry.focused(0).unwrap().maximized);
    }

    #[test]
    fn clicking_the_root_window_is_ignored() {
        let mut state = state_with(&[1]);
        let x = RecordingXConn::default();

        let e = click(0, None, MouseButton::Left, &[ModifierKey::Meta]);
        button_press(&e, &mut state, &x).unwrap();

        assert!(x.take_calls().is_empty());
        assert_eq!(state.drag, Drag::Idle);
    }

    #[test]
    fn clicking_an_unfocused_client_focuses_it() {
        let mut state = state_with(&[1, 2]);
        let x = RecordingXConn::default();

        let e = click(1, None, MouseButton::Left, &[]);
        button_press(&e, &mut state, &x).unwrap();

        assert_eq!(state.registry.focused(0).map(|c| c.id), Some(Xid(1)));
        let calls = x.take_calls();
        assert_eq!(calls[0], Call::Attrs(Xid(2), vec![ClientAttr::BorderColor(NORMAL)]));
        assert_eq!(calls[2], Call::Attrs(Xid(1), vec![ClientAttr::BorderColor(FOCUSED)]));
        assert_eq!(state.drag, Drag::Idle);
    }

    #[test]
    fn bound_click_through_the_root_starts_a_drag_on_the_child() {
        let mut state = state_with(&[1, 2]);
        let x = RecordingXConn::default();

        let e = click(0, Some(1), MouseButton::Right, &[ModifierKey::Meta]);
        button_press(&e, &mut state, &x).unwrap();

        let key = state.registry.find(Xid(1), 0).unwrap();
        assert_eq!(
            state.drag,
            Drag::Resizing {
                client: key,
                last: Point::new(10, 10)
            }
        );
        assert_eq!(x.take_calls().last(), Some(&Call::GrabPointer));
    }

    #[test]
    fn clicking_an_unknown_window_is_an_error() {
        let mut state = state_with(&[1]);
        let x = RecordingXConn::default();

        let e = click(42, None, MouseButton::Left, &[]);

        assert!(matches!(
            button_press(&e, &mut state, &x),
            Err(Error::UnknownClient(Xid(42)))
        ));
    }

    #[test]
    fn map_request_manages_and_focuses_the_new_client() {
        let mut state = state_with(&[1]);
        let mut x = RecordingXConn::default();
        x.geometry.insert(Xid(2), Rect::new(0, 0, 2000, 50));

        map_request(Xid(2), &mut state, &x).unwrap();

        assert_eq!(state.registry.ids(0), vec![Xid(2), Xid(1)]);
        assert_eq!(state.registry.focused(0).unwrap().r, Rect::new(0, 0, 1918, 50));

        let calls = x.take_calls();
        assert_eq!(
            &calls[..4],
            &[
                Call::Config(
                    Xid(2),
                    vec![
                        ClientConfig::Width(1918),
                        ClientConfig::Height(50),
                        ClientConfig::BorderPx(1)
                    ]
                ),
                Call::Map(Xid(2)),
                Call::Attrs(Xid(1), vec![ClientAttr::BorderColor(NORMAL)]),
                Call::GrabAnyButton(Xid(1)),
            ]
        );
        assert!(calls.contains(&Call::Focus(Xid(2))));
    }

    #[test]
    fn map_request_respects_size_hints() {
        let mut state = state_with(&[]);
        let mut x = RecordingXConn::default();
        x.hints.insert(Xid(3), SizeHints::default().with_min(300, 200));

        map_request(Xid(3), &mut state, &x).unwrap();

        let r = state.registry.focused(0).unwrap().r;
        assert_eq!((r.w, r.h), (300, 200));
    }

    #[test]
    fn map_request_is_ignored_for_override_redirect() {
        let mut state = state_with(&[1]);
        let mut x = RecordingXConn::default();
        x.override_redirect.insert(Xid(2));

        map_request(Xid(2), &mut state, &x).unwrap();

        assert_eq!(state.registry.ids(0), vec![Xid(1)]);
        assert!(x.take_calls().is_empty());
    }

    #[test]
    fn known_client_on_the_current_workspace_is_mapped_again() {
        let mut state = state_with(&[1, 2]);
        let x = RecordingXConn::default();

        map_request(Xid(1), &mut state, &x).unwrap();

        let calls = x.take_calls();
        assert_eq!(state.registry.ids(0), vec![Xid(2), Xid(1)]);
        assert_eq!(calls[0], Call::Map(Xid(1)));
        assert!(calls.contains(&Call::Focus(Xid(2))));
    }

    #[test]
    fn known_client_on_a_hidden_workspace_stays_hidden() {
        let mut state = state_with(&[1]);
        let c = Client::new(Xid(2), Rect::new(0, 0, 100, 100), SizeHints::default());
        state.registry.insert(c, 3).unwrap();
        let x = RecordingXConn::default();

        map_request(Xid(2), &mut state, &x).unwrap();

        assert_eq!(state.registry.ids(3), vec![Xid(2)]);
        assert!(x.take_calls().is_empty());
    }

    #[test]
    fn destroying_the_focused_client_focuses_the_next() {
        let mut state = state_with(&[1, 2, 3]);
        let x = RecordingXConn::default();

        destroy(Xid(3), &mut state, &x).unwrap();

        assert_eq!(state.registry.ids(0), vec![Xid(2), Xid(1)]);
        assert!(x.take_calls().contains(&Call::Focus(Xid(2))));
    }

    #[test]
    fn destroying_an_unfocused_client_leaves_focus_alone() {
        let mut state = state_with(&[1, 2, 3]);
        let x = RecordingXConn::default();

        destroy(Xid(1), &mut state, &x).unwrap();

        assert_eq!(state.registry.ids(0), vec![Xid(3), Xid(2)]);
        assert!(x.take_calls().is_empty());
    }

    #[test]
    fn destroying_a_client_on_another_workspace_does_not_touch_the_screen() {
        let mut state = state_with(&[1]);
        let c = Client::new(Xid(5), Rect::new(0, 0, 10, 10), SizeHints::default());
        state.registry.insert(c, 4).unwrap();
        let c = Client::new(Xid(6), Rect::new(0, 0, 10, 10), SizeHints::default());
        state.registry.insert(c, 4).unwrap();
        let x = RecordingXConn::default();

        destroy(Xid(6), &mut state, &x).unwrap();

        assert_eq!(state.registry.ids(4), vec![Xid(5)]);
        assert!(x.take_calls().is_empty());
    }

    #[test_case(true, vec![]; "client sent unmap")]
    #[test_case(false, vec![Xid(1)]; "server generated unmap")]
    #[test]
    fn unmap_notify(synthetic: bool, remaining: Vec<Xid>) {
        let mut state = state_with(&[1]);
        let x = RecordingXConn::default();

        let e = UnmapEvent {
            id: Xid(1),
            synthetic,
        };
        unmap_notify(&e, &mut state, &x).unwrap();

        assert_eq!(state.registry.ids(0), remaining);
    }

    #[test]
    fn configure_request_for_a_client_is_sanitized() {
        let mut state = state_with(&[1]);
        let x = RecordingXConn::default();

        let mask = ConfigureMask::X | ConfigureMask::WIDTH | ConfigureMask::BORDER_WIDTH;
        let e = configure(1, mask, Rect::new(1900, 500, 300, 7));
        configure_request(&e, &mut state, &x).unwrap();

        // y and height were not in the mask so keep their current values
        let expected = Rect::new(1618, 0, 300, 100);
        assert_eq!(state.registry.focused(0).unwrap().r, expected);
        assert_eq!(
            x.take_calls(),
            vec![Call::Config(
                Xid(1),
                vec![
                    ClientConfig::X(1618),
                    ClientConfig::Y(0),
                    ClientConfig::Width(300),
                    ClientConfig::Height(100)
                ]
            )]
        );
    }

    #[test]
    fn configure_request_for_a_maximized_client_is_ignored() {
        let mut state = state_with(&[1]);
        let key = state.registry.focused_key(0).unwrap();
        state.registry.get_mut(key).unwrap().maximized = true;
        let x = RecordingXConn::default();

        let e = configure(1, ConfigureMask::all(), Rect::new(5, 5, 5, 5));
        configure_request(&e, &mut state, &x).unwrap();

        assert!(x.take_calls().is_empty());
        assert_eq!(state.registry.get(key).unwrap().r, Rect::new(0, 0, 100, 100));
    }

    #[test]
    fn configure_request_for_a_client_on_another_workspace_is_applied() {
        let mut state = state_with(&[]);
        let c = Client::new(Xid(5), Rect::new(0, 0, 10, 10), SizeHints::default());
        state.registry.insert(c, 2).unwrap();
        let x = RecordingXConn::default();

        let e = configure(5, ConfigureMask::HEIGHT, Rect::new(0, 0, 0, 40));
        configure_request(&e, &mut state, &x).unwrap();

        assert_eq!(state.registry.focused(2).unwrap().r, Rect::new(0, 0, 10, 40));
    }

    #[test]
    fn configure_request_for_an_unknown_window_passes_through() {
        let mut state = state_with(&[]);
        let x = RecordingXConn::default();

        let e = configure(8, ConfigureMask::all(), Rect::new(-20, 3000, 5000, 6));
        configure_request(&e, &mut state, &x).unwrap();

        assert_eq!(
            x.take_calls(),
            vec![Call::Config(
                Xid(8),
                vec![
                    ClientConfig::X(-20),
                    ClientConfig::Y(3000),
                    ClientConfig::Width(5000),
                    ClientConfig::Height(6),
                    ClientConfig::Sibling(Xid(99)),
                    ClientConfig::StackMode(StackMode::Below),
                ]
            )]
        );
    }

    #[test]
    fn border_only_configure_request_for_an_unknown_window_is_dropped() {
        let mut state = state_with(&[]);
        let x = RecordingXConn::default();

        let e = configure(8, ConfigureMask::BORDER_WIDTH, Rect::default());
        configure_request(&e, &mut state, &x).unwrap();

        assert!(x.take_calls().is_empty());
    }
}
