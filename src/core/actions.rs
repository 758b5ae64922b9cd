//! Running the actions bound to keys and mouse buttons.
use crate::{
    core::{
        bindings::Action,
        drag::{self, DragKind},
        focus, maximize, workspace, State,
    },
    custom_error,
    pure::geometry::Point,
    util::spawn,
    x::{XConn, XConnExt},
    Result,
};
use tracing::{debug, info};

/// Run `action` against the current state.
///
/// Drag actions need the root position of the pointer at the time of the triggering button
/// press and fail if `pointer` is `None`.
pub fn run<X: XConn>(action: &Action, pointer: Option<Point>, state: &mut State, x: &X) -> Result<()> {
    debug!(?action, "running action");

    match action {
        Action::Spawn(argv) => spawn(argv),

        Action::KillFocused => match state.registry.focused(state.current) {
            Some(c) => x.close_client(c.id),
            None => Ok(()),
        },

        Action::ToggleMaximize => maximize::toggle(state, x),
        Action::FocusNext => focus::focus_adjacent(false, state, x),
        Action::FocusPrevious => focus::focus_adjacent(true, state, x),
        Action::SwitchWorkspace(n) => workspace::switch_to(*n, state, x),
        Action::SendToWorkspace(n) => workspace::send_focused_to(*n, state, x),
        Action::NextWorkspace => workspace::next(state, x),
        Action::PreviousWorkspace => workspace::previous(state, x),

        Action::MouseMove | Action::MouseResize => {
            let at = pointer.ok_or_else(|| custom_error!("{:?} requires a pointer position", action))?;
            let kind = if *action == Action::MouseMove {
                DragKind::Move
            } else {
                DragKind::Resize
            };

            drag::begin(kind, at, state, x)
        }

        Action::Quit => {
            info!("quit requested");
            state.running = false;
            Ok(())
        }
    }
}
