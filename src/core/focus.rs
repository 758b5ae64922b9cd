//! Moving focus between the clients of a workspace.
//!
//! The focused client of a workspace is always the head of its ring. Changing focus is done in
//! three steps which must run in order: clear the focus visuals of the current head, move the
//! head, then apply the focus visuals to the new head.
use crate::{
    core::State,
    pure::ClientKey,
    x::{ButtonGrab, XConn, XConnExt},
    Error, Result,
};
use tracing::trace;

/// Mark the focused client of workspace `wix` as unfocused. Does nothing if the workspace
/// has no clients.
pub fn unfocus<X: XConn>(wix: usize, state: &State, x: &X) -> Result<()> {
    let id = match state.registry.focused(wix) {
        Some(c) => c.id,
        None => return Ok(()),
    };

    trace!(%id, wix, "unfocusing client");
    x.set_client_border_color(id, state.config.normal_border)?;
    x.grab_buttons(id, ButtonGrab::Any)
}

/// Mark the focused client of workspace `wix` as focused: raise it, give it input focus and
/// grab only the configured mouse bindings on it.
pub fn apply<X: XConn>(wix: usize, state: &State, x: &X) -> Result<()> {
    let id = state
        .registry
        .focused(wix)
        .map(|c| c.id)
        .ok_or(Error::EmptyWorkspace { wix })?;

    trace!(%id, wix, "focusing client");
    x.set_client_border_color(id, state.config.focused_border)?;
    x.raise_client(id)?;
    x.focus(id)?;
    let states: Vec<_> = state.config.button_bindings.iter().map(|b| b.state).collect();
    x.grab_buttons(id, ButtonGrab::Bindings(&states))
}

/// Make the client for `key` the focused client of its workspace.
pub fn focus_client<X: XConn>(key: ClientKey, state: &mut State, x: &X) -> Result<()> {
    let wix = state
        .registry
        .workspace_of(key)
        .ok_or_else(|| crate::custom_error!("attempt to focus a removed client"))?;

    if state.registry.focused_key(wix) == Some(key) {
        return Ok(());
    }

    unfocus(wix, state, x)?;
    state.registry.set_focused(key)?;
    apply(wix, state, x)
}

/// Move focus to the next (or with `reverse`, previous) client in the ring of the current
/// workspace. Does nothing if there are fewer than two clients.
pub fn focus_adjacent<X: XConn>(reverse: bool, state: &mut State, x: &X) -> Result<()> {
    let wix = state.current;
    if state.registry.len(wix) < 2 {
        return Ok(());
    }

    let head = state
        .registry
        .focused_key(wix)
        .ok_or(Error::EmptyWorkspace { wix })?;
    let target = if reverse {
        state.registry.prev_key(head)
    } else {
        state.registry.next_key(head)
    };

    match target {
        Some(key) => focus_client(key, state, x),
        None => Err(crate::custom_error!("ring for workspace {} has a dangling link", wix)),
    }
}
