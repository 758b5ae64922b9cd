//! Switching between workspaces and moving clients between them.
//!
//! Only the current workspace is ever mapped: every other workspace has all of its clients
//! unmapped.
use crate::{
    core::{drag, focus, State},
    x::XConn,
    Error, Result,
};
use tracing::{debug, info};

fn check_index(n: usize, state: &State) -> Result<()> {
    let n_workspaces = state.registry.n_workspaces();
    if n >= n_workspaces {
        return Err(Error::UnknownWorkspace { wix: n, n: n_workspaces });
    }

    Ok(())
}

/// Make workspace `n` the current workspace.
///
/// All clients of the current workspace are unmapped, all clients of workspace `n` are
/// mapped and the focused client of `n` (if there is one) is given focus.
pub fn switch_to<X: XConn>(n: usize, state: &mut State, x: &X) -> Result<()> {
    check_index(n, state)?;
    if n == state.current {
        return Ok(());
    }

    info!(from = state.current, to = n, "switching workspace");
    drag::cancel(state, x)?;

    for id in state.registry.ids(state.current) {
        x.unmap(id)?;
    }

    for id in state.registry.ids(n) {
        x.map(id)?;
    }

    state.current = n;
    if !state.registry.is_empty(n) {
        focus::apply(n, state, x)?;
    }

    Ok(())
}

/// Move the focused client of the current workspace to workspace `n` where it becomes the
/// focused client. The moved client is unmapped.
pub fn send_focused_to<X: XConn>(n: usize, state: &mut State, x: &X) -> Result<()> {
    check_index(n, state)?;
    let wix = state.current;
    if n == wix || state.registry.is_empty(wix) {
        return Ok(());
    }

    drag::cancel(state, x)?;
    let client = state.registry.remove_focused(wix)?;
    debug!(id = %client.id, from = wix, to = n, "sending client to workspace");

    focus::unfocus(n, state, x)?;
    state.registry.insert(client, n)?;
    x.unmap(client.id)?;

    if !state.registry.is_empty(wix) {
        focus::apply(wix, state, x)?;
    }

    Ok(())
}

/// Switch to the next workspace, wrapping around after the last.
pub fn next<X: XConn>(state: &mut State, x: &X) -> Result<()> {
    check_index(state.current, state)?;
    let n = (state.current + 1) % state.registry.n_workspaces();

    switch_to(n, state, x)
}

/// Switch to the previous workspace, wrapping around before the first.
pub fn previous<X: XConn>(state: &mut State, x: &X) -> Result<()> {
    check_index(state.current, state)?;
    let n_workspaces = state.registry.n_workspaces();
    let n = (state.current + n_workspaces - 1) % n_workspaces;

    switch_to(n, state, x)
}
