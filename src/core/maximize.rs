//! Maximizing clients to cover the whole screen.
use crate::{
    core::State,
    pure::ClientKey,
    x::{ClientConfig, XConn},
    Result,
};
use tracing::debug;

/// Maximize the focused client of the current workspace, or restore it if it is already
/// maximized. Does nothing if the workspace is empty.
pub fn toggle<X: XConn>(state: &mut State, x: &X) -> Result<()> {
    let key = match state.registry.focused_key(state.current) {
        Some(key) => key,
        None => return Ok(()),
    };

    let maximized = state
        .registry
        .get(key)
        .map(|c| c.maximized)
        .ok_or_else(|| crate::custom_error!("focused client is missing from the registry"))?;

    if maximized {
        restore(key, state, x)
    } else {
        maximize(key, state, x)
    }
}

/// Cover the whole screen with the given client and remove its border. The geometry it had
/// beforehand is kept so that it can be restored.
pub fn maximize<X: XConn>(key: ClientKey, state: &mut State, x: &X) -> Result<()> {
    let screen = state.screen;
    let c = state
        .registry
        .get_mut(key)
        .ok_or_else(|| crate::custom_error!("attempt to maximize a removed client"))?;

    if c.maximize() {
        debug!(id = %c.id, "maximizing client");
        x.set_client_config(c.id, &[ClientConfig::Position(screen), ClientConfig::BorderPx(0)])?;
    }

    Ok(())
}

/// Return a maximized client to its stored geometry and the configured border width. Clients
/// that are not maximized are left alone.
pub fn restore<X: XConn>(key: ClientKey, state: &mut State, x: &X) -> Result<()> {
    let border = state.config.border_width;
    let c = state
        .registry
        .get_mut(key)
        .ok_or_else(|| crate::custom_error!("attempt to restore a removed client"))?;

    if let Some(r) = c.restore() {
        debug!(id = %c.id, ?r, "restoring client");
        x.set_client_config(c.id, &[ClientConfig::Position(r), ClientConfig::BorderPx(border)])?;
    }

    Ok(())
}
