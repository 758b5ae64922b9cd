//! Moving and resizing the focused client with the pointer.
use crate::{
    core::{maximize, State},
    pure::{
        geometry::Point,
        sanitize::{sanitize_dimensions, sanitize_position},
        ClientKey,
    },
    x::{XConn, XConnExt},
    Error, Result,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// The kind of drag being started
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    /// Move the client
    Move,
    /// Resize the client from its bottom right corner
    Resize,
}

/// The current pointer drag, if any.
///
/// Active drags remember the client being dragged along with the last root position of the
/// pointer so that each motion event can be applied as a delta.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Drag {
    /// No drag in progress
    #[default]
    Idle,
    /// The client is following the pointer
    Moving {
        /// The client being moved
        client: ClientKey,
        /// Last known pointer position
        last: Point,
    },
    /// The client's bottom right corner is following the pointer
    Resizing {
        /// The client being resized
        client: ClientKey,
        /// Last known pointer position
        last: Point,
    },
}

impl Drag {
    /// Whether a drag is in progress
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Start dragging the focused client of the current workspace from the pointer position `at`.
pub fn begin<X: XConn>(kind: DragKind, at: Point, state: &mut State, x: &X) -> Result<()> {
    if state.drag.is_active() {
        return Err(Error::AlreadyDragging);
    }

    let wix = state.current;
    let client = state
        .registry
        .focused_key(wix)
        .ok_or(Error::EmptyWorkspace { wix })?;

    x.grab_pointer()?;
    state.drag = match kind {
        DragKind::Move => Drag::Moving { client, last: at },
        DragKind::Resize => Drag::Resizing { client, last: at },
    };
    trace!(?kind, ?at, "drag started");

    Ok(())
}

/// Apply pointer motion to the client being dragged.
///
/// A maximized client is restored before the first delta is applied to it. If the client being
/// dragged is no longer the focused client of the current workspace the drag is abandoned.
pub fn motion<X: XConn>(at: Point, state: &mut State, x: &X) -> Result<()> {
    let (kind, key, last) = match state.drag {
        Drag::Idle => return Err(Error::NotDragging),
        Drag::Moving { client, last } => (DragKind::Move, client, last),
        Drag::Resizing { client, last } => (DragKind::Resize, client, last),
    };

    if state.registry.focused_key(state.current) != Some(key) {
        debug!("dragged client is no longer focused: ending drag");
        return end(state, x);
    }

    maximize::restore(key, state, x)?;

    let (dx, dy) = at - last;
    state.drag = match kind {
        DragKind::Move => Drag::Moving { client: key, last: at },
        DragKind::Resize => Drag::Resizing { client: key, last: at },
    };

    let (screen, border) = (state.screen, state.config.border_width);
    let c = state.registry.get_mut(key).ok_or(Error::NotDragging)?;

    match kind {
        DragKind::Move => {
            c.r.reposition(dx, dy);
            sanitize_position(c, &screen, border);
            x.move_client(c.id, c.r.origin())
        }

        DragKind::Resize => {
            c.r.resize(dx, dy);
            sanitize_dimensions(c, &screen, border);
            x.resize_client(c.id, c.r.w, c.r.h)
        }
    }
}

/// Finish the current drag. A release with no drag in progress is ignored.
pub fn release<X: XConn>(state: &mut State, x: &X) -> Result<()> {
    if !state.drag.is_active() {
        trace!("button release with no active drag");
        return Ok(());
    }

    end(state, x)
}

/// Abandon any drag in progress, releasing the pointer grab.
pub fn cancel<X: XConn>(state: &mut State, x: &X) -> Result<()> {
    if state.drag.is_active() {
        debug!("cancelling active drag");
        end(state, x)?;
    }

    Ok(())
}

fn end<X: XConn>(state: &mut State, x: &X) -> Result<()> {
    state.drag = Drag::Idle;
    x.ungrab_pointer()
}
