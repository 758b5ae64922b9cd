//! The per-window state tracked for each managed client
use crate::{
    pure::geometry::{Rect, SizeHints},
    Xid,
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A managed top level window.
///
/// While a client is maximized it is drawn covering the whole screen but `r` continues to hold
/// the geometry it will be restored to: nothing should modify `r` while `maximized` is set.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Client {
    /// The X11 window ID of this client
    pub id: Xid,
    /// Position and size of the client, excluding its border
    pub r: Rect,
    /// Size constraints requested by the client
    pub hints: SizeHints,
    /// Whether the client is currently maximized
    pub maximized: bool,
}

impl Client {
    /// Create a new, non-maximized client.
    pub fn new(id: Xid, r: Rect, hints: SizeHints) -> Self {
        Self {
            id,
            r,
            hints,
            maximized: false,
        }
    }

    /// Mark this client as maximized. The current geometry is kept as the restore geometry.
    ///
    /// Returns `false` if the client was already maximized.
    pub fn maximize(&mut self) -> bool {
        !std::mem::replace(&mut self.maximized, true)
    }

    /// Clear the maximized flag, returning the geometry the client should be restored to.
    ///
    /// Returns `None` if the client was not maximized.
    pub fn restore(&mut self) -> Option<Rect> {
        if std::mem::replace(&mut self.maximized, false) {
            Some(self.r)
        } else {
            None
        }
    }
}
