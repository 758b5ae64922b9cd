//! Data types for working with X events
use crate::{
    core::bindings::{KeyCombo, MouseState},
    pure::geometry::{Point, Rect},
    Xid,
};
use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Wrapper around the low level X event types that correspond to request / response data when
/// communicating with the X server itself.
///
/// Only the events the window manager acts on have dedicated variants. Everything else is
/// reported as [XEvent::Unhandled] so that it can be logged and dropped.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XEvent {
    /// A grabbed key combination was entered by the user
    KeyPress(KeyCombo),
    /// A pointer button was pressed
    ButtonPress(ButtonEvent),
    /// A pointer button was released
    ButtonRelease(ButtonEvent),
    /// The pointer moved while a pointer grab was active
    MotionNotify(MotionEvent),
    /// A client is requesting to be mapped
    MapRequest(Xid),
    /// A client window has been destroyed
    Destroy(Xid),
    /// A client window has been unmapped
    UnmapNotify(UnmapEvent),
    /// A client is requesting a change to its geometry or stacking
    ConfigureRequest(ConfigureRequestEvent),
    /// An event type that the window manager does not act on
    Unhandled {
        /// The X11 response type of the event
        code: u8,
    },
}

/// A pointer button press or release
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    /// The window the event was reported relative to
    pub id: Xid,
    /// The child of `id` that the pointer was over, if any
    pub child: Option<Xid>,
    /// Absolute position of the pointer relative to the root window
    pub root: Point,
    /// The button and modifier state at the time of the event
    pub state: MouseState,
}

/// Pointer motion relative to the root window
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionEvent {
    /// The window the event was reported relative to
    pub id: Xid,
    /// Absolute position of the pointer relative to the root window
    pub root: Point,
}

/// A window being unmapped.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnmapEvent {
    /// The window that was unmapped
    pub id: Xid,
    /// Set when the event was sent by a client through SendEvent rather than generated by
    /// the server in response to an unmap request (including our own).
    pub synthetic: bool,
}

bitflags! {
    /// The fields of a [ConfigureRequestEvent] that the client actually asked to change
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ConfigureMask: u16 {
        /// x position
        const X = 1 << 0;
        /// y position
        const Y = 1 << 1;
        /// width
        const WIDTH = 1 << 2;
        /// height
        const HEIGHT = 1 << 3;
        /// border width
        const BORDER_WIDTH = 1 << 4;
        /// stacking sibling
        const SIBLING = 1 << 5;
        /// stacking mode
        const STACK_MODE = 1 << 6;
    }
}

/// How a window should be restacked relative to its siblings
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackMode {
    /// Above the sibling, or at the top of the stack
    #[default]
    Above,
    /// Below the sibling, or at the bottom of the stack
    Below,
    /// To the top if the sibling occludes the window
    TopIf,
    /// To the bottom if the window occludes the sibling
    BottomIf,
    /// Whichever of TopIf or BottomIf applies
    Opposite,
}

/// A request from a client to change its own geometry or stacking.
///
/// Only the fields named in `mask` carry meaningful values.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureRequestEvent {
    /// The window making the request
    pub id: Xid,
    /// The fields being requested
    pub mask: ConfigureMask,
    /// Requested position and size
    pub r: Rect,
    /// Requested border width
    pub border_width: u32,
    /// Requested stacking sibling
    pub sibling: Option<Xid>,
    /// Requested stacking mode
    pub stack_mode: StackMode,
}
