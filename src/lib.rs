//! kbgwm: a small floating window manager for X11
//!
//! Every managed window lives on exactly one of a fixed number of workspaces. Each workspace
//! keeps its clients in a ring whose head is the focused client of that workspace. Only the
//! current workspace is mapped. Clients are moved and resized with the mouse, can be
//! maximized and restored, and are kept inside the bounds of the screen.
//!
//! The [WindowManager][core::WindowManager] is generic over the [XConn][x::XConn] trait so the
//! state machine can be driven without a running X server. The `x11rb` feature (enabled by
//! default) provides the real backend.
#![warn(
    clippy::complexity,
    clippy::correctness,
    clippy::style,
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    rustdoc::all,
    clippy::undocumented_unsafe_blocks
)]
#![doc(test(attr(deny(rust_2018_idioms, warnings))))]
#![doc(test(attr(allow(unused_extern_crates, unused_variables))))]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref, str::FromStr};

pub mod core;
pub mod keysyms;
pub mod pure;
pub mod util;
pub mod x;
#[cfg(feature = "x11rb")]
pub mod x11rb;

#[doc(inline)]
pub use crate::core::{Config, WindowManager};

/// Error variants from the core kbgwm library.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Something went wrong using the [x11rb] backend.
    #[cfg(feature = "x11rb")]
    #[error(transparent)]
    X11rb(#[from] crate::x11rb::X11rbError),

    /// An operation that needs at least one client was run against an empty workspace
    #[error("workspace {wix} has no clients")]
    EmptyWorkspace {
        /// The index of the workspace that was empty
        wix: usize,
    },

    /// A workspace index outside of the configured range was requested
    #[error("workspace {wix} is out of range: there are {n} workspaces")]
    UnknownWorkspace {
        /// The requested index
        wix: usize,
        /// The number of configured workspaces
        n: usize,
    },

    /// A client id that is not currently being managed was requested
    #[error("{0} is not a known client")]
    UnknownClient(Xid),

    /// A drag update was received while no drag was in progress
    #[error("no drag is in progress")]
    NotDragging,

    /// A new drag was requested while one was already in progress
    #[error("a drag is already in progress")]
    AlreadyDragging,

    /// The user provided config is not valid
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A hex color string could not be parsed
    #[error("invalid hex color code: {code}")]
    InvalidHexColor {
        /// The string that was provided
        code: String,
    },

    /// No keycode could be found for a keysym used in a key binding
    #[error("no keycode is mapped to keysym {keysym:#x}")]
    UnknownKeysym {
        /// The keysym that could not be resolved
        keysym: u32,
    },

    /// Another window manager is already running on the display
    #[error("another window manager is already running")]
    WmAlreadyRunning,

    /// An IO error was encountered
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A call through to libc failed
    #[error(transparent)]
    Nix(#[from] nix::errno::Errno),

    /// A custom error message from a call site that has no dedicated variant
    #[error("{0}")]
    Custom(String),
}

/// A Result where the error type is a kbgwm [Error]
pub type Result<T> = std::result::Result<T, Error>;

/// Construct an [Error::Custom] from a message or a format string with arguments.
#[macro_export]
macro_rules! custom_error {
    ($msg:expr) => {
        $crate::Error::Custom($msg.to_string())
    };

    ($template:expr, $($arg:expr),+) => {
        $crate::Error::Custom(format!($template, $($arg),+))
    };
}

/// An X11 ID for a given resource
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Xid(pub(crate) u32);

impl fmt::Display for Xid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Xid {
    type Target = u32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for Xid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<Xid> for u32 {
    fn from(id: Xid) -> Self {
        id.0
    }
}

/// A simple RGB color used for window borders
///
/// ```
/// # use kbgwm::Color;
/// let c = Color::try_from("#ff0000").unwrap();
///
/// assert_eq!(c, Color::from(0xff0000));
/// assert_eq!(c.rgb_u32(), 0xff0000);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    /// The red, green and blue channels of this color
    pub fn rgb(&self) -> (u8, u8, u8) {
        let [_, r, g, b] = self.0.to_be_bytes();

        (r, g, b)
    }

    /// This color as a 0xRRGGBB value suitable for setting as a border pixel
    pub fn rgb_u32(&self) -> u32 {
        self.0 & 0x00ff_ffff
    }
}

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 {
            return Err(Error::InvalidHexColor { code: s.to_owned() });
        }

        u32::from_str_radix(hex, 16)
            .map(Self::from)
            .map_err(|_| Error::InvalidHexColor { code: s.to_owned() })
    }
}

impl TryFrom<&str> for Color {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}
