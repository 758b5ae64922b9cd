//! Side effect free management of internal window manager state
pub mod client;
pub mod geometry;
pub mod registry;
pub mod sanitize;

#[doc(inline)]
pub use client::Client;
#[doc(inline)]
pub use registry::{ClientKey, Registry};
