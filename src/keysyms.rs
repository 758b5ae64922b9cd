//! X11 keysym values for the keys used in the default bindings.
//!
//! Values are taken from `X11/keysymdef.h`.
#![allow(missing_docs, non_upper_case_globals)]

pub const XK_Return: u32 = 0xff0d;
pub const XK_Tab: u32 = 0xff09;
pub const XK_Home: u32 = 0xff50;
pub const XK_Page_Up: u32 = 0xff55;
pub const XK_Page_Down: u32 = 0xff56;
pub const XK_End: u32 = 0xff57;
pub const XK_Num_Lock: u32 = 0xff7f;

pub const XK_0: u32 = 0x0030;
pub const XK_1: u32 = 0x0031;
pub const XK_2: u32 = 0x0032;
pub const XK_3: u32 = 0x0033;
pub const XK_4: u32 = 0x0034;
pub const XK_5: u32 = 0x0035;
pub const XK_6: u32 = 0x0036;
pub const XK_7: u32 = 0x0037;
pub const XK_8: u32 = 0x0038;
pub const XK_9: u32 = 0x0039;

pub const XK_f: u32 = 0x0066;
pub const XK_p: u32 = 0x0070;
pub const XK_q: u32 = 0x0071;
