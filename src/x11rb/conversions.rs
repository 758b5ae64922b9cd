//! Conversions to kbgwm types from x11rb types
use crate::{
    core::bindings::{KeyCombo, MouseButton, MouseState},
    pure::geometry::{Rect, SizeHints, MAX_SIZE},
    x::{
        event::{ButtonEvent, ConfigureMask, ConfigureRequestEvent, MotionEvent, UnmapEvent},
        StackMode, XEvent,
    },
    x11rb::Conn,
    Xid,
};
use tracing::{trace, warn};
use x11rb::{
    connection::Connection,
    protocol::{
        xproto::{self, ButtonPressEvent},
        Event,
    },
    NONE,
};

// Bits of the WM_SIZE_HINTS flags field
const P_MIN_SIZE: u32 = 1 << 4;
const P_MAX_SIZE: u32 = 1 << 5;

/// Convert an x11rb event into an [XEvent].
///
/// X protocol errors are logged and dropped, returning `None`.
pub(crate) fn convert_event<C: Connection>(conn: &Conn<C>, event: Event) -> Option<XEvent> {
    match event {
        Event::KeyPress(e) => match conn.keysym_for(e.detail) {
            Some(keysym) => Some(XEvent::KeyPress(KeyCombo {
                mask: u16::from(e.state),
                keysym,
            })),
            None => {
                trace!(code = e.detail, "no keysym for keycode");
                Some(XEvent::Unhandled { code: xproto::KEY_PRESS_EVENT })
            }
        },

        Event::ButtonPress(e) => Some(
            to_button_event(&e)
                .map(XEvent::ButtonPress)
                .unwrap_or(XEvent::Unhandled { code: xproto::BUTTON_PRESS_EVENT }),
        ),

        Event::ButtonRelease(e) => Some(
            to_button_event(&e)
                .map(XEvent::ButtonRelease)
                .unwrap_or(XEvent::Unhandled { code: xproto::BUTTON_RELEASE_EVENT }),
        ),

        Event::MotionNotify(e) => Some(XEvent::MotionNotify(MotionEvent {
            id: Xid(e.event),
            root: (e.root_x, e.root_y).into(),
        })),

        Event::MapRequest(e) => Some(XEvent::MapRequest(Xid(e.window))),

        Event::DestroyNotify(e) => Some(XEvent::Destroy(Xid(e.window))),

        Event::UnmapNotify(e) => Some(XEvent::UnmapNotify(UnmapEvent {
            id: Xid(e.window),
            synthetic: e.response_type & 0x80 != 0,
        })),

        Event::ConfigureRequest(e) => Some(XEvent::ConfigureRequest(ConfigureRequestEvent {
            id: Xid(e.window),
            mask: ConfigureMask::from_bits_truncate(u16::from(e.value_mask)),
            r: Rect::new(e.x as i32, e.y as i32, e.width as u32, e.height as u32),
            border_width: e.border_width as u32,
            sibling: if e.sibling == NONE {
                None
            } else {
                Some(Xid(e.sibling))
            },
            stack_mode: from_x11rb_stack_mode(e.stack_mode),
        })),

        Event::Error(e) => {
            warn!(?e, "X error");
            None
        }

        event => Some(XEvent::Unhandled {
            code: event.response_type(),
        }),
    }
}

// Button presses and releases share a single event struct in x11rb
fn to_button_event(e: &ButtonPressEvent) -> Option<ButtonEvent> {
    let button = match MouseButton::try_from(e.detail) {
        Ok(button) => button,
        Err(n) => {
            trace!(button = n, "unknown mouse button");
            return None;
        }
    };

    Some(ButtonEvent {
        id: Xid(e.event),
        child: if e.child == NONE { None } else { Some(Xid(e.child)) },
        root: (e.root_x, e.root_y).into(),
        // pointer button bits are dropped when the mask is cleaned for matching
        state: MouseState {
            button,
            mask: u16::from(e.state),
        },
    })
}

/// Read the minimum and maximum size from the raw data of a `WM_NORMAL_HINTS` property.
///
/// Fields that are not flagged as set (or that are missing entirely) keep their defaults.
pub(crate) fn parse_size_hints(raw: &[u32]) -> SizeHints {
    let mut hints = SizeHints::default();
    let flags = match raw.first() {
        Some(&flags) => flags,
        None => return hints,
    };

    if let (true, Some(&w), Some(&h)) = (flags & P_MIN_SIZE != 0, raw.get(5), raw.get(6)) {
        hints = hints.with_min(w.min(MAX_SIZE), h.min(MAX_SIZE));
    }

    if let (true, Some(&w), Some(&h)) = (flags & P_MAX_SIZE != 0, raw.get(7), raw.get(8)) {
        let bound = |v: u32| if v == 0 { MAX_SIZE } else { v.min(MAX_SIZE) };
        hints = hints.with_max(bound(w), bound(h));
    }

    hints
}

fn from_x11rb_stack_mode(m: xproto::StackMode) -> StackMode {
    match m {
        xproto::StackMode::BELOW => StackMode::Below,
        xproto::StackMode::TOP_IF => StackMode::TopIf,
        xproto::StackMode::BOTTOM_IF => StackMode::BottomIf,
        xproto::StackMode::OPPOSITE => StackMode::Opposite,
        _ => StackMode::Above,
    }
}

pub(crate) fn to_x11rb_stack_mode(m: StackMode) -> xproto::StackMode {
    match m {
        StackMode::Above => xproto::StackMode::ABOVE,
        StackMode::Below => xproto::StackMode::BELOW,
        StackMode::TopIf => xproto::StackMode::TOP_IF,
        StackMode::BottomIf => xproto::StackMode::BOTTOM_IF,
        StackMode::Opposite => xproto::StackMode::OPPOSITE,
    }
}
