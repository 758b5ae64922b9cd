//! Clamping client geometry into the bounds of the screen.
//!
//! Both functions only modify the [Client] they are given. Pushing the result out to the X
//! server is left to the caller.
use crate::pure::{geometry::Rect, Client};

// When a window is larger than the screen the valid range is inverted and we pin the
// window to the lower bound.
fn clamp_or_min(v: i64, min: i64, max: i64) -> i64 {
    if max < min {
        min
    } else {
        v.clamp(min, max)
    }
}

/// Clamp the position of a client so that it (and its border) lies inside of `screen`.
///
/// Windows that are wider or taller than the screen are pinned to the left or top edge.
///
/// ```
/// # use kbgwm::pure::{geometry::{Rect, SizeHints}, sanitize::sanitize_position, Client};
/// let screen = Rect::new(0, 0, 1920, 1080);
/// let mut c = Client::new(1u32.into(), Rect::new(1900, -50, 100, 100), SizeHints::default());
///
/// sanitize_position(&mut c, &screen, 1);
/// assert_eq!((c.r.x, c.r.y), (1818, 0));
/// ```
pub fn sanitize_position(client: &mut Client, screen: &Rect, border: u32) {
    let b = 2 * border as i64;
    let r = &mut client.r;

    let max_x = screen.x as i64 + screen.w as i64 - r.w as i64 - b;
    let max_y = screen.y as i64 + screen.h as i64 - r.h as i64 - b;

    r.x = clamp_or_min(r.x as i64, screen.x as i64, max_x) as i32;
    r.y = clamp_or_min(r.y as i64, screen.y as i64, max_y) as i32;
}

/// Clamp the size of a client first into its own size hints and then into the space left
/// on screen given its current position.
///
/// The position is assumed to have already been placed: call [sanitize_position] first if
/// both need updating. Running this more than once in succession has no further effect.
///
/// ```
/// # use kbgwm::pure::{geometry::{Rect, SizeHints}, sanitize::sanitize_dimensions, Client};
/// let screen = Rect::new(0, 0, 1920, 1080);
/// let mut c = Client::new(1u32.into(), Rect::new(0, 0, 2000, 500), SizeHints::default());
///
/// sanitize_dimensions(&mut c, &screen, 1);
/// assert_eq!((c.r.w, c.r.h), (1918, 500));
/// ```
pub fn sanitize_dimensions(client: &mut Client, screen: &Rect, border: u32) {
    let b = 2 * border as i64;
    let hints = client.hints;
    let r = &mut client.r;

    let w = clamp_or_min(r.w as i64, hints.min_w as i64, hints.max_w as i64);
    let h = clamp_or_min(r.h as i64, hints.min_h as i64, hints.max_h as i64);

    let avail_w = screen.x as i64 + screen.w as i64 - r.x as i64 - b;
    let avail_h = screen.y as i64 + screen.h as i64 - r.y as i64 - b;

    r.w = clamp_or_min(w, 0, avail_w) as u32;
    r.h = clamp_or_min(h, 0, avail_h) as u32;
}
