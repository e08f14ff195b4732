//! General Windows platform utilities
//!
//! Conversions between domain geometry and Win32 structures, plus the
//! sizing math for a window with a fixed client area.

use crate::domain::core::Rect;
use windows::Win32::Foundation::{LPARAM, RECT};
use windows::Win32::UI::WindowsAndMessaging::{AdjustWindowRect, WINDOW_STYLE};

/// Converts a domain rectangle to Windows RECT structure
pub fn rect_to_win32_rect(rect: &Rect) -> RECT {
    RECT {
        left: rect.x,
        top: rect.y,
        right: rect.right(),
        bottom: rect.bottom(),
    }
}

/// Converts a Windows RECT to domain rectangle
pub fn win32_rect_to_rect(rect: &RECT) -> Rect {
    Rect {
        x: rect.left,
        y: rect.top,
        w: rect.right - rect.left,
        h: rect.bottom - rect.top,
    }
}

/// Outer window size needed for a `client` area with the given style
pub fn window_size_for_client(client: &Rect, style: WINDOW_STYLE) -> windows::core::Result<(i32, i32)> {
    let mut rect = rect_to_win32_rect(client);
    unsafe { AdjustWindowRect(&mut rect, style, false)? };
    let outer = win32_rect_to_rect(&rect);
    Ok((outer.w, outer.h))
}

/// Client coordinates packed into a mouse message's LPARAM
///
/// Both halves are signed so positions left of or above the client area
/// come out negative.
pub fn point_from_lparam(lparam: LPARAM) -> (i32, i32) {
    let x = (lparam.0 & 0xFFFF) as u16 as i16 as i32;
    let y = ((lparam.0 >> 16) & 0xFFFF) as u16 as i16 as i32;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_round_trips_through_win32() {
        let rect = Rect::new(180, 530, 180, 40);
        let win32 = rect_to_win32_rect(&rect);
        assert_eq!((win32.right, win32.bottom), (360, 570));
        assert_eq!(win32_rect_to_rect(&win32), rect);
    }

    #[test]
    fn lparam_point_decoding() {
        let lparam = LPARAM(((550_isize) << 16) | 200);
        assert_eq!(point_from_lparam(lparam), (200, 550));

        // -1, -2 as packed 16-bit halves
        let negative = LPARAM((0xFFFE_isize << 16) | 0xFFFF);
        assert_eq!(point_from_lparam(negative), (-1, -2));
    }
}
