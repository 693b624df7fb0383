//! Layout calculations for the scrolling lyrics viewport
//!
//! Used by the renderer to size the lyrics area between the header and
//! footer and to pick which lines to draw.

use std::ops::Range;

/// Gap kept below the lyrics area, in root font size units
pub const VIEWPORT_BOTTOM_GAP_REM: f32 = 0.40;

/// Height of the lyrics area between the player header and footer
///
/// All values in pixels. Never negative.
pub fn lyrics_viewport_height(
    window_height: f32,
    header_height: f32,
    footer_height: f32,
    root_font_size: f32,
) -> f32 {
    (window_height - header_height - footer_height - root_font_size * VIEWPORT_BOTTOM_GAP_REM)
        .max(0.0)
}

/// Indices of lines that intersect the viewport
///
/// Lines are stacked from the top using `heights`, then shifted by
/// `scroll_offset` (zero or negative once the viewport has scrolled).
pub fn visible_range(heights: &[f32], scroll_offset: f32, viewport_height: f32) -> Range<usize> {
    let mut top = scroll_offset;
    let mut start = None;
    let mut end = heights.len();

    for (idx, height) in heights.iter().enumerate() {
        if top >= viewport_height {
            end = idx;
            break;
        }
        let bottom = top + height;
        if start.is_none() && bottom > 0.0 {
            start = Some(idx);
        }
        top = bottom;
    }

    let start = start.unwrap_or(end);
    start..end.max(start)
}
