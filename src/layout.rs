//! Destination-rectangle layout for rendering a decoded frame.

use kurbo::Rect;

/// Compute the centered, aspect-preserving destination rectangle for
/// drawing a `src_w`×`src_h` frame onto a `dst_w`×`dst_h` surface.
///
/// The frame is scaled uniformly by `min(dst_w/src_w, dst_h/src_h)` and
/// centered; degenerate source dimensions yield the zero rect.
pub fn fit_rect(dst_w: f64, dst_h: f64, src_w: f64, src_h: f64) -> Rect {
    if src_w <= 0.0 || src_h <= 0.0 {
        return Rect::ZERO;
    }

    let scale = (dst_w / src_w).min(dst_h / src_h);
    let w = src_w * scale;
    let h = src_h * scale;
    let left = (dst_w - w) / 2.0;
    let top = (dst_h - h) / 2.0;

    Rect::new(left, top, left + w, top + h)
}
