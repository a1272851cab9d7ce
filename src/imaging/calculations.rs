//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Fit `source` inside a `bounds` box, preserving aspect ratio.
///
/// Images already inside the box are returned unchanged: this never
/// upscales. Neither output dimension drops below 1.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bounds` - Maximum dimensions (max_width, max_height)
///
/// # Returns
/// * `(width, height)` - Dimensions that fit inside `bounds`
///
/// # Examples
/// ```
/// # use excursion_cms::imaging::fit_within;
/// // 4000x3000 into 1280x1280 → 1280x960
/// assert_eq!(fit_within((4000, 3000), (1280, 1280)), (1280, 960));
///
/// // Already small enough: untouched
/// assert_eq!(fit_within((800, 600), (1280, 1280)), (800, 600));
/// ```
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w == 0 || src_h == 0 || (src_w <= max_w && src_h <= max_h) {
        return source;
    }

    let scale_w = max_w as f64 / src_w as f64;
    let scale_h = max_h as f64 / src_h as f64;

    if scale_w <= scale_h {
        // Width is the binding edge
        let h = (src_h as f64 * scale_w).round() as u32;
        (max_w.max(1), h.clamp(1, max_h.max(1)))
    } else {
        // Height is the binding edge
        let w = (src_w as f64 * scale_h).round() as u32;
        (w.clamp(1, max_w.max(1)), max_h.max(1))
    }
}
