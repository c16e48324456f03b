// Traffic label placement along a link axis.
// Pure geometry; the SVG side only reads the anchors computed here.

/// Fixed traffic-label box size.
pub const TRAFFIC_LABEL_WIDTH: f32 = 70.0;
pub const TRAFFIC_LABEL_HEIGHT: f32 = 20.0;

const LABEL_GAP: f32 = 8.0;
const STROKE_CLEARANCE_FACTOR: f32 = 6.0;

// Tuned against the stock icon sizes; keep as-is so existing diagrams stay stable.
const STEEP_LINK_CLEARANCE: f32 = 12.0;
const STEEP_MIN_VERTICAL_SPAN: f32 = 48.0;
const STEEP_MAX_HORIZONTAL_SPAN: f32 = 192.0;

/// Mostly vertical links that are short horizontally get labels projected on the
/// vertical axis only.
pub fn is_steep_short_link(dx: f32, dy: f32) -> bool {
    dy.abs() > STEEP_MIN_VERTICAL_SPAN && dx.abs() < STEEP_MAX_HORIZONTAL_SPAN
}

/// Distance from the link midpoint to each traffic label center, measured along
/// the unit direction.
pub fn label_offset(dx: f32, dy: f32, unit: (f32, f32), stroke_width: f32) -> f32 {
    let stroke_clearance = stroke_width * STROKE_CLEARANCE_FACTOR;
    if is_steep_short_link(dx, dy) {
        // |dy| > 48 implies unit.1 != 0.
        (STEEP_LINK_CLEARANCE + stroke_clearance) / unit.1.abs()
    } else {
        TRAFFIC_LABEL_WIDTH / 2.0 + LABEL_GAP + stroke_clearance
    }
}

/// Outbound label sits towards `from` (along -u), inbound towards `to` (along +u).
pub fn label_anchors(mid: (f32, f32), unit: (f32, f32), offset: f32) -> [(f32, f32); 2] {
    [
        (mid.0 - unit.0 * offset, mid.1 - unit.1 * offset),
        (mid.0 + unit.0 * offset, mid.1 + unit.1 * offset),
    ]
}

/// Bounding box `(x, y, w, h)` of a traffic label centered on `anchor`.
pub fn label_rect(anchor: (f32, f32)) -> (f32, f32, f32, f32) {
    (
        anchor.0 - TRAFFIC_LABEL_WIDTH / 2.0,
        anchor.1 - TRAFFIC_LABEL_HEIGHT / 2.0,
        TRAFFIC_LABEL_WIDTH,
        TRAFFIC_LABEL_HEIGHT,
    )
}
