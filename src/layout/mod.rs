mod label_placement;
mod types;

pub use label_placement::{
    TRAFFIC_LABEL_HEIGHT, TRAFFIC_LABEL_WIDTH, is_steep_short_link, label_anchors, label_offset,
    label_rect,
};
pub use types::{ArrowDirection, ArrowSpec, ConnectionLayout, LabelSpec, MarkerDef, marker_id};

use crate::colors::ColorBandMap;
use crate::ir::{ConnectionData, RenderData};

/// Midpoint, length and unit direction of the segment `from -> to`.
///
/// A zero-length segment yields a zero unit vector; every derived point then
/// collapses onto the midpoint.
pub fn segment_geometry(from: (f32, f32), to: (f32, f32)) -> ((f32, f32), f32, (f32, f32)) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let mid = (from.0 + dx / 2.0, from.1 + dy / 2.0);
    let length = (dx * dx + dy * dy).sqrt();
    let unit = if length > 0.0 {
        (dx / length, dy / length)
    } else {
        (0.0, 0.0)
    };
    (mid, length, unit)
}

pub fn layout_connection(conn: &ConnectionData, bands: &ColorBandMap) -> ConnectionLayout {
    let from = (conn.from_x, conn.from_y);
    let to = (conn.to_x, conn.to_y);
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let (mid, length, unit) = segment_geometry(from, to);
    let stroke_width = conn.speed.stroke_width();

    let out_color = bands.resolve(conn.outbound_traffic).to_string();
    let in_color = bands.resolve(conn.inbound_traffic).to_string();
    let out_marker = MarkerDef::for_color(&out_color);
    let in_marker = MarkerDef::for_color(&in_color);

    let steep = is_steep_short_link(dx, dy);
    let offset = label_offset(dx, dy, unit, stroke_width);
    let [out_anchor, in_anchor] = label_anchors(mid, unit, offset);

    let arrows = [
        ArrowSpec {
            direction: ArrowDirection::Outbound,
            start: from,
            end: mid,
            stroke_width,
            color: out_color.clone(),
            marker_id: out_marker.id.clone(),
        },
        ArrowSpec {
            direction: ArrowDirection::Inbound,
            start: to,
            end: mid,
            stroke_width,
            color: in_color.clone(),
            marker_id: in_marker.id.clone(),
        },
    ];
    let labels = [
        LabelSpec {
            direction: ArrowDirection::Outbound,
            anchor: out_anchor,
            traffic: conn.outbound_traffic,
            color: out_color,
        },
        LabelSpec {
            direction: ArrowDirection::Inbound,
            anchor: in_anchor,
            traffic: conn.inbound_traffic,
            color: in_color,
        },
    ];

    ConnectionLayout {
        midpoint: mid,
        length,
        unit,
        steep,
        arrows,
        labels,
        marker_defs: vec![out_marker, in_marker],
    }
}

pub fn layout_connections(data: &RenderData) -> Vec<ConnectionLayout> {
    data.connections
        .iter()
        .map(|conn| layout_connection(conn, &data.colors))
        .collect()
}
