use std::path::Path;

use chrono::{TimeZone, Utc};
use weathermap_renderer::{
    RenderData, StaticTraffic, Theme, Topology, layout_connections, render_svg, render_svg_at,
};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
    assert!(svg.contains("<defs>"), "{fixture}: missing defs");
}

fn load_fixture(rel: &str) -> RenderData {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    let topology = Topology::load(&path).expect("fixture should parse");
    let source = StaticTraffic::from_topology(&topology);
    topology.resolve(&source, None).expect("fixture should resolve")
}

fn strip_timestamp(svg: &str) -> &str {
    let start = svg.find("<g id=\"timestamp\">").expect("timestamp group");
    &svg[..start]
}

#[test]
fn render_all_fixtures() {
    let candidates = ["two_nodes.json5", "campus.json5", "degenerate.json5"];
    for rel in candidates {
        let data = load_fixture(rel);
        let svg = render_svg(&data, &Theme::classic());
        assert_valid_svg(&svg, rel);
    }
}

#[test]
fn two_node_scenario() {
    let data = load_fixture("two_nodes.json5");
    let layouts = layout_connections(&data);
    assert_eq!(layouts.len(), 1);
    let layout = &layouts[0];

    assert!(layout.steep, "dy=200, dx=0 should trigger the steep-link rule");
    assert_eq!(layout.arrows[0].stroke_width, 4.0);
    assert_eq!(layout.arrows[1].stroke_width, 4.0);
    assert_eq!(layout.midpoint, (100.0, 200.0));
    // (12 + 4 * 6) / |u.y|, u = (0, 1)
    assert_eq!(layout.labels[0].anchor, (100.0, 164.0));
    assert_eq!(layout.labels[1].anchor, (100.0, 236.0));

    assert_eq!(layout.arrows[0].color, "#ff0000");
    // 1e9 bps: the largest band key at or below it is 1e8.
    assert_eq!(layout.arrows[1].color, "#ff0000");

    let svg = render_svg(&data, &Theme::classic());
    assert!(svg.contains(">5.00 Gbps</text>"));
    assert!(svg.contains(">1.00 Gbps</text>"));
    assert!(svg.contains("stroke-width=\"4\""));
    assert!(svg.contains(">core-r1</text>"));
    assert!(svg.contains(">Two nodes</text>"));
}

#[test]
fn distinct_traffic_bands_get_distinct_markers() {
    let mut data = load_fixture("two_nodes.json5");
    data.connections[0].inbound_traffic = 50_000_000;
    let when = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let svg = render_svg_at(&data, &Theme::classic(), when);
    assert!(svg.contains("stroke=\"#ff0000\""));
    assert!(svg.contains("stroke=\"#cccc00\""));
    assert_eq!(svg.matches("<marker ").count(), 2);
}

#[test]
fn shared_colors_share_one_marker() {
    let data = load_fixture("campus.json5");
    let svg = render_svg(&data, &Theme::modern());
    let mut colors: Vec<String> = layout_connections(&data)
        .iter()
        .flat_map(|layout| layout.arrows.iter().map(|arrow| arrow.color.clone()))
        .collect();
    colors.sort();
    colors.dedup();
    assert_eq!(svg.matches("<marker ").count(), colors.len());
    assert!(svg.contains("Campus &amp; DC"));
    assert!(svg.contains(">Inactive</text>"));
    assert!(svg.contains("xlink:href=\"#icon-cloud\""));
}

#[test]
fn degenerate_inputs_still_render() {
    let data = load_fixture("degenerate.json5");
    assert!(data.colors.is_empty());
    let traffic: Vec<(i64, i64)> = data
        .connections
        .iter()
        .map(|conn| (conn.outbound_traffic, conn.inbound_traffic))
        .collect();
    assert_eq!(traffic, vec![(10, 20), (-1, -1)]);
    let layouts = layout_connections(&data);
    let zero = &layouts[0];
    assert_eq!(zero.length, 0.0);
    assert_eq!(zero.arrows[0].start, zero.arrows[1].start);
    assert_eq!(zero.labels[0].anchor, zero.labels[1].anchor);
    assert_eq!(layouts[1].arrows[0].stroke_width, 0.0);

    let svg = render_svg(&data, &Theme::classic());
    assert!(svg.contains("stroke=\"black\""));
    assert!(!svg.contains("NaN"));
}

#[test]
fn rendering_twice_is_identical_apart_from_timestamp() {
    let data = load_fixture("campus.json5");
    let first = render_svg(&data, &Theme::classic());
    let second = render_svg(&data, &Theme::classic());
    assert_eq!(strip_timestamp(&first), strip_timestamp(&second));

    let when = Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap();
    let a = render_svg_at(&data, &Theme::classic(), when);
    let b = render_svg_at(&data, &Theme::classic(), when);
    assert_eq!(a, b);
    assert!(a.contains(">2025-06-30 23:59:59</text>"));
}
