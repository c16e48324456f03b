use crate::config::RenderConfig;
use crate::icons::{ARROWHEAD_ID, icon_defs};
use crate::ir::{DeviceData, LabelPosition, RenderData, SiteData};
use crate::layout::{
    ArrowSpec, ConnectionLayout, LabelSpec, MarkerDef, label_rect, layout_connections,
};
use crate::theme::Theme;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

pub const GENERATOR_COMMENT: &str = "<!-- Generated by weathermap-renderer -->";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TITLE_OFFSET_Y: f32 = 30.0;
const TIMESTAMP_MARGIN: f32 = 10.0;
const DEVICE_LABEL_GAP: f32 = 6.0;
const SITE_LABEL_TOP_OFFSET: f32 = 20.0;
const SITE_LABEL_BOTTOM_OFFSET: f32 = 10.0;

pub fn render_svg(data: &RenderData, theme: &Theme) -> String {
    render_svg_at(data, theme, Utc::now())
}

/// Assembles the document with an explicit timestamp; identical inputs give
/// byte-identical output.
pub fn render_svg_at(data: &RenderData, theme: &Theme, timestamp: DateTime<Utc>) -> String {
    let layouts = layout_connections(data);
    render_layouts_at(data, &layouts, theme, timestamp)
}

pub(crate) fn render_layouts_at(
    data: &RenderData,
    layouts: &[ConnectionLayout],
    theme: &Theme,
    timestamp: DateTime<Utc>,
) -> String {
    let width = data.width;
    let height = data.height;

    let mut markers = BTreeSet::new();
    let mut arrows = Vec::with_capacity(layouts.len() * 2);
    let mut labels = Vec::with_capacity(layouts.len() * 2);
    for layout in layouts {
        for def in &layout.marker_defs {
            markers.insert(render_marker(def));
        }
        for arrow in &layout.arrows {
            arrows.push(render_arrow(arrow));
        }
        for label in &layout.labels {
            labels.push(render_traffic_label(label, theme));
        }
    }
    debug!(
        devices = data.devices.len(),
        sites = data.sites.len(),
        connections = layouts.len(),
        markers = markers.len(),
        "assembling weathermap svg"
    );

    let mut svg = String::new();
    svg.push_str(GENERATOR_COMMENT);
    svg.push('\n');
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" version=\"1.1\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));

    svg.push_str("<defs>");
    svg.push_str(&icon_defs(theme));
    for marker in &markers {
        svg.push_str(marker);
    }
    svg.push_str("</defs>");

    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    push_group(&mut svg, "title", [render_title(&data.title, width, theme)]);
    push_group(
        &mut svg,
        "sites",
        data.sites.iter().map(|site| render_site(site, theme)),
    );
    push_group(&mut svg, "links", arrows);
    push_group(&mut svg, "link-labels", labels);
    push_group(
        &mut svg,
        "devices",
        data.devices.iter().map(|device| render_device(device, theme)),
    );
    push_group(
        &mut svg,
        "timestamp",
        [render_timestamp(timestamp, width, height, theme)],
    );

    svg.push_str("</svg>");
    svg
}

fn push_group<I>(svg: &mut String, id: &str, fragments: I)
where
    I: IntoIterator<Item = String>,
{
    svg.push_str(&format!("<g id=\"{id}\">"));
    for fragment in fragments {
        svg.push_str(&fragment);
    }
    svg.push_str("</g>");
}

/// Marker fill can only be set on the marker itself, so each color gets its own
/// marker pointing at the shared arrowhead path.
pub fn render_marker(def: &MarkerDef) -> String {
    format!(
        "<marker id=\"{}\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"3\" markerHeight=\"3\" orient=\"auto\" fill=\"{}\"><use xlink:href=\"#{ARROWHEAD_ID}\"/></marker>",
        def.id,
        escape_xml(&def.color)
    )
}

pub fn render_arrow(arrow: &ArrowSpec) -> String {
    format!(
        "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" marker-end=\"url(#{})\"/>",
        points_to_path(&[arrow.start, arrow.end]),
        escape_xml(&arrow.color),
        arrow.stroke_width,
        arrow.marker_id
    )
}

pub fn render_traffic_label(label: &LabelSpec, theme: &Theme) -> String {
    let (x, y, w, h) = label_rect(label.anchor);
    let mut out = format!(
        "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w}\" height=\"{h}\" rx=\"3\" ry=\"3\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"/>",
        theme.label_background, theme.label_border
    );
    out.push_str(&text_svg(
        label.anchor.0,
        label.anchor.1,
        "middle",
        "central",
        theme.font_size,
        theme,
        &format_traffic(label.traffic),
    ));
    out
}

pub fn render_device(device: &DeviceData, theme: &Theme) -> String {
    let (icon_w, icon_h) = device.kind.icon_size();
    let x = device.render_x - icon_w / 2.0;
    let y = device.render_y - icon_h / 2.0;
    let mut out = format!(
        "<use xlink:href=\"#{}\" x=\"{x:.2}\" y=\"{y:.2}\" width=\"{icon_w}\" height=\"{icon_h}\"/>",
        device.kind.icon_id()
    );
    let label_y = match device.label_position {
        LabelPosition::Top => device.render_y - icon_h / 2.0 - DEVICE_LABEL_GAP,
        LabelPosition::Bottom => {
            device.render_y + icon_h / 2.0 + DEVICE_LABEL_GAP + theme.font_size
        }
    };
    out.push_str(&text_svg(
        device.render_x,
        label_y,
        "middle",
        "auto",
        theme.font_size,
        theme,
        &device.name,
    ));
    out
}

pub fn render_site(site: &SiteData, theme: &Theme) -> String {
    let mut out = format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"10\" ry=\"10\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.5\"/>",
        site.render_x, site.render_y, site.width, site.height, theme.site_fill, theme.site_border
    );
    let label_x = site.render_x + site.width / 2.0;
    let label_y = match site.label_position {
        LabelPosition::Top => site.render_y + SITE_LABEL_TOP_OFFSET,
        LabelPosition::Bottom => site.render_y + site.height - SITE_LABEL_BOTTOM_OFFSET,
    };
    out.push_str(&text_svg(
        label_x,
        label_y,
        "middle",
        "auto",
        theme.font_size,
        theme,
        &site.name,
    ));
    out
}

pub fn render_title(title: &str, width: f32, theme: &Theme) -> String {
    text_svg(
        width / 2.0,
        TITLE_OFFSET_Y,
        "middle",
        "auto",
        theme.title_font_size,
        theme,
        title,
    )
}

pub fn render_timestamp(timestamp: DateTime<Utc>, width: f32, height: f32, theme: &Theme) -> String {
    text_svg(
        width - TIMESTAMP_MARGIN,
        height - TIMESTAMP_MARGIN,
        "end",
        "auto",
        theme.font_size,
        theme,
        &format_timestamp(timestamp),
    )
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Human-readable bit rate, truncated (not rounded) to two decimals.
///
/// Unit cuts sit at 1e5 and 1e8 bits/s, so `100000` reads `0.10 Mbps`.
pub fn format_traffic(bps: i64) -> String {
    if bps < 0 {
        return "Inactive".to_string();
    }
    let (hundredths, unit) = if bps < 100_000 {
        (bps / 10, "kbps")
    } else if bps < 100_000_000 {
        (bps / 10_000, "Mbps")
    } else {
        (bps / 10_000_000, "Gbps")
    };
    format!("{}.{:02} {unit}", hundredths / 100, hundredths % 100)
}

fn text_svg(
    x: f32,
    y: f32,
    anchor: &str,
    baseline: &str,
    font_size: f32,
    theme: &Theme,
    content: &str,
) -> String {
    format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"{anchor}\" dominant-baseline=\"{baseline}\" font-family=\"{}\" font-size=\"{font_size}\" fill=\"{}\">{}</text>",
        escape_xml(&theme.font_family),
        theme.text_color,
        escape_xml(content)
    )
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = String::new();
    d.push_str(&format!("M {:.2} {:.2}", points[0].0, points[0].1));
    for point in points.iter().skip(1) {
        d.push_str(&format!(" L {:.2} {:.2}", point.0, point.1));
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = render_cfg.png_font_family.clone();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let scale = render_cfg.png_scale.max(0.1);
    let size = tree.size().to_int_size().scale_by(scale).ok_or_else(|| {
        anyhow::anyhow!("Invalid PNG size for scale {scale}")
    })?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
