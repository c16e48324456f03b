use crate::ir::RenderData;
use crate::layout::{ArrowDirection, ConnectionLayout};
use crate::render::format_traffic;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub devices: Vec<DeviceDump>,
    pub connections: Vec<ConnectionDump>,
}

#[derive(Debug, Serialize)]
pub struct DeviceDump {
    pub name: String,
    pub kind: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
pub struct ConnectionDump {
    pub index: usize,
    pub speed: String,
    pub length: f32,
    pub steep: bool,
    pub midpoint: [f32; 2],
    pub arrows: Vec<ArrowDump>,
}

#[derive(Debug, Serialize)]
pub struct ArrowDump {
    pub direction: ArrowDirection,
    pub start: [f32; 2],
    pub end: [f32; 2],
    pub stroke_width: f32,
    pub color: String,
    pub label_anchor: [f32; 2],
    pub label_text: String,
}

impl LayoutDump {
    pub fn from_layouts(data: &RenderData, layouts: &[ConnectionLayout]) -> Self {
        let devices = data
            .devices
            .iter()
            .map(|device| DeviceDump {
                name: device.name.clone(),
                kind: format!("{:?}", device.kind),
                x: device.render_x,
                y: device.render_y,
            })
            .collect();

        let connections = layouts
            .iter()
            .zip(&data.connections)
            .enumerate()
            .map(|(index, (layout, conn))| ConnectionDump {
                index,
                speed: conn.speed.as_token().to_string(),
                length: layout.length,
                steep: layout.steep,
                midpoint: [layout.midpoint.0, layout.midpoint.1],
                arrows: layout
                    .arrows
                    .iter()
                    .zip(&layout.labels)
                    .map(|(arrow, label)| ArrowDump {
                        direction: arrow.direction,
                        start: [arrow.start.0, arrow.start.1],
                        end: [arrow.end.0, arrow.end.1],
                        stroke_width: arrow.stroke_width,
                        color: arrow.color.clone(),
                        label_anchor: [label.anchor.0, label.anchor.1],
                        label_text: format_traffic(label.traffic),
                    })
                    .collect(),
            })
            .collect();

        LayoutDump {
            title: data.title.clone(),
            width: data.width,
            height: data.height,
            devices,
            connections,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    data: &RenderData,
    layouts: &[ConnectionLayout],
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layouts(data, layouts);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ConnectionData, LinkSpeed};
    use crate::layout::layout_connections;

    #[test]
    fn dump_carries_label_text_and_geometry() {
        let mut data = RenderData::new("dump", 500.0, 500.0);
        data.connections.push(ConnectionData {
            from_x: 0.0,
            from_y: 0.0,
            to_x: 400.0,
            to_y: 0.0,
            speed: LinkSpeed::Speed100M,
            outbound_traffic: 150_000,
            inbound_traffic: -1,
        });
        let layouts = layout_connections(&data);
        let dump = LayoutDump::from_layouts(&data, &layouts);
        let json = serde_json::to_value(&dump).expect("dump serializes");
        let arrows = &json["connections"][0]["arrows"];
        assert_eq!(arrows[0]["direction"], "outbound");
        assert_eq!(arrows[0]["label_text"], "0.15 Mbps");
        assert_eq!(arrows[1]["label_text"], "Inactive");
        assert_eq!(json["connections"][0]["speed"], "100M");
    }
}
