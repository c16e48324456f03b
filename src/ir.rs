use serde::{Deserialize, Serialize};

use crate::colors::ColorBandMap;

/// Traffic value meaning "inactive, down or not measured".
pub const TRAFFIC_INACTIVE: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Switch,
    Router,
    Cloud,
}

impl DeviceKind {
    /// Id of the `<symbol>` carrying this kind's glyph.
    pub fn icon_id(self) -> &'static str {
        match self {
            Self::Switch => "icon-switch",
            Self::Router => "icon-router",
            Self::Cloud => "icon-cloud",
        }
    }

    /// Width and reserved height of the icon, centered on the device coordinates.
    pub fn icon_size(self) -> (f32, f32) {
        match self {
            Self::Switch => (50.0, 50.0),
            Self::Router => (50.0, 50.0),
            Self::Cloud => (120.0, 80.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    Top,
    #[default]
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkSpeed {
    Speed10M,
    Speed100M,
    Speed1G,
    Speed10G,
    Speed40G,
    Speed100G,
    Unknown,
}

impl LinkSpeed {
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "10M" => Self::Speed10M,
            "100M" => Self::Speed100M,
            "1G" => Self::Speed1G,
            "10G" => Self::Speed10G,
            "40G" => Self::Speed40G,
            "100G" => Self::Speed100G,
            _ => Self::Unknown,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Self::Speed10M => "10M",
            Self::Speed100M => "100M",
            Self::Speed1G => "1G",
            Self::Speed10G => "10G",
            Self::Speed40G => "40G",
            Self::Speed100G => "100G",
            Self::Unknown => "unknown",
        }
    }

    /// Arrow stroke width; unknown speeds draw a zero-width stroke.
    pub fn stroke_width(self) -> f32 {
        match self {
            Self::Speed10M => 0.5,
            Self::Speed100M => 1.0,
            Self::Speed1G => 2.0,
            Self::Speed10G => 4.0,
            Self::Speed40G => 6.0,
            Self::Speed100G => 8.0,
            Self::Unknown => 0.0,
        }
    }
}

impl From<String> for LinkSpeed {
    fn from(value: String) -> Self {
        Self::from_token(&value)
    }
}

impl From<LinkSpeed> for String {
    fn from(value: LinkSpeed) -> Self {
        value.as_token().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceData {
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub name: String,
    pub render_x: f32,
    pub render_y: f32,
    #[serde(default)]
    pub label_position: LabelPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteData {
    pub name: String,
    pub render_x: f32,
    pub render_y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub label_position: LabelPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionData {
    pub from_x: f32,
    pub from_y: f32,
    pub to_x: f32,
    pub to_y: f32,
    pub speed: LinkSpeed,
    pub outbound_traffic: i64,
    pub inbound_traffic: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderData {
    pub title: String,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub devices: Vec<DeviceData>,
    #[serde(default)]
    pub sites: Vec<SiteData>,
    #[serde(default)]
    pub connections: Vec<ConnectionData>,
    #[serde(default)]
    pub colors: ColorBandMap,
}

impl RenderData {
    pub fn new(title: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            devices: Vec::new(),
            sites: Vec::new(),
            connections: Vec::new(),
            colors: ColorBandMap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_width_follows_speed_table() {
        let table = [
            ("10M", 0.5),
            ("100M", 1.0),
            ("1G", 2.0),
            ("10G", 4.0),
            ("40G", 6.0),
            ("100G", 8.0),
        ];
        for (token, width) in table {
            assert_eq!(LinkSpeed::from_token(token).stroke_width(), width, "{token}");
        }
    }

    #[test]
    fn unknown_speed_is_not_an_error() {
        let speed = LinkSpeed::from_token("25G");
        assert_eq!(speed, LinkSpeed::Unknown);
        assert_eq!(speed.stroke_width(), 0.0);

        let conn: ConnectionData = serde_json::from_str(
            r#"{"fromX":0,"fromY":0,"toX":1,"toY":1,"speed":"2.5G","outboundTraffic":-1,"inboundTraffic":0}"#,
        )
        .expect("connection should deserialize");
        assert_eq!(conn.speed, LinkSpeed::Unknown);
    }

    #[test]
    fn cloud_reserves_taller_icon() {
        assert_eq!(DeviceKind::Cloud.icon_size().1, 80.0);
        assert_eq!(DeviceKind::Router.icon_size().1, 50.0);
        assert_eq!(DeviceKind::Switch.icon_size().1, 50.0);
    }

    #[test]
    fn device_deserializes_type_field() {
        let device: DeviceData = serde_json::from_str(
            r#"{"type":"router","name":"core1","renderX":10,"renderY":20,"labelPosition":"top"}"#,
        )
        .expect("device should deserialize");
        assert_eq!(device.kind, DeviceKind::Router);
        assert_eq!(device.label_position, LabelPosition::Top);
    }
}
