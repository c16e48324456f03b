use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowDirection {
    Outbound,
    Inbound,
}

/// One half of a link: from an endpoint to the link midpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowSpec {
    pub direction: ArrowDirection,
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub stroke_width: f32,
    pub color: String,
    pub marker_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSpec {
    pub direction: ArrowDirection,
    pub anchor: (f32, f32),
    pub traffic: i64,
    pub color: String,
}

/// Arrowhead marker for one color. Two links of the same color share a marker.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MarkerDef {
    pub id: String,
    pub color: String,
}

impl MarkerDef {
    pub fn for_color(color: &str) -> Self {
        Self {
            id: marker_id(color),
            color: color.to_string(),
        }
    }
}

/// Marker id for an arrow color. ASCII alphanumerics pass through and every other
/// byte becomes `_xx` (lowercase hex), so distinct colors never share an id.
pub fn marker_id(color: &str) -> String {
    let mut id = String::with_capacity(6 + color.len() * 3);
    id.push_str("arrow-");
    for byte in color.bytes() {
        if byte.is_ascii_alphanumeric() {
            id.push(byte as char);
        } else {
            id.push_str(&format!("_{byte:02x}"));
        }
    }
    id
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionLayout {
    pub midpoint: (f32, f32),
    pub length: f32,
    pub unit: (f32, f32),
    pub steep: bool,
    pub arrows: [ArrowSpec; 2],
    pub labels: [LabelSpec; 2],
    pub marker_defs: Vec<MarkerDef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_ids_keep_distinct_colors_apart() {
        assert_eq!(marker_id("#ff0000"), "arrow-_23ff0000");
        assert_eq!(marker_id("black"), "arrow-black");
        let pairs = [
            ("hsl(0, 100%, 50%)", "hsl(0,100%,50%)"),
            ("#f00", "_f00"),
            ("a b", "a_b"),
        ];
        for (left, right) in pairs {
            assert_ne!(marker_id(left), marker_id(right), "{left} vs {right}");
        }
    }
}
