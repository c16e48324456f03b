use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub title_font_size: f32,
    pub text_color: String,
    pub background: String,
    pub site_fill: String,
    pub site_border: String,
    pub label_background: String,
    pub label_border: String,
    pub icon_fill: String,
    pub icon_stroke: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            font_size: 12.0,
            title_font_size: 20.0,
            text_color: "#000000".to_string(),
            background: "#FFFFFF".to_string(),
            site_fill: "#F2F2F2".to_string(),
            site_border: "#999999".to_string(),
            label_background: "#FFFFFF".to_string(),
            label_border: "#000000".to_string(),
            icon_fill: "#3A6EA5".to_string(),
            icon_stroke: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 11.0,
            title_font_size: 18.0,
            text_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
            site_fill: "#F7FAFF".to_string(),
            site_border: "#D7E0F0".to_string(),
            label_background: "#FFFFFF".to_string(),
            label_border: "#C7D2E5".to_string(),
            icon_fill: "#7A8AA6".to_string(),
            icon_stroke: "#F8FAFF".to_string(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
