use crate::colors::ColorBandMap;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown theme '{0}' (expected 'classic' or 'modern')")]
    UnknownTheme(String),
    #[error("color band map must contain at least one entry")]
    EmptyColors,
    #[error("invalid PNG scale {0}")]
    InvalidScale(f32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub png_scale: f32,
    pub png_font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            png_scale: 1.0,
            png_font_family: "Arial".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub render: RenderConfig,
    /// Overrides the band table of the topology; `None` keeps the topology's own
    /// table, or the built-in one.
    pub colors: Option<ColorBandMap>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    title_font_size: Option<f32>,
    text_color: Option<String>,
    background: Option<String>,
    site_fill: Option<String>,
    site_border: Option<String>,
    label_background: Option<String>,
    label_border: Option<String>,
    icon_fill: Option<String>,
    icon_stroke: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    png_scale: Option<f32>,
    png_font_family: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    render: Option<RenderConfigFile>,
    colors: Option<ColorBandMap>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a JSON or JSON5 config document on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::from_name(theme_name)
            .ok_or_else(|| ConfigError::UnknownTheme(theme_name.to_string()))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.title_font_size {
            config.theme.title_font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.site_fill {
            config.theme.site_fill = v;
        }
        if let Some(v) = vars.site_border {
            config.theme.site_border = v;
        }
        if let Some(v) = vars.label_background {
            config.theme.label_background = v;
        }
        if let Some(v) = vars.label_border {
            config.theme.label_border = v;
        }
        if let Some(v) = vars.icon_fill {
            config.theme.icon_fill = v;
        }
        if let Some(v) = vars.icon_stroke {
            config.theme.icon_stroke = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(scale) = render.png_scale {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(ConfigError::InvalidScale(scale).into());
            }
            config.render.png_scale = scale;
        }
        if let Some(v) = render.png_font_family {
            config.render.png_font_family = v;
        }
    }

    if let Some(colors) = parsed.colors {
        if colors.is_empty() {
            return Err(ConfigError::EmptyColors.into());
        }
        config.colors = Some(colors);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = load_config(None).expect("defaults");
        assert_eq!(config.theme.font_size, Theme::classic().font_size);
        assert!(config.colors.is_none());
        assert_eq!(config.render.png_scale, 1.0);
    }

    #[test]
    fn parses_json5_with_overrides() {
        let config = parse_config(
            r##"{
                // comments and trailing commas are fine
                theme: "modern",
                themeVariables: { fontSize: 14, labelBorder: "#333" },
                render: { pngScale: 2 },
                colors: { "-1": "grey", "0": "green", "1e8": "red", },
            }"##,
        )
        .expect("config should parse");
        assert_eq!(config.theme.font_family, Theme::modern().font_family);
        assert_eq!(config.theme.font_size, 14.0);
        assert_eq!(config.theme.label_border, "#333");
        assert_eq!(config.render.png_scale, 2.0);
        let colors = config.colors.expect("colors");
        assert_eq!(colors.resolve(-1), "grey");
        assert_eq!(colors.resolve(200_000_000), "red");
    }

    #[test]
    fn rejects_unknown_theme() {
        let err = parse_config(r#"{"theme": "neon"}"#).unwrap_err();
        assert!(err.to_string().contains("neon"));
    }

    #[test]
    fn rejects_empty_color_table() {
        let err = parse_config(r#"{"colors": {}}"#).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }
}
