//! Fixed glyphs embedded in every document's `<defs>` block.

use crate::ir::DeviceKind;
use crate::theme::Theme;

/// Id of the arrowhead path shared by every per-color marker.
pub const ARROWHEAD_ID: &str = "arrowhead";

const ARROWHEAD_PATH: &str = "M 0 0 L 10 5 L 0 10 z";

fn icon_body(kind: DeviceKind, theme: &Theme) -> String {
    let fill = &theme.icon_fill;
    let stroke = &theme.icon_stroke;
    match kind {
        DeviceKind::Switch => format!(
            "<rect x=\"2\" y=\"12\" width=\"46\" height=\"26\" rx=\"3\" fill=\"{fill}\"/>\
             <path d=\"M 10 20 L 36 20 M 32 16 L 36 20 L 32 24 M 40 30 L 14 30 M 18 26 L 14 30 L 18 34\" \
             fill=\"none\" stroke=\"{stroke}\" stroke-width=\"2\"/>"
        ),
        DeviceKind::Router => format!(
            "<circle cx=\"25\" cy=\"25\" r=\"23\" fill=\"{fill}\"/>\
             <path d=\"M 25 6 L 25 44 M 6 25 L 44 25 M 20 11 L 25 6 L 30 11 M 20 39 L 25 44 L 30 39 \
             M 11 20 L 6 25 L 11 30 M 39 20 L 44 25 L 39 30\" \
             fill=\"none\" stroke=\"{stroke}\" stroke-width=\"2\"/>"
        ),
        DeviceKind::Cloud => format!(
            "<path d=\"M 30 70 C 8 70 4 46 22 40 C 18 18 46 8 58 24 C 70 6 100 14 98 36 \
             C 118 38 118 70 96 70 Z\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"2\"/>"
        ),
    }
}

fn icon_symbol(kind: DeviceKind, theme: &Theme) -> String {
    let (width, height) = kind.icon_size();
    format!(
        "<symbol id=\"{}\" viewBox=\"0 0 {width} {height}\">{}</symbol>",
        kind.icon_id(),
        icon_body(kind, theme)
    )
}

/// Device glyphs plus the shared arrowhead geometry.
pub fn icon_defs(theme: &Theme) -> String {
    let mut defs = String::new();
    for kind in [DeviceKind::Switch, DeviceKind::Router, DeviceKind::Cloud] {
        defs.push_str(&icon_symbol(kind, theme));
    }
    defs.push_str(&format!(
        "<path id=\"{ARROWHEAD_ID}\" d=\"{ARROWHEAD_PATH}\"/>"
    ));
    defs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defs_contain_every_device_kind() {
        let defs = icon_defs(&Theme::classic());
        for kind in [DeviceKind::Switch, DeviceKind::Router, DeviceKind::Cloud] {
            assert!(defs.contains(&format!("id=\"{}\"", kind.icon_id())));
        }
        assert!(defs.contains("id=\"arrowhead\""));
    }

    #[test]
    fn cloud_symbol_uses_reserved_height() {
        let symbol = icon_symbol(DeviceKind::Cloud, &Theme::classic());
        assert!(symbol.contains("viewBox=\"0 0 120 80\""));
    }
}
