#[cfg(feature = "cli")]
pub mod cli;
pub mod colors;
pub mod config;
pub mod icons;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod theme;
pub mod topology;

#[cfg(feature = "cli")]
pub use cli::run;
pub use colors::{ColorBandMap, resolve_color};
pub use config::{Config, RenderConfig, load_config};
pub use ir::{ConnectionData, DeviceData, DeviceKind, LabelPosition, LinkSpeed, RenderData, SiteData};
pub use layout::{ConnectionLayout, layout_connection, layout_connections};
pub use render::{format_traffic, render_svg, render_svg_at};
pub use theme::Theme;
pub use topology::{StaticTraffic, Topology, TopologyError, TrafficSample, TrafficSource};
