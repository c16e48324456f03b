//! Topology documents and their resolution into [`RenderData`].
//!
//! A topology names devices and links by device name; resolving it looks up the
//! coordinates of each link endpoint and asks a [`TrafficSource`] for the current
//! rates. Any failure aborts the whole resolution so the renderer never sees a
//! partially populated diagram.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::colors::ColorBandMap;
use crate::ir::{
    ConnectionData, DeviceData, DeviceKind, LabelPosition, LinkSpeed, RenderData, SiteData,
    TRAFFIC_INACTIVE,
};

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("failed to read topology: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse topology: {0}")]
    Parse(#[from] json5::Error),
    #[error("diagram size must be positive, got {width}x{height}")]
    InvalidSize { width: f32, height: f32 },
    #[error("device '{0}' is defined more than once")]
    DuplicateDevice(String),
    #[error("connection #{index} references unknown device '{name}'")]
    UnknownDevice { index: usize, name: String },
    #[error("non-finite coordinates for '{0}'")]
    NonFiniteCoordinate(String),
    #[error("traffic unavailable for {device}/{interface}: {reason}")]
    TrafficUnavailable {
        device: String,
        interface: String,
        reason: String,
    },
}

/// Bit rates of one link, as seen from its `from` device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TrafficSample {
    #[serde(default = "inactive")]
    pub outbound: i64,
    #[serde(default = "inactive")]
    pub inbound: i64,
}

fn inactive() -> i64 {
    TRAFFIC_INACTIVE
}

impl TrafficSample {
    pub const INACTIVE: Self = Self {
        outbound: TRAFFIC_INACTIVE,
        inbound: TRAFFIC_INACTIVE,
    };

    /// Converts polled byte rates to bit rates; missing values become inactive.
    pub fn from_byte_rates(outbound: Option<f64>, inbound: Option<f64>) -> Self {
        Self {
            outbound: bits_from_bytes(outbound),
            inbound: bits_from_bytes(inbound),
        }
    }
}

fn bits_from_bytes(rate: Option<f64>) -> i64 {
    match rate {
        Some(bytes) if bytes.is_finite() && bytes >= 0.0 => (bytes * 8.0).round() as i64,
        _ => TRAFFIC_INACTIVE,
    }
}

/// Where link traffic comes from. A monitoring-system client implements this to
/// feed live rates for `link.from`/`link.interface`; [`StaticTraffic`] serves the
/// values embedded in the topology. `index` is the link's position in
/// [`Topology::connections`].
pub trait TrafficSource {
    fn traffic(&self, index: usize, link: &TopologyLink) -> Result<TrafficSample, TopologyError>;
}

/// Samples keyed by connection index, so links sharing a device and interface
/// name still keep their own values.
#[derive(Debug, Clone, Default)]
pub struct StaticTraffic {
    samples: HashMap<usize, TrafficSample>,
}

impl StaticTraffic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: usize, sample: TrafficSample) {
        self.samples.insert(index, sample);
    }

    pub fn from_topology(topology: &Topology) -> Self {
        let mut source = Self::new();
        for (index, link) in topology.connections.iter().enumerate() {
            if let Some(sample) = link.traffic {
                source.insert(index, sample);
            }
        }
        source
    }
}

impl TrafficSource for StaticTraffic {
    fn traffic(&self, index: usize, _link: &TopologyLink) -> Result<TrafficSample, TopologyError> {
        Ok(self
            .samples
            .get(&index)
            .copied()
            .unwrap_or(TrafficSample::INACTIVE))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyDevice {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub label_position: LabelPosition,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologySite {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub label_position: LabelPosition,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyLink {
    pub from: String,
    pub to: String,
    /// Interface on the `from` device whose counters describe this link.
    #[serde(default)]
    pub interface: String,
    pub speed: LinkSpeed,
    #[serde(default)]
    pub traffic: Option<TrafficSample>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    #[serde(default)]
    pub title: String,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub devices: Vec<TopologyDevice>,
    #[serde(default)]
    pub sites: Vec<TopologySite>,
    #[serde(default)]
    pub connections: Vec<TopologyLink>,
    #[serde(default)]
    pub colors: Option<ColorBandMap>,
}

impl Topology {
    /// Parses a JSON or JSON5 topology document.
    pub fn parse(contents: &str) -> Result<Self, TopologyError> {
        Ok(json5::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, TopologyError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Builds render input. `colors` overrides the topology's own band table.
    pub fn resolve(
        &self,
        source: &dyn TrafficSource,
        colors: Option<&ColorBandMap>,
    ) -> Result<RenderData, TopologyError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(TopologyError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }

        let mut positions: HashMap<&str, (f32, f32)> = HashMap::new();
        let mut devices = Vec::with_capacity(self.devices.len());
        for device in &self.devices {
            if !(device.x.is_finite() && device.y.is_finite()) {
                return Err(TopologyError::NonFiniteCoordinate(device.name.clone()));
            }
            if positions
                .insert(device.name.as_str(), (device.x, device.y))
                .is_some()
            {
                return Err(TopologyError::DuplicateDevice(device.name.clone()));
            }
            devices.push(DeviceData {
                kind: device.kind,
                name: device.name.clone(),
                render_x: device.x,
                render_y: device.y,
                label_position: device.label_position,
            });
        }

        let mut sites = Vec::with_capacity(self.sites.len());
        for site in &self.sites {
            let coords = [site.x, site.y, site.width, site.height];
            if !coords.iter().all(|v| v.is_finite()) {
                return Err(TopologyError::NonFiniteCoordinate(site.name.clone()));
            }
            sites.push(SiteData {
                name: site.name.clone(),
                render_x: site.x,
                render_y: site.y,
                width: site.width,
                height: site.height,
                label_position: site.label_position,
            });
        }

        let lookup = |index: usize, name: &str| {
            positions
                .get(name)
                .copied()
                .ok_or_else(|| TopologyError::UnknownDevice {
                    index,
                    name: name.to_string(),
                })
        };

        let mut connections = Vec::with_capacity(self.connections.len());
        for (index, link) in self.connections.iter().enumerate() {
            let from = lookup(index, &link.from)?;
            let to = lookup(index, &link.to)?;
            if link.speed == LinkSpeed::Unknown {
                warn!(
                    from = %link.from,
                    to = %link.to,
                    "unknown link speed, arrow will be drawn without stroke"
                );
            }
            let sample = source.traffic(index, link)?;
            connections.push(ConnectionData {
                from_x: from.0,
                from_y: from.1,
                to_x: to.0,
                to_y: to.1,
                speed: link.speed,
                outbound_traffic: sample.outbound,
                inbound_traffic: sample.inbound,
            });
        }

        let colors = colors
            .cloned()
            .or_else(|| self.colors.clone())
            .unwrap_or_default();

        debug!(
            devices = devices.len(),
            sites = sites.len(),
            connections = connections.len(),
            "resolved topology"
        );

        Ok(RenderData {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            devices,
            sites,
            connections,
            colors,
        })
    }
}
