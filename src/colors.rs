use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ir::TRAFFIC_INACTIVE;

/// Color used when a band map has no entries at all.
pub const FALLBACK_COLOR: &str = "black";

static DEFAULT_BANDS: Lazy<ColorBandMap> = Lazy::new(|| {
    ColorBandMap::from_pairs([
        (TRAFFIC_INACTIVE, "#999999"),
        (0, "#0000ff"),
        (1_000_000, "#00ccff"),
        (10_000_000, "#00cc66"),
        (25_000_000, "#66cc00"),
        (50_000_000, "#cccc00"),
        (75_000_000, "#ff9900"),
        (100_000_000, "#ff0000"),
    ])
});

/// Threshold (bits/second, inclusive lower bound) to color.
///
/// Backed by an ordered map, so the sorted threshold index exists once per map
/// rather than being rebuilt on every lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorBandMap {
    bands: BTreeMap<i64, String>,
}

impl ColorBandMap {
    pub fn empty() -> Self {
        Self {
            bands: BTreeMap::new(),
        }
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        let mut map = Self::empty();
        for (threshold, color) in pairs {
            map.insert(threshold, color);
        }
        map
    }

    /// Later inserts for the same threshold replace earlier ones.
    pub fn insert(&mut self, threshold: i64, color: impl Into<String>) {
        self.bands.insert(threshold, color.into());
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.bands.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Color of the highest band whose threshold is `<= traffic`. Traffic below
    /// every threshold takes the lowest band.
    pub fn resolve(&self, traffic: i64) -> &str {
        self.bands
            .range(..=traffic)
            .next_back()
            .or_else(|| self.bands.iter().next())
            .map(|(_, color)| color.as_str())
            .unwrap_or(FALLBACK_COLOR)
    }
}

impl Default for ColorBandMap {
    fn default() -> Self {
        DEFAULT_BANDS.clone()
    }
}

pub fn resolve_color(traffic: i64, bands: &ColorBandMap) -> &str {
    bands.resolve(traffic)
}

/// Band keys are non-negative bit rates or the inactive sentinel.
fn parse_threshold(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let value = match raw.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            // Thresholds are often written as "2.5e7" in hand-edited files.
            let value = raw.parse::<f64>().ok()?;
            if !(value.is_finite() && value.fract() == 0.0) {
                return None;
            }
            value as i64
        }
    };
    (value >= 0 || value == TRAFFIC_INACTIVE).then_some(value)
}

impl Serialize for ColorBandMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.bands.iter().map(|(k, v)| (k.to_string(), v)))
    }
}

impl<'de> Deserialize<'de> for ColorBandMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut map = ColorBandMap::empty();
        for (key, color) in raw {
            let threshold = parse_threshold(&key)
                .ok_or_else(|| D::Error::custom(format!("invalid color band threshold '{key}'")))?;
            map.insert(threshold, color);
        }
        Ok(map)
    }
}
