//! Region resolution
//!
//! Maps the human-friendly region labels users pick (the ingress point closest
//! to them) to the Sirius endpoint serving that region. Other regions may need
//! a rescan of the mount before they see files uploaded through this one.

use std::collections::BTreeMap;

use crate::error::{Result, SiriusError};

/// Builtin region table: label -> `host:port`
pub const BUILTIN_REGIONS: &[(&str, &str)] = &[
    ("us-west1", "us-west1.files.athera.io:443"),
    ("europe-west1", "files.athera.io:443"),
    (
        "australia-southeast1",
        "australia-southeast1.files.athera.io:443",
    ),
];

/// Immutable label -> endpoint map.
///
/// Extending the table produces a new value; there is no shared mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTable {
    regions: BTreeMap<String, String>,
}

impl RegionTable {
    /// Table containing only [`BUILTIN_REGIONS`]
    pub fn builtin() -> Self {
        Self {
            regions: BUILTIN_REGIONS
                .iter()
                .map(|(label, addr)| (label.to_string(), addr.to_string()))
                .collect(),
        }
    }

    /// Add (or override) a region
    pub fn with_region(mut self, label: impl Into<String>, address: impl Into<String>) -> Self {
        self.regions.insert(label.into(), address.into());
        self
    }

    /// Resolve a region label to its endpoint address
    pub fn resolve(&self, label: &str) -> Result<&str> {
        self.regions
            .get(label)
            .map(String::as_str)
            .ok_or_else(|| unknown_region(label, self.labels()))
    }

    /// Known labels, sorted
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Resolve against the builtin table
pub fn resolve(label: &str) -> Result<&'static str> {
    BUILTIN_REGIONS
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, addr)| *addr)
        .ok_or_else(|| unknown_region(label, BUILTIN_REGIONS.iter().map(|(known, _)| *known)))
}

fn unknown_region<'a>(label: &str, known: impl Iterator<Item = &'a str>) -> SiriusError {
    let mut labels: Vec<&str> = known.collect();
    labels.sort_unstable();
    SiriusError::Configuration(format!(
        "Unknown region '{}', expected one of: {}",
        label,
        labels.join(", ")
    ))
}

/// Split `host:port` into the host part, used as the TLS server name
pub fn host_of(address: &str) -> &str {
    match address.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => host,
        _ => address,
    }
}
