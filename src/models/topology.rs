use serde::{Deserialize, Serialize};

/// Per-category device counts for topology generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceCounts {
    pub routers: usize,
    pub switches: usize,
    pub firewalls: usize,
    pub waps: usize,
    pub workstations_linux: usize,
    pub workstations_windows: usize,
    pub servers_linux: usize,
    pub servers_windows: usize,
    pub ics: usize,
    pub iot: usize,
    pub phones: usize,
}

impl DeviceCounts {
    /// Sum of all categories, saturating at `usize::MAX`
    pub fn total(&self) -> usize {
        [
            self.routers,
            self.switches,
            self.firewalls,
            self.waps,
            self.workstations_linux,
            self.workstations_windows,
            self.servers_linux,
            self.servers_windows,
            self.ics,
            self.iot,
            self.phones,
        ]
        .into_iter()
        .fold(0usize, usize::saturating_add)
    }
}

/// TopologyConfig describes one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub network_name: String,
    pub cidr_block: String,
    #[serde(flatten)]
    pub counts: DeviceCounts,
    #[serde(default)]
    pub example_connections: bool,
}

/// GenerateTopologyRequest for the generation endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateTopologyRequest {
    #[serde(flatten)]
    pub config: TopologyConfig,
    /// Seed for reproducible output
    #[serde(default)]
    pub seed: Option<u64>,
    /// Bulk-upsert the generated elements into the registry
    #[serde(default)]
    pub load: bool,
}
