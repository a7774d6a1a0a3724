//! Stored backend descriptions.
//!
//! JSON form of a device description as reported by a backend: the
//! connectivity graph with per-node and per-edge error rates, the supported
//! gate set and feature flags.
//!
//! All edges are directed as reported; [`StoredDevice::is_connected`] treats
//! them as bidirectional.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A register element, e.g. `("q", [3])`. Serialized as `["q", [3]]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Register(pub String, pub Vec<u32>);

impl Register {
    /// Create a register element.
    pub fn new(name: impl Into<String>, index: impl IntoIterator<Item = u32>) -> Self {
        Self(name.into(), index.into_iter().collect())
    }

    /// Register name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Index within the register.
    pub fn index(&self) -> &[u32] {
        &self.1
    }
}

impl std::fmt::Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let index: Vec<String> = self.1.iter().map(ToString::to_string).collect();
        write!(f, "{}[{}]", self.0, index.join(", "))
    }
}

/// Node in a device connectivity graph, with its error rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredNode {
    /// Qubit identifier.
    pub unitid: Register,
    /// Average gate error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_error: Option<f64>,
    /// Average readout error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readout_error: Option<f64>,
    /// Error rate per gate name.
    pub gate_errors: BTreeMap<String, f64>,
    /// Probability of reading 1 when prepared in 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_state_readout_error: Option<f64>,
    /// Probability of reading 0 when prepared in 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_state_readout_error: Option<f64>,
}

/// Edge in a device connectivity graph, with its error rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEdge {
    /// Source qubit.
    pub unitid_from: Register,
    /// Target qubit.
    pub unitid_to: Register,
    /// Average two-qubit gate error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_error: Option<f64>,
    /// Error rate per gate name.
    pub gate_errors: BTreeMap<String, f64>,
}

/// Nodes and edges that make up a device's connectivity graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDevice {
    /// Qubits.
    pub nodes: Vec<StoredNode>,
    /// Couplings.
    pub edges: Vec<StoredEdge>,
    /// Node count, for devices stored without explicit nodes.
    #[serde(default = "default_n_nodes")]
    pub n_nodes: Option<u32>,
    /// Whether every pair of nodes is coupled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fully_connected: Option<bool>,
}

fn default_n_nodes() -> Option<u32> {
    Some(0)
}

impl StoredDevice {
    /// Create a device from nodes and edges.
    pub fn new(nodes: Vec<StoredNode>, edges: Vec<StoredEdge>) -> Self {
        let n_nodes = u32::try_from(nodes.len()).ok();
        Self {
            nodes,
            edges,
            n_nodes,
            fully_connected: None,
        }
    }

    /// Number of qubits, preferring the explicit node list.
    pub fn num_qubits(&self) -> usize {
        if self.nodes.is_empty() {
            self.n_nodes.map_or(0, |n| n as usize)
        } else {
            self.nodes.len()
        }
    }

    /// Check if two qubits are coupled, in either direction.
    pub fn is_connected(&self, a: &Register, b: &Register) -> bool {
        if self.fully_connected == Some(true) {
            return a != b;
        }
        self.edges.iter().any(|e| {
            (&e.unitid_from == a && &e.unitid_to == b) || (&e.unitid_from == b && &e.unitid_to == a)
        })
    }

    /// Find a node by qubit identifier.
    pub fn node(&self, unitid: &Register) -> Option<&StoredNode> {
        self.nodes.iter().find(|n| &n.unitid == unitid)
    }
}

/// Serializable device description for storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBackendInfo {
    /// Backend name.
    pub name: String,
    /// Device name, if the backend targets a specific device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    /// Backend version string.
    pub version: String,
    /// Connectivity graph.
    pub device: StoredDevice,
    /// Supported gate names.
    pub gate_set: Vec<String>,
    /// Number of classical registers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_cl_reg: Option<u32>,
    /// Supports classical feed-forward within a shot.
    pub supports_fast_feedforward: bool,
    /// Supports qubit reset.
    pub supports_reset: bool,
    /// Supports measuring before the end of the circuit.
    pub supports_midcircuit_measurement: bool,
    /// Free-form backend metadata.
    #[serde(default)]
    pub misc: serde_json::Map<String, serde_json::Value>,
}

impl StoredBackendInfo {
    /// Check if a gate is supported.
    pub fn supports_gate(&self, gate: &str) -> bool {
        self.gate_set.iter().any(|g| g == gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn q(i: u32) -> Register {
        Register::new("q", [i])
    }

    fn edge(a: u32, b: u32) -> StoredEdge {
        StoredEdge {
            unitid_from: q(a),
            unitid_to: q(b),
            average_error: None,
            gate_errors: BTreeMap::new(),
        }
    }

    #[test]
    fn test_register_serializes_as_tuple() {
        let reg = Register::new("q", [2]);
        assert_eq!(serde_json::to_value(&reg).unwrap(), json!(["q", [2]]));
        assert_eq!(reg.to_string(), "q[2]");
    }

    #[test]
    fn test_device_connectivity_is_bidirectional() {
        let device = StoredDevice::new(vec![], vec![edge(0, 1), edge(1, 2)]);
        assert!(device.is_connected(&q(0), &q(1)));
        assert!(device.is_connected(&q(1), &q(0)));
        assert!(!device.is_connected(&q(0), &q(2)));
    }

    #[test]
    fn test_fully_connected_device() {
        let mut device = StoredDevice::new(vec![], vec![]);
        device.fully_connected = Some(true);
        device.n_nodes = Some(4);
        assert!(device.is_connected(&q(0), &q(3)));
        assert!(!device.is_connected(&q(1), &q(1)));
        assert_eq!(device.num_qubits(), 4);
    }

    #[test]
    fn test_backend_info_deserialize() {
        let info: StoredBackendInfo = serde_json::from_value(json!({
            "name": "QuantinuumBackend",
            "device_name": "H1-1E",
            "version": "0.1",
            "device": {
                "nodes": [
                    {"unitid": ["q", [0]], "gate_errors": {"rz": 0.0}},
                    {"unitid": ["q", [1]], "readout_error": 0.003, "gate_errors": {}}
                ],
                "edges": []
            },
            "gate_set": ["rz", "zzmax"],
            "supports_fast_feedforward": true,
            "supports_reset": true,
            "supports_midcircuit_measurement": true
        }))
        .unwrap();

        assert_eq!(info.device.num_qubits(), 2);
        assert_eq!(info.device.n_nodes, Some(0));
        assert!(info.supports_gate("zzmax"));
        assert!(!info.supports_gate("cx"));
        assert!(info.misc.is_empty());
        assert_eq!(info.device.node(&q(1)).unwrap().readout_error, Some(0.003));
    }
}
