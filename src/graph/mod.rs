//! The host graph as seen by the batch core.
//!
//! The editor owns the real node and link model. Everything in this crate talks
//! to it through the [`GraphView`] capability, so the same code runs against the
//! live editor or against an [`InMemoryGraph`] in tests and in the CLI.

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod conversion;
pub mod definition;
pub mod memory;

pub use conversion::*;
pub use definition::*;
pub use memory::InMemoryGraph;

/// Opaque identifier of a node in the host graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A reference to the node whose parameters are varied by a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetRef {
    pub id: NodeId,
    /// Display title of the node, carried into the job list as `nodeName`.
    pub title: Option<String>,
}

/// Read-only summary of a node, as returned by [`GraphView::nodes`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeInfo {
    pub id: NodeId,
    pub node_type: String,
    pub title: Option<String>,
}

impl NodeInfo {
    pub fn target_ref(&self) -> TargetRef {
        TargetRef {
            id: self.id,
            title: self.title.clone(),
        }
    }
}

/// A directed connection from `origin_id` (upstream) to `target_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphLink {
    pub origin_id: NodeId,
    pub target_id: NodeId,
}

/// Capability interface over the host's mutable graph.
///
/// Parameters are addressed by name. Implementations use interior mutability:
/// the discovery loop and the job driver share one graph behind an `Arc`.
pub trait GraphView: Send + Sync {
    /// All nodes, in the host's order.
    fn nodes(&self) -> Vec<NodeInfo>;

    fn links(&self) -> Vec<GraphLink>;

    /// Looks up a live node. `None` if it has been removed.
    fn resolve(&self, id: NodeId) -> Option<NodeInfo>;

    fn read_param(&self, id: NodeId, name: &str) -> Result<serde_json::Value, GraphError>;

    fn write_param(
        &self,
        id: NodeId,
        name: &str,
        value: serde_json::Value,
    ) -> Result<(), GraphError>;
}
