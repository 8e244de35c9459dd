use crate::config::BatchConfig;
use crate::graph::{GraphView, NodeInfo, TargetRef};
use tracing::{debug, warn};

/// One configuration node's payload, paired with the node it annotates.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationSource {
    pub target: TargetRef,
    /// The configuration JSON exactly as stored on the node. Parsed later.
    pub raw_json: String,
}

/// Ordered configuration payloads captured from the graph at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationSnapshot {
    pub sources: Vec<ConfigurationSource>,
}

impl ConfigurationSnapshot {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }
}

/// Scans the graph for configuration nodes and pairs each with its upstream target.
///
/// A configuration node without an incoming link, or whose link points at a
/// node that is no longer in the graph, is skipped. The graph is only read.
pub fn discover<G: GraphView + ?Sized>(graph: &G, config: &BatchConfig) -> ConfigurationSnapshot {
    let nodes = graph.nodes();
    let links = graph.links();
    let mut sources = Vec::new();

    for node in nodes
        .iter()
        .filter(|n| n.node_type == config.config_node_type)
    {
        let Some(origin_id) = links
            .iter()
            .find(|l| l.target_id == node.id)
            .map(|l| l.origin_id)
        else {
            debug!(node = %node.id, "Configuration node has no upstream link, skipping");
            continue;
        };

        let Some(target) = nodes.iter().find(|n| n.id == origin_id) else {
            debug!(node = %node.id, origin = %origin_id, "Linked node not in graph, skipping");
            continue;
        };

        let Some(raw_json) = read_payload(graph, node, &config.config_slot) else {
            continue;
        };

        sources.push(ConfigurationSource {
            target: target.target_ref(),
            raw_json,
        });
    }

    debug!(count = sources.len(), "Discovered configuration sources");
    ConfigurationSnapshot { sources }
}

fn read_payload<G: GraphView + ?Sized>(graph: &G, node: &NodeInfo, slot: &str) -> Option<String> {
    match graph.read_param(node.id, slot) {
        Ok(serde_json::Value::String(raw)) => Some(raw),
        Ok(other) => {
            warn!(node = %node.id, slot, value = %other, "Configuration slot is not a string, skipping");
            None
        }
        Err(e) => {
            warn!(node = %node.id, error = %e, "Cannot read configuration slot, skipping");
            None
        }
    }
}
