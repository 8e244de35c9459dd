use crate::config::SinkConfig;
use crate::error::DriverError;
use crate::generator::{Job, job_list_json};
use crate::graph::{GraphView, NodeId};
use serde_json::Value;
use tracing::{debug, warn};

/// The node receiving job metadata, located once per batch.
pub(super) struct Sink<'a> {
    node: NodeId,
    config: &'a SinkConfig,
}

impl<'a> Sink<'a> {
    /// Finds the first node of the configured sink type.
    pub(super) fn locate<G: GraphView + ?Sized>(graph: &G, config: &'a SinkConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        let node = graph
            .nodes()
            .into_iter()
            .find(|n| n.node_type == config.node_type);
        match node {
            Some(node) => {
                debug!(sink = %node.id, "Recording job metadata on sink node");
                Some(Self {
                    node: node.id,
                    config,
                })
            }
            None => {
                warn!(node_type = %config.node_type, "No sink node in graph, job metadata will not be recorded");
                None
            }
        }
    }

    pub(super) fn record_job_list<G: GraphView + ?Sized>(
        &self,
        graph: &G,
        jobs: &[Job],
    ) -> Result<(), DriverError> {
        let json = job_list_json(jobs).map_err(|e| DriverError::Serialization(e.to_string()))?;
        graph.write_param(self.node, &self.config.job_list_slot, Value::String(json))?;
        Ok(())
    }

    pub(super) fn label<G: GraphView + ?Sized>(&self, graph: &G, job: &Job) -> Result<(), DriverError> {
        graph.write_param(self.node, &self.config.label_slot, Value::from(job.id.0))?;
        Ok(())
    }
}
