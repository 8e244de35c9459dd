//! Common test utilities for building graphs, snapshots and submitters.
use batch_tester::prelude::*;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

pub const SAMPLER: u64 = 1;
pub const CONFIG: u64 = 2;
pub const SINK: u64 = 9;

/// A sampler node with the parameters the sweeps in these tests vary.
#[allow(dead_code)]
pub fn sampler_node(id: u64) -> GraphNodeDefinition {
    GraphNodeDefinition::new(id, "KSampler")
        .with_title("KSampler")
        .with_param("seed", json!(0))
        .with_param("steps", json!(20))
        .with_param("cfg", json!(7.0))
        .with_param("sampler_name", json!("euler"))
}

#[allow(dead_code)]
pub fn config_node(id: u64, payload: &str) -> GraphNodeDefinition {
    GraphNodeDefinition::new(id, "Genera.BatchTester")
        .with_param("input", json!(payload))
        .with_param("comments", json!(""))
}

/// The storage node the driver labels with job ids.
#[allow(dead_code)]
pub fn sink_node(id: u64) -> GraphNodeDefinition {
    GraphNodeDefinition::new(id, "Genera.GCPStorageNode")
        .with_param("file_name", json!(""))
        .with_param("test_name", json!("sweep"))
        .with_param("bucket_name", json!("comfyui-batch-tester"))
        .with_param("config", json!(""))
}

/// Sampler (1) <- configuration (2), plus a sink node (9).
#[allow(dead_code)]
pub fn sweep_graph(payload: &str) -> GraphDefinition {
    let mut definition = GraphDefinition::default();
    definition.nodes.push(sampler_node(SAMPLER));
    definition.nodes.push(config_node(CONFIG, payload));
    definition.nodes.push(sink_node(SINK));
    definition.link(SAMPLER, CONFIG);
    definition
}

#[allow(dead_code)]
pub fn target(id: u64) -> TargetRef {
    TargetRef {
        id: NodeId(id),
        title: Some("KSampler".to_string()),
    }
}

#[allow(dead_code)]
pub fn source(id: u64, raw_json: &str) -> ConfigurationSource {
    ConfigurationSource {
        target: target(id),
        raw_json: raw_json.to_string(),
    }
}

#[allow(dead_code)]
pub fn snapshot(sources: Vec<ConfigurationSource>) -> ConfigurationSnapshot {
    ConfigurationSnapshot { sources }
}

#[allow(dead_code)]
pub fn entry(node: u64, parameter: &str, value: Value) -> VariantEntry {
    VariantEntry {
        target: target(node),
        parameter: parameter.to_string(),
        value,
    }
}

/// The values of each job's assignments, in assignment order.
#[allow(dead_code)]
pub fn job_values(jobs: &[Job]) -> Vec<Vec<Value>> {
    jobs.iter()
        .map(|job| job.assignments.iter().map(|a| a.value.clone()).collect())
        .collect()
}

/// What the graph looked like when a job was submitted.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct SubmissionRecord {
    pub job: JobId,
    pub params: Vec<(String, Value)>,
    pub sink_label: Option<Value>,
    pub sink_job_list: Option<Value>,
}

/// A submitter that records every call, detects overlapping submissions and
/// captures selected sampler parameters at submission time.
#[allow(dead_code)]
pub struct RecordingSubmitter {
    graph: Option<Arc<InMemoryGraph>>,
    watched: Vec<String>,
    delay: Duration,
    fail_on: Option<JobId>,
    in_flight: AtomicUsize,
    overlapped: AtomicBool,
    pub records: Mutex<Vec<SubmissionRecord>>,
}

#[allow(dead_code)]
impl RecordingSubmitter {
    pub fn new() -> Self {
        Self {
            graph: None,
            watched: Vec::new(),
            delay: Duration::from_millis(5),
            fail_on: None,
            in_flight: AtomicUsize::new(0),
            overlapped: AtomicBool::new(false),
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn watching(mut self, graph: Arc<InMemoryGraph>, params: &[&str]) -> Self {
        self.graph = Some(graph);
        self.watched = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn failing_on(mut self, job: usize) -> Self {
        self.fail_on = Some(JobId(job));
        self
    }

    pub fn submitted(&self) -> Vec<JobId> {
        self.records.lock().iter().map(|r| r.job).collect()
    }

    pub fn overlapped(&self) -> bool {
        self.overlapped.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Submitter for RecordingSubmitter {
    async fn submit(&self, job: &Job) -> Result<(), SubmitError> {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlapped.store(true, Ordering::SeqCst);
        }

        let (params, sink_label, sink_job_list) = match &self.graph {
            Some(graph) => (
                self.watched
                    .iter()
                    .map(|name| {
                        let value = graph.read_param(NodeId(SAMPLER), name).unwrap_or(Value::Null);
                        (name.clone(), value)
                    })
                    .collect(),
                graph.read_param(NodeId(SINK), "file_name").ok(),
                graph.read_param(NodeId(SINK), "config").ok(),
            ),
            None => (Vec::new(), None, None),
        };
        self.records.lock().push(SubmissionRecord {
            job: job.id,
            params,
            sink_label,
            sink_job_list,
        });

        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on == Some(job.id) {
            return Err(SubmitError::Rejected("queue refused the prompt".to_string()));
        }
        Ok(())
    }
}

/// Records every enable/disable of the run trigger.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingTrigger {
    pub changes: Mutex<Vec<bool>>,
}

impl TriggerControl for RecordingTrigger {
    fn set_enabled(&self, enabled: bool) {
        self.changes.lock().push(enabled);
    }
}
