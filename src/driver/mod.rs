//! Sequential execution of generated jobs against the live graph.

use crate::config::SinkConfig;
use crate::error::{DriverError, GraphError};
use crate::generator::Job;
use crate::graph::GraphView;
use crate::report::JobFormatter;
use crate::submit::Submitter;
use std::sync::Arc;
use tracing::info;

mod sink;

use sink::Sink;

/// Outcome of a completed drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveReport {
    pub jobs_submitted: usize,
    /// Whether a sink node was found and received job metadata.
    pub sink_recorded: bool,
}

/// Applies each job's assignments to the graph and submits one run per job.
///
/// Jobs run strictly one after another: a job's submission is awaited to
/// completion before the next job touches the graph. The first failure stops
/// the batch; jobs after it are neither applied nor submitted.
pub struct JobDriver<G: ?Sized, S: ?Sized> {
    graph: Arc<G>,
    submitter: Arc<S>,
    sink: SinkConfig,
}

impl<G, S> JobDriver<G, S>
where
    G: GraphView + ?Sized,
    S: Submitter + ?Sized,
{
    pub fn new(graph: Arc<G>, submitter: Arc<S>, sink: SinkConfig) -> Self {
        Self {
            graph,
            submitter,
            sink,
        }
    }

    /// Drives `jobs` in ascending id order.
    pub async fn run(&self, jobs: &[Job]) -> Result<DriveReport, DriverError> {
        let mut ordered: Vec<&Job> = jobs.iter().collect();
        ordered.sort_by_key(|job| job.id);

        let graph = self.graph.as_ref();
        let sink = Sink::locate(graph, &self.sink);
        if let Some(sink) = &sink {
            sink.record_job_list(graph, jobs)?;
        }

        let mut jobs_submitted = 0;
        for job in ordered {
            if let Some(sink) = &sink {
                sink.label(graph, job)?;
            }
            self.apply(job)?;

            info!(job = %job.id, total = jobs.len(), "Submitting {}", JobFormatter::format_job(job));
            self.submitter
                .submit(job)
                .await
                .map_err(|source| DriverError::Submission {
                    job: job.id,
                    source,
                })?;
            jobs_submitted += 1;
        }

        Ok(DriveReport {
            jobs_submitted,
            sink_recorded: sink.is_some(),
        })
    }

    /// Writes every assignment of `job` onto its target node.
    fn apply(&self, job: &Job) -> Result<(), DriverError> {
        for assignment in &job.assignments {
            let node = assignment.target.id;
            if self.graph.resolve(node).is_none() {
                return Err(DriverError::UnresolvedTarget { job: job.id, node });
            }
            self.graph
                .write_param(node, &assignment.parameter, assignment.value.clone())
                .map_err(|e| match e {
                    GraphError::NodeNotFound(node) => {
                        DriverError::UnresolvedTarget { job: job.id, node }
                    }
                    GraphError::ParameterNotFound { node, name } => {
                        DriverError::UnknownParameter {
                            job: job.id,
                            node,
                            parameter: name,
                        }
                    }
                    other => DriverError::Graph(other),
                })?;
        }
        Ok(())
    }
}
