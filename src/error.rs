use crate::generator::JobId;
use crate::graph::NodeId;
use thiserror::Error;

/// Errors raised while expanding a `{min, max, step}` range specification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("Invalid range: min, max, step must be numbers")]
    NotNumeric,

    #[error("Invalid range: min must not exceed max (min {min}, max {max})")]
    Inverted { min: f64, max: f64 },

    #[error("Invalid range: step must be positive (got {step})")]
    NonPositiveStep { step: f64 },

    #[error("Invalid range: {count} values cannot be held in memory")]
    Unrepresentable { count: f64 },
}

/// Errors that can occur while expanding configuration payloads into variants.
#[derive(Error, Debug, Clone)]
pub enum ExpansionError {
    #[error("Failed to parse configuration attached to node {node}: {message}")]
    ConfigurationParse { node: NodeId, message: String },

    #[error("Parameter '{parameter}' on node {node} has an invalid range: {source}")]
    InvalidRange {
        node: NodeId,
        parameter: String,
        #[source]
        source: RangeError,
    },
}

/// Errors reported by a `GraphView` implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("Node {node} has no parameter named '{name}'")]
    ParameterNotFound { node: NodeId, name: String },

    #[error("Invalid graph export: {0}")]
    Conversion(String),
}

/// Errors reported by a `Submitter` when a run cannot be executed.
#[derive(Error, Debug, Clone)]
pub enum SubmitError {
    #[error("Submission rejected: {0}")]
    Rejected(String),

    #[error("Execution status feed closed before the queue drained")]
    StatusFeedClosed,
}

/// Errors that abort a batch while jobs are being driven.
#[derive(Error, Debug, Clone)]
pub enum DriverError {
    #[error("Job {job} references node {node}, which no longer exists in the graph")]
    UnresolvedTarget { job: JobId, node: NodeId },

    #[error("Job {job} references parameter '{parameter}', which node {node} does not have")]
    UnknownParameter {
        job: JobId,
        node: NodeId,
        parameter: String,
    },

    #[error("Graph update failed: {0}")]
    Graph(#[from] GraphError),

    #[error("Submission of job {job} failed: {source}")]
    Submission {
        job: JobId,
        #[source]
        source: SubmitError,
    },

    #[error("Failed to serialize job list: {0}")]
    Serialization(String),
}

/// Errors raised while loading a `BatchConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Validation(String),
}

/// Top-level error for a batch run triggered through the controller.
#[derive(Error, Debug, Clone)]
pub enum BatchError {
    #[error("A batch run is already in progress")]
    Busy,

    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    #[error(transparent)]
    Driver(#[from] DriverError),
}
