//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the batch_tester crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.

// Pipeline stages
pub use crate::discovery::{ConfigurationSnapshot, ConfigurationSource, discover};
pub use crate::expander::{ParameterSpec, RangeSpec, VariantEntry, expand, expand_range};
pub use crate::generator::{Job, JobId, JobRecord, generate, job_list_json};

// Running
pub use crate::controller::{BatchController, BatchReport, BatchState, DiscoveryTask, TriggerControl};
pub use crate::driver::{DriveReport, JobDriver};
pub use crate::submit::{FnSubmitter, QueueDrainSubmitter, Submitter};

// Graph access
pub use crate::graph::{
    GraphDefinition, GraphLink, GraphNodeDefinition, GraphView, InMemoryGraph, IntoGraph, NodeId,
    NodeInfo, TargetRef,
};
pub use crate::ui::UiGraph;

// Configuration
pub use crate::config::{BatchConfig, SinkConfig};

// Error types
pub use crate::error::{
    BatchError, ConfigError, DriverError, ExpansionError, GraphError, RangeError, SubmitError,
};

// Reporting
pub use crate::report::JobFormatter;
