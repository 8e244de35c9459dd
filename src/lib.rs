//! # Batch Tester - Parameter Sweep Jobs for Node Graphs
//!
//! **Batch Tester** turns a compact sweep description attached to a node in a
//! visual node-graph editor into one graph run per parameter combination.
//!
//! A *configuration node* carries a JSON object. Each key names a parameter of
//! the node it is linked to; each value is either a list of discrete values or
//! a `{ "min", "max", "step" }` range:
//!
//! ```json
//! { "sampler_name": ["euler", "dpmpp_2m"], "steps": { "min": 20, "max": 30, "step": 5 } }
//! ```
//!
//! ## Core Workflow
//!
//! 1.  **Discover**: [`discovery::discover`] pairs every configuration node with its upstream target node.
//! 2.  **Expand**: [`expander::expand`] turns each payload into one `VariantEntry` per value.
//! 3.  **Generate**: [`generator::generate`] takes the Cartesian product across parameter names and numbers the jobs.
//! 4.  **Drive**: [`driver::JobDriver`] writes each job's values into the graph and awaits one run per job.
//!
//! [`controller::BatchController`] ties the four together behind a polling
//! discovery task and a single run trigger.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batch_tester::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! // 1. Describe the graph: a sampler and a configuration node linked to it.
//! let mut definition = GraphDefinition::default();
//! definition.nodes.push(
//!     GraphNodeDefinition::new(1, "KSampler")
//!         .with_title("KSampler")
//!         .with_param("steps", json!(20))
//!         .with_param("cfg", json!(7.0)),
//! );
//! definition.nodes.push(GraphNodeDefinition::new(2, "Genera.BatchTester").with_param(
//!     "input",
//!     json!(r#"{ "steps": [20, 30], "cfg": { "min": 6, "max": 8, "step": 1 } }"#),
//! ));
//! definition.link(1, 2);
//! let graph = Arc::new(InMemoryGraph::new(definition));
//!
//! // 2. Provide a submitter that resolves once the host has finished the run.
//! let submitter = Arc::new(FnSubmitter::new(|job: Job| async move {
//!     println!("running {}", JobFormatter::format_job(&job));
//!     Ok::<(), SubmitError>(())
//! }));
//!
//! // 3. Discover and run.
//! let controller = BatchController::new(graph, submitter, BatchConfig::default());
//! controller.refresh();
//! let report = controller.run_batch().await?;
//! assert_eq!(report.jobs_submitted, 6);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod expander;
pub mod generator;
pub mod graph;
pub mod prelude;
pub mod report;
pub mod submit;
pub mod ui;
