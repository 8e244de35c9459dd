use super::definition::GraphDefinition;
use crate::error::GraphError;

/// A trait for host export formats that can be converted into a `GraphDefinition`.
///
/// This is the extension point for loading graphs from whatever shape the editor
/// saves them in. Implement it on your own deserialized structs to provide the
/// translation layer.
///
/// # Example
///
/// ```rust,no_run
/// use batch_tester::graph::{GraphDefinition, GraphNodeDefinition, IntoGraph};
/// use batch_tester::error::GraphError;
///
/// struct MyNode { id: u64, kind: String }
/// struct MyExport { nodes: Vec<MyNode> }
///
/// impl IntoGraph for MyExport {
///     fn into_graph(self) -> Result<GraphDefinition, GraphError> {
///         Ok(GraphDefinition {
///             nodes: self
///                 .nodes
///                 .into_iter()
///                 .map(|n| GraphNodeDefinition::new(n.id, &n.kind))
///                 .collect(),
///             links: vec![],
///         })
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the object and converts it into the canonical graph model.
    fn into_graph(self) -> Result<GraphDefinition, GraphError>;
}

impl IntoGraph for GraphDefinition {
    fn into_graph(self) -> Result<GraphDefinition, GraphError> {
        Ok(self)
    }
}
