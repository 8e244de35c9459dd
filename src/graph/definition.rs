use super::{GraphLink, NodeId};

/// The complete, canonical definition of a host graph.
/// This is the target structure for any host export conversion.
#[derive(Debug, Clone, Default)]
pub struct GraphDefinition {
    pub nodes: Vec<GraphNodeDefinition>,
    pub links: Vec<GraphLink>,
}

/// Defines a single node and its named parameter slots.
#[derive(Debug, Clone)]
pub struct GraphNodeDefinition {
    pub id: NodeId,
    pub node_type: String,
    pub title: Option<String>,
    pub params: Vec<ParamDefinition>,
}

/// A named parameter slot (a widget, in editor terms) and its current value.
#[derive(Debug, Clone)]
pub struct ParamDefinition {
    pub name: String,
    pub value: serde_json::Value,
}

impl GraphNodeDefinition {
    pub fn new(id: u64, node_type: &str) -> Self {
        Self {
            id: NodeId(id),
            node_type: node_type.to_string(),
            title: None,
            params: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_param(mut self, name: &str, value: serde_json::Value) -> Self {
        self.params.push(ParamDefinition {
            name: name.to_string(),
            value,
        });
        self
    }

    pub fn param(&self, name: &str) -> Option<&ParamDefinition> {
        self.params.iter().find(|p| p.name == name)
    }

    pub(crate) fn param_mut(&mut self, name: &str) -> Option<&mut ParamDefinition> {
        self.params.iter_mut().find(|p| p.name == name)
    }
}

impl GraphDefinition {
    /// Adds a link from `origin` into `target`.
    pub fn link(&mut self, origin: u64, target: u64) {
        self.links.push(GraphLink {
            origin_id: NodeId(origin),
            target_id: NodeId(target),
        });
    }
}
