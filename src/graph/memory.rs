use super::definition::{GraphDefinition, GraphNodeDefinition};
use super::{GraphLink, GraphView, NodeId, NodeInfo};
use crate::error::GraphError;
use ahash::AHashMap;
use parking_lot::RwLock;

/// A `GraphView` backed by an owned `GraphDefinition`.
///
/// Used by the CLI and by tests as a stand-in for the live editor.
pub struct InMemoryGraph {
    inner: RwLock<Inner>,
}

struct Inner {
    definition: GraphDefinition,
    // node id -> position in `definition.nodes`
    index: AHashMap<NodeId, usize>,
}

impl Inner {
    fn new(definition: GraphDefinition) -> Self {
        let mut inner = Self {
            definition,
            index: AHashMap::new(),
        };
        inner.reindex();
        inner
    }

    fn reindex(&mut self) {
        self.index = self
            .definition
            .nodes
            .iter()
            .enumerate()
            .map(|(pos, node)| (node.id, pos))
            .collect();
    }

    fn node(&self, id: NodeId) -> Option<&GraphNodeDefinition> {
        self.index.get(&id).map(|&pos| &self.definition.nodes[pos])
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut GraphNodeDefinition> {
        let pos = *self.index.get(&id)?;
        self.definition.nodes.get_mut(pos)
    }
}

fn info(node: &GraphNodeDefinition) -> NodeInfo {
    NodeInfo {
        id: node.id,
        node_type: node.node_type.clone(),
        title: node.title.clone(),
    }
}

impl InMemoryGraph {
    pub fn new(definition: GraphDefinition) -> Self {
        Self {
            inner: RwLock::new(Inner::new(definition)),
        }
    }

    /// Removes a node and every link touching it, as deleting it in the editor would.
    pub fn remove_node(&self, id: NodeId) -> bool {
        let mut inner = self.inner.write();
        let before = inner.definition.nodes.len();
        inner.definition.nodes.retain(|n| n.id != id);
        inner
            .definition
            .links
            .retain(|l| l.origin_id != id && l.target_id != id);
        let removed = inner.definition.nodes.len() != before;
        if removed {
            inner.reindex();
        }
        removed
    }

    /// Adds a node after construction. An existing node with the same id is replaced.
    pub fn insert_node(&self, node: GraphNodeDefinition) {
        let mut inner = self.inner.write();
        match inner.index.get(&node.id).copied() {
            Some(pos) => inner.definition.nodes[pos] = node,
            None => {
                inner.definition.nodes.push(node);
                inner.reindex();
            }
        }
    }

    /// Connects `origin` into `target`.
    pub fn add_link(&self, origin: NodeId, target: NodeId) {
        self.inner.write().definition.links.push(GraphLink {
            origin_id: origin,
            target_id: target,
        });
    }

    /// A copy of the current graph state.
    pub fn definition(&self) -> GraphDefinition {
        self.inner.read().definition.clone()
    }
}

impl GraphView for InMemoryGraph {
    fn nodes(&self) -> Vec<NodeInfo> {
        self.inner.read().definition.nodes.iter().map(info).collect()
    }

    fn links(&self) -> Vec<GraphLink> {
        self.inner.read().definition.links.clone()
    }

    fn resolve(&self, id: NodeId) -> Option<NodeInfo> {
        self.inner.read().node(id).map(info)
    }

    fn read_param(&self, id: NodeId, name: &str) -> Result<serde_json::Value, GraphError> {
        let inner = self.inner.read();
        let node = inner.node(id).ok_or(GraphError::NodeNotFound(id))?;
        node.param(name)
            .map(|p| p.value.clone())
            .ok_or_else(|| GraphError::ParameterNotFound {
                node: id,
                name: name.to_string(),
            })
    }

    fn write_param(
        &self,
        id: NodeId,
        name: &str,
        value: serde_json::Value,
    ) -> Result<(), GraphError> {
        let mut inner = self.inner.write();
        let node = inner.node_mut(id).ok_or(GraphError::NodeNotFound(id))?;
        let param = node
            .param_mut(name)
            .ok_or_else(|| GraphError::ParameterNotFound {
                node: id,
                name: name.to_string(),
            })?;
        param.value = value;
        Ok(())
    }
}
