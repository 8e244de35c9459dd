use crate::error::GraphError;
use crate::graph::{
    GraphDefinition, GraphLink, GraphNodeDefinition, IntoGraph, NodeId, ParamDefinition,
};
use serde::Deserialize;

/// A named widget on an exported node
#[derive(Debug, Deserialize, Clone)]
pub struct UiWidget {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Exported editor node
#[derive(Debug, Deserialize, Clone)]
pub struct UiNode {
    pub id: u64,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub widgets: Vec<UiWidget>,
}

/// Exported link, either as an object or as the editor's positional array
/// `[link_id, origin_id, origin_slot, target_id, target_slot, type]`
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum UiLink {
    Object {
        #[serde(alias = "originId")]
        origin_id: u64,
        #[serde(alias = "targetId")]
        target_id: u64,
    },
    Positional(Vec<serde_json::Value>),
}

impl UiLink {
    fn endpoints(&self) -> Result<(u64, u64), GraphError> {
        match self {
            UiLink::Object {
                origin_id,
                target_id,
            } => Ok((*origin_id, *target_id)),
            UiLink::Positional(fields) => {
                let at = |pos: usize| {
                    fields.get(pos).and_then(|v| v.as_u64()).ok_or_else(|| {
                        GraphError::Conversion(format!(
                            "link {:?} has no node id at position {}",
                            fields, pos
                        ))
                    })
                };
                Ok((at(1)?, at(3)?))
            }
        }
    }
}

/// Complete exported graph
#[derive(Debug, Deserialize, Clone)]
pub struct UiGraph {
    pub nodes: Vec<UiNode>,
    #[serde(default)]
    pub links: Vec<Option<UiLink>>,
}

impl UiGraph {
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        serde_json::from_str(json).map_err(|e| GraphError::Conversion(e.to_string()))
    }
}

impl IntoGraph for UiGraph {
    fn into_graph(self) -> Result<GraphDefinition, GraphError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|node| GraphNodeDefinition {
                id: NodeId(node.id),
                node_type: node.node_type,
                title: node.title,
                params: node
                    .widgets
                    .into_iter()
                    .map(|w| ParamDefinition {
                        name: w.name,
                        value: w.value,
                    })
                    .collect(),
            })
            .collect();

        // The editor leaves `null` holes in its link table after deletions.
        let links = self
            .links
            .iter()
            .flatten()
            .map(|link| {
                link.endpoints().map(|(origin, target)| GraphLink {
                    origin_id: NodeId(origin),
                    target_id: NodeId(target),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GraphDefinition { nodes, links })
    }
}
