//! Authored content: the dialogue graph and the derived-system catalog.
//!
//! Content is static input. It is validated once when loaded so that play
//! never encounters a dangling reference.

mod catalog;
mod node;

pub use catalog::*;
pub use node::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ContentError, NavigationError};

/// Identifier of a dialogue node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-disk shape of a dialogue graph.
#[derive(Debug, Deserialize)]
struct GraphFile {
    safe_start: NodeId,
    nodes: Vec<DialogueNode>,
}

/// The dialogue graph, indexed by node id.
///
/// The safe-start node is guaranteed to exist: construction fails
/// otherwise, so recovery from a missing node always has somewhere to go.
#[derive(Debug, Clone)]
pub struct DialogueGraph {
    nodes: HashMap<NodeId, DialogueNode>,
    safe_start: NodeId,
}

impl DialogueGraph {
    /// Build and validate a graph.
    pub fn new(
        nodes: Vec<DialogueNode>,
        safe_start: impl Into<NodeId>,
    ) -> Result<Self, ContentError> {
        let safe_start = safe_start.into();
        let mut index = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if index.contains_key(&node.id) {
                return Err(ContentError::DuplicateNode(node.id));
            }
            index.insert(node.id.clone(), node);
        }

        if !index.contains_key(&safe_start) {
            return Err(ContentError::MissingSafeStart(safe_start));
        }

        let graph = Self {
            nodes: index,
            safe_start,
        };
        graph.check_choice_targets()?;
        Ok(graph)
    }

    /// Parse a graph from JSON: `{ "safe_start": "...", "nodes": [...] }`.
    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        let file: GraphFile = serde_json::from_str(json)?;
        Self::new(file.nodes, file.safe_start)
    }

    fn check_choice_targets(&self) -> Result<(), ContentError> {
        for node in self.nodes.values() {
            for choice in &node.choices {
                if let Some(target) = &choice.next_node {
                    if !self.nodes.contains_key(target) {
                        return Err(ContentError::DanglingChoice {
                            node: node.id.clone(),
                            choice: choice.id.clone(),
                            target: target.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Cross-check the graph against a catalog: every referenced combo must
    /// exist and every pattern-unlock choice must lead somewhere real.
    pub fn validate_against(&self, catalog: &ContentCatalog) -> Result<(), ContentError> {
        for node in self.nodes.values() {
            for condition in node.all_conditions() {
                for combo in condition.combo_references() {
                    if !catalog.combos.contains(combo) {
                        return Err(ContentError::UnknownCombo {
                            location: node.id.to_string(),
                            combo: combo.to_string(),
                        });
                    }
                }
            }
        }

        for unlock in &catalog.pattern_unlocks {
            if let Some(target) = &unlock.choice.next_node {
                if !self.nodes.contains_key(target) {
                    return Err(ContentError::DanglingChoice {
                        node: NodeId::new(format!("pattern_unlock:{}", unlock.id)),
                        choice: unlock.choice.id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn node(&self, id: &NodeId) -> Result<&DialogueNode, NavigationError> {
        self.nodes
            .get(id)
            .ok_or_else(|| NavigationError::NodeNotFound(id.clone()))
    }

    pub fn safe_start_id(&self) -> &NodeId {
        &self.safe_start
    }

    pub fn safe_start(&self) -> &DialogueNode {
        // Present by construction.
        &self.nodes[&self.safe_start]
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DialogueNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::Condition;

    const GRAPH: &str = r#"{
        "safe_start": "station_platform",
        "nodes": [
            {
                "id": "station_platform",
                "speaker": "samuel",
                "content": { "text": "Welcome to Grand Central Terminus.", "emotion": "warm" },
                "choices": [
                    { "id": "ask_station", "text": "What is this place?", "next_node": "samuel_explains" }
                ]
            },
            {
                "id": "samuel_explains",
                "speaker": "samuel",
                "content": { "text": "A place between places." },
                "variants": [
                    {
                        "conditions": [{ "type": "trust_at_least", "character": "samuel", "min": 5 }],
                        "content": { "text": "You already know, don't you?" }
                    }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_load_graph_from_json() {
        let graph = DialogueGraph::from_json_str(GRAPH).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.safe_start().id.as_str(), "station_platform");
        assert!(graph.node(&"samuel_explains".into()).is_ok());
    }

    #[test]
    fn test_missing_node_is_signalled() {
        let graph = DialogueGraph::from_json_str(GRAPH).unwrap();
        let err = graph.node(&"nowhere".into()).unwrap_err();
        assert_eq!(err, NavigationError::NodeNotFound("nowhere".into()));
    }

    #[test]
    fn test_missing_safe_start_rejected() {
        let nodes = vec![DialogueNode::new("a", "samuel", "Hi.")];
        let err = DialogueGraph::new(nodes, "b").unwrap_err();
        assert!(matches!(err, ContentError::MissingSafeStart(_)));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let nodes = vec![
            DialogueNode::new("a", "samuel", "Hi."),
            DialogueNode::new("a", "samuel", "Hello again."),
        ];
        assert!(matches!(
            DialogueGraph::new(nodes, "a"),
            Err(ContentError::DuplicateNode(_))
        ));
    }

    #[test]
    fn test_dangling_choice_rejected() {
        let nodes = vec![DialogueNode::new("a", "samuel", "Hi.")
            .with_choice(Choice::new("go", "Go on.").leads_to("b"))];
        assert!(matches!(
            DialogueGraph::new(nodes, "a"),
            Err(ContentError::DanglingChoice { .. })
        ));
    }

    #[test]
    fn test_unknown_condition_kind_fails_load() {
        let bad = GRAPH.replace("trust_at_least", "trust_vibes");
        assert!(matches!(
            DialogueGraph::from_json_str(&bad),
            Err(ContentError::Json(_))
        ));
    }

    #[test]
    fn test_unknown_combo_reference_rejected() {
        let nodes = vec![DialogueNode::new("a", "maya", "Hi.").with_choice(
            Choice::new("tinker", "Let's tinker.")
                .with_condition(Condition::combo_unlocked("does_not_exist")),
        )];
        let graph = DialogueGraph::new(nodes, "a").unwrap();

        let err = graph.validate_against(&ContentCatalog::default()).unwrap_err();
        assert!(matches!(err, ContentError::UnknownCombo { .. }));
    }
}
