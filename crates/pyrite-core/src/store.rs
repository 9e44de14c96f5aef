use crate::node::{Annotation, ControlFlowNode, Label, NodeId};
use tree_sitter::Node;

/// Arena owning every control-flow node of one analysis unit.
///
/// A node's id is its insertion index, so the counter lives and dies with the
/// store; independent builds get independent id spaces. Nodes are only ever
/// appended - later passes add edges to existing nodes but never remove any.
#[derive(Debug, Default)]
pub struct NodeStore<'tree> {
    nodes: Vec<ControlFlowNode<'tree>>,
}

impl<'tree> NodeStore<'tree> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Id the next `add` call will assign.
    pub fn peek_id(&self) -> NodeId {
        NodeId(self.nodes.len() as u32)
    }

    pub fn add(
        &mut self,
        parents: &[NodeId],
        source_ref: Option<Node<'tree>>,
        label: Option<Label>,
        annotation: Annotation,
    ) -> NodeId {
        let id = self.peek_id();
        let mut node = ControlFlowNode::new(id, source_ref, label, annotation);
        for &parent in parents {
            if !node.parents.contains(&parent) {
                node.parents.push(parent);
            }
        }
        self.nodes.push(node);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&ControlFlowNode<'tree>> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ControlFlowNode<'tree>> {
        self.nodes.get_mut(id.index())
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlFlowNode<'tree>> {
        self.nodes.iter()
    }

    /// Append a backward edge, suppressing duplicates.
    pub fn add_parent(&mut self, id: NodeId, parent: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            if !node.parents.contains(&parent) {
                node.parents.push(parent);
            }
        }
    }

    pub fn add_parents(&mut self, id: NodeId, parents: &[NodeId]) {
        for &parent in parents {
            self.add_parent(id, parent);
        }
    }

    /// Append a forward edge, suppressing duplicates.
    pub fn add_child(&mut self, id: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            if !node.children.contains(&child) {
                node.children.push(child);
            }
        }
    }
}

impl<'tree> std::ops::Index<NodeId> for NodeStore<'tree> {
    type Output = ControlFlowNode<'tree>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}
