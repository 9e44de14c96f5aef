use crate::analysis::{compute_dominators, Direction, Dominators};
use crate::node::{ControlFlowNode, NodeId};
use crate::store::NodeStore;
use crate::Result;
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};

/// A resolved function definition: its enter node and every way out.
#[derive(Debug, Clone)]
pub struct FunctionEntry {
    pub enter: NodeId,
    pub returns: Vec<NodeId>,
}

/// Function name to definition, insertion-ordered. Name collisions overwrite:
/// the last definition wins, matching Python rebinding semantics.
pub type FunctionTable = IndexMap<String, FunctionEntry>;

/// A finalized control-flow graph for one analysis unit.
///
/// Only exists after the walk, the children transpose, and the function
/// linker have all run, so `children`, exports, and dominator queries are
/// always answered over a complete graph. The builder's intermediate state is
/// not observable.
#[derive(Debug)]
pub struct Cfg<'tree> {
    pub(crate) store: NodeStore<'tree>,
    source: &'tree str,
    start: NodeId,
    stop: NodeId,
    functions: FunctionTable,
}

impl<'tree> Cfg<'tree> {
    pub(crate) fn new(
        store: NodeStore<'tree>,
        source: &'tree str,
        start: NodeId,
        stop: NodeId,
        functions: FunctionTable,
    ) -> Self {
        Self {
            store,
            source,
            start,
            stop,
            functions,
        }
    }

    /// Synthetic `<start>` sentinel.
    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Synthetic `<stop>` sentinel.
    pub fn stop(&self) -> NodeId {
        self.stop
    }

    pub fn source(&self) -> &'tree str {
        self.source
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&ControlFlowNode<'tree>> {
        self.store.get(id)
    }

    /// Panics if `id` was not minted by this graph's build.
    pub fn node(&self, id: NodeId) -> &ControlFlowNode<'tree> {
        &self.store[id]
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.store.ids()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ControlFlowNode<'tree>> {
        self.store.iter()
    }

    /// Display text of a node, or `None` for hidden plumbing nodes.
    pub fn annotation(&self, id: NodeId) -> Option<String> {
        self.store.get(id).and_then(|node| node.display(self.source))
    }

    /// Every node reachable from `from` by forward edges, `from` included.
    pub fn reachable_from(&self, from: NodeId) -> HashSet<NodeId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            if visited.insert(current) {
                if let Some(node) = self.store.get(current) {
                    for &child in &node.children {
                        queue.push_back(child);
                    }
                }
            }
        }

        visited
    }

    /// Dominator sets over this graph from a chosen start node.
    pub fn dominators(&self, start: NodeId, direction: Direction) -> Result<Dominators> {
        compute_dominators(self, start, direction)
    }
}

/// Derive every node's forward edges as the exact transpose of the recorded
/// backward edges. Duplicate suppression makes a second run a no-op.
pub(crate) fn index_children(store: &mut NodeStore<'_>) {
    let edges: Vec<(NodeId, Vec<NodeId>)> = store
        .iter()
        .map(|node| (node.id, node.parents.clone()))
        .collect();
    for (id, parents) in edges {
        for parent in parents {
            store.add_child(parent, id);
        }
    }
}

/// Splice callee graphs into call sites.
///
/// For every resolvable callee of a call node: the callee's enter node becomes
/// an additional parent of the call node, and every callee return node becomes
/// an additional parent of each of the call node's children. Unresolved names
/// (library calls) stay as leaf `calls` annotations with no structural edge.
/// Requires the children transpose to have run.
pub(crate) fn link_functions(store: &mut NodeStore<'_>, functions: &FunctionTable) {
    let call_sites: Vec<(NodeId, Vec<String>)> = store
        .iter()
        .filter(|node| !node.calls.is_empty())
        .map(|node| (node.id, node.calls.clone()))
        .collect();

    for (caller, calls) in call_sites {
        for name in calls {
            let Some(entry) = functions.get(&name) else {
                continue;
            };
            store.add_parent(caller, entry.enter);
            let children = store[caller].children.clone();
            for child in children {
                for &ret in &entry.returns {
                    store.add_parent(child, ret);
                }
            }
        }
    }
}
