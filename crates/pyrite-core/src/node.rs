use serde::{Deserialize, Serialize};
use tree_sitter::Node;

/// Stable handle for a control-flow node within one build.
///
/// Ids are assigned in creation order and never reused; nodes reference each
/// other only through ids, never by ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Fixed label vocabulary for structurally significant nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    LoopEntry,
    IfTrue,
    IfFalse,
    Enter,
    Call,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::LoopEntry => "loop_entry",
            Label::IfTrue => "if:True",
            Label::IfFalse => "if:False",
            Label::Enter => "enter",
            Label::Call => "call",
        }
    }
}

/// How a node should render.
///
/// `Source` nodes display their own source text, `Hidden` nodes are
/// sub-expression plumbing that renderers collapse into the nearest visible
/// ancestor, and `Text` carries the display string of a synthetic node
/// (`<start>`, `<define>: f`, `if: a == b`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Source,
    Hidden,
    Text(String),
}

/// One control point in the graph.
///
/// `source_ref` borrows the caller's syntax tree; the graph never outlives it
/// and never mutates it. Synthetic nodes (sentinels, branch markers, loop
/// machinery) have no `source_ref`.
#[derive(Debug, Clone)]
pub struct ControlFlowNode<'tree> {
    pub id: NodeId,
    pub source_ref: Option<Node<'tree>>,
    pub label: Option<Label>,
    pub annotation: Annotation,
    /// Backward edges, recorded during the walk; later passes only append.
    pub parents: Vec<NodeId>,
    /// Forward edges, populated once as the transpose of all parent lists.
    pub children: Vec<NodeId>,
    /// Callee names referenced by this node's statement.
    pub calls: Vec<String>,
    /// Loop-entry nodes only: every way control can leave the loop.
    pub exits: Option<Vec<NodeId>>,
    /// Function-enter nodes only: every return point plus the implicit
    /// fallthrough frontier.
    pub returns: Option<Vec<NodeId>>,
    /// Name of the enclosing function, captured at creation.
    pub function: Option<String>,
}

impl<'tree> ControlFlowNode<'tree> {
    pub fn new(
        id: NodeId,
        source_ref: Option<Node<'tree>>,
        label: Option<Label>,
        annotation: Annotation,
    ) -> Self {
        Self {
            id,
            source_ref,
            label,
            annotation,
            parents: Vec::new(),
            children: Vec::new(),
            calls: Vec::new(),
            exits: None,
            returns: None,
            function: None,
        }
    }

    /// 1-based source line, or 0 for synthetic nodes.
    pub fn line(&self) -> usize {
        self.source_ref
            .map(|node| node.start_position().row + 1)
            .unwrap_or(0)
    }

    /// Source text backing this node, if any.
    pub fn source<'s>(&self, source: &'s str) -> Option<&'s str> {
        self.source_ref
            .and_then(|node| node.utf8_text(source.as_bytes()).ok())
    }

    /// Display text, or `None` for hidden nodes.
    pub fn display(&self, source: &str) -> Option<String> {
        match &self.annotation {
            Annotation::Source => self.source(source).map(str::to_string),
            Annotation::Hidden => None,
            Annotation::Text(text) => Some(text.clone()),
        }
    }
}
