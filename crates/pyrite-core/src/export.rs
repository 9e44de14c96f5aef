use crate::graph::Cfg;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Per-line flow summary - the shape a taint engine or coverage overlay
/// consumes. Line 0 collects the synthetic sentinels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineFlow {
    pub parents: BTreeSet<usize>,
    pub children: BTreeSet<usize>,
    pub calls: Vec<String>,
    pub function: String,
}

/// Collapse the node graph onto source lines.
///
/// Every node contributes its parent and child lines to its own line's entry;
/// self-loops (same-line edges) are filtered out, since they only describe
/// intra-statement plumbing.
pub fn export_lines(cfg: &Cfg<'_>) -> BTreeMap<usize, LineFlow> {
    let mut lines: BTreeMap<usize, LineFlow> = BTreeMap::new();

    for node in cfg.nodes() {
        let at = node.line();
        let entry = lines.entry(at).or_default();

        entry.parents.extend(
            node.parents
                .iter()
                .map(|&parent| cfg.node(parent).line())
                .filter(|&line| line != at),
        );
        entry.children.extend(
            node.children
                .iter()
                .map(|&child| cfg.node(child).line())
                .filter(|&line| line != at),
        );
        entry.calls.extend(node.calls.iter().cloned());
        if let Some(function) = &node.function {
            entry.function = function.clone();
        }
    }

    lines
}
