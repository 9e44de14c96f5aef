use pyrite_core::{Cfg, Label, NodeId};
use std::collections::HashSet;

/// Executed `(parent_line, child_line)` pairs from a coverage run.
pub type CoverageArcs = HashSet<(usize, usize)>;

/// Render `cfg` as a DOT digraph.
///
/// Hidden nodes are not drawn; edges into a visible node are lifted to the
/// nearest visible ancestor of each recorded parent. Branch edges keep their
/// arm color: blue for the `True` arm, red for the `False` arm.
pub fn to_dot(cfg: &Cfg<'_>) -> String {
    render(cfg, None)
}

/// Render `cfg` as a DOT digraph with coverage coloring: edges whose
/// `(parent_line, child_line)` pair appears in `arcs` are green, every other
/// edge is red.
pub fn to_dot_with_coverage(cfg: &Cfg<'_>, arcs: &CoverageArcs) -> String {
    render(cfg, Some(arcs))
}

fn render(cfg: &Cfg<'_>, arcs: Option<&CoverageArcs>) -> String {
    let mut out = String::from("digraph cfg {\n");

    for id in cfg.ids() {
        let Some(text) = cfg.annotation(id) else {
            continue;
        };
        out.push_str(&format!(
            "  {} [label=\"{}\", shape={}, peripheries={}];\n",
            id,
            escape(&text),
            shape(&text),
            peripheries(&text),
        ));

        for &parent in &cfg.node(id).parents {
            let Some(ancestor) = visible_ancestor(cfg, parent) else {
                continue;
            };
            let color = match arcs {
                Some(arcs) => coverage_color(cfg, ancestor, id, arcs),
                None => arm_color(cfg, parent),
            };
            out.push_str(&format!("  {} -> {} [color={}];\n", ancestor, id, color));
        }
    }

    out.push_str("}\n");
    out
}

/// Walk the first-parent chain of a hidden node up to the nearest node a
/// renderer actually draws. `None` means the chain dead-ends, which only
/// happens for plumbing emitted after a statement that never falls through.
fn visible_ancestor(cfg: &Cfg<'_>, mut id: NodeId) -> Option<NodeId> {
    while cfg.annotation(id).is_none() {
        id = *cfg.node(id).parents.first()?;
    }
    Some(id)
}

/// Branch arm color for the hidden chain starting at `id`: the first branch
/// marker met decides, black if the chain reaches a visible node first.
fn arm_color(cfg: &Cfg<'_>, mut id: NodeId) -> &'static str {
    while cfg.annotation(id).is_none() {
        match cfg.node(id).label {
            Some(Label::IfTrue) => return "blue",
            Some(Label::IfFalse) => return "red",
            _ => {}
        }
        match cfg.node(id).parents.first() {
            Some(&parent) => id = parent,
            None => break,
        }
    }
    "black"
}

fn coverage_color(cfg: &Cfg<'_>, parent: NodeId, child: NodeId, arcs: &CoverageArcs) -> &'static str {
    let arc = (cfg.node(parent).line(), cfg.node(child).line());
    if arcs.contains(&arc) {
        "green"
    } else {
        "red"
    }
}

fn shape(text: &str) -> &'static str {
    if is_sentinel(text) {
        "oval"
    } else if text.starts_with("if:") || text.starts_with("for:") {
        "diamond"
    } else {
        "rectangle"
    }
}

fn peripheries(text: &str) -> &'static str {
    if is_sentinel(text) {
        "2"
    } else {
        "1"
    }
}

fn is_sentinel(text: &str) -> bool {
    text == "<start>" || text == "<stop>" || text.starts_with("<define>")
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
