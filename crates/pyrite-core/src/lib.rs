/*! Control-flow graph construction and dominance analysis for Python source.
 *
 * Static analysis of Python starts with a faithful picture of control flow. This crate walks a
 * tree-sitter syntax tree into a flat graph of control points, splices called functions into their
 * call sites, and computes dominance relations - the substrate that taint engines, vulnerability
 * matchers, and coverage overlays consume.
 */

pub mod analysis;
pub mod builder;
pub mod export;
pub mod graph;
pub mod node;
pub mod parse;
pub mod store;
pub mod syntax;

pub use analysis::{compute_dominators, Direction, Dominators};
pub use builder::CfgBuilder;
pub use export::{export_lines, LineFlow};
pub use graph::{Cfg, FunctionEntry, FunctionTable};
pub use node::{Annotation, ControlFlowNode, Label, NodeId};
pub use parse::parse_module;
pub use store::NodeStore;
pub use syntax::SyntaxKind;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CfgError {
    #[error("unsupported syntax: {0}")]
    UnsupportedSyntax(String),
    #[error("malformed {kind} node at line {line}")]
    MalformedSyntax { kind: String, line: usize },
    #[error("'break' outside loop at line {0}")]
    BreakOutsideLoop(usize),
    #[error("'continue' outside loop at line {0}")]
    ContinueOutsideLoop(usize),
    #[error("'return' outside function at line {0}")]
    ReturnOutsideFunction(usize),
    #[error("start node {0} not present in the graph")]
    UnknownStartNode(NodeId),
    #[error("source could not be parsed")]
    Parse,
}

pub type Result<T> = std::result::Result<T, CfgError>;

#[cfg(test)]
mod tests;
