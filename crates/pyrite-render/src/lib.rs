/*! Graphviz rendering for control-flow graphs.
 *
 * A graph is easiest to review as a picture. This crate lowers a finalized [`Cfg`] to DOT text,
 * collapsing sub-expression plumbing nodes into their nearest visible ancestor and keeping the
 * shape and color conventions stable so diffs between runs stay readable.
 *
 * [`Cfg`]: pyrite_core::Cfg
 */

pub mod dot;

pub use dot::{to_dot, to_dot_with_coverage, CoverageArcs};
