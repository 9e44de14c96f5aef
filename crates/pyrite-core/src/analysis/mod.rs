/*! Dataflow analyses over a finalized control-flow graph.
 *
 * Dominance is the workhorse: it tells downstream consumers which control points every execution
 * must pass through, forward from the start sentinel or backward from the stop sentinel.
 */

pub mod dominator;

pub use dominator::{compute_dominators, Direction, Dominators};
