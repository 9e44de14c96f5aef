/*! Unified interface for Python control-flow analysis.
 *
 * Single import for everything you need: building control-flow graphs from source, computing
 * dominance relations, rendering DOT, and checking declared requirement ranges.
 */

pub use pyrite_core as core;
pub use pyrite_render as render;
pub use pyrite_requirements as requirements;

pub use pyrite_core::{
    compute_dominators, export_lines, parse_module, Cfg, CfgBuilder, CfgError, ControlFlowNode,
    Direction, Dominators, LineFlow, NodeId,
};

pub use pyrite_render::{to_dot, to_dot_with_coverage};

pub use pyrite_requirements::{parse_requirements, Requirement, Version, VRange};
