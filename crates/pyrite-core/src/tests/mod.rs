mod walk_tests;

use crate::graph::Cfg;
use crate::node::NodeId;
use crate::{parse_module, CfgBuilder};

/// Parse, build, and hand the finalized graph to the assertion closure. The
/// tree must outlive the graph, so both live inside this helper.
pub(crate) fn with_cfg<F>(source: &str, check: F)
where
    F: FnOnce(&Cfg<'_>),
{
    let tree = parse_module(source).expect("source must parse");
    let cfg = CfgBuilder::build(&tree, source).expect("build must succeed");
    check(&cfg);
}

pub(crate) fn with_cfg_mut<F>(source: &str, check: F)
where
    F: FnOnce(&mut Cfg<'_>),
{
    let tree = parse_module(source).expect("source must parse");
    let mut cfg = CfgBuilder::build(&tree, source).expect("build must succeed");
    check(&mut cfg);
}

/// First node whose display text matches exactly.
pub(crate) fn find_display(cfg: &Cfg<'_>, text: &str) -> NodeId {
    cfg.ids()
        .find(|&id| cfg.annotation(id).as_deref() == Some(text))
        .unwrap_or_else(|| panic!("no node displaying {text:?}"))
}

/// First node on `line` whose display text matches exactly.
pub(crate) fn find_display_at(cfg: &Cfg<'_>, text: &str, line: usize) -> NodeId {
    cfg.ids()
        .find(|&id| {
            cfg.annotation(id).as_deref() == Some(text) && cfg.node(id).line() == line
        })
        .unwrap_or_else(|| panic!("no node displaying {text:?} at line {line}"))
}
