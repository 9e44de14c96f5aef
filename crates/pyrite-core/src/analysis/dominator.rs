use crate::graph::Cfg;
use crate::node::NodeId;
use crate::{CfgError, Result};
use std::collections::{HashMap, HashSet};

/// Which adjacency the solver follows.
///
/// `Forward` reads `parents` as the predecessor relation (classic dominance
/// from a start node); `Post` reads `children` (post-dominance from an exit
/// node).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Post,
}

/// Dominator sets for every node, keyed by node id.
#[derive(Debug, Clone, PartialEq)]
pub struct Dominators {
    start: NodeId,
    direction: Direction,
    sets: HashMap<NodeId, HashSet<NodeId>>,
}

impl Dominators {
    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set(&self, node: NodeId) -> Option<&HashSet<NodeId>> {
        self.sets.get(&node)
    }

    pub fn sets(&self) -> &HashMap<NodeId, HashSet<NodeId>> {
        &self.sets
    }

    /// Does every path from the start to `node` pass through `dominator`?
    pub fn dominates(&self, dominator: NodeId, node: NodeId) -> bool {
        self.sets
            .get(&node)
            .map(|set| set.contains(&dominator))
            .unwrap_or(false)
    }
}

/// Iterative fixed point: the start owns `{start}`, everything else starts at
/// the full node set and monotonically shrinks until a full pass changes
/// nothing. An empty predecessor intersection yields the empty set, so
/// unreached nodes settle at `{node}` plus whatever the over-approximation
/// leaves.
pub fn compute_dominators(cfg: &Cfg<'_>, start: NodeId, direction: Direction) -> Result<Dominators> {
    if cfg.get(start).is_none() {
        return Err(CfgError::UnknownStartNode(start));
    }

    let all_nodes: HashSet<NodeId> = cfg.ids().collect();
    let mut sets: HashMap<NodeId, HashSet<NodeId>> = HashMap::with_capacity(all_nodes.len());
    sets.insert(start, HashSet::from([start]));
    for id in cfg.ids() {
        if id != start {
            sets.insert(id, all_nodes.clone());
        }
    }

    let mut changed = true;
    while changed {
        changed = false;

        for id in cfg.ids() {
            if id == start {
                continue;
            }

            let predecessors = match direction {
                Direction::Forward => &cfg.node(id).parents,
                Direction::Post => &cfg.node(id).children,
            };

            let mut new_set = match predecessors.split_first() {
                None => HashSet::new(),
                Some((first, rest)) => {
                    let mut intersection = sets[first].clone();
                    for pred in rest {
                        intersection = intersection.intersection(&sets[pred]).copied().collect();
                    }
                    intersection
                }
            };
            new_set.insert(id);

            if sets[&id] != new_set {
                sets.insert(id, new_set);
                changed = true;
            }
        }
    }

    Ok(Dominators {
        start,
        direction,
        sets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_module, CfgBuilder};

    #[test]
    fn start_dominates_straight_line() {
        let source = "a = 1\nb = 2\n";
        let tree = parse_module(source).unwrap();
        let cfg = CfgBuilder::build(&tree, source).unwrap();

        let doms = compute_dominators(&cfg, cfg.start(), Direction::Forward).unwrap();
        for id in cfg.ids() {
            assert!(doms.dominates(cfg.start(), id), "start must dominate {id}");
        }
        assert_eq!(doms.set(cfg.start()), Some(&HashSet::from([cfg.start()])));
    }

    #[test]
    fn branch_arms_do_not_dominate_each_other() {
        let source = "if a:\n    b = 1\nelse:\n    c = 2\n";
        let tree = parse_module(source).unwrap();
        let cfg = CfgBuilder::build(&tree, source).unwrap();

        let doms = compute_dominators(&cfg, cfg.start(), Direction::Forward).unwrap();
        let arm_b = cfg
            .nodes()
            .find(|node| node.display(source).as_deref() == Some("b = 1"))
            .map(|node| node.id)
            .unwrap();
        let arm_c = cfg
            .nodes()
            .find(|node| node.display(source).as_deref() == Some("c = 2"))
            .map(|node| node.id)
            .unwrap();

        assert!(!doms.dominates(arm_b, arm_c));
        assert!(!doms.dominates(arm_c, arm_b));
        assert!(doms.dominates(cfg.start(), arm_b));
        assert!(doms.dominates(cfg.start(), arm_c));
    }

    #[test]
    fn stop_postdominates_straight_line() {
        let source = "a = 1\nb = 2\n";
        let tree = parse_module(source).unwrap();
        let cfg = CfgBuilder::build(&tree, source).unwrap();

        let postdoms = compute_dominators(&cfg, cfg.stop(), Direction::Post).unwrap();
        for id in cfg.ids() {
            assert!(postdoms.dominates(cfg.stop(), id), "stop must post-dominate {id}");
        }
    }

    #[test]
    fn recomputation_reaches_the_same_fixed_point() {
        let source = "while a:\n    if b:\n        break\n    c = 1\n";
        let tree = parse_module(source).unwrap();
        let cfg = CfgBuilder::build(&tree, source).unwrap();

        let first = compute_dominators(&cfg, cfg.start(), Direction::Forward).unwrap();
        let second = compute_dominators(&cfg, cfg.start(), Direction::Forward).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_start_is_an_error() {
        let source = "a = 1\n";
        let tree = parse_module(source).unwrap();
        let cfg = CfgBuilder::build(&tree, source).unwrap();

        let missing = NodeId(10_000);
        let err = compute_dominators(&cfg, missing, Direction::Forward).unwrap_err();
        assert!(matches!(err, CfgError::UnknownStartNode(id) if id == missing));
    }
}
