use super::{with_cfg, with_cfg_mut};
use crate::graph::index_children;
use crate::node::NodeId;
use crate::{parse_module, CfgBuilder, CfgError};
use pretty_assertions::assert_eq;

#[test]
fn straight_line_is_a_single_chain() {
    // k simple statements produce exactly k statement nodes plus the two
    // sentinels, linked start -> s1 -> s2 -> s3 -> stop.
    with_cfg("pass\npass\npass\n", |cfg| {
        assert_eq!(cfg.len(), 5);
        for id in cfg.ids() {
            let node = cfg.node(id);
            assert!(node.parents.len() <= 1);
            assert!(node.children.len() <= 1);
        }
        for index in 1..cfg.len() {
            let id = NodeId(index as u32);
            assert_eq!(cfg.node(id).parents, vec![NodeId(index as u32 - 1)]);
        }
        assert!(cfg.node(cfg.stop()).children.is_empty());
    });
}

#[test]
fn assignment_threads_through_its_value() {
    with_cfg("x = 1\n", |cfg| {
        let assign = super::find_display(cfg, "x = 1");
        // The literal is a hidden successor of the assignment node.
        assert_eq!(cfg.node(assign).parents, vec![cfg.start()]);
        assert_eq!(cfg.node(assign).children.len(), 1);
        let value = cfg.node(assign).children[0];
        assert!(cfg.annotation(value).is_none());
        assert_eq!(cfg.node(cfg.stop()).parents, vec![value]);
    });
}

#[test]
fn assignment_emits_exactly_one_statement_node() {
    with_cfg("x = 1\ny += 2\n", |cfg| {
        for text in ["x = 1", "y += 2"] {
            let visible: Vec<NodeId> = cfg
                .ids()
                .filter(|&id| cfg.annotation(id).as_deref() == Some(text))
                .collect();
            assert_eq!(visible.len(), 1, "duplicate nodes for {text:?}");
        }
    });
}

#[test]
fn children_are_the_transpose_of_parents() {
    with_cfg("x = 1\nif x:\n    y = 2\n", |cfg| {
        for node in cfg.nodes() {
            for &parent in &node.parents {
                assert!(
                    cfg.node(parent).children.contains(&node.id),
                    "{} missing from children of {}",
                    node.id,
                    parent
                );
            }
            for &child in &node.children {
                assert!(
                    cfg.node(child).parents.contains(&node.id),
                    "{} missing from parents of {}",
                    node.id,
                    child
                );
            }
        }
    });
}

#[test]
fn children_indexing_is_idempotent() {
    with_cfg_mut("x = 1\nwhile x:\n    x = 2\n", |cfg| {
        let before: Vec<Vec<NodeId>> = cfg.nodes().map(|node| node.children.clone()).collect();
        index_children(&mut cfg.store);
        let after: Vec<Vec<NodeId>> = cfg.nodes().map(|node| node.children.clone()).collect();
        assert_eq!(before, after);
    });
}

#[test]
fn node_ids_increase_in_creation_order() {
    with_cfg("a = 1\nb = 2\n", |cfg| {
        let a = super::find_display(cfg, "a = 1");
        let b = super::find_display(cfg, "b = 2");
        assert!(a < b);
        assert_eq!(cfg.start(), NodeId(0));
    });
}

#[test]
fn unsupported_construct_aborts_the_build() {
    let source = "class A:\n    pass\n";
    let tree = parse_module(source).unwrap();
    let err = CfgBuilder::build(&tree, source).unwrap_err();
    match err {
        CfgError::UnsupportedSyntax(kind) => assert_eq!(kind, "class_definition"),
        other => panic!("expected UnsupportedSyntax, got {other:?}"),
    }
}

#[test]
fn parallel_assignment_is_unsupported() {
    let source = "a, b = 1, 2\n";
    let tree = parse_module(source).unwrap();
    let err = CfgBuilder::build(&tree, source).unwrap_err();
    match err {
        CfgError::UnsupportedSyntax(kind) => assert_eq!(kind, "parallel-assignment"),
        other => panic!("expected UnsupportedSyntax, got {other:?}"),
    }
}

#[test]
fn comments_do_not_emit_nodes() {
    with_cfg("# leading comment\npass  # trailing\n", |cfg| {
        // start, pass, stop
        assert_eq!(cfg.len(), 3);
    });
}

#[test]
fn imports_are_plain_statements() {
    with_cfg("import os\nfrom sys import path\npass\n", |cfg| {
        assert_eq!(cfg.len(), 5);
        let import = super::find_display(cfg, "import os");
        assert_eq!(cfg.node(import).parents, vec![cfg.start()]);
    });
}

#[test]
fn fresh_builds_use_independent_id_spaces() {
    let source = "x = 1\n";
    let tree_a = parse_module(source).unwrap();
    let cfg_a = CfgBuilder::build(&tree_a, source).unwrap();
    let tree_b = parse_module(source).unwrap();
    let cfg_b = CfgBuilder::build(&tree_b, source).unwrap();

    // Counters are scoped per build, not process-wide.
    assert_eq!(cfg_a.start(), cfg_b.start());
    assert_eq!(cfg_a.len(), cfg_b.len());
}
