//! Integration tests: tree mutator properties across the public API.
//!
//! Scenario tests use small outlines; property-style tests run every
//! operation against the sign-up fixture and check the results with
//! `validate_tree`.

use fb_core::emitter::emit_outline;
use fb_core::id::{ComponentId, SequentialIds};
use fb_core::model::*;
use fb_core::mutate::*;
use fb_core::parser::parse_outline;
use fb_core::policy::ContainerPolicy;
use fb_core::validate::is_well_formed;
use pretty_assertions::assert_eq;

const SIGNUP: &str = include_str!("fixtures/signup.fb");
const FULL_ROW: &str = include_str!("fixtures/full_row.fb");

fn id(s: &str) -> ComponentId {
    ComponentId::intern(s)
}

fn leaf(name: &str) -> ComponentNode {
    ComponentNode::leaf(name, FieldType::Input)
}

// ─── Concrete scenarios ─────────────────────────────────────────────────

#[test]
fn scenario_insert_after() {
    let tree = parse_outline("input @A\ninput @B\n").unwrap();
    let out = insert_after(&tree, id("A"), leaf("C"), &ContainerPolicy::default()).unwrap();
    assert_eq!(emit_outline(&out), "input @A\ninput @C\ninput @B\n");
}

#[test]
fn scenario_form_row_right() {
    let tree = parse_outline("input @A\n").unwrap();
    let out = form_row(
        &tree,
        id("A"),
        leaf("B"),
        Side::Right,
        &ContainerPolicy::default(),
        &mut SequentialIds::new(),
    )
    .unwrap();
    assert_eq!(out.roots.len(), 1);
    assert!(out.roots[0].is_row());
    assert_eq!(out.roots[0].children, vec![leaf("A"), leaf("B")]);
}

#[test]
fn scenario_full_row_refuses_member() {
    let tree = parse_outline(FULL_ROW).unwrap();
    let (rest, v) = extract_node(&tree, id("V"));
    let err = append_to_row(
        &rest,
        id("R"),
        v.unwrap(),
        RowSlot::End,
        &ContainerPolicy::with_max_row_children(4),
    )
    .unwrap_err();
    assert!(matches!(err, MutationError::CapacityExceeded { max: 4, .. }));
}

#[test]
fn larger_capacity_admits_fifth_member() {
    let tree = parse_outline(FULL_ROW).unwrap();
    let out = move_node(
        &tree,
        id("V"),
        Placement::Row(id("R"), RowSlot::After(id("Y"))),
        &ContainerPolicy::with_max_row_children(12),
        &mut SequentialIds::new(),
    )
    .unwrap();
    assert_eq!(
        emit_outline(&out),
        "row @R {\n  input @X\n  input @Y\n  input @V\n  input @Z\n  input @W\n}\n"
    );
}

// ─── Properties over the fixture ─────────────────────────────────────────

#[test]
fn extract_and_reinsert_every_node_restores_tree() {
    let tree = parse_outline(SIGNUP).unwrap();
    let policy = ContainerPolicy::default();

    for node_id in tree.ids() {
        let loc = location_of(&tree, node_id).unwrap();
        let (rest, node) = extract_node(&tree, node_id);
        let node = node.unwrap();
        assert!(!rest.contains(node_id));

        let restored = insert_at(&rest, loc.container, loc.index, node, &policy)
            .unwrap_or_else(|e| panic!("re-insert of {node_id} failed: {e}"));
        assert_eq!(restored, tree, "round-trip changed the tree for {node_id}");
    }
}

#[test]
fn every_successful_move_keeps_tree_well_formed() {
    let tree = parse_outline(SIGNUP).unwrap();
    let policy = ContainerPolicy::default();
    let ids = tree.ids();
    let mut fresh = SequentialIds::starting_after(1000);

    let mut applied = 0;
    for &moving in &ids {
        for &anchor in &ids {
            let placements = [
                Placement::Before(anchor),
                Placement::After(anchor),
                Placement::Into(anchor),
                Placement::FormRow(anchor, Side::Left),
                Placement::Row(anchor, RowSlot::End),
            ];
            for placement in placements {
                match move_node(&tree, moving, placement, &policy, &mut fresh) {
                    Ok(out) => {
                        applied += 1;
                        assert!(
                            is_well_formed(&out, &policy),
                            "{moving} {placement:?} produced:\n{}",
                            emit_outline(&out)
                        );
                        let added = usize::from(matches!(placement, Placement::FormRow(..)));
                        assert_eq!(out.len(), tree.len() + added);
                        let mut sorted = out.ids();
                        sorted.sort_by(|a, b| a.as_str().cmp(b.as_str()));
                        sorted.dedup();
                        assert_eq!(sorted.len(), out.len(), "duplicate id after {placement:?}");
                    }
                    Err(MutationError::SelfDrop { id }) => {
                        assert_eq!(id, moving);
                        assert!(
                            tree.get(moving).is_some_and(|n| n.contains(anchor)),
                            "unexpected self-drop for {moving} onto {anchor}"
                        );
                    }
                    Err(_) => {}
                }
            }
        }
    }
    assert!(applied > 100, "only {applied} moves succeeded");
}

#[test]
fn moving_row_beside_row_member_is_refused() {
    let tree = parse_outline(SIGNUP).unwrap();
    let err = move_node(
        &tree,
        id("name_row"),
        Placement::After(id("country")),
        &ContainerPolicy::default(),
        &mut SequentialIds::new(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        MutationError::InvalidNesting {
            parent: id("phone_row"),
            child: id("name_row"),
        }
    );
}

#[test]
fn failed_operations_leave_tree_untouched() {
    let tree = parse_outline(SIGNUP).unwrap();
    let snapshot = tree.clone();
    let policy = ContainerPolicy::with_max_row_children(2);

    assert!(insert_into(&tree, id("name_row"), leaf("extra"), &policy).is_err());
    assert!(insert_after(&tree, id("ghost"), leaf("extra"), &policy).is_err());
    assert!(
        move_node(
            &tree,
            id("contact"),
            Placement::Into(id("phone_row")),
            &policy,
            &mut SequentialIds::new(),
        )
        .is_err()
    );
    assert_eq!(tree, snapshot);
}
