//! Integration tests: whole gestures through `CanvasController`.
//!
//! Every test lays the sign-up fixture out on a 400px-wide canvas (leaves
//! are 40px tall, columns stack, rows split their width evenly) and drives
//! the controller with the same events an embedder would send.

use fb_core::id::{ComponentId, SequentialIds};
use fb_core::model::{ComponentKind, ComponentNode, ComponentTree};
use fb_core::validate::is_well_formed;
use fb_editor::action::{Action, RejectReason};
use fb_editor::apply::ApplyOutcome;
use fb_editor::config::EditorConfig;
use fb_editor::controller::{CanvasController, Feedback};
use fb_editor::geometry::{GeometryProvider, Point, Rect, StaticGeometry};
use fb_editor::input::InputEvent;
use fb_editor::session::DragState;
use pretty_assertions::assert_eq;

const SIGNUP: &str = include_str!("fixtures/signup.fb");
const EDITOR_CONFIG: &str = include_str!("fixtures/editor.json");

const CANVAS_WIDTH: f32 = 400.0;
const LEAF_HEIGHT: f32 = 40.0;

// ─── Helpers ─────────────────────────────────────────────────────────────

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn id(s: &str) -> ComponentId {
    ComponentId::intern(s)
}

fn ids_of(nodes: &[ComponentNode]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

/// Lay out `nodes` from (`x`, `y`); returns the height used.
fn layout(nodes: &[ComponentNode], x: f32, y: f32, width: f32, stacked: bool, geo: &mut StaticGeometry) -> f32 {
    if stacked {
        let mut cursor = y;
        for node in nodes {
            cursor += place(node, x, cursor, width, geo);
        }
        cursor - y
    } else {
        let cell = width / nodes.len().max(1) as f32;
        let mut height: f32 = 0.0;
        for (i, node) in nodes.iter().enumerate() {
            height = height.max(place(node, x + i as f32 * cell, y, cell, geo));
        }
        height
    }
}

fn place(node: &ComponentNode, x: f32, y: f32, width: f32, geo: &mut StaticGeometry) -> f32 {
    let height = if node.children.is_empty() {
        LEAF_HEIGHT
    } else {
        layout(&node.children, x, y, width, !node.is_row(), geo)
    };
    geo.insert(node.id, Rect::new(x, y, width, height));
    height
}

fn geometry_for(tree: &ComponentTree) -> StaticGeometry {
    let mut geo = StaticGeometry::new();
    let height = layout(&tree.roots, 0.0, 0.0, CANVAS_WIDTH, true, &mut geo);
    geo.insert(ComponentId::root(), Rect::new(0.0, 0.0, CANVAS_WIDTH, height + 240.0));
    geo
}

fn controller(config: EditorConfig) -> CanvasController {
    CanvasController::from_outline(SIGNUP, config)
        .expect("fixture parses")
        .with_ids(SequentialIds::new())
}

/// Press on `source`, travel to `to` over `hit`, release there.
fn drag(
    c: &mut CanvasController,
    geo: &StaticGeometry,
    source: &str,
    to: Point,
    hit: Option<ComponentId>,
) -> (Feedback, Feedback) {
    let from = rect(geo, source).center();
    c.handle(&InputEvent::from_pointer_down(from.x, from.y), Some(id(source)), geo);
    let hover = c.handle(&InputEvent::from_pointer_move(to.x, to.y), hit, geo);
    let done = c.handle(&InputEvent::from_pointer_up(to.x, to.y), hit, geo);
    (hover, done)
}

fn rect(geo: &StaticGeometry, name: &str) -> Rect {
    geo.rect_of(id(name)).expect("laid out")
}

// ─── Gestures ────────────────────────────────────────────────────────────

#[test]
fn layout_matches_expectations() {
    let c = controller(EditorConfig::default());
    let geo = geometry_for(c.tree());
    assert_eq!(rect(&geo, "contact"), Rect::new(0.0, 80.0, 400.0, 120.0));
    assert_eq!(rect(&geo, "phone"), Rect::new(200.0, 120.0, 200.0, 40.0));
    assert_eq!(rect(&geo, "submit"), Rect::new(0.0, 320.0, 400.0, 40.0));
}

#[test]
fn drop_beside_column_member_forms_row() {
    init_logs();
    let mut c = controller(EditorConfig::default());
    let geo = geometry_for(c.tree());

    let (hover, done) = drag(&mut c, &geo, "birthday", Point::new(390.0, 100.0), Some(id("email")));
    assert_eq!(
        hover,
        Feedback::Hover(Action::FormRow {
            target_id: id("email"),
            side: fb_core::mutate::Side::Right,
        })
    );
    assert!(matches!(
        done,
        Feedback::Dropped {
            outcome: ApplyOutcome::Applied,
            ..
        }
    ));

    let tree = c.tree();
    assert_eq!(
        ids_of(tree.children_of(id("contact")).unwrap()),
        vec!["row_1", "phone_row", "newsletter"]
    );
    assert_eq!(ids_of(tree.children_of(id("row_1")).unwrap()), vec!["email", "birthday"]);
    assert!(is_well_formed(tree, &c.config().policy));
    assert_eq!(c.revision(), 1);
}

#[test]
fn palette_row_beside_row_member_is_lifted() {
    init_logs();
    let mut c = controller(EditorConfig::default());
    let geo = geometry_for(c.tree());

    c.press_palette(ComponentKind::ROW, Point::new(-100.0, 0.0)).unwrap();
    let hover = c.handle(&InputEvent::from_pointer_move(5.0, 140.0), Some(id("country")), &geo);
    assert_eq!(
        hover,
        Feedback::Hover(Action::InsertAfter {
            target_id: id("phone_row")
        })
    );
    c.handle(&InputEvent::from_pointer_up(5.0, 140.0), Some(id("country")), &geo);

    assert_eq!(
        ids_of(c.tree().children_of(id("contact")).unwrap()),
        vec!["email", "phone_row", "row_1", "newsletter"]
    );
    assert!(is_well_formed(c.tree(), &c.config().policy));
}

#[test]
fn full_row_refuses_drop_from_config() {
    init_logs();
    let config = EditorConfig::from_json(EDITOR_CONFIG).unwrap();
    assert_eq!(config.policy.max_row_children, 2);
    let mut c = controller(config);
    let geo = geometry_for(c.tree());
    let before = c.outline();

    let (hover, done) = drag(&mut c, &geo, "submit", Point::new(395.0, 140.0), Some(id("phone")));
    let refused = Action::Reject {
        reason: RejectReason::CapacityExceeded,
    };
    assert_eq!(hover, Feedback::Hover(refused));
    assert_eq!(
        done,
        Feedback::Dropped {
            action: refused,
            outcome: ApplyOutcome::CapacityExceeded,
        }
    );
    assert_eq!(c.outline(), before);
    assert_eq!(c.revision(), 0);
}

#[test]
fn background_drop_reorders_top_level() {
    init_logs();
    let mut c = controller(EditorConfig::default());
    let geo = geometry_for(c.tree());

    let (hover, _) = drag(&mut c, &geo, "title", Point::new(200.0, 500.0), Some(ComponentId::root()));
    assert_eq!(
        hover,
        Feedback::Hover(Action::MoveWithinContainer {
            container_id: ComponentId::root(),
            from_index: 0,
            to_index: 6,
        })
    );
    assert_eq!(
        ids_of(&c.tree().roots),
        vec!["name_row", "contact", "birthday", "sep", "captcha", "submit", "title"]
    );
}

#[test]
fn click_without_travel_changes_nothing() {
    let mut c = controller(EditorConfig::default());
    let geo = geometry_for(c.tree());
    let before = c.outline();

    c.handle(&InputEvent::from_pointer_down(200.0, 220.0), Some(id("birthday")), &geo);
    c.handle(&InputEvent::from_pointer_move(202.0, 223.0), Some(id("birthday")), &geo);
    assert!(matches!(c.session().state(), DragState::Armed { .. }));
    let done = c.handle(&InputEvent::from_pointer_up(202.0, 223.0), Some(id("birthday")), &geo);

    assert_eq!(done, Feedback::Cancelled);
    assert_eq!(c.outline(), before);
}

#[test]
fn escape_mid_drag_then_new_gesture() {
    init_logs();
    let mut c = controller(EditorConfig::default());
    let geo = geometry_for(c.tree());
    let before = c.outline();

    c.handle(&InputEvent::from_pointer_down(200.0, 340.0), Some(id("submit")), &geo);
    c.handle(&InputEvent::from_pointer_move(200.0, 20.0), Some(id("title")), &geo);
    assert_eq!(c.handle(&InputEvent::key("Escape"), None, &geo), Feedback::Cancelled);
    assert_eq!(c.outline(), before);

    // Top band of `title`: submit moves to the very top
    let (_, done) = drag(&mut c, &geo, "submit", Point::new(200.0, 2.0), Some(id("title")));
    assert!(matches!(
        done,
        Feedback::Dropped {
            action: Action::InsertBefore { .. },
            outcome: ApplyOutcome::Applied,
        }
    ));
    assert_eq!(c.tree().roots[0].id, id("submit"));
}

#[test]
fn leaving_canvas_cancels() {
    let mut c = controller(EditorConfig::default());
    let geo = geometry_for(c.tree());
    c.handle(&InputEvent::from_pointer_down(200.0, 220.0), Some(id("birthday")), &geo);
    c.handle(&InputEvent::from_pointer_move(200.0, 300.0), Some(id("captcha")), &geo);
    assert_eq!(c.handle(&InputEvent::PointerLeave, None, &geo), Feedback::Cancelled);
    assert!(!c.session().is_active());
}
