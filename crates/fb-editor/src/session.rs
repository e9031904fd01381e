//! Drag session: the state machine for one drag gesture.
//!
//! ```text
//! Idle ─pointer_down─▶ Armed ─move past threshold─▶ Dragging ◀─▶ Hovering
//!                        │                             │            │
//!                        └──── pointer_up / cancel ────┴─▶ Cancelled │
//!                                                       pointer_up ─┴─▶ Dropped
//! ```
//!
//! `Dropped` and `Cancelled` are never stored: the call that reaches them
//! returns a `DropOutcome` and leaves the session `Idle`. Hover results are
//! cached per (target, zone) until `invalidate_hover`; the drop re-resolves
//! against the tree it is applied to (reorders are re-anchored on the
//! payload's current index), so a stale hover never reaches the mutator.

use crate::action::Action;
use crate::apply::{ApplyResult, apply};
use crate::config::EditorConfig;
use crate::geometry::{GeometryProvider, Point, Rect};
use crate::payload::DragPayload;
use crate::resolve::resolve_in;
use crate::zone::{Axis, Zone, classify_with, insertion_index};
use fb_core::id::{ComponentId, IdGenerator};
use fb_core::model::{ComponentKind, ComponentTree};
use fb_core::traverse;
use thiserror::Error;

/// What a press landed on.
#[derive(Debug, Clone, PartialEq)]
pub enum DragSource {
    /// A palette entry that creates a new component of this kind.
    Palette(ComponentKind),
    /// A component already on the canvas.
    Component(ComponentId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    /// Pressed, not yet moved far enough to count as a drag.
    Armed { source: DragSource, origin: Point },
    /// Dragging with no valid target under the pointer.
    Dragging { payload: DragPayload },
    /// Dragging over `target`, with the action a drop would perform.
    Hovering {
        payload: DragPayload,
        zone: Zone,
        target: ComponentId,
        pending_action: Action,
    },
}

/// How a gesture ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// The drop ran. `result.tree` is the tree to adopt; on a refused drop it
    /// equals the input tree.
    Dropped { action: Action, result: ApplyResult },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a drag gesture is already in progress")]
    AlreadyActive,
}

/// The single in-progress drag gesture, owned by the canvas controller.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
    config: EditorConfig,
}

impl DragSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            state: DragState::Idle,
            config,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Takes effect from the next hover.
    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn payload(&self) -> Option<&DragPayload> {
        match &self.state {
            DragState::Dragging { payload } | DragState::Hovering { payload, .. } => Some(payload),
            DragState::Idle | DragState::Armed { .. } => None,
        }
    }

    pub fn pending_action(&self) -> Option<&Action> {
        match &self.state {
            DragState::Hovering { pending_action, .. } => Some(pending_action),
            _ => None,
        }
    }

    // ─── Hooks ───────────────────────────────────────────────────────────

    /// Start dragging `payload` immediately, skipping the press threshold.
    pub fn on_drag_start(&mut self, payload: DragPayload) -> Result<(), SessionError> {
        if self.is_active() {
            return Err(SessionError::AlreadyActive);
        }
        log::debug!("drag start: {payload:?}");
        self.state = DragState::Dragging { payload };
        Ok(())
    }

    /// Re-evaluate the drop under `pointer`. `candidate` is the innermost
    /// component under the pointer (`root` for the canvas background, `None`
    /// for nothing droppable). Returns the pending action, if any.
    ///
    /// The cache assumes `tree` is unchanged since the last hover; call
    /// `invalidate_hover` after replacing it.
    pub fn on_hover(
        &mut self,
        pointer: Point,
        candidate: Option<ComponentId>,
        tree: &ComponentTree,
        geometry: &dyn GeometryProvider,
    ) -> Option<Action> {
        let payload = match std::mem::take(&mut self.state) {
            DragState::Hovering {
                payload,
                zone,
                target,
                pending_action,
            } => {
                // Same target and zone: reuse, unless the action depends on
                // the exact pointer position
                if let Some(hit) = candidate
                    && hit == target
                    && !matches!(pending_action, Action::MoveWithinContainer { .. })
                    && self.zone_of(pointer, hit, geometry) == Some(zone)
                {
                    self.state = DragState::Hovering {
                        payload,
                        zone,
                        target,
                        pending_action,
                    };
                    return Some(pending_action);
                }
                payload
            }
            DragState::Dragging { payload } => payload,
            other => {
                self.state = other;
                return None;
            }
        };

        let hovered = candidate.and_then(|target| {
            let zone = self.zone_of(pointer, target, geometry)?;
            let action = self
                .reorder_action(pointer, &payload, target, zone, tree, geometry)
                .or_else(|| resolve_in(tree, zone, &payload, target, &self.config.policy))?;
            Some((target, zone, action))
        });

        match hovered {
            Some((target, zone, action)) => {
                log::trace!("hover {target} {zone:?}: {action}");
                self.state = DragState::Hovering {
                    payload,
                    zone,
                    target,
                    pending_action: action,
                };
                Some(action)
            }
            None => {
                self.state = DragState::Dragging { payload };
                None
            }
        }
    }

    /// Finish the gesture. A hover becomes a drop applied to `tree`;
    /// anything else cancels.
    pub fn on_drop(&mut self, tree: &ComponentTree, ids: &mut dyn IdGenerator) -> DropOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Hovering {
                payload,
                zone,
                target,
                pending_action,
            } => {
                let resolved = match pending_action {
                    Action::MoveWithinContainer {
                        container_id,
                        to_index,
                        ..
                    } => rebase_reorder(tree, &payload, container_id, to_index),
                    _ => None,
                };
                // A vanished target keeps the hover action so the
                // missing-target policy decides
                let action = resolved
                    .or_else(|| resolve_in(tree, zone, &payload, target, &self.config.policy))
                    .unwrap_or(pending_action);
                let result = apply(tree, &action, &payload, &self.config.policy, ids);
                log::debug!("drop on {target} {zone:?}: {action} -> {}", result.outcome);
                DropOutcome::Dropped { action, result }
            }
            DragState::Idle => DropOutcome::Cancelled,
            other => {
                log::debug!("drop without target: cancelled ({other:?})");
                DropOutcome::Cancelled
            }
        }
    }

    /// Forget the cached hover after the tree changed under the drag. The
    /// next `on_hover` resolves from scratch.
    pub fn invalidate_hover(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            DragState::Hovering { payload, .. } => DragState::Dragging { payload },
            other => other,
        };
    }

    /// Abandon the gesture (Escape, pointer left the canvas).
    pub fn on_cancel(&mut self) -> DropOutcome {
        if self.is_active() {
            log::debug!("drag cancelled");
        }
        self.state = DragState::Idle;
        DropOutcome::Cancelled
    }

    // ─── Pointer events ──────────────────────────────────────────────────

    /// Press on a draggable source.
    pub fn pointer_down(&mut self, pointer: Point, source: DragSource) -> Result<(), SessionError> {
        if self.is_active() {
            return Err(SessionError::AlreadyActive);
        }
        log::debug!("armed: {source:?}");
        self.state = DragState::Armed {
            source,
            origin: pointer,
        };
        Ok(())
    }

    /// Pointer travel. Promotes a press to a drag once it passes the
    /// threshold, then hovers.
    pub fn pointer_move(
        &mut self,
        pointer: Point,
        candidate: Option<ComponentId>,
        tree: &ComponentTree,
        geometry: &dyn GeometryProvider,
    ) -> Option<Action> {
        if let DragState::Armed { source, origin } = &self.state {
            let threshold = self.config.drag_threshold;
            if (pointer.x - origin.x).abs() <= threshold && (pointer.y - origin.y).abs() <= threshold {
                return None;
            }
            let payload = match source {
                DragSource::Palette(kind) => Some(DragPayload::new_item(kind.clone())),
                DragSource::Component(id) => DragPayload::existing(tree, *id),
            };
            let Some(payload) = payload else {
                log::debug!("drag source vanished before the drag started; cancelled");
                self.state = DragState::Idle;
                return None;
            };
            log::debug!("drag start: {payload:?}");
            self.state = DragState::Dragging { payload };
        }
        self.on_hover(pointer, candidate, tree, geometry)
    }

    /// Release. Drops when hovering a target; otherwise cancels (a release
    /// while only armed is a click).
    pub fn pointer_up(&mut self, tree: &ComponentTree, ids: &mut dyn IdGenerator) -> DropOutcome {
        self.on_drop(tree, ids)
    }

    // ─── Internals ───────────────────────────────────────────────────────

    /// Zone of `pointer` over `target`. The canvas background is all center;
    /// a target without geometry is not droppable.
    fn zone_of(&self, pointer: Point, target: ComponentId, geometry: &dyn GeometryProvider) -> Option<Zone> {
        if target.is_root() {
            return Some(Zone::Center);
        }
        let rect = geometry.rect_of(target)?;
        Some(classify_with(
            pointer,
            rect,
            self.config.thresholds,
            self.config.zone_strategy,
        ))
    }

    /// Over the center of the payload's own container: reorder by gap
    /// scanning its rendered children.
    fn reorder_action(
        &self,
        pointer: Point,
        payload: &DragPayload,
        target: ComponentId,
        zone: Zone,
        tree: &ComponentTree,
        geometry: &dyn GeometryProvider,
    ) -> Option<Action> {
        let DragPayload::ExistingItem { id, .. } = payload else {
            return None;
        };
        if zone != Zone::Center || payload.origin_container() != Some(target) {
            return None;
        }
        let location = traverse::locate(&tree.roots, *id)?;
        if location.container != target {
            return None;
        }
        let siblings = tree.children_of(target)?;
        let rects: Vec<Rect> = siblings
            .iter()
            .map(|s| geometry.rect_of(s.id))
            .collect::<Option<_>>()?;
        let axis = Axis::of(tree.container_kind(target)?);

        let gap = insertion_index(pointer, &rects, axis);
        let from_index = location.index;
        // The gap is counted with the payload still in place
        let to_index = if gap > from_index { gap - 1 } else { gap };
        Some(Action::MoveWithinContainer {
            container_id: target,
            from_index,
            to_index: to_index.min(siblings.len() - 1),
        })
    }
}

/// Re-anchor a hover-time reorder on `tree`: the payload's current index
/// in `container_id`, with the destination clamped to the container. `None`
/// if the payload no longer sits in that container.
fn rebase_reorder(
    tree: &ComponentTree,
    payload: &DragPayload,
    container_id: ComponentId,
    to_index: usize,
) -> Option<Action> {
    let location = traverse::locate(&tree.roots, payload.id()?)?;
    if location.container != container_id {
        return None;
    }
    let len = tree.children_of(container_id)?.len();
    Some(Action::MoveWithinContainer {
        container_id,
        from_index: location.index,
        to_index: to_index.min(len.saturating_sub(1)),
    })
}
