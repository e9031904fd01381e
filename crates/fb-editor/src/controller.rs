//! Canvas controller: owns the current tree and the drag session.
//!
//! The controller is the one place where a drop turns into a new tree. It
//! routes normalized `InputEvent`s into the `DragSession` and swaps in the
//! tree returned by a drop. Rendering, hit-testing, and drop indicators
//! stay with the embedder, which passes the component under the pointer
//! (`hit`) and a `GeometryProvider` with every event.

use crate::action::Action;
use crate::apply::ApplyOutcome;
use crate::config::EditorConfig;
use crate::geometry::{GeometryProvider, Point};
use crate::input::InputEvent;
use crate::session::{DragSession, DragSource, DropOutcome, SessionError};
use fb_core::emitter::emit_outline;
use fb_core::id::{AutoIds, ComponentId, IdGenerator};
use fb_core::model::{ComponentKind, ComponentTree};
use fb_core::parser::parse_outline;

/// What the embedder should show after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Nothing changed.
    None,
    /// Dragging over a target; draw the indicator for this action.
    Hover(Action),
    /// The gesture ended in a drop.
    Dropped {
        action: Action,
        outcome: ApplyOutcome,
    },
    /// The gesture was abandoned.
    Cancelled,
}

pub struct CanvasController {
    /// The current form (single source of truth).
    tree: ComponentTree,
    session: DragSession,
    ids: Box<dyn IdGenerator>,
    /// Bumped on every tree change.
    revision: u64,
}

impl CanvasController {
    pub fn new(tree: ComponentTree, config: EditorConfig) -> Self {
        Self {
            tree,
            session: DragSession::new(config),
            ids: Box::new(AutoIds),
            revision: 0,
        }
    }

    /// Create a controller from outline notation.
    pub fn from_outline(text: &str, config: EditorConfig) -> Result<Self, String> {
        Ok(Self::new(parse_outline(text)?, config))
    }

    /// Use a specific id source for synthesized rows and palette drops.
    #[must_use]
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn config(&self) -> &EditorConfig {
        self.session.config()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current tree in outline notation.
    pub fn outline(&self) -> String {
        emit_outline(&self.tree)
    }

    /// Replace the tree from outside (e.g. loading a saved form). An
    /// in-progress drag keeps going: its next hover and its drop resolve
    /// against the new tree.
    pub fn set_tree(&mut self, tree: ComponentTree) {
        self.tree = tree;
        self.revision += 1;
        self.session.invalidate_hover();
    }

    /// Press on a palette entry.
    pub fn press_palette(&mut self, kind: ComponentKind, at: Point) -> Result<(), SessionError> {
        self.session.pointer_down(at, DragSource::Palette(kind))
    }

    /// Route one input event. `hit` is the innermost component under the
    /// pointer (`root` for the canvas background).
    pub fn handle(
        &mut self,
        event: &InputEvent,
        hit: Option<ComponentId>,
        geometry: &dyn GeometryProvider,
    ) -> Feedback {
        match event {
            InputEvent::PointerDown { x, y } => {
                let Some(id) = hit.filter(|id| !id.is_root() && self.tree.contains(*id)) else {
                    return Feedback::None;
                };
                if let Err(err) = self
                    .session
                    .pointer_down(Point::new(*x, *y), DragSource::Component(id))
                {
                    log::warn!("ignored press on {id}: {err}");
                }
                Feedback::None
            }
            InputEvent::PointerMove { x, y } => self
                .session
                .pointer_move(Point::new(*x, *y), hit, &self.tree, geometry)
                .map_or(Feedback::None, Feedback::Hover),
            InputEvent::PointerUp { x, y } => {
                if !self.session.is_active() {
                    return Feedback::None;
                }
                // Drop where the pointer was released
                if self.session.payload().is_some() {
                    self.session.on_hover(Point::new(*x, *y), hit, &self.tree, geometry);
                }
                let outcome = self.session.pointer_up(&self.tree, self.ids.as_mut());
                self.finish(outcome)
            }
            InputEvent::PointerLeave => self.cancel(),
            InputEvent::Key { .. } if event.is_cancel() => self.cancel(),
            InputEvent::Key { .. } => Feedback::None,
        }
    }

    fn cancel(&mut self) -> Feedback {
        if !self.session.is_active() {
            return Feedback::None;
        }
        let outcome = self.session.on_cancel();
        self.finish(outcome)
    }

    fn finish(&mut self, outcome: DropOutcome) -> Feedback {
        match outcome {
            DropOutcome::Dropped { action, result } => {
                if result.outcome.is_applied() || result.tree != self.tree {
                    log::debug!("tree updated by {action} ({})", result.outcome);
                    self.tree = result.tree;
                    self.revision += 1;
                }
                Feedback::Dropped {
                    action,
                    outcome: result.outcome,
                }
            }
            DropOutcome::Cancelled => Feedback::Cancelled,
        }
    }
}
