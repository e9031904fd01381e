pub mod action;
pub mod apply;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod input;
pub mod payload;
pub mod resolve;
pub mod session;
pub mod zone;

pub use action::{Action, RejectReason};
pub use apply::{ApplyOutcome, ApplyResult, apply};
pub use config::{ConfigError, EditorConfig};
pub use controller::{CanvasController, Feedback};
pub use geometry::{GeometryProvider, Point, Rect, StaticGeometry};
pub use input::InputEvent;
pub use payload::DragPayload;
pub use resolve::{Ancestry, resolve, resolve_in};
pub use session::{DragSession, DragSource, DragState, DropOutcome, SessionError};
pub use zone::{Axis, Thresholds, Zone, ZoneStrategy, classify, classify_with, insertion_index};
