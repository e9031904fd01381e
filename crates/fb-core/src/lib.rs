pub mod emitter;
pub mod id;
pub mod model;
pub mod mutate;
pub mod parser;
pub mod policy;
pub mod traverse;
pub mod validate;

pub use emitter::{emit_node_outline, emit_outline};
pub use id::{AutoIds, ComponentId, IdGenerator, SequentialIds};
pub use model::*;
pub use mutate::{MutationError, MutationResult, Placement, RowSlot, Side};
pub use parser::parse_outline;
pub use policy::{ContainerPolicy, MissingTargetPolicy};
pub use traverse::{ContainerPath, Location};
pub use validate::{IssueSeverity, TreeIssue, is_well_formed, validate_tree};
