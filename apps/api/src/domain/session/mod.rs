// Session domain module
// Contains the session aggregate root, its transcript, the status
// transition table and domain events

#![allow(clippy::module_inception)]

pub mod events;
pub mod session;
pub mod transcript;
pub mod value_objects;
pub mod workflow;

// Re-export main types for convenience
pub use events::SessionEvent;
pub use session::{RunningTask, Session};
pub use transcript::{Message, MessageRole, NavLink, ProcessingStep, StepStatus, Transcript};
pub use value_objects::{Request, RequestNo, RequestType, SessionStatus, TaskKind};
pub use workflow::{transition, InvalidTransition, SessionAction, TransitionError};
