// Agent application layer
//
// This module coordinates the worker agents: the operator console that
// owns every session mutation, the processing simulator that drives
// timed tasks, and the router that moves requests between agents.

pub mod console;
pub mod errors;
pub mod router;
pub mod simulator;

// Re-export main types
pub use console::Console;
pub use errors::{AgentError, AgentResult};
pub use router::CrossAgentRouter;
pub use simulator::{ProcessingSimulator, TaskDriver, TickOutcome, DEFAULT_STEP_INTERVAL};
