//! Core application primitives (cycle runtime, scheduler)

pub mod bootstrap;
pub mod report;
pub mod runtime;
pub mod scheduler;

pub use bootstrap::*;
pub use report::*;
pub use runtime::*;
pub use scheduler::*;
