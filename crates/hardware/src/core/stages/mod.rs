//! Pipeline stage implementations.
//!
//! Each stage is a small state machine advanced once per core cycle over
//! its instruction stream, its statically assigned memory channels, and the
//! token channels it shares with its neighbors. A stage that cannot make
//! progress holds its state unchanged; suspension is the only blocking
//! primitive.

/// Compute stage (reloads, accumulation, result production, finish).
pub mod compute;
/// Instruction fetch and demultiplex.
pub mod fetch;
/// Operand transfers into the scratchpad.
pub mod load;
/// Result transfers to external memory.
pub mod store;

pub use compute::ComputeStage;
pub use fetch::FetchStage;
pub use load::LoadStage;
pub use store::StoreStage;
