//! Fluent builders for test programs.

pub mod program;

pub use program::ProgramBuilder;
