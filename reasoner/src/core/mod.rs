//! Deterministic, pure logic shared by the orchestrator.
//!
//! Core modules must be free of I/O side effects. They operate on completion
//! text and in-memory records and return deterministic outputs suitable for tests.

pub mod extract;
pub mod finalize;
pub mod transition;
pub mod types;
