//! Plan → execute → verify reasoning agent.
//!
//! A question goes through three model roles per attempt: a planner writes a
//! numbered plan, an executor follows it and commits to a `FINAL ANSWER:`
//! line, and a verifier independently re-solves the problem and returns a
//! JSON verdict. Failed verdicts feed back into the next plan until the retry
//! budget runs out. The run then ends with a user-facing summary or a failure
//! explanation.
//!
//! - **[`core`]**: Pure logic (answer extraction, structured-output parsing,
//!   retry transitions, answer resolution). No I/O.
//! - **[`io`]**: Completion backends (Ollama HTTP, external command), prompt
//!   templates, and configuration files.
//! - **[`agents`]**: One thin wrapper per model role.
//!
//! [`solve::Orchestrator`] ties them together.

pub mod agents;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod solve;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
