//! The plan → execute → verify controller.
//!
//! [`Orchestrator::solve`] runs up to `max_retries + 1` attempts, stopping at
//! the first passing verification and threading each failed attempt's
//! feedback into the next plan. The finalizer then runs exactly once: the
//! summarizer on success, the failure analyst when the budget is exhausted.
//! Nothing inside a run is returned as an error; every degradation is folded
//! into the [`RunResult`].

use tracing::{debug, info, info_span, instrument};

use crate::agents::executor::ExecutorAgent;
use crate::agents::failure::FailureAnalystAgent;
use crate::agents::planner::PlannerAgent;
use crate::agents::summarizer::SummarizerAgent;
use crate::agents::verifier::VerifierAgent;
use crate::core::finalize::{Resolution, resolve_failure, resolve_success};
use crate::core::transition::{Transition, next_transition};
use crate::core::types::{CheckLogEntry, RunMetadata, RunResult, RunStatus, Verification};
use crate::io::completion::Completer;

/// Retries allowed after the first attempt unless configured otherwise.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Holds the completion backend and the fixed per-orchestrator configuration.
///
/// `solve` takes `&self` and keeps all run state on its own stack, so one
/// orchestrator can serve any number of questions.
#[derive(Debug, Clone)]
pub struct Orchestrator<C> {
    completer: C,
    model: String,
    max_retries: u32,
}

/// Artifacts of the last attempt, handed to the finalizer.
struct LastAttempt {
    plan: String,
    solution: String,
    verification: Verification,
    attempt: u32,
}

impl<C: Completer> Orchestrator<C> {
    pub fn new(completer: C, model: impl Into<String>) -> Self {
        Self {
            completer,
            model: model.into(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Answer `question` with the retrying plan/execute/verify loop.
    #[instrument(skip_all, fields(model = %self.model, max_retries = self.max_retries))]
    pub fn solve(&self, question: &str) -> RunResult {
        info!(question_bytes = question.len(), "solve started");

        let mut checks = Vec::new();
        let (status, last) = self.attempt_loop(question, &mut checks);

        let Resolution {
            answer,
            reasoning_visible_to_user,
        } = match status {
            RunStatus::Success => {
                let summary =
                    SummarizerAgent::new(&self.model).run(&self.completer, &last.solution);
                resolve_success(&last.solution, &last.verification, summary.as_ref())
            }
            RunStatus::Failed => {
                let summary = FailureAnalystAgent::new(&self.model).run(&self.completer, &checks);
                resolve_failure(summary.as_ref())
            }
        };

        info!(status = %status, retries = last.attempt, "solve finished");
        RunResult {
            answer,
            status,
            reasoning_visible_to_user,
            metadata: RunMetadata {
                plan: last.plan,
                checks,
                retries: last.attempt,
            },
        }
    }

    fn attempt_loop(&self, question: &str, checks: &mut Vec<CheckLogEntry>) -> (RunStatus, LastAttempt) {
        let planner = PlannerAgent::new(&self.model);
        let executor = ExecutorAgent::new(&self.model);
        let verifier = VerifierAgent::new(&self.model);

        let mut feedback: Option<String> = None;
        let mut attempt = 0u32;
        loop {
            let span = info_span!("attempt", attempt);
            let _guard = span.enter();

            let plan = planner.run(&self.completer, question, feedback.as_deref());
            let solution = executor.run(&self.completer, question, &plan);
            let verification = verifier.run(&self.completer, question, &plan, &solution);
            checks.push(CheckLogEntry::for_attempt(attempt, &verification));

            let transition = next_transition(attempt, self.max_retries, &verification);
            debug!(passed = verification.passed, ?transition, "attempt verified");
            let last = LastAttempt {
                plan,
                solution,
                verification,
                attempt,
            };
            match transition {
                Transition::Success => return (RunStatus::Success, last),
                Transition::Exhausted => return (RunStatus::Failed, last),
                Transition::Retry { feedback: next } => {
                    feedback = Some(next);
                    attempt += 1;
                }
            }
        }
    }
}
