//! System-instruction templates for each pipeline step.
//!
//! Templates live next to this module as markdown and are compiled once into a
//! shared minijinja environment. Substitution points are plain template
//! variables (`{{ question }}`, `{{ feedback }}`, `{{ solution_text }}`);
//! substituted values are inserted verbatim.

use std::sync::LazyLock;

use minijinja::{Environment, context};
use tracing::debug;

const PLANNER_TEMPLATE: &str = include_str!("prompts/planner.md");
const PLANNER_FEEDBACK_TEMPLATE: &str = include_str!("prompts/planner_feedback.md");
const EXECUTOR_TEMPLATE: &str = include_str!("prompts/executor.md");
const VERIFIER_TEMPLATE: &str = include_str!("prompts/verifier.md");
const FORMATTER_TEMPLATE: &str = include_str!("prompts/formatter.md");
const FAILURE_TEMPLATE: &str = include_str!("prompts/failure.md");

static ENGINE: LazyLock<PromptEngine> = LazyLock::new(PromptEngine::new);

/// Template engine wrapper around minijinja.
struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    fn new() -> Self {
        let mut env = Environment::new();
        for (name, source) in [
            ("planner", PLANNER_TEMPLATE),
            ("planner_feedback", PLANNER_FEEDBACK_TEMPLATE),
            ("executor", EXECUTOR_TEMPLATE),
            ("verifier", VERIFIER_TEMPLATE),
            ("formatter", FORMATTER_TEMPLATE),
            ("failure", FAILURE_TEMPLATE),
        ] {
            env.add_template(name, source)
                .expect("prompt template should be valid");
        }
        Self { env }
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> String {
        let rendered = self
            .env
            .get_template(name)
            .and_then(|template| template.render(ctx))
            .expect("prompt template rendering should not fail");
        debug!(template = name, bytes = rendered.len(), "rendered prompt");
        rendered
    }
}

/// Planner instruction for a first attempt.
pub fn planner_prompt() -> String {
    ENGINE.render("planner", context! {})
}

/// Planner instruction for a retry, carrying the question and the prior feedback.
pub fn planner_feedback_prompt(question: &str, feedback: &str) -> String {
    ENGINE.render(
        "planner_feedback",
        context! { question => question, feedback => feedback },
    )
}

/// Executor instruction, including the minutes-from-midnight time policy.
pub fn executor_prompt() -> String {
    ENGINE.render("executor", context! {})
}

/// Verifier instruction requesting a strictly-JSON judgment.
pub fn verifier_prompt() -> String {
    ENGINE.render("verifier", context! {})
}

/// Success formatter instruction wrapping the raw solution text.
pub fn formatter_prompt(solution_text: &str) -> String {
    ENGINE.render("formatter", context! { solution_text => solution_text })
}

/// Failure analyst instruction.
pub fn failure_prompt() -> String {
    ENGINE.render("failure", context! {})
}
