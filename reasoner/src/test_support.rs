//! Test-only completers.
//!
//! [`ScriptedCompleter`] replays per-role replies in order and records every
//! request it receives. [`SimulatedModel`] is a stateless stand-in for a small
//! model that answers clock-duration questions, either correctly or with the
//! classic "subtract hours and minutes separately" mistake.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use regex::Regex;
use serde_json::json;

use crate::core::extract::extract_final_answer;
use crate::io::completion::{Completer, CompletionRequest, Role};

/// Replays scripted replies per role and captures requests.
#[derive(Debug, Default)]
pub struct ScriptedCompleter {
    replies: RefCell<HashMap<Role, VecDeque<Result<String, String>>>>,
    requests: RefCell<Vec<CompletionRequest>>,
}

impl ScriptedCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply for `role`.
    pub fn reply(self, role: Role, text: &str) -> Self {
        self.push(role, Ok(text.to_string()))
    }

    /// Queue a completion failure for `role`.
    pub fn fail(self, role: Role, message: &str) -> Self {
        self.push(role, Err(message.to_string()))
    }

    pub fn planner(self, text: &str) -> Self {
        self.reply(Role::Planner, text)
    }

    pub fn executor(self, text: &str) -> Self {
        self.reply(Role::Executor, text)
    }

    pub fn verifier(self, text: &str) -> Self {
        self.reply(Role::Verifier, text)
    }

    pub fn summarizer(self, text: &str) -> Self {
        self.reply(Role::Summarizer, text)
    }

    pub fn failure_analyst(self, text: &str) -> Self {
        self.reply(Role::FailureAnalyst, text)
    }

    fn push(self, role: Role, reply: Result<String, String>) -> Self {
        self.replies
            .borrow_mut()
            .entry(role)
            .or_default()
            .push_back(reply);
        self
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.borrow().clone()
    }

    pub fn requests_for(&self, role: Role) -> Vec<CompletionRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|request| request.role == role)
            .cloned()
            .collect()
    }

    pub fn calls_for(&self, role: Role) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|request| request.role == role)
            .count()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.borrow().last().cloned()
    }
}

impl Completer for ScriptedCompleter {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.borrow_mut().push(request.clone());
        let reply = self
            .replies
            .borrow_mut()
            .get_mut(&request.role)
            .and_then(VecDeque::pop_front);
        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no scripted reply for {}", request.role)),
        }
    }
}

/// Render a verifier verdict the way a well-behaved model would.
pub fn verdict_json(passed: bool, feedback: &str, corrected: Option<&str>) -> String {
    json!({
        "passed": passed,
        "feedback": feedback,
        "corrected_answer": corrected,
    })
    .to_string()
}

/// How the simulated executor subtracts clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arithmetic {
    /// Converts to minutes from midnight whenever its instructions say so.
    FollowInstructions,
    /// Subtracts hours and minutes separately unless the plan itself says
    /// to work in minutes from midnight.
    NaiveHours,
}

/// Feedback the simulated verifier gives for a wrong duration.
pub const SIMULATED_FEEDBACK: &str =
    "The duration is wrong. Convert both times to minutes from midnight before subtracting.";

/// Stateless fake model for "how long from HH:MM to HH:MM" questions.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedModel {
    arithmetic: Arithmetic,
}

static CLOCK_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})\b").expect("valid clock regex"));

impl SimulatedModel {
    pub fn new(arithmetic: Arithmetic) -> Self {
        Self { arithmetic }
    }

    fn plan(&self, request: &CompletionRequest) -> String {
        let mut plan = String::from("1. Read the departure and arrival times.\n");
        if request.system.contains("minutes from midnight") {
            plan.push_str("2. Convert both times to minutes from midnight and subtract.\n");
        } else {
            plan.push_str("2. Subtract the departure time from the arrival time.\n");
        }
        plan.push_str("3. Report the duration in hours and minutes.");
        plan
    }

    fn execute(&self, request: &CompletionRequest) -> String {
        let Some((start, end)) = first_two_times(&request.user) else {
            return "No clock times found.\nFINAL ANSWER: unknown".to_string();
        };
        let use_minutes = match self.arithmetic {
            Arithmetic::FollowInstructions => request.system.contains("minutes from midnight"),
            Arithmetic::NaiveHours => plan_section(&request.user).contains("minutes from midnight"),
        };
        if use_minutes {
            let (from, to) = (minutes_from_midnight(start), minutes_from_midnight(end));
            format!(
                "{}:{:02} = {from} minutes, {}:{:02} = {to} minutes.\n{to} - {from} = {} minutes.\nFINAL ANSWER: {}",
                start.0,
                start.1,
                end.0,
                end.1,
                to - from,
                format_duration(to - from)
            )
        } else {
            let hours = end.0 - start.0;
            let minutes = end.1 - start.1;
            format!(
                "{} - {} = {hours} hours, {:02} - {:02} = {minutes} minutes.\nFINAL ANSWER: {hours} hours {minutes} minutes",
                end.0, start.0, end.1, start.1
            )
        }
    }

    fn verify(&self, request: &CompletionRequest) -> String {
        let question = request
            .user
            .split("\n\nPlan:\n")
            .next()
            .unwrap_or_default();
        let Some((start, end)) = first_two_times(question) else {
            return verdict_json(false, "Could not find two clock times.", None);
        };
        let expected = if request.system.contains("convert both times to total minutes") {
            format_duration(minutes_from_midnight(end) - minutes_from_midnight(start))
        } else {
            format!("{} hours {} minutes", end.0 - start.0, end.1 - start.1)
        };
        let proposed = request
            .user
            .split("Proposed Solution:\n")
            .nth(1)
            .and_then(extract_final_answer);
        if proposed.as_deref() == Some(expected.as_str()) {
            verdict_json(true, "The duration matches an independent computation.", None)
        } else {
            verdict_json(false, SIMULATED_FEEDBACK, Some(&expected))
        }
    }

    fn summarize(&self, request: &CompletionRequest) -> String {
        let answer = extract_final_answer(&request.system);
        json!({
            "answer": answer,
            "reasoning_visible_to_user": "Both times were converted to minutes and subtracted.",
        })
        .to_string()
    }
}

impl Completer for SimulatedModel {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        Ok(match request.role {
            Role::Planner => self.plan(request),
            Role::Executor => self.execute(request),
            Role::Verifier => self.verify(request),
            Role::Summarizer => self.summarize(request),
            Role::FailureAnalyst => json!({
                "reasoning_visible_to_user":
                    "The computed duration never matched an independent check.",
            })
            .to_string(),
        })
    }
}

fn first_two_times(text: &str) -> Option<((i64, i64), (i64, i64))> {
    let mut times = CLOCK_TIME.captures_iter(text).filter_map(|caps| {
        let hours = caps[1].parse().ok()?;
        let minutes = caps[2].parse().ok()?;
        Some((hours, minutes))
    });
    Some((times.next()?, times.next()?))
}

fn plan_section(user: &str) -> &str {
    user.split("\n\nPlan:\n").nth(1).unwrap_or_default()
}

fn minutes_from_midnight((hours, minutes): (i64, i64)) -> i64 {
    hours * 60 + minutes
}

/// Render a minute count as `"H hours M minutes"`.
pub fn format_duration(total_minutes: i64) -> String {
    format!("{} hours {} minutes", total_minutes / 60, total_minutes % 60)
}
