//! Rule-based workflow generation.
//!
//! Maps a free-text request to a typed workflow document through an ordered
//! first-match classifier: a too-vague guard, then a ranked table of
//! (matcher, builder) pairs, falling through to a general-purpose template.
//!
//! Generation is deterministic: the same input always yields the same domain
//! and step structure. Only the workflow id embeds wall-clock time and
//! randomness, so ids are unique per invocation rather than reproducible.

mod templates;

use serde::{Deserialize, Serialize};

use crate::workflow::{Domain, Workflow, WorkflowTrigger};

/// Minimum input length before the generator attempts classification.
const MIN_INPUT_LEN: usize = 10;

/// Fixed follow-up question for under-specified input.
const CLARIFICATION_QUESTION: &str = "Could you describe in a bit more detail what you want to \
     automate? For example: \"Remind me to stretch every hour\" or \"Set up a new React project \
     with TypeScript\".";

/// Result of generating a workflow from text.
///
/// Generation never fails: under-specified input takes the clarification
/// path, which still carries a valid (empty) workflow document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    /// The generated workflow document
    pub workflow: Workflow,

    /// True when the input was too vague to classify
    pub clarification_needed: bool,

    /// The follow-up question to show the user, when clarification is needed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarification_question: Option<String>,
}

impl Generation {
    fn complete(workflow: Workflow) -> Self {
        Self { workflow, clarification_needed: false, clarification_question: None }
    }

    fn clarify(workflow: Workflow) -> Self {
        Self {
            workflow,
            clarification_needed: true,
            clarification_question: Some(CLARIFICATION_QUESTION.to_string()),
        }
    }
}

/// One entry in the classifier: a predicate over the normalized input and the
/// template that builds the workflow when the predicate matches first.
struct Template {
    matches: fn(&str) -> bool,
    build: fn(&str, &str) -> Workflow,
}

/// Ranked dispatch table, evaluated top to bottom; first match wins.
///
/// Reminder vocabulary outranks the notification branch on purpose: "send me
/// a reminder" must classify as a reminder even though "send" would match
/// the notification template. The general template matches unconditionally.
const TEMPLATES: &[Template] = &[
    Template { matches: templates::matches_reminder, build: templates::build_reminder },
    Template { matches: templates::matches_app_setup, build: templates::build_app_setup },
    Template { matches: templates::matches_notification, build: templates::build_notification },
    Template { matches: matches_any, build: templates::build_general },
];

fn matches_any(_input: &str) -> bool {
    true
}

/// Generate a workflow document from a natural-language request.
///
/// Returns the clarification path for input shorter than ten characters or
/// consisting of a single token; otherwise classifies the input against the
/// template table and builds the matching workflow.
pub fn generate(raw: &str) -> Generation {
    let trimmed = raw.trim();
    let normalized = trimmed.to_lowercase();

    // Too-vague guard runs before domain detection and short-circuits it.
    if trimmed.len() < MIN_INPUT_LEN || !trimmed.contains(char::is_whitespace) {
        tracing::debug!(input = trimmed, "input too vague, asking for clarification");
        let workflow = Workflow::new(
            Domain::General,
            WorkflowTrigger::manual(),
            Vec::new(),
            raw,
            "The request was too short to classify, so no steps were generated. \
             A follow-up question was returned instead.",
        );
        return Generation::clarify(workflow);
    }

    for template in TEMPLATES {
        if (template.matches)(&normalized) {
            let workflow = (template.build)(&normalized, raw);
            tracing::debug!(
                domain = %workflow.domain,
                steps = workflow.steps.len(),
                "classified input"
            );
            return Generation::complete(workflow);
        }
    }

    unreachable!("the general template matches any input");
}
