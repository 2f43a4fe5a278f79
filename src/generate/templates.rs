//! Workflow templates and their text-extraction helpers.
//!
//! Each template turns the normalized (lower-cased, trimmed) input into a
//! fixed step structure, copying fragments of the input verbatim into step
//! config where the text supplies them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::workflow::{
    Domain, StepKind, TriggerKind, Workflow, WorkflowStep, WorkflowTrigger,
};

/// Time or frequency token: digits optionally with minutes, followed by a
/// clock or calendar unit ("3pm", "9:30 am", "2 hours", "1 week").
static TIME_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}(?::\d{2})?)\s*(am|pm|hours?|minutes?|days?|weeks?)\b").unwrap()
});

/// Fallback when the request names no time.
const DEFAULT_REMINDER_TIME: &str = "9:00 AM";

/// Fallback when the request names no reminder message.
const DEFAULT_REMINDER_MESSAGE: &str = "Complete your task";

/// Installed when the request names no recognizable packages.
const PLACEHOLDER_PACKAGE: &str = "base-tooling";

// ---------------------------------------------------------------------------
// Matchers (ranked by the dispatch table in `generate`)
// ---------------------------------------------------------------------------

pub(super) fn matches_reminder(input: &str) -> bool {
    input.contains("remind") || input.contains("alert")
}

pub(super) fn matches_app_setup(input: &str) -> bool {
    input.contains("set up")
        || input.contains("setup")
        || input.contains("initialize")
        || (input.contains("create") && input.contains("project"))
}

pub(super) fn matches_notification(input: &str) -> bool {
    input.contains("email") || input.contains("send") || input.contains("notify")
}

// ---------------------------------------------------------------------------
// Reminder template
// ---------------------------------------------------------------------------

/// Build a three-step reminder chain: watch the clock, deliver the message,
/// record completion.
pub(super) fn build_reminder(input: &str, raw: &str) -> Workflow {
    let time = extract_time(input).unwrap_or_else(|| DEFAULT_REMINDER_TIME.to_string());
    let recurring = input.contains("every");
    let frequency = if recurring { "recurring" } else { "once" };
    let message =
        extract_reminder_message(input).unwrap_or_else(|| DEFAULT_REMINDER_MESSAGE.to_string());

    let steps = vec![
        WorkflowStep::new(
            "step-1",
            StepKind::Condition,
            "Wait for the scheduled time",
            format!("Watch the clock until {time} is reached"),
            format!(
                "A reminder is only useful at the right moment, so a condition step gates \
                 everything downstream until {time}."
            ),
        )
        .with_config("time", time.clone())
        .with_config("frequency", frequency),
        WorkflowStep::new(
            "step-2",
            StepKind::Notification,
            "Send the reminder",
            format!("Deliver \"{message}\" on the configured channels"),
            "The message itself is the point of the workflow; it goes out on both push and \
             email so it is hard to miss.",
        )
        .with_config("message", message.clone())
        .with_config("channels", json!(["push", "email"]))
        .with_dependency("step-1"),
        WorkflowStep::new(
            "step-3",
            StepKind::Action,
            "Record completion",
            "Log that the reminder was delivered",
            "Logging each delivery keeps recurring reminders auditable and the history view \
             accurate.",
        )
        .with_config("command", "log reminder delivery")
        .with_dependency("step-2"),
    ];

    let cadence = if recurring {
        format!("Runs on a recurring schedule ({time})")
    } else {
        format!("Runs once at {time}")
    };
    let trigger = WorkflowTrigger::new(TriggerKind::Schedule, cadence)
        .with_config("time", time.clone())
        .with_config("frequency", frequency);

    Workflow::new(
        Domain::Reminders,
        trigger,
        steps,
        raw,
        format!(
            "The request uses reminder vocabulary, so it was classified as a reminder. The \
             schedule resolved to {time} ({frequency}) and the reminder text to \"{message}\". \
             Three chained steps were generated: wait for the scheduled time, deliver the \
             message, then record that it went out."
        ),
    )
}

/// Pull the first time/frequency token out of the input.
fn extract_time(input: &str) -> Option<String> {
    TIME_TOKEN.captures(input).map(|caps| {
        let unit = &caps[2];
        match unit {
            "am" | "pm" => format!("{}{}", &caps[1], unit),
            _ => format!("{} {}", &caps[1], unit),
        }
    })
}

/// Pull the reminder message: the text following "to ", cut at " at" or
/// " every" when either follows it.
fn extract_reminder_message(input: &str) -> Option<String> {
    let start = input.find("to ")? + 3;
    let rest = &input[start..];
    let mut end = rest.len();
    for marker in [" at", " every"] {
        if let Some(idx) = rest.find(marker) {
            end = end.min(idx);
        }
    }
    let message = rest[..end].trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

// ---------------------------------------------------------------------------
// App-setup template
// ---------------------------------------------------------------------------

/// Frameworks checked in priority order; first mention wins.
const FRAMEWORKS: &[&str] = &["react", "vue", "angular", "next", "svelte"];

/// Packages recognized by keyword presence.
const PACKAGES: &[&str] = &["typescript", "eslint", "prettier", "tailwind", "jest", "vitest"];

/// Build a project-scaffolding workflow: initialize, install, optionally
/// configure testing, start the dev server.
pub(super) fn build_app_setup(input: &str, raw: &str) -> Workflow {
    let framework = FRAMEWORKS.iter().find(|f| input.contains(*f)).copied().unwrap_or("react");
    let mut packages: Vec<&str> = PACKAGES.iter().filter(|p| input.contains(*p)).copied().collect();
    if packages.is_empty() {
        packages.push(PLACEHOLDER_PACKAGE);
    }
    let wants_testing =
        input.contains("test") || input.contains("jest") || input.contains("vitest");

    let init_command = match framework {
        "vue" => "npm create vue@latest my-app",
        "angular" => "npx @angular/cli new my-app",
        "next" => "npx create-next-app@latest my-app",
        "svelte" => "npm create svelte@latest my-app",
        _ => "npx create-react-app my-app",
    };
    let dev_command = if framework == "react" { "npm start" } else { "npm run dev" };
    let test_runner = if input.contains("vitest") { "vitest" } else { "jest" };

    let mut steps = vec![
        WorkflowStep::new(
            "step-1",
            StepKind::Action,
            "Initialize the project",
            format!("Scaffold a new {framework} project"),
            format!(
                "Every {framework} setup starts from the official scaffolding tool so the \
                 project matches current conventions."
            ),
        )
        .with_config("command", init_command)
        .with_config("framework", framework),
        WorkflowStep::new(
            "step-2",
            StepKind::Action,
            "Install dependencies",
            format!("Install {}", packages.join(", ")),
            "The requested tooling has to be present before any configuration or dev-server \
             step can use it.",
        )
        .with_config("command", format!("npm install --save-dev {}", packages.join(" ")))
        .with_config("packages", json!(packages))
        .with_dependency("step-1"),
    ];

    if wants_testing {
        steps.push(
            WorkflowStep::new(
                "step-3",
                StepKind::Action,
                "Configure testing",
                format!("Set up {test_runner} with a starter configuration"),
                "The request mentions testing, so a dedicated step wires up the test runner \
                 before development starts.",
            )
            .with_config("command", format!("npx {test_runner} --init"))
            .with_dependency("step-2"),
        );
    }

    // The dev server needs the dependencies, not the optional testing setup;
    // it therefore depends on the install step directly.
    let dev_id = if wants_testing { "step-4" } else { "step-3" };
    steps.push(
        WorkflowStep::new(
            dev_id,
            StepKind::Action,
            "Start the dev server",
            "Launch the development server to verify the scaffold",
            "Starting the dev server confirms the scaffold works end to end and leaves the \
             project ready for development.",
        )
        .with_config("command", dev_command)
        .with_dependency("step-2"),
    );

    let step_count = steps.len();
    Workflow::new(
        Domain::AppSetup,
        WorkflowTrigger::manual(),
        steps,
        raw,
        format!(
            "The request uses project-setup vocabulary, so it was classified as app setup. \
             The target framework resolved to {framework} and the package list to [{}]. \
             {step_count} steps were generated: initialize, install{}, and start the dev \
             server.",
            packages.join(", "),
            if wants_testing { ", configure testing" } else { "" },
        ),
    )
}

// ---------------------------------------------------------------------------
// Notification template
// ---------------------------------------------------------------------------

/// Build a four-step delivery pipeline: validate the recipient, prepare the
/// message, send it, confirm delivery.
pub(super) fn build_notification(input: &str, raw: &str) -> Workflow {
    let channel = detect_channel(input);
    let priority =
        if input.contains("urgent") || input.contains("important") { "high" } else { "normal" };
    let event_driven =
        input.contains("when") || input.contains("signup") || input.contains("user");

    let steps = vec![
        WorkflowStep::new(
            "step-1",
            StepKind::Condition,
            "Validate the recipient",
            format!("Check that the recipient can receive {channel} messages"),
            "Sending to an invalid recipient wastes the delivery attempt, so the address is \
             validated up front.",
        )
        .with_config("channel", channel),
        WorkflowStep::new(
            "step-2",
            StepKind::Action,
            "Prepare the message",
            format!("Render the message body at {priority} priority"),
            format!(
                "The body is rendered before sending so the delivery step only has to hand \
                 it to the {channel} channel."
            ),
        )
        .with_config("priority", priority)
        .with_dependency("step-1"),
        WorkflowStep::new(
            "step-3",
            StepKind::Notification,
            "Send the notification",
            format!("Deliver the message via {channel}"),
            "This is the step the whole workflow exists for; everything before it makes the \
             delivery safe and everything after verifies it.",
        )
        .with_config("channel", channel)
        .with_config("message", "Automated notification")
        .with_config("priority", priority)
        .with_dependency("step-2"),
        WorkflowStep::new(
            "step-4",
            StepKind::Action,
            "Confirm delivery",
            "Check the delivery receipt from the channel provider",
            "Confirming the receipt distinguishes a delivered message from one that silently \
             dropped; the retry settings are carried for a future delivery engine.",
        )
        .with_config("retryOnFailure", true)
        .with_config("maxRetries", 3)
        .with_dependency("step-3"),
    ];

    let trigger = if event_driven {
        WorkflowTrigger::new(TriggerKind::Event, "Fires when a new user signs up")
            .with_config("event", "user.signup")
    } else {
        WorkflowTrigger::manual()
    };

    Workflow::new(
        Domain::Automation,
        trigger,
        steps,
        raw,
        format!(
            "The request uses messaging vocabulary, so it was classified as a notification \
             automation. The delivery channel resolved to {channel} at {priority} priority, \
             triggered {}. Four sequential steps were generated: validate the recipient, \
             prepare the message, send it, and confirm delivery.",
            if event_driven { "by the user.signup event" } else { "manually" },
        ),
    )
}

/// First matching channel keyword wins; email is the default.
fn detect_channel(input: &str) -> &'static str {
    if input.contains("email") {
        "email"
    } else if input.contains("sms") || input.contains("text") {
        "sms"
    } else if input.contains("slack") {
        "slack"
    } else if input.contains("push") {
        "push"
    } else {
        "email"
    }
}

// ---------------------------------------------------------------------------
// General template
// ---------------------------------------------------------------------------

/// Verb vocabulary scanned in fixed order; one step per verb found.
const VERBS: &[&str] = &[
    "create", "send", "check", "update", "delete", "notify", "process", "validate", "transform",
    "save", "load", "execute",
];

/// Build a generic action chain from whichever known verbs the input
/// contains, or a single catch-all step when none match.
pub(super) fn build_general(input: &str, raw: &str) -> Workflow {
    let found: Vec<&str> = VERBS.iter().filter(|v| input.contains(*v)).copied().collect();

    let steps = if found.is_empty() {
        vec![WorkflowStep::new(
            "step-1",
            StepKind::Action,
            "Process the request",
            raw.trim(),
            "No specialized template matched, so a single step carries the request as \
             written for the caller to refine.",
        )
        .with_config("command", "process request")]
    } else {
        found
            .iter()
            .enumerate()
            .map(|(i, verb)| {
                let mut step = WorkflowStep::new(
                    format!("step-{}", i + 1),
                    StepKind::Action,
                    capitalize(verb),
                    format!("{} as described in the request", capitalize(verb)),
                    format!(
                        "The request mentions \"{verb}\", so a dedicated step performs that \
                         operation in the order the vocabulary ranks it."
                    ),
                )
                .with_config("command", *verb);
                if i > 0 {
                    step = step.with_dependency(format!("step-{i}"));
                }
                step
            })
            .collect()
    };

    let summary = if found.is_empty() {
        "No specialized template and no known verbs matched, so a single catch-all step \
         carries the raw request."
            .to_string()
    } else {
        format!(
            "No specialized template matched, so the request was scanned for known verbs. \
             Found [{}]; one action step was generated per verb, each depending on the \
             previous one.",
            found.join(", ")
        )
    };

    Workflow::new(Domain::General, WorkflowTrigger::manual(), steps, raw, summary)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_time_clock() {
        assert_eq!(extract_time("remind me at 3pm"), Some("3pm".to_string()));
        assert_eq!(extract_time("remind me at 9:30 am"), Some("9:30am".to_string()));
    }

    #[test]
    fn test_extract_time_frequency() {
        assert_eq!(extract_time("every 2 hours"), Some("2 hours".to_string()));
        assert_eq!(extract_time("in 30 minutes"), Some("30 minutes".to_string()));
        assert_eq!(extract_time("every 1 week"), Some("1 week".to_string()));
    }

    #[test]
    fn test_extract_time_none() {
        assert_eq!(extract_time("remind me to stretch"), None);
    }

    #[test]
    fn test_extract_message_cuts_at_time() {
        assert_eq!(
            extract_reminder_message("remind me to take medicine at 5pm"),
            Some("take medicine".to_string())
        );
    }

    #[test]
    fn test_extract_message_cuts_at_every() {
        assert_eq!(
            extract_reminder_message("remind me to drink water every hour"),
            Some("drink water".to_string())
        );
    }

    #[test]
    fn test_extract_message_runs_to_end() {
        assert_eq!(
            extract_reminder_message("remind me to call mom"),
            Some("call mom".to_string())
        );
    }

    #[test]
    fn test_extract_message_none() {
        assert_eq!(extract_reminder_message("send me a reminder"), None);
    }

    #[test]
    fn test_reminder_defaults() {
        let wf = build_reminder("send me a reminder", "Send me a reminder");
        assert_eq!(wf.steps[0].config_str("time"), Some(DEFAULT_REMINDER_TIME));
        assert_eq!(wf.steps[0].config_str("frequency"), Some("once"));
        assert_eq!(wf.steps[1].config_str("message"), Some(DEFAULT_REMINDER_MESSAGE));
    }

    #[test]
    fn test_reminder_recurring() {
        let wf = build_reminder("remind me to stand up every hour", "x");
        assert_eq!(wf.steps[0].config_str("frequency"), Some("recurring"));
        assert_eq!(wf.trigger.kind, TriggerKind::Schedule);
        assert!(wf.trigger.description.contains("recurring"));
    }

    #[test]
    fn test_app_setup_react_with_typescript_and_testing() {
        let wf = build_app_setup(
            "set up a new react project with typescript and testing",
            "Set up a new React project with TypeScript and testing",
        );
        assert_eq!(wf.domain, Domain::AppSetup);
        assert_eq!(wf.steps.len(), 4);
        assert_eq!(wf.steps[0].config_str("framework"), Some("react"));
        assert_eq!(wf.steps[1].config["packages"], json!(["typescript"]));
        assert_eq!(wf.steps[2].title, "Configure testing");
        // The dev server depends on the install step, not the testing step.
        assert_eq!(wf.steps[3].dependencies, vec!["step-2"]);
    }

    #[test]
    fn test_app_setup_without_testing_has_three_steps() {
        let wf = build_app_setup("set up a new svelte project with eslint", "x");
        assert_eq!(wf.steps.len(), 3);
        assert_eq!(wf.steps[0].config_str("framework"), Some("svelte"));
        assert_eq!(wf.steps[2].title, "Start the dev server");
        assert_eq!(wf.steps[2].id, "step-3");
    }

    #[test]
    fn test_app_setup_placeholder_package() {
        let wf = build_app_setup("set up a new project", "x");
        assert_eq!(wf.steps[1].config["packages"], json!([PLACEHOLDER_PACKAGE]));
    }

    #[test]
    fn test_detect_channel() {
        assert_eq!(detect_channel("send an email"), "email");
        assert_eq!(detect_channel("send a text message"), "sms");
        assert_eq!(detect_channel("notify the slack channel"), "slack");
        assert_eq!(detect_channel("send a push notification"), "push");
        assert_eq!(detect_channel("send something"), "email");
    }

    #[test]
    fn test_notification_event_trigger() {
        let wf = build_notification(
            "send an email notification when a new user signs up",
            "Send an email notification when a new user signs up",
        );
        assert_eq!(wf.domain, Domain::Automation);
        assert_eq!(wf.trigger.kind, TriggerKind::Event);
        assert_eq!(wf.trigger.config["event"], json!("user.signup"));
        assert_eq!(wf.steps.len(), 4);
        assert_eq!(wf.steps[2].config_str("channel"), Some("email"));
        assert_eq!(wf.steps[2].config_str("priority"), Some("normal"));
    }

    #[test]
    fn test_notification_manual_trigger_and_priority() {
        let wf = build_notification("send an urgent slack message to the team", "x");
        assert_eq!(wf.trigger.kind, TriggerKind::Manual);
        assert_eq!(wf.steps[2].config_str("channel"), Some("slack"));
        assert_eq!(wf.steps[2].config_str("priority"), Some("high"));
    }

    #[test]
    fn test_notification_retry_config_is_carried() {
        let wf = build_notification("send an email", "x");
        let confirm = &wf.steps[3];
        assert_eq!(confirm.config["retryOnFailure"], json!(true));
        assert_eq!(confirm.config["maxRetries"], json!(3));
    }

    #[test]
    fn test_general_verbs_in_vocabulary_order() {
        // "update" appears before "check" in the input but after it in the
        // vocabulary; vocabulary order wins.
        let wf = build_general("update the records and check the totals", "x");
        assert_eq!(wf.steps.len(), 2);
        assert_eq!(wf.steps[0].title, "Check");
        assert_eq!(wf.steps[1].title, "Update");
        assert_eq!(wf.steps[1].dependencies, vec!["step-1"]);
    }

    #[test]
    fn test_general_fallback_step() {
        let wf = build_general("make the coffee nice and hot", "Make the coffee nice and hot");
        assert_eq!(wf.steps.len(), 1);
        assert_eq!(wf.steps[0].description, "Make the coffee nice and hot");
        assert!(wf.steps[0].dependencies.is_empty());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("create"), "Create");
        assert_eq!(capitalize(""), "");
    }
}
