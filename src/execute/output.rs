//! Simulated per-step output text.
//!
//! The step kind changes only the wording here, never the executor's control
//! flow. Config fields (`command`, `channel`, `message`, `frequency`,
//! `time`) are woven into the text when the step carries them.

use serde_json::Value;

use crate::workflow::{StepKind, WorkflowStep};

/// Render the human-readable success output for a step.
pub(super) fn simulated_output(step: &WorkflowStep) -> String {
    match step.kind {
        StepKind::Action => match step.config_str("command") {
            Some(command) => format!("Executed command: {command}"),
            None => "Action completed successfully".to_string(),
        },
        StepKind::Condition => {
            let mut text = "Condition check passed".to_string();
            if let Some(time) = step.config_str("time") {
                text.push_str(&format!(" (time: {time}"));
                if let Some(frequency) = step.config_str("frequency") {
                    text.push_str(&format!(", {frequency}"));
                }
                text.push(')');
            }
            text
        }
        StepKind::Notification => {
            let mut text = "Notification sent".to_string();
            if let Some(channel) = channel_text(step) {
                text.push_str(&format!(" via {channel}"));
            }
            if let Some(message) = step.config_str("message") {
                text.push_str(&format!(": \"{message}\""));
            }
            text
        }
        StepKind::Delay => match step.config_str("time") {
            Some(time) => format!("Waited for {time}"),
            None => "Delay elapsed".to_string(),
        },
    }
}

/// A single `channel` string, or the joined `channels` array.
fn channel_text(step: &WorkflowStep) -> Option<String> {
    if let Some(channel) = step.config_str("channel") {
        return Some(channel.to_string());
    }
    step.config.get("channels").and_then(Value::as_array).map(|channels| {
        channels.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", ")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(kind: StepKind) -> WorkflowStep {
        WorkflowStep::new("step-1", kind, "Step", "A step", "Because")
    }

    #[test]
    fn test_action_with_command() {
        let s = step(StepKind::Action).with_config("command", "npm install");
        assert_eq!(simulated_output(&s), "Executed command: npm install");
    }

    #[test]
    fn test_action_without_command() {
        assert_eq!(simulated_output(&step(StepKind::Action)), "Action completed successfully");
    }

    #[test]
    fn test_condition_with_time_and_frequency() {
        let s = step(StepKind::Condition)
            .with_config("time", "9:00 AM")
            .with_config("frequency", "recurring");
        assert_eq!(simulated_output(&s), "Condition check passed (time: 9:00 AM, recurring)");
    }

    #[test]
    fn test_notification_with_channels_array() {
        let s = step(StepKind::Notification)
            .with_config("channels", json!(["push", "email"]))
            .with_config("message", "Drink water");
        assert_eq!(simulated_output(&s), "Notification sent via push, email: \"Drink water\"");
    }

    #[test]
    fn test_notification_with_single_channel() {
        let s = step(StepKind::Notification).with_config("channel", "slack");
        assert_eq!(simulated_output(&s), "Notification sent via slack");
    }

    #[test]
    fn test_delay() {
        assert_eq!(simulated_output(&step(StepKind::Delay)), "Delay elapsed");
        let s = step(StepKind::Delay).with_config("time", "30 minutes");
        assert_eq!(simulated_output(&s), "Waited for 30 minutes");
    }
}
