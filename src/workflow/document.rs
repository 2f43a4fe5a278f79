//! Workflow document definitions.
//!
//! Defines the JSON structure exchanged between the generator and the
//! executor.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{FlowError, FlowResult};

/// The kind of work a step performs.
///
/// A closed set: the kind changes only the wording of the simulated output,
/// never the executor's control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Runs something (a command, a script, an API call)
    Action,
    /// Checks a gate before downstream work proceeds
    Condition,
    /// Waits for a period of time
    Delay,
    /// Delivers a message to a person or channel
    Notification,
}

impl StepKind {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Condition => "condition",
            Self::Delay => "delay",
            Self::Notification => "notification",
        }
    }
}

/// A single unit of work within a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    /// Unique id within the workflow, stable for the workflow's lifetime
    pub id: String,

    /// What kind of work this step performs
    pub kind: StepKind,

    /// Short name shown in listings
    pub title: String,

    /// Longer description of what the step does
    pub description: String,

    /// Why the generator created this step. Always non-empty; this is the
    /// explainability contract of the whole system.
    pub reasoning: String,

    /// Open key-value configuration, interpreted only by the executor's
    /// simulated-output formatter
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub config: HashMap<String, Value>,

    /// Ids of steps that must complete before this one may run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl WorkflowStep {
    /// Create a new step with no config and no dependencies.
    pub fn new(
        id: impl Into<String>,
        kind: StepKind,
        title: impl Into<String>,
        description: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            description: description.into(),
            reasoning: reasoning.into(),
            config: HashMap::new(),
            dependencies: Vec::new(),
        }
    }

    /// Add a config entry.
    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Add a dependency on another step.
    #[must_use]
    pub fn with_dependency(mut self, id: impl Into<String>) -> Self {
        self.dependencies.push(id.into());
        self
    }

    /// Get a config value as a string, if present and string-typed.
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }
}

/// What starts a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerKind {
    /// Started explicitly by a user
    Manual,
    /// Started on a time-based schedule
    Schedule,
    /// Started by a named system event
    Event,
}

/// Trigger description attached to a workflow.
///
/// Informational only: the executor never inspects the trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTrigger {
    /// How the workflow is started
    pub kind: TriggerKind,

    /// Human-readable description of the trigger
    pub description: String,

    /// Kind-specific settings (event name, schedule string)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub config: HashMap<String, Value>,
}

impl WorkflowTrigger {
    /// Create a manual trigger with a standard description.
    pub fn manual() -> Self {
        Self {
            kind: TriggerKind::Manual,
            description: "Started manually by the user".to_string(),
            config: HashMap::new(),
        }
    }

    /// Create a trigger with a custom description.
    pub fn new(kind: TriggerKind, description: impl Into<String>) -> Self {
        Self { kind, description: description.into(), config: HashMap::new() }
    }

    /// Add a config entry.
    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }
}

/// Classification tag chosen by the generator.
///
/// Used for display and reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Domain {
    /// Time-based reminders
    Reminders,
    /// Messaging and event-driven automation
    Automation,
    /// Project scaffolding and tooling setup
    AppSetup,
    /// Anything that matched no specialized template
    General,
}

impl Domain {
    /// The wire/display name of the domain.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reminders => "reminders",
            Self::Automation => "automation",
            Self::AppSetup => "app-setup",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creation metadata attached to a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetadata {
    /// When the workflow was generated
    pub created_at: DateTime<Utc>,

    /// The original raw user text
    pub source_text: String,

    /// Overall summary of the classification and structure decisions taken
    pub agent_reasoning: String,
}

/// A complete workflow document.
///
/// Constructed once by the generator; `id` and step order are immutable
/// thereafter. Callers may let a user edit step titles or descriptions but
/// must not renumber ids or dependencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Globally unique id (time component plus randomness)
    pub id: String,

    /// Classification tag for display
    pub domain: Domain,

    /// What starts the workflow
    pub trigger: WorkflowTrigger,

    /// Ordered steps; list order is already a valid dependency order
    pub steps: Vec<WorkflowStep>,

    /// Creation metadata
    pub metadata: WorkflowMetadata,
}

impl Workflow {
    /// Create a workflow with a fresh id and creation timestamp.
    pub fn new(
        domain: Domain,
        trigger: WorkflowTrigger,
        steps: Vec<WorkflowStep>,
        source_text: impl Into<String>,
        agent_reasoning: impl Into<String>,
    ) -> Self {
        Self {
            id: new_workflow_id(),
            domain,
            trigger,
            steps,
            metadata: WorkflowMetadata {
                created_at: Utc::now(),
                source_text: source_text.into(),
                agent_reasoning: agent_reasoning.into(),
            },
        }
    }

    /// Look up a step by id.
    pub fn step(&self, id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// Validate document invariants.
    ///
    /// Checks that step ids are unique, every dependency references a step in
    /// this workflow, and every step carries reasoning text. Generated
    /// documents always pass; this guards documents arriving from outside the
    /// generator.
    pub fn validate(&self) -> FlowResult<()> {
        let mut seen = std::collections::HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.id.as_str()) {
                return Err(FlowError::DuplicateStepId(step.id.clone()));
            }
            if step.reasoning.trim().is_empty() {
                return Err(FlowError::MissingReasoning(step.id.clone()));
            }
        }
        for step in &self.steps {
            for dep in &step.dependencies {
                if !seen.contains(dep.as_str()) {
                    return Err(FlowError::UnknownDependency {
                        step: step.id.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Parse a workflow document from JSON.
    pub fn from_json(json: &str) -> FlowResult<Self> {
        let workflow: Self = serde_json::from_str(json)?;
        workflow.validate()?;
        Ok(workflow)
    }
}

/// Generate a workflow id from the current time plus randomness.
///
/// Collision probability is treated as negligible, not formally bounded.
fn new_workflow_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("wf-{millis}-{}", &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: &str) -> WorkflowStep {
        WorkflowStep::new(id, StepKind::Action, "Do it", "Does the thing", "Because")
    }

    fn workflow(steps: Vec<WorkflowStep>) -> Workflow {
        Workflow::new(Domain::General, WorkflowTrigger::manual(), steps, "test input", "summary")
    }

    #[test]
    fn test_workflow_id_format() {
        let wf = workflow(vec![step("step-1")]);
        assert!(wf.id.starts_with("wf-"));
        assert_eq!(wf.id.split('-').count(), 3);
    }

    #[test]
    fn test_workflow_ids_unique() {
        let a = workflow(Vec::new());
        let b = workflow(Vec::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_step_builder() {
        let s = step("step-1").with_config("command", "npm install").with_dependency("step-0");
        assert_eq!(s.config_str("command"), Some("npm install"));
        assert_eq!(s.dependencies, vec!["step-0"]);
        assert_eq!(s.config_str("missing"), None);
    }

    #[test]
    fn test_validate_ok() {
        let wf = workflow(vec![step("step-1"), step("step-2").with_dependency("step-1")]);
        assert!(wf.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_dependency() {
        let wf = workflow(vec![step("step-1").with_dependency("step-9")]);
        assert!(matches!(wf.validate(), Err(FlowError::UnknownDependency { .. })));
    }

    #[test]
    fn test_validate_duplicate_id() {
        let wf = workflow(vec![step("step-1"), step("step-1")]);
        assert!(matches!(wf.validate(), Err(FlowError::DuplicateStepId(_))));
    }

    #[test]
    fn test_validate_missing_reasoning() {
        let mut s = step("step-1");
        s.reasoning = "  ".to_string();
        let wf = workflow(vec![s]);
        assert!(matches!(wf.validate(), Err(FlowError::MissingReasoning(_))));
    }

    #[test]
    fn test_forward_dependency_is_valid() {
        // Dependencies may reference steps anywhere in the sequence; the
        // executor relies on list order, not the validator, for ordering.
        let wf = workflow(vec![step("step-1").with_dependency("step-2"), step("step-2")]);
        assert!(wf.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let wf = workflow(vec![
            step("step-1").with_config("channel", "email"),
            step("step-2").with_dependency("step-1"),
        ]);
        let json = serde_json::to_string(&wf).unwrap();
        assert!(json.contains("\"sourceText\""));
        assert!(json.contains("\"createdAt\""));

        let parsed = Workflow::from_json(&json).unwrap();
        assert_eq!(parsed.id, wf.id);
        assert_eq!(parsed.steps.len(), 2);
        assert_eq!(parsed.steps[0].config_str("channel"), Some("email"));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(Workflow::from_json("not json"), Err(FlowError::InvalidDocument(_))));
    }

    #[test]
    fn test_domain_wire_names() {
        assert_eq!(Domain::AppSetup.as_str(), "app-setup");
        assert_eq!(serde_json::to_string(&Domain::AppSetup).unwrap(), "\"app-setup\"");
        assert_eq!(serde_json::to_string(&StepKind::Notification).unwrap(), "\"notification\"");
    }
}
