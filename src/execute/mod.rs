//! Workflow execution simulator.
//!
//! Walks a workflow's steps strictly in list order, one at a time: checks
//! declared dependencies, simulates latency and a randomized outcome, and
//! records every transition in a per-run execution log. The input document
//! is read-only; all state lives in the returned [`ExecutionRecord`].
//!
//! Progress is published as value-independent snapshots: the sink receives a
//! clone of the record at each transition and can never observe later
//! mutations through it.

mod output;

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::{StepKind, Workflow};

/// Fixed error text for a step whose dependencies have not completed.
const DEPENDENCIES_NOT_MET: &str = "Dependencies not met";

/// Fixed error text for a randomized step failure.
const SIMULATED_ERROR: &str = "Simulated execution error";

/// Lifecycle of a single step within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Created but not yet reached
    Pending,
    /// Currently executing
    Running,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Failed,
}

impl StepStatus {
    /// Whether the step has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Overall status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

/// Per-step log entry, created at executor start and mutated in place
/// through its lifecycle. Never deleted: the log length always equals the
/// workflow's step count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepLog {
    /// Id of the step this entry tracks
    pub step_id: String,

    /// Current lifecycle status
    pub status: StepStatus,

    /// When the step started running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,

    /// When the step reached a terminal status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    /// Human-readable success text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Human-readable failure text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepLog {
    fn pending(step_id: &str) -> Self {
        Self {
            step_id: step_id.to_string(),
            status: StepStatus::Pending,
            start_time: None,
            end_time: None,
            output: None,
            error: None,
        }
    }
}

/// The result of one run of a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    /// Back-reference to the workflow that was run (non-owning)
    pub workflow_id: String,

    /// Fresh id for this run
    pub execution_id: String,

    /// Overall run status
    pub status: RunStatus,

    /// One entry per step, keyed by step id (not position)
    pub logs: Vec<StepLog>,

    /// When the run started
    pub start_time: DateTime<Utc>,

    /// When the run reached a terminal status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl ExecutionRecord {
    fn new(workflow: &Workflow) -> Self {
        Self {
            workflow_id: workflow.id.clone(),
            execution_id: Uuid::new_v4().to_string(),
            status: RunStatus::Running,
            logs: workflow.steps.iter().map(|s| StepLog::pending(&s.id)).collect(),
            start_time: Utc::now(),
            end_time: None,
        }
    }

    /// Look up the log entry for a step.
    pub fn log(&self, step_id: &str) -> Option<&StepLog> {
        self.logs.iter().find(|l| l.step_id == step_id)
    }

    fn log_mut(&mut self, step_id: &str) -> Option<&mut StepLog> {
        self.logs.iter_mut().find(|l| l.step_id == step_id)
    }

    /// Count of logs with the given status.
    pub fn count(&self, status: StepStatus) -> usize {
        self.logs.iter().filter(|l| l.status == status).count()
    }
}

/// Executor configuration.
///
/// Latency and outcome randomness are injectable so callers (and tests) can
/// force deterministic, zero-latency runs.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Minimum simulated per-step latency in milliseconds
    pub min_latency_ms: u64,

    /// Maximum simulated per-step latency in milliseconds
    pub max_latency_ms: u64,

    /// Probability in `[0, 1]` that a step succeeds
    pub success_rate: f64,

    /// Seed for the outcome RNG; None draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { min_latency_ms: 1000, max_latency_ms: 2000, success_rate: 0.95, seed: None }
    }
}

impl ExecutorConfig {
    /// Deterministic configuration for tests: no latency, fixed outcomes.
    pub fn deterministic(success_rate: f64) -> Self {
        Self { min_latency_ms: 0, max_latency_ms: 0, success_rate, seed: Some(0) }
    }
}

/// Simulated workflow executor.
///
/// Each call to [`execute`](Self::execute) allocates its own record and RNG,
/// so independent runs never interfere; there is no global registry.
pub struct WorkflowExecutor {
    config: ExecutorConfig,
}

impl Default for WorkflowExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowExecutor {
    /// Create an executor with the default configuration.
    pub fn new() -> Self {
        Self { config: ExecutorConfig::default() }
    }

    /// Create an executor with a custom configuration.
    pub fn with_config(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Run a workflow without observing progress.
    pub async fn execute(&self, workflow: &Workflow) -> ExecutionRecord {
        self.execute_with_progress(workflow, |_| {}).await
    }

    /// Run a workflow, publishing a cloned snapshot of the record to
    /// `on_progress` at every state transition.
    pub async fn execute_with_progress<F>(
        &self,
        workflow: &Workflow,
        mut on_progress: F,
    ) -> ExecutionRecord
    where
        F: FnMut(ExecutionRecord),
    {
        let mut record = ExecutionRecord::new(workflow);
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        tracing::debug!(
            workflow = workflow.id,
            execution = record.execution_id,
            steps = workflow.steps.len(),
            "starting simulated execution"
        );

        let mut halted = false;
        for step in &workflow.steps {
            // A step may only run once every declared dependency completed.
            // An unmet dependency fails this step but never halts the run;
            // the gate propagates downstream through further dependency
            // checks instead.
            let unmet = step
                .dependencies
                .iter()
                .any(|dep| record.log(dep).map_or(true, |l| l.status != StepStatus::Completed));
            if unmet {
                let entry = record.log_mut(&step.id).expect("log entry exists for every step");
                entry.status = StepStatus::Failed;
                entry.error = Some(DEPENDENCIES_NOT_MET.to_string());
                entry.end_time = Some(Utc::now());
                tracing::debug!(step = step.id, "dependencies not met, skipping");
                on_progress(record.clone());
                continue;
            }

            {
                let entry = record.log_mut(&step.id).expect("log entry exists for every step");
                entry.status = StepStatus::Running;
                entry.start_time = Some(Utc::now());
            }
            on_progress(record.clone());

            self.simulate_latency(&mut rng).await;
            let succeeded = rng.random::<f64>() < self.config.success_rate;

            let entry = record.log_mut(&step.id).expect("log entry exists for every step");
            entry.end_time = Some(Utc::now());
            if succeeded {
                entry.status = StepStatus::Completed;
                entry.output = Some(output::simulated_output(step));
            } else {
                entry.status = StepStatus::Failed;
                entry.error = Some(SIMULATED_ERROR.to_string());
            }
            tracing::debug!(step = step.id, success = succeeded, "step finished");
            on_progress(record.clone());

            // A failed condition is a soft gate: its failure is recorded but
            // the run continues. Any other kind failing halts the run and
            // leaves the remaining steps pending.
            if !succeeded && step.kind != StepKind::Condition {
                halted = true;
                break;
            }
        }

        record.status = if halted { RunStatus::Failed } else { RunStatus::Completed };
        record.end_time = Some(Utc::now());
        on_progress(record.clone());

        tracing::debug!(
            execution = record.execution_id,
            status = ?record.status,
            "execution finished"
        );
        record
    }

    async fn simulate_latency(&self, rng: &mut StdRng) {
        if self.config.max_latency_ms == 0 {
            return;
        }
        let span = self.config.min_latency_ms..=self.config.max_latency_ms;
        let millis = rng.random_range(span);
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
}
