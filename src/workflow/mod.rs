//! Workflow document model.
//!
//! The workflow document is the single unit of exchange in flowgen: the
//! generator produces one from free text, callers may persist or display it,
//! and the executor consumes it read-only.
//!
//! ## Shape
//!
//! - `Workflow` - id, domain tag, trigger, ordered steps, metadata
//! - `WorkflowStep` - one unit of work with kind, reasoning, and dependencies
//! - `WorkflowTrigger` - what starts the workflow (informational only)
//!
//! Documents serialize to camelCase JSON so they can round-trip through any
//! caller-side storage unchanged.

mod document;

pub use document::{
    Domain, StepKind, TriggerKind, Workflow, WorkflowMetadata, WorkflowStep, WorkflowTrigger,
};
