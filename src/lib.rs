//! # Flowgen
//!
//! Turn a plain-English sentence into a structured workflow and watch it run.
//!
//! Flowgen classifies a short natural-language request with a deterministic
//! rule-based generator, produces a typed workflow document (ordered steps
//! with declared dependencies), and simulates executing that document step by
//! step while streaming per-step progress.
//!
//! ## Quick Start
//!
//! ```bash
//! # Install
//! cargo install flowgen
//!
//! # Generate a workflow from a sentence
//! flowgen generate "Remind me to stretch every hour"
//!
//! # Generate and simulate it end to end
//! flowgen run "Set up a new React project with TypeScript"
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::use_self)]

pub mod error;
pub mod execute;
pub mod generate;
pub mod workflow;

pub use error::{FlowError, FlowResult};
pub use execute::{
    ExecutionRecord, ExecutorConfig, RunStatus, StepLog, StepStatus, WorkflowExecutor,
};
pub use generate::{generate, Generation};
pub use workflow::{
    Domain, StepKind, TriggerKind, Workflow, WorkflowMetadata, WorkflowStep, WorkflowTrigger,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "flowgen";
