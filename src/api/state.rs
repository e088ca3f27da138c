//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::PayrollConfig;
use crate::ledger::AdvanceLedger;
use crate::payroll::PayrollRunner;
use crate::store::InMemoryStore;
use crate::workflow::ApprovalWorkflow;

/// Shared application state.
///
/// Holds the payroll runner (which owns the advance ledger) and the approval
/// workflow, all sharing one store.
#[derive(Clone)]
pub struct AppState {
    runner: Arc<PayrollRunner>,
    workflow: Arc<ApprovalWorkflow>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(runner: PayrollRunner, workflow: ApprovalWorkflow) -> Self {
        Self {
            runner: Arc::new(runner),
            workflow: Arc::new(workflow),
        }
    }

    /// Creates a state where one in-memory store backs everything.
    pub fn in_memory(config: PayrollConfig, store: Arc<InMemoryStore>) -> Self {
        let workflow = ApprovalWorkflow::new(store.clone());
        Self::new(PayrollRunner::in_memory(config, store), workflow)
    }

    /// Returns the payroll runner.
    pub fn runner(&self) -> &PayrollRunner {
        &self.runner
    }

    /// Returns the approval workflow.
    pub fn workflow(&self) -> &ApprovalWorkflow {
        &self.workflow
    }

    /// Returns the advance ledger.
    pub fn ledger(&self) -> &AdvanceLedger {
        self.runner.ledger()
    }
}
