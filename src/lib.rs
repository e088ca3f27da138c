//! Payroll Engine for attendance- and sales-based staff salaries
//!
//! This crate computes monthly salaries from attendance, sales and sales
//! targets, recovers salary advances through amortized deductions, and moves
//! the resulting salary records through an approval workflow.
//!
//! The main entry points are [`payroll::PayrollRunner`] for payroll runs,
//! [`workflow::ApprovalWorkflow`] for approvals and payments, and
//! [`ledger::AdvanceLedger`] for advances. [`api::create_router`] exposes
//! all three over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod payroll;
pub mod store;
pub mod workflow;
