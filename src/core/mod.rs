//! Core business logic, independent of the chat framework.
//!
//! The pure engine (`period`, `installment`, `allocation`) works on already-loaded
//! [`crate::models::Transaction`] values. The builders (`dashboard`, `activity`,
//! `statement`, `budget`) load data through `transaction` and hand it to the engine.

pub mod activity;
pub mod allocation;
pub mod budget;
pub mod dashboard;
pub mod installment;
pub mod period;
pub mod report;
pub mod statement;
pub mod transaction;
