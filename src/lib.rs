//! Timesheet Engine for field crews
//!
//! This crate classifies work shifts into day, night, weekend and overtime
//! minutes in the site's own timezone, and calculates pay from those minutes
//! using configurable rate plans, holidays and overtime policies.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
