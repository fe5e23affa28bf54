//! Synthetic sales CRM dataset generation and pipeline analytics.
//!
//! The [`dataset`] module synthesizes six related tables (territories,
//! reps, products, accounts, opportunities, activities) from a seeded
//! random source; [`analytics`] computes read-only aggregates over
//! them; [`export`] writes the flat CSV files dashboards import.

pub mod analytics;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod telemetry;
