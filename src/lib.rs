//! Shared attendance and schedule state for HR dashboards
//!
//! This crate keeps one store of attendance records, schedule events and
//! today's clock state, notifies subscribers after every change, and derives
//! calendar grids and monthly rollups from that state. An optional axum
//! router exposes the store over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
