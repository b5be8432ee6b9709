//! Data models for purchase orders and pipeline configuration.

pub mod config;
pub mod order;
