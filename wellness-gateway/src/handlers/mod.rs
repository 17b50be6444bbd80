//! HTTP handlers for the wellness gateway.

pub mod chat;
pub mod health;
pub mod metrics;
pub mod predict;
