//! Care Triage - Conversational Health Triage Engine
//!
//! Turns a free-text symptom description into an urgency level, tailored
//! guidance and ranked care-service recommendations, asking a bounded set of
//! follow-up questions along the way. Emergency phrases short-circuit the
//! conversation at any point.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
