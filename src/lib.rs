//! docudraft - Schema-driven conversational intake for structured documents.
//!
//! This crate turns free-text conversation into validated, structured
//! document data: a declarative schema registry describes what to collect,
//! a phase-based state machine decides what to ask next, and an unreliable
//! external oracle does the language understanding behind a defensive
//! parsing layer.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
