//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into UI-facing commands.
//! - Keep UI layers decoupled from storage details.

pub mod note_service;
