//! Prompt construction and dispatch for the generation backend.
//!
//! The "intelligence" of cram lives behind one upstream call: build a
//! prompt string for a [`GenerationTask`], POST it to a Gemini-style
//! `generateContent` endpoint, and parse the returned text into typed
//! results. This crate owns all three steps; nothing else in the
//! workspace talks to the model.

pub mod client;
pub mod error;
pub mod parse;
pub mod task;

pub use client::{AiConfig, GeminiClient};
pub use error::{Error, Result};
pub use task::GenerationTask;
