//! Outbound collaborators: one module per external service the executor
//! talks to. Each performs at most one network/system call per invocation
//! and reports failures as `Result`s for the executor to translate into
//! user-facing apologies.

pub mod email;
pub mod joke;
pub mod launcher;
pub mod news;
pub mod ollama;
pub mod weather;
pub mod web;
