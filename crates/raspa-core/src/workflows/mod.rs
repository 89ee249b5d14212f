//! # Workflows Module
//!
//! High-level entry points that chain the individual service calls into a complete
//! simulation run.
//!
//! - **Run Workflow** ([`run`]) - Submit, poll until the job is terminal, and download the
//!   result archive, with a cancellable wait between polls.
//!
//! Workflows never fail with an error: every failure of an underlying call has already been
//! reported by the client and is folded into the returned [`run::RunOutcome`].

pub mod run;
