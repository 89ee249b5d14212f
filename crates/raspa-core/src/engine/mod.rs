//! # Engine Module
//!
//! This module implements the client side of the remote simulation service: the three
//! service operations and everything they need to run and to report what they did.
//!
//! ## Architecture
//!
//! - **Client** ([`client`]) - `SimulationClient` with `submit`, `get_status` and
//!   `fetch_results`
//! - **Configuration** ([`config`]) - Immutable client settings and their builder
//! - **Error Handling** ([`error`]) - The `ClientError` taxonomy shared by all operations
//! - **Progress Monitoring** ([`progress`]) - Events emitted while a job is submitted,
//!   polled and downloaded
//! - **Cancellation** ([`cancel`]) - A token that interrupts the wait between status polls
//!
//! ## Error Policy
//!
//! Every operation reports its own failure through `tracing` at the point where it
//! happens and then returns it as a value. Nothing is retried: a single failed exchange
//! ends the operation.

pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod progress;
