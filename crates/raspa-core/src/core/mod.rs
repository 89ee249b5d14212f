//! # Core Module
//!
//! The foundation the client is built on: the data exchanged with the simulation service
//! and the transport abstraction used to exchange it.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Job handles, job states and status snapshots, and the
//!   set of input files a simulation needs
//! - **Transport** ([`transport`]) - The request/response seam between the client logic and
//!   the HTTP library, with the production `reqwest` implementation
//!
//! Nothing in this module talks to the user or decides policy; the [`crate::engine`] layer
//! owns reporting, error mapping and the interpretation of responses.

pub mod models;
pub mod transport;
