//! # RASPA Client Library
//!
//! A blocking client for a remote RASPA2 simulation service. The service accepts a set of
//! input files, runs the simulation on its own hardware, and exposes the job state and the
//! final output archive over HTTP.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split used throughout our tooling:
//!
//! - **[`core`]: The Foundation.** Plain data models (`JobHandle`, `JobStatus`,
//!   `SimulationInputs`) and the [`Transport`](core::transport::Transport) seam that hides
//!   the HTTP library behind a small, mockable interface.
//!
//! - **[`engine`]: The Client.** The [`SimulationClient`](engine::client::SimulationClient)
//!   with its three service operations, its configuration, error type, progress events and
//!   the cancellation token used to interrupt waits.
//!
//! - **[`workflows`]: The Public API.** The composite submit-poll-download workflow that most
//!   callers want, returning a [`RunOutcome`](workflows::run::RunOutcome) describing how the
//!   job ended.
//!
//! ## Example
//!
//! ```no_run
//! use raspa_client::engine::cancel::CancellationToken;
//! use raspa_client::engine::client::SimulationClient;
//! use raspa_client::engine::config::ClientConfigBuilder;
//! use raspa_client::engine::progress::ProgressReporter;
//! use raspa_client::core::models::inputs::SimulationInputs;
//! use raspa_client::workflows::run::{self, RunOptions};
//!
//! let config = ClientConfigBuilder::new()
//!     .base_url("http://localhost:8000")
//!     .build()
//!     .unwrap();
//! let client = SimulationClient::connect(config).unwrap();
//! let inputs = SimulationInputs::new(
//!     "force_field_mixing_rules.def",
//!     "pseudo_atoms.def",
//!     "example_mof.cif",
//!     "adsorbate.def",
//!     "simulation.input",
//! );
//!
//! let outcome = run::run_and_wait(
//!     &client,
//!     &inputs,
//!     &RunOptions::default(),
//!     &CancellationToken::new(),
//!     &ProgressReporter::new(),
//! );
//! println!("{:?}", outcome.into_path());
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
