//! # Core Models Module
//!
//! Plain data types shared by the client, the workflows and the command-line front end.
//!
//! - [`job`] - The server-issued [`JobHandle`](job::JobHandle), the [`JobState`](job::JobState)
//!   lifecycle value and the [`JobStatus`](job::JobStatus) snapshot returned by a status poll
//! - [`inputs`] - The five input files of a RASPA simulation and the multipart field each
//!   one is uploaded under

pub mod inputs;
pub mod job;
