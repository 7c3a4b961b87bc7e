//! Deterministic test harness for Ciphergram protocol testing.
//!
//! In-memory implementations of the `Environment` and transport seams,
//! enabling reproducible end-to-end tests of two provisioned parties.
//!
//! - [`SeededEnv`]: ChaCha20-backed randomness; the same seed yields the same
//!   keys, nonces and envelopes
//! - [`duplex`]: a connected pair of in-memory stream endpoints
//! - [`Scenario`]: provisions a client and a server and connects their
//!   channels

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod duplex;
mod scenario;
mod seeded_env;

pub use duplex::{DuplexEnd, duplex};
pub use scenario::{Scenario, ScenarioChannel};
pub use seeded_env::SeededEnv;
