// Library root
// -----------
// This crate exposes the API client for the Voynich Manuscript Research
// Platform plus the pieces the two binaries are built from.
//
// Module responsibilities:
// - `api`: one method per external API endpoint, built on a single
//   request helper that handles URLs, auth headers and error bodies.
// - `transport`: the network seam; blocking reqwest in production.
// - `models`: request bodies, vote/timeframe enums and response envelopes.
// - `config`: base URL / API key resolution.
// - `cli`: the `voynich` command-line surface.
// - `workflow`: the example research workflow (`voynich-workflow`).
// - `output`, `logging`: stdout formatting and stderr logging.
// - `testing`: mock transport for tests.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod testing;
pub mod transport;
pub mod workflow;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ApiError, Result};
