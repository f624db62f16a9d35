//! # NewsWave API
//!
//! HTTP API that lets the NewsWave front end store news documents on IPFS
//! and read them back.
//!
//! This crate provides:
//! - **Upload**: `POST /api/ipfs/upload` stores a JSON news document
//! - **Fetch**: `GET /api/ipfs/fetch/{cid}` returns the stored document
//! - **Gateway**: `GET /api/ipfs/gateway/{cid}` resolves a public HTTP URL
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Browser clients                    │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │        Standalone routes │ Serverless functions     │
//! ├─────────────────────────────────────────────────────┤
//! │  Handler core: method gate, config gate, CORS       │
//! ├─────────────────────────────────────────────────────┤
//! │  Error classifier (keyword → category → status)     │
//! ├─────────────────────────────────────────────────────┤
//! │                 newswave-storage                    │
//! │            (thirdweb IPFS, in-memory)               │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod serverless;
pub mod state;

pub use classify::{classify, ErrorCategory, Operation};
pub use config::{ApiConfig, DeploymentMode};
pub use error::ApiError;
pub use server::{run_server, run_server_with_shutdown};
pub use state::AppState;
