//! # shiori-dispatch
//!
//! A request-dispatch pipeline for the SHIORI/3.x line-oriented protocol
//! used by desktop "ukagaka" virtual agents.
//!
//! The pipeline accepts raw wire text or a pre-parsed [`Request`], rejects
//! 2.x-generation requests, awaits a caller-supplied handler, normalizes
//! whatever the handler returns (or fails with) into a well-formed
//! [`Response`], and fills in the fields the handler omitted — status code,
//! protocol version, default headers — without disturbing anything the
//! handler set explicitly.
//!
//! ## Quick Start
//!
//! ```rust
//! use shiori_dispatch::{Pipeline, Request};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let pipeline = Pipeline::new(|request: Request| async move {
//!         match request.headers().get("ID") {
//!             Some("version") => "0.1.0",
//!             _ => "",
//!         }
//!     });
//!
//!     let wire = pipeline
//!         .dispatch_text("GET SHIORI/3.0\r\nID: version\r\n\r\n")
//!         .await;
//!     assert!(wire.starts_with("SHIORI/3.0 200 OK\r\n"));
//! }
//! ```

pub mod handler;
pub mod message;
pub mod pipeline;
pub mod respond;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use handler::{BoxError, Handler, IntoOutcome, Outcome, normalize};
pub use message::{Headers, ParseError, Request, Response, StatusCode};
pub use pipeline::{DispatchError, Input, Pipeline, RequestParser, SharedHeaders, WireParser};
