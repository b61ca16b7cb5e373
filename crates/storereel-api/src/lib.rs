//! HTTP surface for storereel
//!
//! Admin catalog routes (list, create, toggle, delete), the multipart upload
//! endpoint that drives the ingestion pipeline, and the read-only public
//! storefront feed.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod telemetry;
