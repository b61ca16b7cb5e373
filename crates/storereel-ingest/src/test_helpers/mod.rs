//! Test doubles for pipeline tests
//!
//! Scriptable implementations of [`AssetPlatform`](storereel_platform::AssetPlatform)
//! and [`Transferer`](storereel_platform::Transferer) with call counters, so
//! tests can assert which remote operations ran and how often.

pub mod mock_platform;
pub mod mock_transfer;

pub use mock_platform::{MockPlatform, StatusScript};
pub use mock_transfer::MockTransferer;
