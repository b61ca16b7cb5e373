//! Request handlers

pub mod feed;
pub mod upload;
pub mod videos;

use serde::Deserialize;

/// Shop resolution: the shop domain arrives as a query parameter. Session
/// authentication is an external collaborator and not handled here.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub shop: String,
}
