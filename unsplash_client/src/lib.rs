//! Unsplash API client
//!
//! A small standalone wrapper around the Unsplash REST API, independent of the
//! bot code. Only the endpoints this project needs are covered.

mod client;
mod error;
mod models;

pub use client::{UnsplashClient, DEFAULT_BASE_URL};
pub use error::{Error, Result};
pub use models::{Orientation, Photo, PhotoUrls};
