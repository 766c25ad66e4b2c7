//! Unsplash API data models
//!
//! Only the fields this project reads are declared; everything else in the
//! response is ignored.

use serde::{Deserialize, Serialize};

/// Photo URLs at the sizes Unsplash pre-renders
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhotoUrls {
    pub regular: String,
    #[serde(default)]
    pub full: Option<String>,
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub small: Option<String>,
}

/// A photo as returned by `/photos/random`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Photo {
    pub id: String,
    pub urls: PhotoUrls,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Orientation filter for random photos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    Landscape,
    #[default]
    Portrait,
    Squarish,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Squarish => "squarish",
        }
    }
}
