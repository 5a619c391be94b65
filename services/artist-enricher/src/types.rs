//!
//! src/types.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Rows flowing through the enricher and the slice of the
//! spotify search payload we deserialize
//!

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder for any field we could not resolve
pub const NA: &str = "NA";

/// One song row; only the inverted artist name is consumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    pub artist_inverted: String
}

impl InputRow {
    pub fn new(artist_inverted: impl Into<String>) -> Self {
        Self { artist_inverted: artist_inverted.into() }
    }
}

// "First Surname" form used in catalog queries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedName(pub String);

impl NormalizedName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistImage {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>
}

/// Artist object as returned by GET /v1/search?type=artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub name: String,
    pub id: String,
    pub uri: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Vec<ArtistImage>
}

impl ArtistRecord {
    pub fn main_image(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistSearchResponse {
    pub artists: Page<ArtistRecord>
}

/// Outcome of a single catalog lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtistMatch {
    Matched(ArtistRecord),
    Unmatched
}

impl ArtistMatch {
    /// Most relevant artist is at index 0
    pub fn from_ranked(mut ranked: Vec<ArtistRecord>) -> Self {
        if ranked.is_empty() {
            ArtistMatch::Unmatched
        } else {
            ArtistMatch::Matched(ranked.swap_remove(0))
        }
    }
}

/// One row of the metadata table, aligned with an input row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub genre: String,
    pub artist_id: String,
    pub image_url: String
}

impl OutputRow {
    pub const HEADER: [&'static str; 3] = ["spotify.genre", "artist.id", "artist.image"];

    pub fn unmatched() -> Self {
        Self {
            genre: NA.to_string(),
            artist_id: NA.to_string(),
            image_url: NA.to_string()
        }
    }

    pub fn fields(&self) -> [&str; 3] {
        [&self.genre, &self.artist_id, &self.image_url]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize
}
