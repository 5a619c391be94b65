//!
//! src/genre.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Reduces the free-text genre tags spotify attaches to an artist
//! down to a single main genre using an ordered priority table
//!

use std::{fs, path::Path};

use tracing::debug;

use crate::errors::EnricherError;
use crate::types::{ArtistMatch, NA};

pub const PRIMARY_GENRES: [&str; 15] = [
    "pop",
    "r&b",
    "rock",
    "hip hop",
    "country",
    "rap",
    "latin",
    "neo soul",
    "punk",
    "post-grunge",
    "alternative rock",
    "alternative metal",
    "nu metal",
    "electronic",
    "new wave",
];

pub const POP_COMBINATIONS: [&str; 6] = [
    "pop rock",
    "pop rap",
    "dance pop",
    "hip pop",
    "europop",
    "post-teen pop",
];

pub const OTHER_GENRES: [&str; 10] = [
    "blues-rock",
    "gangster rap",
    "smooth jazz",
    "soft rock",
    "canadian pop",
    "boy band",
    "deep contemporary country",
    "disco house",
    "german techno",
    "trance",
];

/// Ordered table of canonical genres; earlier entries win
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenrePriority {
    entries: Vec<String>
}

impl Default for GenrePriority {
    fn default() -> Self {
        Self::new(
            PRIMARY_GENRES.iter()
                .chain(POP_COMBINATIONS.iter())
                .chain(OTHER_GENRES.iter())
                .copied()
        )
    }
}

impl GenrePriority {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        Self { entries: entries.into_iter().map(Into::into).collect() }
    }

    /// Loads a table from a json array of genre strings
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EnricherError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let entries: Vec<String> = serde_json::from_str(&raw)
            .map_err(|e| EnricherError::Parse(
                format!("genre table {}: {e}", path.display())
            ))?;
        if entries.is_empty() {
            return Err(EnricherError::Config(
                format!("genre table {} is empty", path.display())
            ));
        }
        Ok(Self::new(entries))
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// First table entry present anywhere in tags; tag order is irrelevant
    pub fn select<'a>(&'a self, tags: &[String]) -> Option<&'a str> {
        self.entries.iter()
            .find(|entry| tags.iter().any(|tag| tag == *entry))
            .map(String::as_str)
    }

    pub fn main_genre(&self, artist: &ArtistMatch) -> String {
        let ArtistMatch::Matched(record) = artist else {
            return NA.to_string();
        };
        match self.select(&record.genres) {
            Some(genre) => {
                debug!(artist = %record.name, genre, "genre.selected");
                genre.to_string()
            }
            None => {
                debug!(artist = %record.name, tags = ?record.genres, "genre.missing");
                NA.to_string()
            }
        }
    }
}
