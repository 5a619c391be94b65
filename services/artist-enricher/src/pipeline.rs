//!
//! src/pipeline.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Drives the enrichment run: every song row is normalized, resolved
//! against the catalog and reduced to a metadata row, strictly in order
//! and one lookup at a time. The first error ends the run.
//!

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::errors::EnricherError;
use crate::genre::GenrePriority;
use crate::normalize::normalize_artist;
use crate::resolver::{ArtistCatalog, ArtistResolver};
use crate::types::{ArtistMatch, ArtistRecord, GenreCount, InputRow, OutputRow, NA};

pub struct Pipeline<C> {
    resolver: ArtistResolver<C>,
    genres: GenrePriority
}

impl<C: ArtistCatalog> Pipeline<C> {
    pub fn new(catalog: C, genres: GenrePriority) -> Self {
        Self {
            resolver: ArtistResolver::new(catalog),
            genres
        }
    }

    async fn resolve_row(&self, row: &InputRow) -> Result<ArtistMatch, EnricherError> {
        let name = normalize_artist(&row.artist_inverted);
        // an empty "artist:" query would match arbitrary artists
        if name.is_blank() {
            warn!(raw = %row.artist_inverted, "resolve.blank_name");
            return Ok(ArtistMatch::Unmatched);
        }
        self.resolver.resolve(&name).await
    }

    /// Maps a lookup outcome onto (genre, uri, first image) with "NA" fallbacks
    pub fn metadata_row(&self, artist: &ArtistMatch) -> OutputRow {
        let ArtistMatch::Matched(record) = artist else {
            return OutputRow::unmatched();
        };

        let image_url = match record.main_image() {
            Some(url) => {
                debug!(artist = %record.name, url, "image.selected");
                url.to_string()
            }
            None => {
                debug!(artist = %record.name, "image.missing");
                NA.to_string()
            }
        };

        OutputRow {
            genre: self.genres.main_genre(artist),
            artist_id: record.uri.clone(),
            image_url
        }
    }

    /// One output row per input row, same order, no dedup
    #[instrument(name = "enrich", skip_all, fields(run_id = %Uuid::new_v4(), rows = rows.len()))]
    pub async fn enrich(&self, rows: &[InputRow]) -> Result<Vec<OutputRow>, EnricherError> {
        info!("enrich.start");
        let mut output = Vec::with_capacity(rows.len());
        let mut unmatched = 0_usize;

        for (index, row) in rows.iter().enumerate() {
            debug!(row = index, raw = %row.artist_inverted, "enrich.row");
            let artist = self.resolve_row(row).await?;
            if artist == ArtistMatch::Unmatched {
                unmatched += 1;
            }
            output.push(self.metadata_row(&artist));
        }

        info!(matched = rows.len() - unmatched, unmatched, "enrich.done");
        Ok(output)
    }

    /// Ranked catalog results for a single raw "Surname, First" name
    pub async fn lookup(&self, raw: &str) -> Result<Vec<ArtistRecord>, EnricherError> {
        let name = normalize_artist(raw);
        self.resolver.search(&name).await
    }

    /// Counts every tag of every matched artist, most common first
    #[instrument(name = "tally", skip_all, fields(run_id = %Uuid::new_v4(), rows = rows.len()))]
    pub async fn tally_genres(&self, rows: &[InputRow]) -> Result<Vec<GenreCount>, EnricherError> {
        let mut counts: HashMap<String, usize> = HashMap::new();

        for row in rows {
            if let ArtistMatch::Matched(record) = self.resolve_row(row).await? {
                debug!(artist = %record.name, genres = ?record.genres, "tally.genres");
                for genre in record.genres {
                    *counts.entry(genre).or_default() += 1;
                }
            }
        }

        let mut tally: Vec<GenreCount> = counts.into_iter()
            .map(|(genre, count)| GenreCount { genre, count })
            .collect();
        tally.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.genre.cmp(&b.genre)));
        info!(distinct = tally.len(), "tally.done");
        Ok(tally)
    }
}
