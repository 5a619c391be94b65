//!
//! src/resolver.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Resolves a normalized artist name to the catalog's most relevant
//! artist, or reports that nothing matched
//!

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::EnricherError;
use crate::types::{ArtistMatch, ArtistRecord, NormalizedName};

/// Ranked artist search against an external music catalog
#[async_trait]
pub trait ArtistCatalog: Send + Sync {
    /// Returns artists for query, most relevant first
    async fn search_artists(&self, query: &str) -> Result<Vec<ArtistRecord>, EnricherError>;
}

pub struct ArtistResolver<C> {
    catalog: C
}

impl<C: ArtistCatalog> ArtistResolver<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn query_for(name: &NormalizedName) -> String {
        format!("artist:{name}")
    }

    /// Full ranked list for name
    pub async fn search(&self, name: &NormalizedName) -> Result<Vec<ArtistRecord>, EnricherError> {
        let query = Self::query_for(name);
        info!(%name, %query, "resolve.search");
        self.catalog.search_artists(&query).await
    }

    /// Exactly one search; no retry, errors go straight back to the caller
    pub async fn resolve(&self, name: &NormalizedName) -> Result<ArtistMatch, EnricherError> {
        let ranked = self.search(name).await?;
        let outcome = ArtistMatch::from_ranked(ranked);
        match &outcome {
            ArtistMatch::Matched(artist) =>
                info!(%name, matched = %artist.name, uri = %artist.uri, "resolve.matched"),
            ArtistMatch::Unmatched =>
                warn!(%name, "resolve.unmatched"),
        }
        Ok(outcome)
    }
}
