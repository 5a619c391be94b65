//!
//! src/normalize.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Turns "Surname, First" names from the song table into
//! the "First Surname" form the catalog search expects
//!

use crate::types::NormalizedName;

/// Removes apostrophes, splits on ", " and reverses the pieces.
///
/// "Aguilera, Christina" becomes "Christina Aguilera"; names without a
/// comma pass through with only apostrophes removed.
pub fn normalize_artist(raw: &str) -> NormalizedName {
    let cleaned = raw.replace('\'', "");
    let pieces: Vec<&str> = cleaned.split(", ").collect();
    let reversed: Vec<&str> = pieces.into_iter().rev().collect();
    NormalizedName(reversed.join(" "))
}
