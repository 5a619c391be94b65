//!
//! src/source.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Reads the song table. The billboard export is latin-1 encoded, so
//! bytes are decoded one-to-one into code points before csv parsing.
//!

use std::{fs, path::Path};

use tracing::info;

use crate::errors::EnricherError;
use crate::types::InputRow;

/// ISO-8859-1 maps every byte to the code point of the same value
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Parses csv text, keeping only the artist column of each record
pub fn parse_rows(text: &str, artist_column: &str) -> Result<Vec<InputRow>, EnricherError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = headers.iter()
        .position(|h| h.trim() == artist_column)
        .ok_or_else(|| EnricherError::Input(
            format!("missing column {artist_column:?} (found {:?})", headers.iter().collect::<Vec<_>>())
        ))?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let artist = record.get(column).ok_or_else(|| EnricherError::Input(
            format!("row {} has no {artist_column:?} field", index + 1)
        ))?;
        rows.push(InputRow::new(artist));
    }
    Ok(rows)
}

pub fn read_input(path: impl AsRef<Path>, artist_column: &str) -> Result<Vec<InputRow>, EnricherError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| EnricherError::Input(
        format!("read {}: {e}", path.display())
    ))?;
    let rows = parse_rows(&decode_latin1(&bytes), artist_column)?;
    info!(path = %path.display(), rows = rows.len(), "source.loaded");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_latin1_bytes() {
        // "Beyoncé" and "Sinéad" in latin-1
        let bytes = b"Beyonc\xe9 / Sin\xe9ad \xbf";
        assert_eq!(decode_latin1(bytes), "Beyoncé / Sinéad ¿");
    }

    #[test]
    fn keeps_artist_column_in_order() {
        let text = "title,artist.inverted,year\n\
                    Genie in a Bottle,\"Aguilera, Christina\",1999\n\
                    Smooth,Santana,1999\n\
                    Believe,Cher,1999\n";
        let rows = parse_rows(text, "artist.inverted").unwrap();
        assert_eq!(rows, vec![
            InputRow::new("Aguilera, Christina"),
            InputRow::new("Santana"),
            InputRow::new("Cher"),
        ]);
    }

    #[test]
    fn missing_column_is_an_input_error() {
        let err = parse_rows("title,artist\nSmooth,Santana\n", "artist.inverted").unwrap_err();
        assert!(matches!(err, EnricherError::Input(ref m) if m.contains("artist.inverted")));
    }

    #[test]
    fn short_record_is_an_input_error() {
        let err = parse_rows("title,artist.inverted\nSmooth\n", "artist.inverted").unwrap_err();
        assert!(matches!(err, EnricherError::Input(_)));
    }

    #[test]
    fn header_only_table_has_no_rows() {
        assert!(parse_rows("artist.inverted\n", "artist.inverted").unwrap().is_empty());
    }

    #[test]
    fn reads_latin1_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("billboard.csv");
        fs::write(&path, b"artist.inverted\n\"Knowles, Beyonc\xe9\"\n").unwrap();

        let rows = read_input(&path, "artist.inverted").unwrap();
        assert_eq!(rows, vec![InputRow::new("Knowles, Beyoncé")]);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(dir.path().join("nope.csv"), "artist.inverted").unwrap_err();
        assert!(matches!(err, EnricherError::Input(_)));
    }
}
