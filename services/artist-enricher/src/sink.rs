//!
//! src/sink.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Writes the artist metadata table to disk. Existing output is
//! overwritten, never appended to.
//!

use std::{io::Write, path::{Path, PathBuf}};

use tracing::info;

use crate::errors::EnricherError;
use crate::types::OutputRow;

/// Header first, then one record per row in (genre, id, image) order,
/// every line CRLF terminated
pub fn write_rows<W: Write>(writer: W, rows: &[OutputRow]) -> Result<(), EnricherError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);
    csv_writer.write_record(OutputRow::HEADER)?;
    for row in rows {
        csv_writer.write_record(row.fields())?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub struct CsvSink {
    path: PathBuf
}

impl CsvSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn write(&self, rows: &[OutputRow]) -> Result<PathBuf, EnricherError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|e| EnricherError::Io(
            std::io::Error::new(e.kind(), format!("create dir {}: {e}", parent.display()))
        ))?;

        let temp = tempfile::NamedTempFile::new_in(&parent)?;
        write_rows(temp.as_file(), rows)?;
        temp.persist(&self.path).map_err(|e| EnricherError::Io(e.error))?;

        info!(path = %self.path.display(), rows = rows.len(), "sink.written");
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NA;

    fn row(genre: &str, id: &str, image: &str) -> OutputRow {
        OutputRow {
            genre: genre.to_string(),
            artist_id: id.to_string(),
            image_url: image.to_string()
        }
    }

    fn render(rows: &[OutputRow]) -> String {
        let mut buf = Vec::new();
        write_rows(&mut buf, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_is_written_even_without_rows() {
        assert_eq!(render(&[]), "spotify.genre,artist.id,artist.image\r\n");
    }

    #[test]
    fn rows_follow_header_in_order() {
        let out = render(&[
            row("pop", "spotify:artist:123", "http://img/1"),
            OutputRow::unmatched(),
            row("r&b", "spotify:artist:456", NA),
        ]);
        assert_eq!(out, "spotify.genre,artist.id,artist.image\r\n\
                         pop,spotify:artist:123,http://img/1\r\n\
                         NA,NA,NA\r\n\
                         r&b,spotify:artist:456,NA\r\n");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let out = render(&[row("pop, rock", "id", NA)]);
        assert!(out.ends_with("\"pop, rock\",id,NA\r\n"));
    }

    #[test]
    fn overwrites_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("spotify-metadata.csv");
        let sink = CsvSink::new(&path);

        sink.write(&[row("rock", "a", NA), row("pop", "b", NA)]).unwrap();
        sink.write(&[OutputRow::unmatched()]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "spotify.genre,artist.id,artist.image\r\nNA,NA,NA\r\n");
    }

    #[test]
    fn every_line_ends_with_crlf() {
        let out = render(&[row("rock", "a", NA), row("pop", "b", "http://img/2")]);
        assert_eq!(out.matches("\r\n").count(), 3);
        assert_eq!(out.matches('\n').count(), 3);
    }
}
