//! Reading and writing Organya (`.org`) tracker songs
//!
//! An Organya song is a fixed header, a table of sixteen instruments (eight
//! melody tracks followed by eight percussion tracks) and a note-event section
//! whose length is given by the note counts in that table.
//!
//! ```no_run
//! use org_parser::{OrgFile, TrackId, NoteEvent};
//!
//! let mut song = OrgFile::from_path("NewData.org")?;
//! let lead = TrackId::melody(0).unwrap();
//! song.track_mut(lead).insert_note(NoteEvent::new(48, 0, 4));
//! song.to_path("NewData.org")?;
//! # Ok::<(), org_parser::OrgError>(())
//! ```

pub mod codec;
pub mod cursor;
pub mod errors;
pub mod header;
pub mod note;
pub mod parser_config;
pub mod track;
pub mod traits;
pub mod validation;
pub mod writer;

pub use codec::{decode, decode_with_config, encode, Decoded};
pub use cursor::ByteCursor;
pub use errors::*;
pub use header::*;
pub use note::NoteEvent;
pub use parser_config::ParserConfig;
pub use track::*;
pub use traits::*;
pub use validation::*;
pub use writer::ByteWriter;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::{fs, io::Write, path::Path};
use tempfile::NamedTempFile;

/// A complete song: header, sixteen tracks and any unrecognized trailing bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgFile {
    pub header: HeaderData,
    /// Melody tracks in slots 0-7, percussion tracks in slots 8-15
    pub tracks: [Track; TRACK_COUNT],
    /// Bytes after the note section, written back verbatim
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trailing: Vec<u8>,
}

impl OrgFile {
    /// Name given to new songs by editors
    pub const DEFAULT_FILE_NAME: &'static str = "NewData.org";

    /// The starter song: stock header, stock instruments and no notes
    pub fn new() -> Self {
        Self {
            header: HeaderData::default(),
            tracks: std::array::from_fn(|slot| {
                let instrument = TrackId::from_slot(slot)
                    .map(InstrumentSlot::stock)
                    .unwrap_or_else(|| InstrumentSlot::with_waveform(0));
                Track::new(instrument)
            }),
            trailing: Vec::new(),
        }
    }

    /// Parse an `.org` file from path with the default parser configuration
    ///
    /// Out-of-order notes are sorted and only logged. Use
    /// [`from_path_with_config`](Self::from_path_with_config) or [`decode`] to get
    /// the list of repairs.
    pub fn from_path<P>(path: P) -> OrgResult<Self>
    where
        P: AsRef<Path>,
    {
        let decoded = Self::from_path_with_config(path, &ParserConfig::default())?;
        Ok(decoded.song)
    }

    /// Parse an `.org` file from path, returning the anomaly report as well
    pub fn from_path_with_config<P>(path: P, config: &ParserConfig) -> OrgResult<Decoded>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let data = fs::read(path)
            .map_err(|e| OrgError::from(e).with_path(&path.to_string_lossy()))?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "read song file");

        decode_with_config(Bytes::from(data), config)
    }

    /// Serialize to an `.org` file on disk
    ///
    /// The song is encoded before the file is touched, then written to a uniquely
    /// named temporary file next to `path` and renamed over it, so a failure leaves
    /// no partial file.
    pub fn to_path<P>(&self, path: P) -> OrgResult<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let path_str = path.to_string_lossy();
        let bytes = encode(self)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_error = |e: std::io::Error| OrgError::from(e).with_path(&path_str);

        // dropped, and so deleted, on every early return
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_error)?;
        tmp.write_all(&bytes).map_err(io_error)?;
        tmp.as_file().sync_all().map_err(io_error)?;
        tmp.persist(path).map_err(|e| io_error(e.error))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote song file");
        Ok(())
    }

    /// Every track with its id, in table order
    pub fn tracks(&self) -> impl Iterator<Item = (TrackId, &Track)> {
        TrackId::all().zip(self.tracks.iter())
    }

    pub fn track(&self, id: TrackId) -> &Track {
        &self.tracks[id.slot()]
    }

    pub fn track_mut(&mut self, id: TrackId) -> &mut Track {
        &mut self.tracks[id.slot()]
    }

    /// Notes across all tracks
    pub fn total_notes(&self) -> usize {
        self.tracks.iter().map(Track::note_count).sum()
    }

    /// Size of the encoded file in bytes
    pub fn encoded_len(&self) -> usize {
        codec::NOTE_SECTION_OFFSET
            + self.total_notes() * NoteEvent::ENCODED_LEN
            + self.trailing.len()
    }
}

impl Default for OrgFile {
    fn default() -> Self {
        Self::new()
    }
}
