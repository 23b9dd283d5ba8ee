//! Decoding and encoding of whole `.org` files
//!
//! Layout, little-endian throughout:
//!
//! | Offset | Field                                                      |
//! |--------|------------------------------------------------------------|
//! | 0      | signature, 6 bytes                                         |
//! | 6      | tempo (2), steps per bar (1), beats per step (1)           |
//! | 10     | loop start (4), loop end (4)                               |
//! | 18     | 16 instrument slots: pitch (2), waveform (1), pi (1), notes (2) |
//! | 114    | note events per track in slot order, 6 bytes each          |
//!
//! Anything after the last note event is kept as opaque trailing data.

use bytes::Bytes;

use crate::{
    cursor::ByteCursor,
    errors::{OrgError, OrgResult},
    header::{HeaderData, HEADER_LEN},
    note::NoteEvent,
    parser_config::ParserConfig,
    track::{InstrumentSlot, Track, TrackId, SLOT_LEN, TRACK_COUNT},
    traits::{OrgParser, OrgWriter},
    writer::ByteWriter,
    OrgFile,
};

/// Offset of the first note event
pub const NOTE_SECTION_OFFSET: usize = HEADER_LEN + TRACK_COUNT * SLOT_LEN;

/// A decoded song together with the anomalies that were repaired on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub song: OrgFile,
    /// Recoverable problems, currently only [`OrgError::UnorderedNoteEvents`]
    pub anomalies: Vec<OrgError>,
}

impl Decoded {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// Decode a song with the default parser configuration
pub fn decode(data: &[u8]) -> OrgResult<Decoded> {
    decode_with_config(Bytes::copy_from_slice(data), &ParserConfig::default())
}

/// Decode a song
///
/// Structural problems abort the whole decode. Out-of-order notes are sorted and
/// reported in [`Decoded::anomalies`], unless the configuration asks for strict ordering.
pub fn decode_with_config(data: Bytes, config: &ParserConfig) -> OrgResult<Decoded> {
    config.check_file_size(data.len())?;

    let mut cursor = ByteCursor::new(data);
    let header = HeaderData::from_bytes(&mut cursor)?;

    let mut tracks: [Track; TRACK_COUNT] =
        std::array::from_fn(|_| Track::new(InstrumentSlot::with_waveform(0)));
    let mut note_counts = [0u16; TRACK_COUNT];

    for (track, note_count) in tracks.iter_mut().zip(note_counts.iter_mut()) {
        track.instrument = InstrumentSlot::from_bytes(&mut cursor)?;
        *note_count = cursor.read_u16_le()?;
    }

    let mut anomalies = Vec::new();
    for (id, (track, note_count)) in TrackId::all().zip(tracks.iter_mut().zip(note_counts)) {
        config.check_note_section(&cursor, note_count)?;

        track.notes.reserve_exact(usize::from(note_count));
        for _ in 0..note_count {
            track.notes.push(NoteEvent::from_bytes(&mut cursor)?);
        }
        tracing::trace!(track = %id, notes = note_count, "parsed note block");

        if let Some(index) = track.first_unordered() {
            let anomaly = OrgError::UnorderedNoteEvents {
                track: id.to_string(),
                index,
                position: track.notes[index].position,
                previous: track.notes[index - 1].position,
            };

            if config.strict_note_order {
                return Err(anomaly);
            }

            tracing::warn!("{anomaly}; sorting notes by position");
            track.sort_notes();
            anomalies.push(anomaly);
        }
    }

    let trailing = if cursor.is_empty() {
        Vec::new()
    } else if config.preserve_trailing_data {
        tracing::debug!(bytes = cursor.remaining(), "keeping trailing data");
        cursor.read_rest().to_vec()
    } else {
        tracing::warn!(bytes = cursor.remaining(), "dropping trailing data");
        Vec::new()
    };

    Ok(Decoded {
        song: OrgFile {
            header,
            tracks,
            trailing,
        },
        anomalies,
    })
}

/// Encode a song into the bytes of an `.org` file
pub fn encode(song: &OrgFile) -> OrgResult<Bytes> {
    let mut buffer = ByteWriter::with_capacity(song.encoded_len());
    song.to_bytes(&mut buffer)?;
    Ok(buffer.finish())
}

impl OrgParser for OrgFile {
    /// Decode leniently, logging and discarding the anomaly report
    ///
    /// Call [`decode_with_config`] instead when the list of repairs is needed.
    fn from_bytes(data: &mut ByteCursor) -> OrgResult<Self> {
        let decoded = decode_with_config(data.read_rest(), &ParserConfig::default())?;
        Ok(decoded.song)
    }
}

impl OrgWriter for OrgFile {
    fn to_bytes(&self, buffer: &mut ByteWriter) -> OrgResult<()> {
        self.header.to_bytes(buffer)?;

        for (id, track) in self.tracks() {
            track.instrument.to_bytes(buffer)?;
            buffer.write_u16_le(&format!("note_count of {id}"), track.note_count() as u64)?;
        }

        for (id, track) in self.tracks() {
            if track.is_ordered() {
                write_notes(buffer, &track.notes)?;
            } else {
                tracing::debug!(track = %id, "writing notes in position order");
                let mut sorted = track.clone();
                sorted.sort_notes();
                write_notes(buffer, &sorted.notes)?;
            }
        }

        buffer.write_bytes(&self.trailing);
        Ok(())
    }
}

fn write_notes(buffer: &mut ByteWriter, notes: &[NoteEvent]) -> OrgResult<()> {
    for note in notes {
        note.to_bytes(buffer)?;
    }
    Ok(())
}
