//! Org test data builders
//!
//! Fluent builders for well-formed songs, plus helpers that corrupt encoded
//! bytes in the ways broken third-party files tend to be broken.

#![allow(dead_code)]

use org_parser::{
    encode, HeaderData, InstrumentSlot, NoteEvent, OrgFile, OrgResult, OrgVersion, TrackId,
    HEADER_LEN, SLOT_LEN,
};

/// Main builder for creating test songs
#[derive(Debug)]
pub struct OrgBuilder {
    header: HeaderBuilder,
    tracks: Vec<(TrackId, TrackBuilder)>,
    trailing: Vec<u8>,
}

impl Default for OrgBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OrgBuilder {
    /// Start from the stock empty song
    pub fn new() -> Self {
        Self {
            header: HeaderBuilder::default(),
            tracks: Vec::new(),
            trailing: Vec::new(),
        }
    }

    pub fn header<F>(mut self, f: F) -> Self
    where
        F: FnOnce(HeaderBuilder) -> HeaderBuilder,
    {
        self.header = f(self.header);
        self
    }

    /// Configure one track; `track` is `m0`-`m7`, `p0`-`p7` or a slot number
    pub fn track<F>(mut self, track: &str, f: F) -> Self
    where
        F: FnOnce(TrackBuilder) -> TrackBuilder,
    {
        let id: TrackId = track.parse().unwrap_or_else(|e| panic!("bad track id in test: {e}"));
        let builder = match self.tracks.iter().position(|(existing, _)| *existing == id) {
            Some(at) => self.tracks.remove(at).1,
            None => TrackBuilder::new(id),
        };
        self.tracks.push((id, f(builder)));
        self
    }

    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    /// Build the song model, without checking it
    pub fn build(self) -> OrgFile {
        let mut song = OrgFile::new();
        song.header = self.header.build();
        for (id, track) in self.tracks {
            let target = song.track_mut(id);
            target.instrument = track.instrument;
            target.notes = track.notes;
        }
        song.trailing = self.trailing;
        song
    }

    /// Build and encode to bytes
    pub fn build_bytes(self) -> OrgResult<Vec<u8>> {
        Ok(encode(&self.build())?.to_vec())
    }
}

/// Builder for the 18-byte header
#[derive(Debug)]
pub struct HeaderBuilder {
    header: HeaderData,
}

impl Default for HeaderBuilder {
    fn default() -> Self {
        Self {
            header: HeaderData::default(),
        }
    }
}

impl HeaderBuilder {
    pub fn version(mut self, version: OrgVersion) -> Self {
        self.header.version = version;
        self
    }

    pub fn tempo(mut self, wait_ms: u16) -> Self {
        self.header.tempo_wait_ms = wait_ms;
        self
    }

    /// Steps per bar and beats per step
    pub fn time_signature(mut self, steps: u8, beats: u8) -> Self {
        self.header.steps_per_bar = steps;
        self.header.beats_per_step = beats;
        self
    }

    /// Loop bounds, written as given even when inverted
    pub fn loop_range(mut self, start: u32, end: u32) -> Self {
        self.header.loop_start_tick = start;
        self.header.loop_end_tick = end;
        self
    }

    pub fn build(self) -> HeaderData {
        self.header
    }
}

/// Builder for one track's instrument and notes
#[derive(Debug)]
pub struct TrackBuilder {
    instrument: InstrumentSlot,
    notes: Vec<NoteEvent>,
}

impl TrackBuilder {
    fn new(id: TrackId) -> Self {
        Self {
            instrument: InstrumentSlot::stock(id),
            notes: Vec::new(),
        }
    }

    pub fn pitch(mut self, pitch: u16) -> Self {
        self.instrument.pitch = pitch;
        self
    }

    pub fn waveform(mut self, waveform_id: u8) -> Self {
        self.instrument.waveform_id = waveform_id;
        self
    }

    pub fn pi(mut self, pi: u8) -> Self {
        self.instrument.pi = pi;
        self
    }

    /// Note with default volume and centre pan, appended as given
    pub fn note(mut self, semitone: u8, position: u16, length: u8) -> Self {
        self.notes.push(NoteEvent::new(semitone, position, length));
        self
    }

    pub fn raw_note(mut self, note: NoteEvent) -> Self {
        self.notes.push(note);
        self
    }

    /// A run of notes, one every `spacing` ticks
    pub fn scale(mut self, start: u8, count: u16, spacing: u16) -> Self {
        for i in 0..count {
            self.notes
                .push(NoteEvent::new(start.wrapping_add(i as u8) % 96, i * spacing, 1));
        }
        self
    }
}

/// Offset of a slot's note count in an encoded song
pub fn note_count_offset(id: TrackId) -> usize {
    HEADER_LEN + id.slot() * SLOT_LEN + 4
}

/// Corruptions of otherwise valid encoded songs
pub struct Malformed;

impl Malformed {
    pub fn with_signature(mut bytes: Vec<u8>, signature: &[u8; 6]) -> Vec<u8> {
        bytes[..6].copy_from_slice(signature);
        bytes
    }

    pub fn truncated(mut bytes: Vec<u8>, len: usize) -> Vec<u8> {
        bytes.truncate(len);
        bytes
    }

    /// Overwrite a track's declared note count without touching the note section
    pub fn with_note_count(mut bytes: Vec<u8>, id: TrackId, count: u16) -> Vec<u8> {
        let at = note_count_offset(id);
        bytes[at..at + 2].copy_from_slice(&count.to_le_bytes());
        bytes
    }

    /// Raw loop bounds, bypassing the encoder's checks
    pub fn with_loop(mut bytes: Vec<u8>, start: u32, end: u32) -> Vec<u8> {
        bytes[10..14].copy_from_slice(&start.to_le_bytes());
        bytes[14..18].copy_from_slice(&end.to_le_bytes());
        bytes
    }
}
