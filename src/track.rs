//! The sixteen tracks of a song: eight melody tracks followed by eight percussion tracks

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::{
    cursor::ByteCursor,
    errors::{checked_narrow, OrgError, OrgResult},
    note::NoteEvent,
    traits::{OrgParser, OrgWriter},
    writer::ByteWriter,
};

/// Number of tracks in every song
pub const TRACK_COUNT: usize = 16;

/// Number of tracks of each kind
pub const TRACKS_PER_KIND: usize = 8;

/// Size of one entry in the instrument table (pitch, waveform, pi, note count)
pub const SLOT_LEN: usize = 6;

/// Stock waveform for each melody track of a new song
pub const DEFAULT_MELODY_WAVEFORMS: [u8; TRACKS_PER_KIND] = [0, 11, 22, 33, 44, 55, 66, 77];

/// Stock sample for each percussion track of a new song
pub const DEFAULT_PERCUSSION_WAVEFORMS: [u8; TRACKS_PER_KIND] = [0, 2, 5, 6, 4, 8, 0, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    Melody,
    Percussion,
}

/// A track addressed by kind and index within that kind, rather than by raw slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId {
    kind: TrackKind,
    index: u8,
}

impl TrackId {
    pub fn melody(index: usize) -> Option<Self> {
        Self::new(TrackKind::Melody, index)
    }

    pub fn percussion(index: usize) -> Option<Self> {
        Self::new(TrackKind::Percussion, index)
    }

    pub fn new(kind: TrackKind, index: usize) -> Option<Self> {
        if index < TRACKS_PER_KIND {
            Some(Self {
                kind,
                index: index as u8,
            })
        } else {
            None
        }
    }

    /// Map a slot in the instrument table (0-15) to its track
    pub fn from_slot(slot: usize) -> Option<Self> {
        match slot {
            0..=7 => Self::melody(slot),
            8..=15 => Self::percussion(slot - TRACKS_PER_KIND),
            _ => None,
        }
    }

    /// Position of this track in the instrument table
    pub fn slot(&self) -> usize {
        match self.kind {
            TrackKind::Melody => self.index as usize,
            TrackKind::Percussion => TRACKS_PER_KIND + self.index as usize,
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Every track in table order
    pub fn all() -> impl Iterator<Item = TrackId> {
        (0..TRACK_COUNT).filter_map(Self::from_slot)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TrackKind::Melody => write!(f, "m{}", self.index),
            TrackKind::Percussion => write!(f, "p{}", self.index),
        }
    }
}

impl FromStr for TrackId {
    type Err = OrgError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || OrgError::InvalidTrackId {
            input: input.to_string(),
        };

        let lower = input.trim().to_ascii_lowercase();
        let parsed = if let Some(index) = lower.strip_prefix('m') {
            index.parse().ok().and_then(Self::melody)
        } else if let Some(index) = lower.strip_prefix('p') {
            index.parse().ok().and_then(Self::percussion)
        } else {
            lower.parse().ok().and_then(Self::from_slot)
        };

        parsed.ok_or_else(invalid)
    }
}

/// Instrument settings for one track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSlot {
    /// Base frequency offset
    pub pitch: u16,
    /// Melody waveform, or percussion sample for percussion tracks
    pub waveform_id: u8,
    /// "Pipi" flag
    pub pi: u8,
}

impl InstrumentSlot {
    pub const DEFAULT_PITCH: u16 = 0x03E8;

    pub fn with_waveform(waveform_id: u8) -> Self {
        Self {
            pitch: Self::DEFAULT_PITCH,
            waveform_id,
            pi: 0,
        }
    }

    /// Stock instrument for a track of a new song
    pub fn stock(track: TrackId) -> Self {
        let waveform_id = match track.kind() {
            TrackKind::Melody => DEFAULT_MELODY_WAVEFORMS[track.index()],
            TrackKind::Percussion => DEFAULT_PERCUSSION_WAVEFORMS[track.index()],
        };
        Self::with_waveform(waveform_id)
    }

    pub fn set_pitch(&mut self, value: u32) -> OrgResult<()> {
        self.pitch = checked_narrow("pitch", value.into())?;
        Ok(())
    }

    pub fn set_waveform_id(&mut self, value: u32) -> OrgResult<()> {
        self.waveform_id = checked_narrow("waveform_id", value.into())?;
        Ok(())
    }

    pub fn set_pi(&mut self, value: u32) -> OrgResult<()> {
        self.pi = checked_narrow("pi", value.into())?;
        Ok(())
    }
}

impl OrgParser for InstrumentSlot {
    fn from_bytes(data: &mut ByteCursor) -> OrgResult<Self> {
        Ok(InstrumentSlot {
            pitch: data.read_u16_le()?,
            waveform_id: data.read_u8()?,
            pi: data.read_u8()?,
        })
    }
}

impl OrgWriter for InstrumentSlot {
    fn to_bytes(&self, buffer: &mut ByteWriter) -> OrgResult<()> {
        buffer.write_u16_le("pitch", self.pitch)?;
        buffer.write_u8("waveform_id", self.waveform_id)?;
        buffer.write_u8("pi", self.pi)?;
        Ok(())
    }
}

/// An instrument together with the notes it plays
///
/// The note count stored in the instrument table is always the length of
/// `notes`, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub instrument: InstrumentSlot,
    pub notes: Vec<NoteEvent>,
}

impl Track {
    pub fn new(instrument: InstrumentSlot) -> Self {
        Self {
            instrument,
            notes: Vec::new(),
        }
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Insert a note after every note at the same or an earlier position
    pub fn insert_note(&mut self, note: NoteEvent) {
        let at = self.notes.partition_point(|n| n.position <= note.position);
        self.notes.insert(at, note);
    }

    /// Index of the first note whose position is lower than its predecessor's
    pub fn first_unordered(&self) -> Option<usize> {
        self.notes
            .windows(2)
            .position(|pair| pair[1].position < pair[0].position)
            .map(|i| i + 1)
    }

    pub fn is_ordered(&self) -> bool {
        self.first_unordered().is_none()
    }

    /// Stable sort by position, keeping the file order of notes on the same tick
    pub fn sort_notes(&mut self) {
        self.notes.sort_by_key(|note| note.position);
    }
}
