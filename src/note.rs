use serde::{Deserialize, Serialize};

use crate::{
    cursor::ByteCursor,
    errors::OrgResult,
    traits::{OrgParser, OrgWriter},
    writer::ByteWriter,
};

/// One scheduled note on a track
///
/// Semitone, volume and pan reserve [`NoteEvent::NO_CHANGE`] to mean "keep the
/// previous value", which is how a note can change only its volume or pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteEvent {
    /// 0 is the lowest note, 95 the highest
    pub semitone: u8,
    /// Tick at which the note starts
    pub position: u16,
    /// Duration in ticks
    pub length: u8,
    pub volume: u8,
    /// 0 is hard left, 6 centre, 12 hard right
    pub pan: u8,
}

impl NoteEvent {
    /// Size of one note in the note-event section
    pub const ENCODED_LEN: usize = 6;

    pub const NO_CHANGE: u8 = 255;
    pub const MAX_SEMITONE: u8 = 95;
    pub const DEFAULT_VOLUME: u8 = 200;
    pub const MAX_PAN: u8 = 12;
    pub const CENTER_PAN: u8 = 6;

    /// A note at default volume, panned to the centre
    pub fn new(semitone: u8, position: u16, length: u8) -> Self {
        Self {
            semitone,
            position,
            length,
            volume: Self::DEFAULT_VOLUME,
            pan: Self::CENTER_PAN,
        }
    }

    pub fn changes_semitone(&self) -> bool {
        self.semitone != Self::NO_CHANGE
    }

    pub fn changes_volume(&self) -> bool {
        self.volume != Self::NO_CHANGE
    }

    pub fn changes_pan(&self) -> bool {
        self.pan != Self::NO_CHANGE
    }

    /// First tick after the note has ended
    pub fn end_position(&self) -> u32 {
        u32::from(self.position) + u32::from(self.length)
    }
}

impl OrgParser for NoteEvent {
    fn from_bytes(data: &mut ByteCursor) -> OrgResult<Self> {
        Ok(NoteEvent {
            semitone: data.read_u8()?,
            position: data.read_u16_le()?,
            length: data.read_u8()?,
            volume: data.read_u8()?,
            pan: data.read_u8()?,
        })
    }
}

impl OrgWriter for NoteEvent {
    fn to_bytes(&self, buffer: &mut ByteWriter) -> OrgResult<()> {
        buffer.write_u8("semitone", self.semitone)?;
        buffer.write_u16_le("position", self.position)?;
        buffer.write_u8("length", self.length)?;
        buffer.write_u8("volume", self.volume)?;
        buffer.write_u8("pan", self.pan)?;
        Ok(())
    }
}
