use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    cursor::ByteCursor,
    errors::{checked_narrow, OrgError, OrgResult},
    traits::{OrgParser, OrgWriter},
    writer::ByteWriter,
};

/// Length of the leading signature
pub const SIGNATURE_LEN: usize = 6;

/// Length of the fixed header: signature plus the five scalar fields
pub const HEADER_LEN: usize = 18;

/// Revision of the format, identified by the file signature
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrgVersion {
    #[serde(rename = "Org-01")]
    Org01,
    #[default]
    #[serde(rename = "Org-02")]
    Org02,
    #[serde(rename = "Org-03")]
    Org03,
}

static SIGNATURES: phf::Map<&'static str, OrgVersion> = phf_map! {
    "Org-01" => OrgVersion::Org01,
    "Org-02" => OrgVersion::Org02,
    "Org-03" => OrgVersion::Org03,
};

impl OrgVersion {
    /// Look up the version for a raw signature, if it is one we accept
    pub fn from_signature(signature: &[u8]) -> Option<Self> {
        let signature = std::str::from_utf8(signature).ok()?;
        SIGNATURES.get(signature).copied()
    }

    pub fn signature(&self) -> &'static [u8; SIGNATURE_LEN] {
        match self {
            OrgVersion::Org01 => b"Org-01",
            OrgVersion::Org02 => b"Org-02",
            OrgVersion::Org03 => b"Org-03",
        }
    }
}

impl fmt::Display for OrgVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.signature()))
    }
}

/// The scalar fields at the start of every file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderData {
    pub version: OrgVersion,
    /// Duration of one tick in milliseconds
    pub tempo_wait_ms: u16,
    pub steps_per_bar: u8,
    pub beats_per_step: u8,
    pub loop_start_tick: u32,
    pub loop_end_tick: u32,
}

impl HeaderData {
    pub const DEFAULT_TEMPO_WAIT_MS: u16 = 0x80;
    pub const DEFAULT_STEPS_PER_BAR: u8 = 0x04;
    pub const DEFAULT_BEATS_PER_STEP: u8 = 0x04;
    pub const DEFAULT_LOOP_START_TICK: u32 = 0x00;
    pub const DEFAULT_LOOP_END_TICK: u32 = 0x0FF0;

    /// Ticks in one bar
    pub fn bar_length_ticks(&self) -> u32 {
        u32::from(self.steps_per_bar) * u32::from(self.beats_per_step)
    }

    /// Ticks between loop start and loop end, zero when the range is inverted
    pub fn loop_length_ticks(&self) -> u32 {
        self.loop_end_tick.saturating_sub(self.loop_start_tick)
    }

    pub fn loop_duration_ms(&self) -> u64 {
        u64::from(self.loop_length_ticks()) * u64::from(self.tempo_wait_ms)
    }

    pub fn check_loop_range(&self) -> OrgResult<()> {
        if self.loop_start_tick > self.loop_end_tick {
            return Err(OrgError::InvalidLoopRange {
                start: self.loop_start_tick.into(),
                end: self.loop_end_tick.into(),
            });
        }
        Ok(())
    }

    pub fn set_tempo_wait_ms(&mut self, value: u32) -> OrgResult<()> {
        self.tempo_wait_ms = checked_narrow("tempo_wait_ms", value.into())?;
        Ok(())
    }

    pub fn set_steps_per_bar(&mut self, value: u32) -> OrgResult<()> {
        self.steps_per_bar = checked_narrow("steps_per_bar", value.into())?;
        Ok(())
    }

    pub fn set_beats_per_step(&mut self, value: u32) -> OrgResult<()> {
        self.beats_per_step = checked_narrow("beats_per_step", value.into())?;
        Ok(())
    }

    /// Set both loop boundaries at once; nothing changes if either is invalid
    pub fn set_loop_range(&mut self, start: u64, end: u64) -> OrgResult<()> {
        let start_tick: u32 = checked_narrow("loop_start_tick", start)?;
        let end_tick: u32 = checked_narrow("loop_end_tick", end)?;
        if start_tick > end_tick {
            return Err(OrgError::InvalidLoopRange { start, end });
        }

        self.loop_start_tick = start_tick;
        self.loop_end_tick = end_tick;
        Ok(())
    }
}

impl Default for HeaderData {
    fn default() -> Self {
        Self {
            version: OrgVersion::Org02,
            tempo_wait_ms: Self::DEFAULT_TEMPO_WAIT_MS,
            steps_per_bar: Self::DEFAULT_STEPS_PER_BAR,
            beats_per_step: Self::DEFAULT_BEATS_PER_STEP,
            loop_start_tick: Self::DEFAULT_LOOP_START_TICK,
            loop_end_tick: Self::DEFAULT_LOOP_END_TICK,
        }
    }
}

impl OrgParser for HeaderData {
    fn from_bytes(data: &mut ByteCursor) -> OrgResult<Self> {
        let offset = data.position();
        let signature = data.read_bytes(SIGNATURE_LEN)?;

        let version =
            OrgVersion::from_signature(&signature).ok_or_else(|| OrgError::UnrecognizedFormat {
                found: String::from_utf8_lossy(&signature).to_string(),
                offset,
            })?;

        let header = HeaderData {
            version,
            tempo_wait_ms: data.read_u16_le()?,
            steps_per_bar: data.read_u8()?,
            beats_per_step: data.read_u8()?,
            loop_start_tick: data.read_u32_le()?,
            loop_end_tick: data.read_u32_le()?,
        };
        header.check_loop_range()?;

        tracing::debug!(
            version = %header.version,
            tempo_wait_ms = header.tempo_wait_ms,
            loop_start = header.loop_start_tick,
            loop_end = header.loop_end_tick,
            "parsed header"
        );

        Ok(header)
    }
}

impl OrgWriter for HeaderData {
    fn to_bytes(&self, buffer: &mut ByteWriter) -> OrgResult<()> {
        self.check_loop_range()?;

        buffer.write_bytes(self.version.signature());
        buffer.write_u16_le("tempo_wait_ms", self.tempo_wait_ms)?;
        buffer.write_u8("steps_per_bar", self.steps_per_bar)?;
        buffer.write_u8("beats_per_step", self.beats_per_step)?;
        buffer.write_u32_le("loop_start_tick", self.loop_start_tick)?;
        buffer.write_u32_le("loop_end_tick", self.loop_end_tick)?;
        Ok(())
    }
}
