use std::fmt;
use thiserror::Error;

/// Error type for Organya parsing, serialization and validation
///
/// Every variant carries enough context (offsets, field names, offending values)
/// to point at the exact spot in the byte stream or document that caused it.
/// Each error also has a machine-readable code, see [`OrgError::code`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrgError {
    // ========== I/O ERRORS (1000-1099) ==========
    /// Reading or writing a file failed
    #[error("I/O unavailable for {path}: {reason}")]
    IoUnavailable { path: String, reason: String },

    // ========== FORMAT ERRORS (2000-2099) ==========
    /// The leading six bytes are not a known Organya signature
    #[error("Unrecognized format: expected an Org-0x signature, found '{found}' at offset {offset}")]
    UnrecognizedFormat { found: String, offset: usize },

    /// The input is larger than the configured limit
    #[error("Data size exceeds limit for {field}: {size} bytes (limit: {limit})")]
    DataSizeExceedsLimit {
        field: String,
        size: usize,
        limit: usize,
    },

    // ========== DATA ERRORS (3000-3099) ==========
    /// The buffer ended before a field could be read completely
    #[error("Unexpected end of data at offset {offset}: needed {needed} bytes, only {available} available")]
    UnexpectedEndOfData {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// The loop start lies after the loop end
    #[error("Invalid loop range: start tick {start} is after end tick {end}")]
    InvalidLoopRange { start: u64, end: u64 },

    /// Note events of a track are not sorted by position
    #[error("Unordered note events in {track}: note {index} at position {position} follows position {previous}")]
    UnorderedNoteEvents {
        track: String,
        index: usize,
        position: u16,
        previous: u16,
    },

    // ========== ENCODING ERRORS (4000-4099) ==========
    /// A value does not fit in the width of its field
    #[error("Value {value} out of range for {field} (maximum {max})")]
    ValueOutOfRange { field: String, value: u64, max: u64 },

    // ========== VALIDATION ERRORS (5000-5099) ==========
    /// A note field holds a value outside of its domain
    #[error("Invalid {field} value {value} for note {index} in {track}")]
    InvalidNoteField {
        track: String,
        index: usize,
        field: String,
        value: u8,
    },

    /// A track name could not be parsed
    #[error("Invalid track id '{input}': use m0-m7, p0-p7 or a slot number 0-15")]
    InvalidTrackId { input: String },

    /// A waveform id is not part of the built-in tables
    #[error("Unknown waveform {waveform_id} for {track} (table holds {table_size} entries)")]
    UnknownWaveform {
        track: String,
        waveform_id: u8,
        table_size: u8,
    },
}

impl OrgError {
    /// Get the error code for machine-readable processing
    pub fn code(&self) -> u16 {
        match self {
            Self::IoUnavailable { .. } => 1001,

            Self::UnrecognizedFormat { .. } => 2001,
            Self::DataSizeExceedsLimit { .. } => 2002,

            Self::UnexpectedEndOfData { .. } => 3001,
            Self::InvalidLoopRange { .. } => 3002,
            Self::UnorderedNoteEvents { .. } => 3003,

            Self::ValueOutOfRange { .. } => 4001,

            Self::InvalidNoteField { .. } => 5001,
            Self::InvalidTrackId { .. } => 5002,
            Self::UnknownWaveform { .. } => 5003,
        }
    }

    /// Get the error category for grouping related errors
    pub fn category(&self) -> ErrorCategory {
        match self.code() {
            1000..=1099 => ErrorCategory::Io,
            2000..=2099 => ErrorCategory::Format,
            3000..=3099 => ErrorCategory::Data,
            4000..=4099 => ErrorCategory::Encoding,
            5000..=5099 => ErrorCategory::Validation,
            _ => ErrorCategory::Unknown,
        }
    }

    /// Check if the error is recoverable (decoding can continue after repairing it)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnorderedNoteEvents { .. })
    }

    /// Get suggested action for handling this error
    pub fn suggested_action(&self) -> &'static str {
        match self {
            Self::IoUnavailable { .. } => "Check the file path and its permissions",
            Self::UnrecognizedFormat { .. } => "Verify this is a valid Organya (.org) file",
            Self::DataSizeExceedsLimit { .. } => "Raise the parser limits or check the input",
            Self::UnexpectedEndOfData { .. } => "File appears to be corrupted or truncated",
            Self::InvalidLoopRange { .. } => "Make sure the loop start is not after the loop end",
            Self::UnorderedNoteEvents { .. } => "Notes were re-sorted; save the song to fix the file",
            Self::ValueOutOfRange { .. } => "Use a value that fits in the field's width",
            Self::InvalidNoteField { .. } => "Use a value inside the field's domain or 255 for no change",
            Self::InvalidTrackId { .. } => "Name tracks m0-m7 (melody) or p0-p7 (percussion)",
            Self::UnknownWaveform { .. } => "Pick a waveform from the built-in table",
        }
    }

    /// Attach a path to an I/O error that was converted without one
    pub(crate) fn with_path(self, path: &str) -> Self {
        match self {
            Self::IoUnavailable { reason, .. } => Self::IoUnavailable {
                path: path.to_string(),
                reason,
            },
            other => other,
        }
    }
}

/// Error categories for grouping related error types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Io,
    Format,
    Data,
    Encoding,
    Validation,
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "I/O"),
            Self::Format => write!(f, "Format"),
            Self::Data => write!(f, "Data"),
            Self::Encoding => write!(f, "Encoding"),
            Self::Validation => write!(f, "Validation"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Result type alias for Organya operations
pub type OrgResult<T> = Result<T, OrgError>;

impl From<std::io::Error> for OrgError {
    fn from(err: std::io::Error) -> Self {
        OrgError::IoUnavailable {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Narrow a wide integer into a field's type, failing instead of truncating
pub(crate) fn checked_narrow<T>(field: &str, value: u64) -> OrgResult<T>
where
    T: TryFrom<u64> + Into<u64> + Bounded,
{
    T::try_from(value).map_err(|_| OrgError::ValueOutOfRange {
        field: field.to_string(),
        value,
        max: T::MAX_VALUE.into(),
    })
}

/// Integer field types with a known maximum
pub(crate) trait Bounded: Sized {
    const MAX_VALUE: Self;
}

impl Bounded for u8 {
    const MAX_VALUE: Self = u8::MAX;
}

impl Bounded for u16 {
    const MAX_VALUE: Self = u16::MAX;
}

impl Bounded for u32 {
    const MAX_VALUE: Self = u32::MAX;
}
