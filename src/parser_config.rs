use crate::cursor::ByteCursor;
use crate::errors::{OrgError, OrgResult};
use crate::note::NoteEvent;

/// Knobs for decoding
///
/// Controls how strictly malformed third-party files are treated and how much
/// input the decoder is willing to look at. Semantic checks on an already
/// decoded song live in [`ValidationConfig`](crate::ValidationConfig).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Largest input accepted, in bytes
    pub max_file_size: usize,

    /// Fail on note events that are out of position order instead of re-sorting them
    pub strict_note_order: bool,

    /// Keep bytes found after the note section so they are written back on encode
    pub preserve_trailing_data: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            // 16 full tracks take a little over 6MB
            max_file_size: 16 * 1024 * 1024,
            strict_note_order: false,
            preserve_trailing_data: true,
        }
    }
}

impl ParserConfig {
    /// Reject anything that is not a clean, well-formed file
    pub fn strict() -> Self {
        Self {
            max_file_size: 8 * 1024 * 1024,
            strict_note_order: true,
            preserve_trailing_data: true,
        }
    }

    /// Accept large inputs and repair what can be repaired
    pub fn permissive() -> Self {
        Self {
            max_file_size: 64 * 1024 * 1024,
            strict_note_order: false,
            preserve_trailing_data: true,
        }
    }

    /// Check if the input size is acceptable before parsing
    pub fn check_file_size(&self, size: usize) -> OrgResult<()> {
        if size > self.max_file_size {
            return Err(OrgError::DataSizeExceedsLimit {
                field: "file_size".to_string(),
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Check that a track's declared notes fit in what is left, before allocating for them
    pub fn check_note_section(&self, data: &ByteCursor, note_count: u16) -> OrgResult<()> {
        data.ensure(usize::from(note_count) * NoteEvent::ENCODED_LEN)
    }
}
