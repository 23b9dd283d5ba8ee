use crate::errors::{OrgError, OrgResult};
use crate::header::HeaderData;
use crate::note::NoteEvent;
use crate::track::{Track, TrackId, TrackKind};
use crate::OrgFile;

/// Configuration for semantic checks on a decoded or edited song
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Check semitone (0-95) and pan (0-12) domains, allowing the no-change sentinel
    pub check_note_domains: bool,
    /// Require waveform ids to exist in the built-in tables
    pub require_known_waveforms: bool,
    /// Number of melody waveforms in the built-in table
    pub melody_waveform_count: u8,
    /// Number of percussion samples in the built-in table
    pub percussion_sample_count: u8,
    /// Treat out-of-order notes as a failure (encode would otherwise sort them)
    pub strict_mode: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            check_note_domains: true,
            require_known_waveforms: false,
            melody_waveform_count: 100,
            percussion_sample_count: 42,
            strict_mode: false,
        }
    }
}

impl ValidationConfig {
    /// Every check enabled
    pub fn strict() -> Self {
        Self {
            require_known_waveforms: true,
            strict_mode: true,
            ..Self::default()
        }
    }
}

/// Trait for validatable song components
pub trait OrgValidate {
    fn validate(&self, config: &ValidationConfig) -> OrgResult<()>;

    /// Validate with the default configuration
    fn quick_validate(&self) -> OrgResult<()> {
        self.validate(&ValidationConfig::default())
    }
}

/// Loop boundary validator
pub struct LoopValidator;

impl LoopValidator {
    pub fn validate_loop(header: &HeaderData) -> OrgResult<()> {
        header.check_loop_range()
    }
}

/// Note field domain validator
pub struct NoteValidator;

impl NoteValidator {
    pub fn validate_note(id: TrackId, index: usize, note: &NoteEvent) -> OrgResult<()> {
        let invalid = |field: &str, value: u8| OrgError::InvalidNoteField {
            track: id.to_string(),
            index,
            field: field.to_string(),
            value,
        };

        if note.changes_semitone() && note.semitone > NoteEvent::MAX_SEMITONE {
            return Err(invalid("semitone", note.semitone));
        }
        if note.changes_pan() && note.pan > NoteEvent::MAX_PAN {
            return Err(invalid("pan", note.pan));
        }

        Ok(())
    }

    /// Report the first out-of-order note of a track
    pub fn validate_order(id: TrackId, track: &Track) -> OrgResult<()> {
        match track.first_unordered() {
            Some(index) => Err(OrgError::UnorderedNoteEvents {
                track: id.to_string(),
                index,
                position: track.notes[index].position,
                previous: track.notes[index - 1].position,
            }),
            None => Ok(()),
        }
    }
}

/// Waveform table validator
pub struct WaveformValidator;

impl WaveformValidator {
    pub fn validate_waveform(id: TrackId, track: &Track, config: &ValidationConfig) -> OrgResult<()> {
        let table_size = match id.kind() {
            TrackKind::Melody => config.melody_waveform_count,
            TrackKind::Percussion => config.percussion_sample_count,
        };

        if track.instrument.waveform_id >= table_size {
            return Err(OrgError::UnknownWaveform {
                track: id.to_string(),
                waveform_id: track.instrument.waveform_id,
                table_size,
            });
        }
        Ok(())
    }
}

/// Main validator that coordinates all checks
pub struct OrgValidator {
    config: ValidationConfig,
}

impl OrgValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Stop at the first problem
    pub fn validate_song(&self, song: &OrgFile) -> OrgResult<()> {
        match self.collect_issues(song).into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }

    /// Every problem found in the song, in table order
    pub fn collect_issues(&self, song: &OrgFile) -> Vec<OrgError> {
        let mut issues = Vec::new();

        if let Err(e) = LoopValidator::validate_loop(&song.header) {
            issues.push(e);
        }

        for (id, track) in song.tracks() {
            if self.config.require_known_waveforms {
                if let Err(e) = WaveformValidator::validate_waveform(id, track, &self.config) {
                    issues.push(e);
                }
            }

            if self.config.strict_mode {
                if let Err(e) = NoteValidator::validate_order(id, track) {
                    issues.push(e);
                }
            }

            if self.config.check_note_domains {
                issues.extend(
                    track
                        .notes
                        .iter()
                        .enumerate()
                        .filter_map(|(index, note)| NoteValidator::validate_note(id, index, note).err()),
                );
            }
        }

        issues
    }
}

impl Default for OrgValidator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl OrgValidate for HeaderData {
    fn validate(&self, _config: &ValidationConfig) -> OrgResult<()> {
        LoopValidator::validate_loop(self)
    }
}

impl OrgValidate for OrgFile {
    fn validate(&self, config: &ValidationConfig) -> OrgResult<()> {
        OrgValidator::new(config.clone()).validate_song(self)
    }
}
