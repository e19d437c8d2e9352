// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::collections::HashSet;

use midly::num::{u4, u7};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Name used for the chord table in errors and logs.
pub const CHORD_TABLE: &str = "chord";

/// Name used for the bass table in errors and logs.
pub const BASS_TABLE: &str = "bass";

/// A YAML representation of a single label to pitch mapping.
#[derive(Deserialize, Clone, Serialize, Debug, PartialEq, Eq)]
pub struct LabelEntry {
    /// The label, e.g. "C7" for a chord or "F#" for a bass note.
    label: String,

    /// The pitches sounded by this label, in playing order.
    pitches: Vec<u8>,
}

impl LabelEntry {
    /// Creates a new label entry.
    pub fn new(label: &str, pitches: Vec<u8>) -> LabelEntry {
        LabelEntry {
            label: label.to_string(),
            pitches,
        }
    }

    /// Gets the label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Gets the pitches.
    pub fn pitches(&self) -> &[u8] {
        &self.pitches
    }
}

/// A YAML representation of the chord pad configuration.
///
/// Every field is optional so that a user file can override only what it
/// needs to. The embedded defaults fill in the rest, see [`PadConfig::merge`].
#[derive(Deserialize, Clone, Serialize, Debug, Default)]
pub struct PadConfig {
    /// The note on velocity.
    #[serde(skip_serializing_if = "Option::is_none")]
    velocity: Option<u8>,

    /// The MIDI channel (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<u8>,

    /// The program selected at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    program: Option<u8>,

    /// The tonics, in column order.
    #[serde(skip_serializing_if = "Option::is_none")]
    tonics: Option<Vec<String>>,

    /// The chord qualities, in row order. The empty quality is a major triad.
    #[serde(skip_serializing_if = "Option::is_none")]
    qualities: Option<Vec<String>>,

    /// The chord table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    chords: Vec<LabelEntry>,

    /// The bass note table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    bass: Vec<LabelEntry>,

    /// Human readable instrument names, indexed by program.
    #[serde(skip_serializing_if = "Option::is_none")]
    instruments: Option<Vec<String>>,
}

impl PadConfig {
    /// Merges the overlay over this configuration. Scalars and lists set in the
    /// overlay replace ours; table entries replace ours by label or are appended.
    pub fn merge(mut self, overlay: PadConfig) -> PadConfig {
        merge_entries(&mut self.chords, overlay.chords);
        merge_entries(&mut self.bass, overlay.bass);

        PadConfig {
            velocity: overlay.velocity.or(self.velocity),
            channel: overlay.channel.or(self.channel),
            program: overlay.program.or(self.program),
            tonics: overlay.tonics.or(self.tonics),
            qualities: overlay.qualities.or(self.qualities),
            chords: self.chords,
            bass: self.bass,
            instruments: overlay.instruments.or(self.instruments),
        }
    }

    /// Validates the configuration and converts it into settings.
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let velocity = self.velocity.ok_or(ConfigError::Missing("velocity"))?;
        let velocity = u7::try_from(velocity).ok_or(ConfigError::InvalidVelocity(velocity))?;

        let channel = self.channel.ok_or(ConfigError::Missing("channel"))?;
        if !(1..=16).contains(&channel) {
            return Err(ConfigError::InvalidChannel(channel));
        }
        let channel = u4::from(channel - 1);

        let program = self.program.ok_or(ConfigError::Missing("program"))?;
        let program = u7::try_from(program).ok_or(ConfigError::InvalidProgram(program))?;

        let tonics = self.tonics.ok_or(ConfigError::Missing("tonics"))?;
        let mut seen = HashSet::new();
        for tonic in tonics.iter() {
            if !seen.insert(tonic.as_str()) {
                return Err(ConfigError::DuplicateTonic(tonic.clone()));
            }
        }

        validate_entries(CHORD_TABLE, &self.chords)?;
        validate_entries(BASS_TABLE, &self.bass)?;

        Ok(Settings {
            velocity,
            channel,
            program,
            tonics,
            qualities: self.qualities.ok_or(ConfigError::Missing("qualities"))?,
            chords: self.chords,
            bass: self.bass,
            instruments: self.instruments.unwrap_or_default(),
        })
    }
}

fn merge_entries(base: &mut Vec<LabelEntry>, overlay: Vec<LabelEntry>) {
    for entry in overlay {
        match base.iter_mut().find(|existing| existing.label == entry.label) {
            Some(existing) => *existing = entry,
            None => base.push(entry),
        }
    }
}

fn validate_entries(table: &'static str, entries: &[LabelEntry]) -> Result<(), ConfigError> {
    for entry in entries {
        if entry.pitches.is_empty() {
            return Err(ConfigError::EmptyEntry {
                table,
                label: entry.label.clone(),
            });
        }
        if let Some(pitch) = entry.pitches.iter().find(|pitch| u7::try_from(**pitch).is_none()) {
            return Err(ConfigError::InvalidPitch {
                table,
                label: entry.label.clone(),
                pitch: *pitch,
            });
        }
    }
    Ok(())
}

/// Validated, immutable chord pad settings.
#[derive(Clone, Debug)]
pub struct Settings {
    velocity: u7,
    channel: u4,
    program: u7,
    tonics: Vec<String>,
    qualities: Vec<String>,
    chords: Vec<LabelEntry>,
    bass: Vec<LabelEntry>,
    instruments: Vec<String>,
}

impl Settings {
    /// The velocity used for every note on.
    pub fn velocity(&self) -> u7 {
        self.velocity
    }

    /// The zero-indexed MIDI channel.
    pub fn channel(&self) -> u4 {
        self.channel
    }

    /// The program selected at startup.
    pub fn program(&self) -> u7 {
        self.program
    }

    pub fn tonics(&self) -> &[String] {
        &self.tonics
    }

    pub fn qualities(&self) -> &[String] {
        &self.qualities
    }

    pub fn chords(&self) -> &[LabelEntry] {
        &self.chords
    }

    pub fn bass(&self) -> &[LabelEntry] {
        &self.bass
    }

    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    /// Gets the human readable name of the given program, if one is configured.
    pub fn instrument_name(&self, program: u8) -> Option<&str> {
        self.instruments.get(program as usize).map(String::as_str)
    }
}
