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
use std::collections::HashMap;
use std::fmt;

use crate::config::{LabelEntry, Settings, BASS_TABLE, CHORD_TABLE};

/// The table a label is looked up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    Chord,
    Bass,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Chord => write!(f, "{}", CHORD_TABLE),
            Namespace::Bass => write!(f, "{}", BASS_TABLE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("No {namespace} found for label '{label}'")]
    NotFound { namespace: Namespace, label: String },
}

/// Maps chord and bass labels to pitches.
#[derive(Clone, Debug)]
pub struct Resolver {
    chords: HashMap<String, Vec<u8>>,
    bass: HashMap<String, Vec<u8>>,
}

impl Resolver {
    /// Creates a resolver from the chord and bass tables in the settings.
    pub fn new(settings: &Settings) -> Resolver {
        Resolver {
            chords: to_table(settings.chords()),
            bass: to_table(settings.bass()),
        }
    }

    /// Gets the pitches for the label in the given namespace, in configured order.
    pub fn resolve(&self, namespace: Namespace, label: &str) -> Result<&[u8], ResolveError> {
        let table = match namespace {
            Namespace::Chord => &self.chords,
            Namespace::Bass => &self.bass,
        };

        table
            .get(label)
            .map(Vec::as_slice)
            .ok_or_else(|| ResolveError::NotFound {
                namespace,
                label: label.to_string(),
            })
    }

    /// Gets the pitches of a chord label, e.g. "C7".
    pub fn resolve_chord(&self, label: &str) -> Result<&[u8], ResolveError> {
        self.resolve(Namespace::Chord, label)
    }

    /// Gets the pitches of a bass label, e.g. "F#".
    pub fn resolve_bass(&self, label: &str) -> Result<&[u8], ResolveError> {
        self.resolve(Namespace::Bass, label)
    }
}

/// Later entries win over earlier ones with the same label.
fn to_table(entries: &[LabelEntry]) -> HashMap<String, Vec<u8>> {
    entries
        .iter()
        .map(|entry| (entry.label().to_string(), entry.pitches().to_vec()))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::config;

    use super::*;

    fn resolver() -> Resolver {
        Resolver::new(&config::load_settings(None).unwrap())
    }

    #[test]
    fn test_resolve_chords() {
        let resolver = resolver();

        assert_eq!(resolver.resolve_chord("C"), Ok(&[60, 64, 67][..]));
        assert_eq!(resolver.resolve_chord("C7"), Ok(&[60, 64, 67, 70][..]));
        assert_eq!(resolver.resolve_chord("Cm"), Ok(&[60, 63, 67][..]));
        assert_eq!(resolver.resolve_chord("F#dim"), Ok(&[66, 69, 72][..]));
        assert_eq!(resolver.resolve_chord("Abaug"), Ok(&[68, 72, 76][..]));
    }

    #[test]
    fn test_resolve_bass() {
        let resolver = resolver();

        assert_eq!(resolver.resolve_bass("C"), Ok(&[36][..]));
        assert_eq!(resolver.resolve_bass("Eb"), Ok(&[39][..]));
        assert_eq!(resolver.resolve(Namespace::Bass, "B"), Ok(&[47][..]));
    }

    #[test]
    fn test_not_found() {
        let resolver = resolver();

        assert_eq!(
            resolver.resolve_chord("XYZ"),
            Err(ResolveError::NotFound {
                namespace: Namespace::Chord,
                label: "XYZ".to_string(),
            })
        );

        // The namespaces are separate: bass has no chord labels.
        let err = resolver.resolve_bass("C7").unwrap_err();
        assert_eq!(err.to_string(), "No bass found for label 'C7'");

        // Labels are case sensitive.
        assert!(resolver.resolve_chord("c").is_err());
    }
}
