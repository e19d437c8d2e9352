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
use std::path::Path;

use config::{Config, File, FileFormat};
use tracing::info;

mod error;
mod pad;

pub use error::ConfigError;
pub use pad::{LabelEntry, PadConfig, Settings, BASS_TABLE, CHORD_TABLE};

/// The embedded default configuration: the standard pad layout, chord and bass
/// tables and the General MIDI instrument names.
const DEFAULT_CONFIG: &str = include_str!("config/default.yaml");

/// Parses the embedded default configuration.
pub fn default_config() -> Result<PadConfig, ConfigError> {
    Ok(Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Yaml))
        .build()?
        .try_deserialize::<PadConfig>()?)
}

/// Loads the configuration, merging the given YAML file over the defaults.
pub fn load_config(path: Option<&Path>) -> Result<PadConfig, ConfigError> {
    let defaults = default_config()?;

    let path = match path {
        Some(path) => path,
        None => return Ok(defaults),
    };

    info!(path = %path.display(), "Loading chord pad configuration.");
    let overlay = Config::builder()
        .add_source(File::from(path).format(FileFormat::Yaml))
        .build()?
        .try_deserialize::<PadConfig>()?;

    Ok(defaults.merge(overlay))
}

/// Loads and validates the settings, merging the given YAML file over the defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    load_config(path)?.into_settings()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use midly::num::{u4, u7};

    use super::*;

    #[test]
    fn test_default_settings() -> Result<(), ConfigError> {
        let settings = load_settings(None)?;

        assert_eq!(settings.velocity(), u7::from(100));
        assert_eq!(settings.channel(), u4::from(0));
        assert_eq!(settings.program(), u7::from(18));
        assert_eq!(settings.tonics().len(), 12);
        assert_eq!(settings.tonics()[0], "Eb");
        assert_eq!(settings.tonics()[11], "Ab");
        assert_eq!(settings.qualities().len(), 5);
        assert_eq!(settings.qualities()[0], "");
        assert_eq!(settings.chords().len(), 60);
        assert_eq!(settings.bass().len(), 12);
        assert_eq!(settings.instruments().len(), 76);
        assert_eq!(settings.instrument_name(18), Some("Rock Organ"));
        assert_eq!(settings.instrument_name(75), Some("Pan Flute"));
        assert_eq!(settings.instrument_name(76), None);

        // Every tonic/quality pair on the grid has a chord, and every tonic a bass note.
        for tonic in settings.tonics() {
            for quality in settings.qualities() {
                let label = format!("{}{}", tonic, quality);
                assert!(
                    settings.chords().iter().any(|c| c.label() == label),
                    "missing chord {}",
                    label
                );
            }
            assert!(settings.bass().iter().any(|b| b.label() == tonic));
        }

        Ok(())
    }

    #[test]
    fn test_load_from_file() -> Result<(), ConfigError> {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            r#"
program: 0
chords:
  - label: Csus4
    pitches: [60, 65, 67]
bass:
  - label: C
    pitches: [24]
"#
        )
        .unwrap();

        let settings = load_settings(Some(file.path()))?;

        assert_eq!(settings.program(), u7::from(0));
        assert_eq!(settings.chords().len(), 61);
        let csus4 = settings
            .chords()
            .iter()
            .find(|c| c.label() == "Csus4")
            .unwrap();
        assert_eq!(csus4.pitches(), &[60, 65, 67]);
        let c = settings.bass().iter().find(|b| b.label() == "C").unwrap();
        assert_eq!(c.pitches(), &[24]);
        assert_eq!(settings.bass().len(), 12);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let result = load_settings(Some(Path::new("/nonexistent/chordpad.yaml")));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
