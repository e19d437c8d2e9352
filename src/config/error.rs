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

/// Typed error for config load/parse failures so callers can distinguish
/// e.g. file-not-found from an out-of-range pitch without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config load/parse error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Pitch {pitch} for {table} label '{label}' is outside 0-127")]
    InvalidPitch {
        table: &'static str,
        label: String,
        pitch: u8,
    },

    #[error("{table} label '{label}' has no pitches")]
    EmptyEntry { table: &'static str, label: String },

    #[error("Velocity {0} is outside 0-127")]
    InvalidVelocity(u8),

    #[error("MIDI channel {0} is outside 1-16")]
    InvalidChannel(u8),

    #[error("Program {0} is outside 0-127")]
    InvalidProgram(u8),

    #[error("Tonic '{0}' is listed more than once")]
    DuplicateTonic(String),

    #[error("Missing required setting '{0}'")]
    Missing(&'static str),
}
