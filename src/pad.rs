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

//! The chord pad: a grid of chord pads with a row of bass pads underneath.
//!
//! Pressing a pad resolves its label and starts its pitches, releasing it stops
//! them. The pad itself keeps no per-pad state, the tracker does all of that.

use std::fmt;
use std::sync::Arc;

use midly::num::u7;
use parking_lot::Mutex;
use tracing::{debug, info, span, Level};

use crate::config::Settings;
use crate::instrument::Instrument;
use crate::resolver::{Namespace, ResolveError, Resolver};
use crate::tracker::{Tracker, TrackerError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PadError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error("Program {0} is outside 0-127")]
    InvalidProgram(u8),
}

/// A single pad on the grid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pad {
    /// A chord pad. The empty quality is the major triad.
    Chord { tonic: String, quality: String },
    /// A bass note pad.
    Bass { tonic: String },
}

impl Pad {
    pub fn chord(tonic: &str, quality: &str) -> Pad {
        Pad::Chord {
            tonic: tonic.to_string(),
            quality: quality.to_string(),
        }
    }

    pub fn bass(tonic: &str) -> Pad {
        Pad::Bass {
            tonic: tonic.to_string(),
        }
    }

    /// The label the pad is looked up by.
    pub fn label(&self) -> String {
        match self {
            Pad::Chord { tonic, quality } => format!("{}{}", tonic, quality),
            Pad::Bass { tonic } => tonic.clone(),
        }
    }

    /// The table the pad's label lives in.
    pub fn namespace(&self) -> Namespace {
        match self {
            Pad::Chord { .. } => Namespace::Chord,
            Pad::Bass { .. } => Namespace::Bass,
        }
    }

    /// Parses a chord label typed as a single word, e.g. "F#m", into a chord pad.
    /// The longest matching tonic wins, so "Bbm" is Bb minor rather than B "bm".
    pub fn parse_chord(label: &str, tonics: &[String]) -> Option<Pad> {
        tonics
            .iter()
            .filter(|tonic| label.starts_with(tonic.as_str()))
            .max_by_key(|tonic| tonic.len())
            .map(|tonic| Pad::chord(tonic, &label[tonic.len()..]))
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.namespace(), self.label())
    }
}

/// Drives an instrument from pad presses and releases.
pub struct ChordPad {
    settings: Settings,
    resolver: Resolver,
    tracker: Tracker,
    instrument: Arc<dyn Instrument>,
    program: Mutex<u7>,
}

impl ChordPad {
    /// Creates a new chord pad and selects the configured program on the instrument.
    pub fn new(settings: Settings, instrument: Arc<dyn Instrument>) -> ChordPad {
        let program = settings.program();
        info!(
            instrument = instrument.name(),
            program = program.as_int(),
            "Starting chord pad."
        );
        instrument.select_program(program);

        ChordPad {
            resolver: Resolver::new(&settings),
            tracker: Tracker::new(instrument.clone()),
            settings,
            instrument,
            program: Mutex::new(program),
        }
    }

    /// Starts the pad's pitches.
    pub fn press(&self, pad: &Pad) -> Result<(), PadError> {
        let span = span!(Level::DEBUG, "press", pad = %pad);
        let _enter = span.enter();

        let pitches = self.resolver.resolve(pad.namespace(), &pad.label())?;
        debug!(pitches = ?pitches, "Pressed.");
        self.tracker.note_on_many(pitches)?;
        Ok(())
    }

    /// Stops the pad's pitches. Releasing a pad that was never pressed is fine.
    pub fn release(&self, pad: &Pad) -> Result<(), PadError> {
        let span = span!(Level::DEBUG, "release", pad = %pad);
        let _enter = span.enter();

        let pitches = self.resolver.resolve(pad.namespace(), &pad.label())?;
        debug!(pitches = ?pitches, "Released.");
        self.tracker.note_off_many(pitches);
        Ok(())
    }

    /// Silences everything and switches the instrument to the given program.
    pub fn select_program(&self, program: u8) -> Result<(), PadError> {
        let program = u7::try_from(program).ok_or(PadError::InvalidProgram(program))?;

        let mut current = self.program.lock();
        self.tracker.stop_all();
        self.instrument.select_program(program);
        *current = program;

        info!(
            program = program.as_int(),
            name = self.instrument_name(program.as_int()).unwrap_or("unknown"),
            "Program selected."
        );
        Ok(())
    }

    /// Gets the selected program.
    pub fn program(&self) -> u8 {
        self.program.lock().as_int()
    }

    /// Gets the human readable name of the given program.
    pub fn instrument_name(&self, program: u8) -> Option<&str> {
        self.settings.instrument_name(program)
    }

    /// Stops every sounding pitch.
    pub fn panic(&self) {
        self.tracker.stop_all();
    }

    /// Gets the tracker driving the instrument.
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Gets the pad grid, see [`layout`].
    pub fn layout(&self) -> Vec<Vec<Pad>> {
        layout(&self.settings)
    }
}

/// Gets the pad grid, top row first: one row of chord pads per quality in
/// reverse configured order, then the row of bass pads.
pub fn layout(settings: &Settings) -> Vec<Vec<Pad>> {
    let tonics = settings.tonics();

    let mut rows: Vec<Vec<Pad>> = settings
        .qualities()
        .iter()
        .rev()
        .map(|quality| {
            tonics
                .iter()
                .map(|tonic| Pad::chord(tonic, quality))
                .collect()
        })
        .collect();
    rows.push(tonics.iter().map(|tonic| Pad::bass(tonic)).collect());
    rows
}

impl fmt::Debug for ChordPad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChordPad")
            .field("program", &self.program())
            .field("tracker", &self.tracker)
            .finish()
    }
}
