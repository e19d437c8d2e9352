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
use std::io;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use tracing::{info, span, warn, Level};

use super::Event;
use crate::pad::Pad;

const PRESS: &str = "press";
const RELEASE: &str = "release";
const CHORD: &str = "chord";
const BASS: &str = "bass";
const PROGRAM: &str = "program";
const PANIC: &str = "panic";
const QUIT: &str = "quit";

/// A controller that plays the chord pad from typed commands, one per line:
/// `press chord C7`, `release bass F#`, `program 18`, `panic`, `quit`.
pub struct Driver {
    /// The configured tonics, used to split chord labels into tonic and quality.
    tonics: Vec<String>,
}

impl Driver {
    pub fn new(tonics: Vec<String>) -> Driver {
        Driver { tonics }
    }

    /// Parses a single command. Keywords are case insensitive, labels are not.
    fn parse(tonics: &[String], input: &str) -> Option<Event> {
        let words: Vec<&str> = input.split_whitespace().collect();
        let keyword = words.first()?.to_lowercase();

        match (keyword.as_str(), &words[1..]) {
            (PRESS, [table, label]) => Self::parse_pad(tonics, table, label).map(Event::Press),
            (RELEASE, [table, label]) => Self::parse_pad(tonics, table, label).map(Event::Release),
            (PROGRAM, [program]) => program.parse::<u8>().ok().map(Event::Program),
            (PANIC, []) => Some(Event::Panic),
            (QUIT, []) => Some(Event::Quit),
            _ => None,
        }
    }

    fn parse_pad(tonics: &[String], table: &str, label: &str) -> Option<Pad> {
        match table.to_lowercase().as_str() {
            CHORD => Pad::parse_chord(label, tonics),
            BASS => Some(Pad::bass(label)),
            _ => None,
        }
    }

    /// Reads and sends a single command. Returns false once input is exhausted,
    /// the user quits or nobody is listening anymore.
    fn monitor_io<R, W>(
        tonics: &[String],
        events_tx: &Sender<Event>,
        mut reader: R,
        mut writer: W,
    ) -> Result<bool, io::Error>
    where
        R: io::BufRead,
        W: io::Write,
    {
        write!(
            writer,
            "Command ({} {}|{} <label>, {} {}|{} <label>, {} <n>, {}, {}): ",
            PRESS, CHORD, BASS, RELEASE, CHORD, BASS, PROGRAM, PANIC, QUIT,
        )?;
        writer.flush()?;
        let mut input: String = String::default();
        if reader.read_line(&mut input)? == 0 {
            // End of input behaves like quitting so nothing is left sounding.
            let _ = events_tx.send(Event::Quit);
            return Ok(false);
        }

        let event = match Self::parse(tonics, &input) {
            Some(event) => event,
            None => {
                warn!(input = input.trim(), "Unrecognized input");
                return Ok(true);
            }
        };

        let quit = event == Event::Quit;
        if events_tx.send(event).is_err() {
            return Ok(false);
        }
        Ok(!quit)
    }
}

impl super::Driver for Driver {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>> {
        let tonics = self.tonics.clone();
        thread::spawn(move || {
            let span = span!(Level::INFO, "keyboard driver");
            let _enter = span.enter();

            info!("Keyboard driver started.");

            while Self::monitor_io(&tonics, &events_tx, io::stdin().lock(), io::stdout())? {}
            Ok(())
        })
    }
}
