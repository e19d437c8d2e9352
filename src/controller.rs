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
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use tracing::{error, info, span, warn, Level};

use crate::pad::{ChordPad, Pad};

pub mod keyboard;

/// Controller events that will trigger behavior in the chord pad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A pad was pressed.
    Press(Pad),

    /// A pad was released.
    Release(Pad),

    /// Switches the instrument to the given program, silencing everything first.
    Program(u8),

    /// Stops every sounding note.
    Panic,

    /// Stops every sounding note and closes the controller.
    Quit,
}

pub trait Driver: Send + Sync + 'static {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>>;
}

/// Feeds events from a driver into a chord pad.
pub struct Controller {
    pad: Arc<ChordPad>,
    driver: Arc<dyn Driver>,
}

impl Controller {
    /// Creates a new controller with the given driver.
    pub fn new(pad: Arc<ChordPad>, driver: Arc<dyn Driver>) -> Controller {
        Controller { pad, driver }
    }

    /// Runs until the driver quits or stops sending events. Every note is
    /// stopped on the way out.
    pub fn run(&self) -> Result<(), io::Error> {
        let span = span!(Level::INFO, "controller");
        let _enter = span.enter();

        let (events_tx, events_rx) = crossbeam_channel::bounded(1);
        let join_handle = self.driver.monitor_events(events_tx);

        info!("Controller started.");

        while let Ok(event) = events_rx.recv() {
            if !handle_event(&self.pad, event) {
                break;
            }
        }

        info!("Controller closing.");
        self.pad.panic();
        drop(events_rx);

        match join_handle.join() {
            Ok(result) => result,
            Err(_) => {
                error!("Error waiting for event monitor to stop.");
                Ok(())
            }
        }
    }
}

/// Applies the event to the chord pad. Returns false once the controller should close.
///
/// Pads without a configured label and invalid programs are logged and ignored,
/// the same as a gesture that lands nowhere.
pub fn handle_event(pad: &ChordPad, event: Event) -> bool {
    info!(event = format!("{:?}", event), "Received event.");

    let result = match event {
        Event::Press(p) => pad.press(&p),
        Event::Release(p) => pad.release(&p),
        Event::Program(program) => pad.select_program(program),
        Event::Panic => {
            pad.panic();
            Ok(())
        }
        Event::Quit => return false,
    };

    if let Err(e) = result {
        warn!(err = %e, "Ignoring event.");
    }
    true
}
