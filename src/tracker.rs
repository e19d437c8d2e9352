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

//! Polyphonic note tracking.
//!
//! The tracker is the single source of truth for which pitches are sounding on
//! an instrument. Every pitch is either silent or sounding:
//! - a note on for a silent pitch starts it; for a sounding pitch it does nothing.
//! - a note off for a sounding pitch stops it; for a silent pitch it does nothing.
//!
//! Redundant calls are expected (repeated gesture events, a chord and a bass
//! note sharing a pitch) and are not errors. Only out-of-range pitches are.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use midly::num::u7;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::instrument::Instrument;

/// Errors reported by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("Pitch {0} is outside 0-127")]
    InvalidPitch(u8),
}

/// Tracks the sounding pitches of an instrument and forwards only net-new note
/// on and note off commands to it.
pub struct Tracker {
    /// The instrument receiving note commands. Shared with whoever created it.
    instrument: Arc<dyn Instrument>,
    /// The pitches for which a note on was forwarded and no note off since.
    active: Mutex<BTreeSet<u7>>,
}

impl Tracker {
    /// Creates a new tracker with nothing sounding.
    pub fn new(instrument: Arc<dyn Instrument>) -> Tracker {
        Tracker {
            instrument,
            active: Mutex::new(BTreeSet::new()),
        }
    }

    /// Starts the pitch unless it is already sounding.
    pub fn note_on(&self, pitch: u8) -> Result<(), TrackerError> {
        let key = u7::try_from(pitch).ok_or(TrackerError::InvalidPitch(pitch))?;

        // The instrument is called with the lock held so that the set and the
        // forwarded commands can't disagree under concurrent callers.
        let mut active = self.active.lock();
        if active.insert(key) {
            debug!(pitch, "Note on.");
            self.instrument.note_on(key);
        } else {
            debug!(pitch, "Pitch already sounding, ignoring note on.");
        }
        Ok(())
    }

    /// Stops the pitch if it is sounding. Pitches outside 0-127 can never be
    /// sounding, so they are ignored like any other silent pitch.
    pub fn note_off(&self, pitch: u8) {
        let key = match u7::try_from(pitch) {
            Some(key) => key,
            None => {
                debug!(pitch, "Ignoring note off for out of range pitch.");
                return;
            }
        };

        let mut active = self.active.lock();
        if active.remove(&key) {
            debug!(pitch, "Note off.");
            self.instrument.note_off(key);
        } else {
            debug!(pitch, "Pitch not sounding, ignoring note off.");
        }
    }

    /// Starts each pitch in order. Invalid pitches don't prevent the rest from
    /// starting and nothing already started is rolled back; the first invalid
    /// pitch is reported once the whole batch has been processed.
    pub fn note_on_many(&self, pitches: &[u8]) -> Result<(), TrackerError> {
        let mut first_error = None;
        for pitch in pitches {
            if let Err(e) = self.note_on(*pitch) {
                warn!(pitch, "Skipping invalid pitch.");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Stops each pitch in order.
    pub fn note_off_many(&self, pitches: &[u8]) {
        pitches.iter().for_each(|pitch| self.note_off(*pitch));
    }

    /// Stops every sounding pitch, lowest first, and clears the set.
    pub fn stop_all(&self) {
        let mut active = self.active.lock();
        if active.is_empty() {
            return;
        }

        info!(count = active.len(), "Stopping all notes.");
        for key in active.iter() {
            self.instrument.note_off(*key);
        }
        active.clear();
    }

    /// Returns true if the pitch is sounding.
    pub fn is_sounding(&self, pitch: u8) -> bool {
        u7::try_from(pitch).is_some_and(|key| self.active.lock().contains(&key))
    }

    /// Returns the sounding pitches, lowest first.
    pub fn active(&self) -> Vec<u8> {
        self.active.lock().iter().map(|key| key.as_int()).collect()
    }

    /// Returns the number of sounding pitches.
    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.stop_all();
    }
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("instrument", &self.instrument.name())
            .field("active", &self.active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crate::instrument::{Call, MockDevice};

    use super::*;

    fn tracker() -> (Tracker, MockDevice) {
        let device = MockDevice::get("mock-tracker");
        (Tracker::new(Arc::new(device.clone())), device)
    }

    #[test]
    fn test_note_on_is_idempotent() {
        let (tracker, device) = tracker();

        tracker.note_on(60).unwrap();
        tracker.note_on(60).unwrap();

        assert_eq!(device.calls(), vec![Call::NoteOn(60)]);
        assert_eq!(tracker.active(), vec![60]);
        assert!(tracker.is_sounding(60));
    }

    #[test]
    fn test_note_off_when_silent() {
        let (tracker, device) = tracker();

        tracker.note_off(60);
        tracker.note_off(200);
        assert!(device.calls().is_empty());

        tracker.note_on(60).unwrap();
        tracker.note_off(60);
        tracker.note_off(60);
        assert_eq!(device.calls(), vec![Call::NoteOn(60), Call::NoteOff(60)]);
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn test_shared_pitch_released_by_either_holder() {
        let (tracker, device) = tracker();

        // A C major chord and a bass note that shares its root.
        tracker.note_on_many(&[60, 64, 67]).unwrap();
        tracker.note_on(60).unwrap();
        assert_eq!(device.note_ons(), vec![60, 64, 67]);

        // Releasing the bass note silences the shared pitch even though the
        // chord is still held.
        tracker.note_off(60);
        assert_eq!(device.note_offs(), vec![60]);
        assert!(!tracker.is_sounding(60));
        assert_eq!(tracker.active(), vec![64, 67]);

        // Releasing the chord doesn't stop 60 a second time.
        tracker.note_off_many(&[60, 64, 67]);
        assert_eq!(device.note_offs(), vec![60, 64, 67]);
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn test_stop_all() {
        let (tracker, device) = tracker();

        tracker.note_on_many(&[67, 60, 64]).unwrap();
        tracker.stop_all();

        assert_eq!(tracker.active_count(), 0);
        let mut offs = device.note_offs();
        offs.sort();
        assert_eq!(offs, vec![60, 64, 67]);

        // Everything is silent again, so a repeat does nothing.
        device.reset();
        tracker.stop_all();
        assert!(device.calls().is_empty());
    }

    #[test]
    fn test_stop_all_when_empty() {
        let (tracker, device) = tracker();

        tracker.stop_all();
        assert!(device.calls().is_empty());
        assert_eq!(tracker.active_count(), 0);
    }

    #[test]
    fn test_invalid_pitch_rejected() {
        let (tracker, device) = tracker();
        tracker.note_on(62).unwrap();

        assert_eq!(tracker.note_on(200), Err(TrackerError::InvalidPitch(200)));
        assert_eq!(tracker.note_on(128), Err(TrackerError::InvalidPitch(128)));
        assert_eq!(tracker.active(), vec![62]);
        assert_eq!(device.calls(), vec![Call::NoteOn(62)]);
        assert!(!tracker.is_sounding(200));
    }

    #[test]
    fn test_batch_is_best_effort() {
        let (tracker, device) = tracker();

        let result = tracker.note_on_many(&[60, 200, 64, 255, 67]);

        assert_eq!(result, Err(TrackerError::InvalidPitch(200)));
        assert_eq!(device.note_ons(), vec![60, 64, 67]);
        assert_eq!(tracker.active(), vec![60, 64, 67]);

        tracker.note_off_many(&[60, 200, 64, 67]);
        assert_eq!(device.note_offs(), vec![60, 64, 67]);
    }

    #[test]
    fn test_pitch_bounds() {
        let (tracker, device) = tracker();

        tracker.note_on(0).unwrap();
        tracker.note_on(127).unwrap();
        assert_eq!(device.note_ons(), vec![0, 127]);
    }

    #[test]
    fn test_drop_stops_everything() {
        let (tracker, device) = tracker();

        tracker.note_on_many(&[60, 64]).unwrap();
        drop(tracker);

        assert_eq!(device.note_offs(), vec![60, 64]);
    }

    #[test]
    fn test_independent_trackers() {
        let (first, first_device) = tracker();
        let (second, second_device) = tracker();

        first.note_on(60).unwrap();
        second.note_on(60).unwrap();
        first.note_off(60);

        assert_eq!(first_device.calls(), vec![Call::NoteOn(60), Call::NoteOff(60)]);
        assert_eq!(second_device.calls(), vec![Call::NoteOn(60)]);
        assert!(second.is_sounding(60));
    }

    #[test]
    fn test_concurrent_note_on() {
        let (tracker, device) = tracker();
        let tracker = Arc::new(tracker);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        tracker.note_on_many(&[60, 64, 67]).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(device.note_ons().len(), 3);
        assert_eq!(tracker.active(), vec![60, 64, 67]);
    }
}
