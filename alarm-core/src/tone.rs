//! # Tone
//! A fixed sequence of notes played without blocking.
//!
//! [`Tone::play`] is polled from the control loop. Each call does a bounded amount of work:
//! it starts, silences or advances at most one note depending on the time elapsed since the
//! last step transition, and never waits. The sequence loops for as long as `play` keeps
//! being called; [`Tone::stop`] silences it and rewinds to the first note.

use crate::error::Error;
use crate::time::Millis;

/// Note frequencies in Hz
pub mod pitches {
    /// G4
    pub const NOTE_G4: u16 = 392;
    /// B4
    pub const NOTE_B4: u16 = 494;
    /// G5
    pub const NOTE_G5: u16 = 784;
}

use pitches::{NOTE_B4, NOTE_G4, NOTE_G5};

/// One step of a tone: a pitch held for `duration`, then `pause` of silence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Note {
    /// Frequency in Hz
    pub pitch: u16,
    /// How long the pitch sounds, in milliseconds
    pub duration: u16,
    /// Silence after the pitch, in milliseconds
    pub pause: u16,
}

impl Note {
    /// Create a note
    pub const fn new(pitch: u16, duration: u16, pause: u16) -> Self {
        Self {
            pitch,
            duration,
            pause,
        }
    }

    /// Duration plus pause: the time from this note's start to the next note's start
    pub const fn period(&self) -> u32 {
        self.duration as u32 + self.pause as u32
    }
}

/// Notification chirp
pub static NOTIFY_NOTES: [Note; 2] = [Note::new(NOTE_B4, 200, 100), Note::new(NOTE_B4, 200, 2000)];

/// Emergency pattern
pub static EMERGENCY_NOTES: [Note; 5] = [
    Note::new(NOTE_G4, 300, 200),
    Note::new(NOTE_G4, 300, 200),
    Note::new(NOTE_G4, 300, 400),
    Note::new(NOTE_G4, 200, 100),
    Note::new(NOTE_G5, 200, 1500),
];

/// Shutdown notice
pub static OFF_NOTES: [Note; 1] = [Note::new(NOTE_G4, 200, 200)];

/// Sink that can sound a pitch until told to stop, e.g. a PWM channel driving a buzzer
pub trait ToneOutput {
    /// Start sounding `pitch_hz`, replacing whatever was sounding
    fn start(&mut self, pitch_hz: u16);

    /// Stop sounding
    fn silence(&mut self);
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Not playing, the next `play` starts at the first note
    Stopped,
    /// Playing the note at `step`
    Playing {
        /// Index of the current note
        step: usize,
        /// `false` once the note ended and its pause runs
        sounding: bool,
    },
}

/// A sequence of notes that can be played
#[derive(Debug, Clone)]
pub struct Tone {
    /// The notes, borrowed for the program lifetime
    notes: &'static [Note],
    /// Where playback is
    state: State,
    /// When the current note started
    step_started: Millis,
}

impl Tone {
    /// Create a stopped tone over `notes`
    pub const fn new(notes: &'static [Note]) -> Self {
        Self {
            notes,
            state: State::Stopped,
            step_started: Millis::ZERO,
        }
    }

    /// Advance playback to `now`.
    ///
    /// A stopped tone starts at its first note. A playing tone silences the current note once
    /// its duration is over and moves to the next note, wrapping to the first, once its pause
    /// is over too. An empty tone never plays and reports [`Error::EmptyTone`].
    pub fn play(&mut self, now: Millis, out: &mut impl ToneOutput) -> Result<(), Error> {
        let Some(first) = self.notes.first() else {
            return Err(Error::EmptyTone);
        };

        match self.state {
            State::Stopped => {
                out.start(first.pitch);
                self.begin_step(0, now);
            }
            State::Playing { step, sounding } => {
                let Some(note) = self.notes.get(step) else {
                    self.state = State::Stopped;
                    return Ok(());
                };
                let elapsed = now.elapsed_since(self.step_started);
                if elapsed >= note.period() {
                    let next = (step + 1) % self.notes.len();
                    if let Some(next_note) = self.notes.get(next) {
                        out.start(next_note.pitch);
                    }
                    self.begin_step(next, now);
                } else if sounding && elapsed >= u32::from(note.duration) {
                    out.silence();
                    self.state = State::Playing {
                        step,
                        sounding: false,
                    };
                }
            }
        }
        Ok(())
    }

    /// Stop playing; the next [`Tone::play`] starts over at the first note
    pub fn stop(&mut self, out: &mut impl ToneOutput) {
        if let State::Playing { sounding, .. } = self.state {
            if sounding {
                out.silence();
            }
            self.state = State::Stopped;
        }
    }

    /// Whether the tone is playing, in a note or in a pause
    pub const fn is_playing(&self) -> bool {
        matches!(self.state, State::Playing { .. })
    }

    /// Index of the current note while playing
    pub const fn current_step(&self) -> Option<usize> {
        match self.state {
            State::Playing { step, .. } => Some(step),
            State::Stopped => None,
        }
    }

    /// The notes of this tone
    pub const fn notes(&self) -> &'static [Note] {
        self.notes
    }

    /// Enter the note at `step`, sounding
    const fn begin_step(&mut self, step: usize, now: Millis) {
        self.state = State::Playing {
            step,
            sounding: true,
        };
        self.step_started = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records what the tone asked the output to do
    #[derive(Default)]
    struct Recorder {
        /// Pitch sounding right now
        sounding: Option<u16>,
        /// Every pitch started, in order
        started: heapless::Vec<u16, 32>,
        /// Number of silence calls
        silenced: usize,
    }

    impl ToneOutput for Recorder {
        fn start(&mut self, pitch_hz: u16) {
            self.sounding = Some(pitch_hz);
            self.started.push(pitch_hz).unwrap();
        }

        fn silence(&mut self) {
            self.sounding = None;
            self.silenced += 1;
        }
    }

    #[test]
    fn first_play_starts_first_note() {
        let mut tone = Tone::new(&EMERGENCY_NOTES);
        let mut out = Recorder::default();
        tone.play(Millis::new(1_000), &mut out).unwrap();
        assert_eq!(out.sounding, Some(NOTE_G4));
        assert_eq!(tone.current_step(), Some(0));
    }

    #[test]
    fn emergency_steps_follow_the_programmed_timing() {
        let mut tone = Tone::new(&EMERGENCY_NOTES);
        let mut out = Recorder::default();
        let mut now = Millis::new(500);
        tone.play(now, &mut out).unwrap();

        // walk two full loops, checking each note and its pause
        for round in 0..2 {
            for (index, note) in EMERGENCY_NOTES.iter().enumerate() {
                assert_eq!(tone.current_step(), Some(index), "round {round}");
                assert_eq!(out.sounding, Some(note.pitch));

                tone.play(now.wrapping_add(u32::from(note.duration) - 1), &mut out)
                    .unwrap();
                assert_eq!(out.sounding, Some(note.pitch));

                tone.play(now.wrapping_add(u32::from(note.duration)), &mut out)
                    .unwrap();
                assert_eq!(out.sounding, None);

                tone.play(now.wrapping_add(note.period() - 1), &mut out)
                    .unwrap();
                assert_eq!(tone.current_step(), Some(index));

                now = now.wrapping_add(note.period());
                tone.play(now, &mut out).unwrap();
            }
        }
        assert_eq!(tone.current_step(), Some(0));
        assert_eq!(out.started.len(), 2 * EMERGENCY_NOTES.len() + 1);
    }

    #[test]
    fn stop_then_play_restarts_at_first_note() {
        let mut tone = Tone::new(&EMERGENCY_NOTES);
        let mut out = Recorder::default();
        tone.play(Millis::new(0), &mut out).unwrap();
        tone.play(Millis::new(500), &mut out).unwrap();
        tone.play(Millis::new(1_000), &mut out).unwrap();
        assert_eq!(tone.current_step(), Some(2));

        tone.stop(&mut out);
        assert!(!tone.is_playing());
        assert_eq!(out.sounding, None);

        tone.play(Millis::new(1_010), &mut out).unwrap();
        assert_eq!(tone.current_step(), Some(0));
        assert_eq!(out.sounding, Some(NOTE_G4));
    }

    #[test]
    fn stop_during_pause_does_not_silence_again() {
        let mut tone = Tone::new(&OFF_NOTES);
        let mut out = Recorder::default();
        tone.play(Millis::new(0), &mut out).unwrap();
        tone.play(Millis::new(250), &mut out).unwrap();
        assert_eq!(out.silenced, 1);
        tone.stop(&mut out);
        assert_eq!(out.silenced, 1);
        tone.stop(&mut out);
        assert_eq!(out.silenced, 1);
    }

    #[test]
    fn single_note_tone_loops() {
        let mut tone = Tone::new(&OFF_NOTES);
        let mut out = Recorder::default();
        tone.play(Millis::new(0), &mut out).unwrap();
        tone.play(Millis::new(400), &mut out).unwrap();
        tone.play(Millis::new(800), &mut out).unwrap();
        assert_eq!(out.started.as_slice(), &[NOTE_G4, NOTE_G4, NOTE_G4]);
    }

    #[test]
    fn timing_survives_clock_wraparound() {
        let mut tone = Tone::new(&NOTIFY_NOTES);
        let mut out = Recorder::default();
        let start = Millis::new(u32::MAX - 150);
        tone.play(start, &mut out).unwrap();
        tone.play(start.wrapping_add(200), &mut out).unwrap();
        assert_eq!(out.sounding, None);
        tone.play(start.wrapping_add(300), &mut out).unwrap();
        assert_eq!(tone.current_step(), Some(1));
        assert_eq!(out.sounding, Some(NOTE_B4));
    }

    #[test]
    fn empty_tone_never_plays() {
        static NO_NOTES: [Note; 0] = [];
        let mut tone = Tone::new(&NO_NOTES);
        let mut out = Recorder::default();
        assert_eq!(tone.play(Millis::new(0), &mut out), Err(Error::EmptyTone));
        assert_eq!(tone.play(Millis::new(10_000), &mut out), Err(Error::EmptyTone));
        assert!(!tone.is_playing());
        assert!(out.started.is_empty());
        tone.stop(&mut out);
        assert_eq!(out.silenced, 0);
    }

    #[test]
    fn zero_length_notes_advance_one_step_per_call() {
        static CLICKS: [Note; 3] = [Note::new(100, 0, 0), Note::new(200, 0, 0), Note::new(300, 0, 0)];
        let mut tone = Tone::new(&CLICKS);
        let mut out = Recorder::default();
        let now = Millis::new(42);
        tone.play(now, &mut out).unwrap();
        tone.play(now, &mut out).unwrap();
        tone.play(now, &mut out).unwrap();
        tone.play(now, &mut out).unwrap();
        assert_eq!(out.started.as_slice(), &[100, 200, 300, 100]);
    }
}
