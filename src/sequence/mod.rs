#![doc = r#"
The in-memory sequence a track is filled from and parsed into.

A [`Sequence`] owns its [`Event`]s, kept in timestamp order, and the
[`Trigger`]s that place it in the song. Song-wide state lives in
[`Song`](crate::proprietary::Song) and is only written with the tempo track.
"#]

mod event;
pub use event::*;

mod trigger;
pub use trigger::*;

use crate::SeqNumber;
use alloc::{string::String, vec::Vec};

/// Beats per bar and beat width of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Numerator
    pub beats_per_bar: u8,
    /// Denominator, a power of two
    pub beat_width: u8,
}

impl TimeSignature {
    /// Create a time signature
    pub const fn new(beats_per_bar: u8, beat_width: u8) -> Self {
        Self {
            beats_per_bar,
            beat_width,
        }
    }

    /// The denominator as the power of two used by the `FF 58` meta event
    pub const fn width_power(&self) -> u8 {
        if self.beat_width == 0 {
            0
        } else {
            self.beat_width.trailing_zeros() as u8
        }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

#[doc = r#"
A pattern of events plus the per-track settings stored next to it.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    number: SeqNumber,
    name: String,
    length: u32,
    buss: u8,
    channel: u8,
    time_signature: TimeSignature,
    key: Option<u8>,
    scale: Option<u8>,
    background: SeqNumber,
    transpose: bool,
    events: Vec<Event>,
    triggers: Vec<Trigger>,
}

impl Default for Sequence {
    fn default() -> Self {
        Self {
            number: SeqNumber::NULL,
            name: String::new(),
            length: 0,
            buss: 0,
            channel: 0,
            time_signature: TimeSignature::default(),
            key: None,
            scale: None,
            background: SeqNumber::LIMIT,
            transpose: true,
            events: Vec::new(),
            triggers: Vec::new(),
        }
    }
}

impl Sequence {
    /// Create an empty, unnumbered sequence
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The sequence number written in the `FF 00` meta event
    pub fn number(&self) -> SeqNumber {
        self.number
    }
    /// Set the sequence number
    pub fn set_number(&mut self, number: SeqNumber) {
        self.number = number;
    }

    /// The track name
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Set the track name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Length of the pattern in ticks
    pub fn length(&self) -> u32 {
        self.length
    }
    /// Set the pattern length
    pub fn set_length(&mut self, length: u32) {
        self.length = length;
    }

    /// Output buss
    pub fn buss(&self) -> u8 {
        self.buss
    }
    /// Set the output buss
    pub fn set_buss(&mut self, buss: u8) {
        self.buss = buss;
    }

    /// Output channel
    pub fn channel(&self) -> u8 {
        self.channel
    }
    /// Set the output channel
    pub fn set_channel(&mut self, channel: u8) {
        self.channel = channel;
    }

    /// Time signature
    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }
    /// Set the time signature
    pub fn set_time_signature(&mut self, time_signature: TimeSignature) {
        self.time_signature = time_signature;
    }

    /// Musical key shown by the editor, if one was chosen
    pub fn key(&self) -> Option<u8> {
        self.key
    }
    /// Set the musical key
    pub fn set_key(&mut self, key: Option<u8>) {
        self.key = key;
    }

    /// Scale shown by the editor, if one was chosen
    pub fn scale(&self) -> Option<u8> {
        self.scale
    }
    /// Set the scale
    pub fn set_scale(&mut self, scale: Option<u8>) {
        self.scale = scale;
    }

    /// Sequence drawn behind this one in the editor
    pub fn background(&self) -> SeqNumber {
        self.background
    }
    /// Set the background sequence
    pub fn set_background(&mut self, background: SeqNumber) {
        self.background = background;
    }

    /// Whether song transposition applies to this sequence
    pub fn transpose(&self) -> bool {
        self.transpose
    }
    /// Set whether song transposition applies
    pub fn set_transpose(&mut self, transpose: bool) {
        self.transpose = transpose;
    }

    /// Events in timestamp order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Insert an event after every event with the same or an earlier timestamp.
    pub fn add_event(&mut self, event: Event) {
        let index = self
            .events
            .partition_point(|e| e.timestamp() <= event.timestamp());
        self.events.insert(index, event);
    }

    /// Triggers in the order they were added.
    ///
    /// The owner keeps them sorted by start tick and free of overlaps.
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// Append a trigger
    pub fn add_trigger(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }

    /// Remove every trigger
    pub fn clear_triggers(&mut self) {
        self.triggers.clear();
    }
}

#[test]
fn events_stay_sorted() {
    let mut seq = Sequence::new("sorted");
    seq.add_event(Event::channel(96, 0x80, 60, 0));
    seq.add_event(Event::channel(0, 0x90, 60, 100));
    seq.add_event(Event::channel(96, 0x90, 62, 100));
    let ticks: Vec<u32> = seq.events().iter().map(Event::timestamp).collect();
    assert_eq!(ticks, [0, 96, 96]);
    assert_eq!(seq.events()[1].status(), 0x80);
    assert_eq!(seq.events()[2].status(), 0x90);
}
