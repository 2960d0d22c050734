#![doc = r#"
Song-wide state carried by the footer of the tempo track.

# Layout

The footer follows the tempo track's end-of-track event. Each block is a
32-bit tag, a 32-bit payload length and the payload. Blocks are always
written in this order:

```text
MidiControl  count:2, then per control 3 x (active inverse status data min max)
MidiClocks   count:2, then one ClockMode byte per buss
Notes        count:2, then per screen set len:2 + UTF-8 text
Bpm          milli-beats per minute:4
MuteGroups   count:2, then per group len:2 + one 0/1 byte per track
```

Readers dispatch on the tag and accept the blocks in any order.
"#]

use super::ProprietaryTag;
use crate::{container::*, error::ProprietaryError};
use alloc::{string::String, vec::Vec};
use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
Beats per minute in thousandths
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bpm(u32);

impl Bpm {
    /// The largest value a `FF 51` event holds in its three data bytes
    pub const MAX_MICROS: u32 = 0xFF_FFFF;

    /// Create a tempo from thousandths of a beat per minute
    pub const fn from_millis(millis: u32) -> Self {
        Self(millis)
    }

    /// Create a tempo from whole beats per minute
    pub const fn new(bpm: u32) -> Self {
        Self(bpm * 1000)
    }

    /// Thousandths of a beat per minute
    pub const fn millis(&self) -> u32 {
        self.0
    }

    /// Beats per minute
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 1000.
    }

    /// Microseconds per quarter note, as written in a `FF 51` event.
    ///
    /// Saturates at [`Bpm::MAX_MICROS`], so tempos below about 3.58 BPM are
    /// written as the slowest tempo a `FF 51` event can carry.
    pub const fn micros_per_quarter_note(&self) -> u32 {
        if self.0 == 0 {
            return 0;
        }
        let micros = 60_000_000_000u64 / self.0 as u64;
        if micros > Self::MAX_MICROS as u64 {
            Self::MAX_MICROS
        } else {
            micros as u32
        }
    }

    /// The tempo from a `FF 51` event
    pub const fn from_micros_per_quarter_note(micros: u32) -> Self {
        if micros == 0 {
            return Self(0);
        }
        Self((60_000_000_000u64 / micros as u64) as u32)
    }
}

impl Default for Bpm {
    fn default() -> Self {
        Self::new(120)
    }
}

/// One MIDI control binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlBinding {
    /// The binding responds to input
    pub active: bool,
    /// The binding acts on values outside `min..=max`
    pub inverse: bool,
    /// Status byte to match
    pub status: u8,
    /// First data byte to match
    pub data: u8,
    /// Lowest matching value
    pub min: u8,
    /// Highest matching value
    pub max: u8,
}

impl ControlBinding {
    const LEN: usize = 6;

    fn write<C: MidiContainer>(&self, out: &mut C) {
        out.add_bytes(&[
            self.active as u8,
            self.inverse as u8,
            self.status,
            self.data,
            self.min,
            self.max,
        ]);
    }

    fn read(bytes: &[u8]) -> Self {
        Self {
            active: bytes[0] != 0,
            inverse: bytes[1] != 0,
            status: bytes[2],
            data: bytes[3],
            min: bytes[4],
            max: bytes[5],
        }
    }
}

/// The toggle, on and off bindings for one pattern slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiControl {
    /// Toggles the slot
    pub toggle: ControlBinding,
    /// Arms the slot
    pub on: ControlBinding,
    /// Mutes the slot
    pub off: ControlBinding,
}

impl MidiControl {
    const LEN: usize = ControlBinding::LEN * 3;
}

/// How a buss sends MIDI clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ClockMode {
    /// No clock
    Off = 0,
    /// Clock with song position
    Pos = 1,
    /// Clock starting on the next multiple of the clock modulo
    Mod = 2,
    /// The buss is not used
    Disabled = 3,
}

#[doc = r#"
Song-wide settings written once, after the tempo track
"#]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Song {
    /// Song tempo
    pub bpm: Bpm,
    /// MIDI control bindings, one per pattern slot
    pub midi_controls: Vec<MidiControl>,
    /// Clock mode per output buss
    pub clocks: Vec<ClockMode>,
    /// One note per screen set
    pub notes: Vec<String>,
    /// Each group lists the armed state of every track
    pub mute_groups: Vec<Vec<bool>>,
}

fn block<C: MidiContainer>(out: &mut C, tag: ProprietaryTag, payload: &MidiVector) {
    out.add_long(tag.value());
    out.add_long(payload.size() as u32);
    out.add_bytes(payload.as_slice());
}

/// At most `u16::MAX` entries, the most a 16-bit count can describe.
fn capped<T>(items: &[T]) -> &[T] {
    &items[..items.len().min(u16::MAX as usize)]
}

/// The longest prefix of `text` that fits a 16-bit length and ends on a
/// character boundary.
fn capped_text(text: &str) -> &str {
    let mut end = text.len().min(u16::MAX as usize);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Write the five song blocks in their canonical order.
///
/// Lists and notes longer than a 16-bit count are cut to fit.
pub fn write_song_footer<C: MidiContainer>(out: &mut C, song: &Song) {
    let mut payload = MidiVector::default();
    let controls = capped(&song.midi_controls);
    payload.add_short(controls.len() as u16);
    for control in controls {
        control.toggle.write(&mut payload);
        control.on.write(&mut payload);
        control.off.write(&mut payload);
    }
    block(out, ProprietaryTag::MidiControl, &payload);

    payload.clear();
    let clocks = capped(&song.clocks);
    payload.add_short(clocks.len() as u16);
    for &clock in clocks {
        payload.put(clock.into());
    }
    block(out, ProprietaryTag::MidiClocks, &payload);

    payload.clear();
    let notes = capped(&song.notes);
    payload.add_short(notes.len() as u16);
    for note in notes {
        let text = capped_text(note);
        payload.add_short(text.len() as u16);
        payload.add_bytes(text.as_bytes());
    }
    block(out, ProprietaryTag::Notes, &payload);

    payload.clear();
    payload.add_long(song.bpm.millis());
    block(out, ProprietaryTag::Bpm, &payload);

    payload.clear();
    let groups = capped(&song.mute_groups);
    payload.add_short(groups.len() as u16);
    for group in groups {
        let group = capped(group);
        payload.add_short(group.len() as u16);
        for &armed in group {
            payload.put(armed as u8);
        }
    }
    block(out, ProprietaryTag::MuteGroups, &payload);
}

/// Apply one song block to `song`.
///
/// Per-track tags are ignored here; the caller has already consumed their bytes.
pub fn apply_song_block(
    song: &mut Song,
    tag: ProprietaryTag,
    payload: &[u8],
) -> Result<(), ProprietaryError> {
    let malformed = ProprietaryError::MalformedLength {
        tag: tag.value(),
        length: payload.len(),
    };
    let mut reader = MidiVector::from(payload.to_vec());
    match tag {
        ProprietaryTag::MidiControl => {
            let count = reader.read_short().map_err(|_| malformed)? as usize;
            let bytes = reader
                .read_bytes(count * MidiControl::LEN)
                .map_err(|_| malformed)?;
            song.midi_controls = bytes
                .chunks_exact(MidiControl::LEN)
                .map(|c| MidiControl {
                    toggle: ControlBinding::read(&c[0..6]),
                    on: ControlBinding::read(&c[6..12]),
                    off: ControlBinding::read(&c[12..18]),
                })
                .collect();
        }
        ProprietaryTag::MidiClocks => {
            let count = reader.read_short().map_err(|_| malformed)? as usize;
            let bytes = reader.read_bytes(count).map_err(|_| malformed)?;
            song.clocks = bytes
                .into_iter()
                .map(|b| {
                    ClockMode::try_from(b).map_err(|_| ProprietaryError::InvalidValue {
                        tag: tag.value(),
                        value: b as u32,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
        }
        ProprietaryTag::Notes => {
            let count = reader.read_short().map_err(|_| malformed)?;
            let mut notes = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let len = reader.read_short().map_err(|_| malformed)? as usize;
                let text = reader.read_bytes(len).map_err(|_| malformed)?;
                notes.push(String::from_utf8_lossy(&text).into_owned());
            }
            song.notes = notes;
        }
        ProprietaryTag::Bpm => {
            song.bpm = Bpm::from_millis(reader.read_long().map_err(|_| malformed)?);
        }
        ProprietaryTag::MuteGroups => {
            let count = reader.read_short().map_err(|_| malformed)?;
            let mut groups = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let len = reader.read_short().map_err(|_| malformed)? as usize;
                let states = reader.read_bytes(len).map_err(|_| malformed)?;
                groups.push(states.into_iter().map(|b| b != 0).collect());
            }
            song.mute_groups = groups;
        }
        _ => return Ok(()),
    }
    if reader.done() { Ok(()) } else { Err(malformed) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bpm_conversions() {
        let bpm = Bpm::new(120);
        assert_eq!(bpm.micros_per_quarter_note(), 500_000);
        assert_eq!(Bpm::from_micros_per_quarter_note(500_000), bpm);
        assert_eq!(Bpm::from_millis(0).micros_per_quarter_note(), 0);
    }

    #[test]
    fn slow_tempo_saturates() {
        assert_eq!(Bpm::from_millis(3_577).micros_per_quarter_note(), 16_773_832);
        assert_eq!(Bpm::from_millis(3_576).micros_per_quarter_note(), Bpm::MAX_MICROS);
        assert_eq!(Bpm::from_millis(3_000).micros_per_quarter_note(), Bpm::MAX_MICROS);
        assert_eq!(Bpm::from_millis(1).micros_per_quarter_note(), Bpm::MAX_MICROS);
    }

    #[test]
    fn empty_song_footer() {
        let mut out = MidiVector::default();
        write_song_footer(&mut out, &Song::default());
        #[rustfmt::skip]
        let expected = [
            0x24, 0x24, 0x00, 0x10, 0, 0, 0, 2, 0, 0,
            0x24, 0x24, 0x00, 0x03, 0, 0, 0, 2, 0, 0,
            0x24, 0x24, 0x00, 0x05, 0, 0, 0, 2, 0, 0,
            0x24, 0x24, 0x00, 0x07, 0, 0, 0, 4, 0x00, 0x01, 0xD4, 0xC0,
            0x24, 0x24, 0x00, 0x09, 0, 0, 0, 2, 0, 0,
        ];
        assert_eq!(out.as_slice(), expected);
    }

    #[test]
    fn oversized_lists_are_cut_to_fit() {
        let song = Song {
            notes: alloc::vec!["é".repeat(40_000)],
            mute_groups: alloc::vec![alloc::vec![true; 65_536]],
            ..Default::default()
        };
        let mut out = MidiVector::default();
        write_song_footer(&mut out, &song);

        let mut decoded = Song::default();
        let mut reader = MidiVector::from(out.as_slice().to_vec());
        while !reader.done() {
            let tag = ProprietaryTag::try_from(reader.read_long().unwrap()).unwrap();
            let len = reader.read_long().unwrap() as usize;
            let payload = reader.read_bytes(len).unwrap();
            apply_song_block(&mut decoded, tag, &payload).unwrap();
        }
        assert_eq!(decoded.notes, ["é".repeat(32_767)]);
        assert_eq!(decoded.mute_groups, [alloc::vec![true; 65_535]]);
    }

    #[test]
    fn clock_mode_out_of_range() {
        let mut song = Song::default();
        let err = apply_song_block(&mut song, ProprietaryTag::MidiClocks, &[0, 2, 1, 9]);
        assert_eq!(
            err,
            Err(ProprietaryError::InvalidValue {
                tag: 0x2424_0003,
                value: 9
            })
        );
    }

    #[test]
    fn notes_with_trailing_bytes() {
        let mut song = Song::default();
        let payload = [0, 1, 0, 2, b'h', b'i', 0xAA];
        assert_eq!(
            apply_song_block(&mut song, ProprietaryTag::Notes, &payload),
            Err(ProprietaryError::MalformedLength {
                tag: 0x2424_0005,
                length: 7
            })
        );
        assert_eq!(song.notes, ["hi"]);
    }
}
