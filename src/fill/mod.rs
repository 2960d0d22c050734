#![doc = r#"
The track fill engine

[`TrackFill`] walks one [`Sequence`] and writes a complete track body into a
[`MidiContainer`]:

1. header: sequence number (`FF 00`) and track name (`FF 03`) when present; on
   the tempo track also set tempo (`FF 51`) and time signature (`FF 58`). An
   unnamed sequence whose body opens with its own `FF 00` or `FF 03` at tick 0
   gets an empty name event, so the decoder leaves those in the body.
2. body: every event, delta-timed from the previous one
3. proprietary blocks: triggers, buss, time signature, channel, then key,
   scale, background sequence and transpose
4. end of track (`FF 2F`), placed at the sequence length
5. on the tempo track only, the song footer

The engine borrows the sequence for the duration of a call, so there is no way
to fill from a sequence that is not there.
"#]

mod export;

mod options;
pub use options::*;

use crate::{
    container::{MidiContainer, MidiVector},
    proprietary::{ProprietaryTag, Song, encode_triggers, write_song_footer, write_track_block},
    sequence::*,
};

/// The track that carries tempo, time signature and the song footer
pub const TEMPO_TRACK: u16 = 0;

#[doc = r#"
Fills a container from one sequence

```rust
# use seqtrack::prelude::*;
let seq = Sequence::new("empty");
let mut list = MidiList::default();
TrackFill::new(&seq).fill(&mut list, 3);

// name, trigger/buss/timesig/channel/transpose blocks, end of track
assert_eq!(list.size(), 9 + 8 + 9 + 10 + 9 + 9 + 4);
```
"#]
#[derive(Debug, Clone, Copy)]
pub struct TrackFill<'a> {
    sequence: &'a Sequence,
    song: Option<&'a Song>,
    options: FillOptions,
}

impl<'a> TrackFill<'a> {
    /// Fill from `sequence` with the default options
    pub const fn new(sequence: &'a Sequence) -> Self {
        Self {
            sequence,
            song: None,
            options: FillOptions::new(),
        }
    }

    /// The song written with the tempo track. Without one, a default song is written.
    pub const fn song(mut self, song: &'a Song) -> Self {
        self.song = Some(song);
        self
    }

    /// Replace the options
    pub const fn options(mut self, options: FillOptions) -> Self {
        self.options = options;
        self
    }

    /// Append the complete track body for `track` to `out`.
    pub fn fill<C: MidiContainer>(&self, out: &mut C, track: u16) {
        let seq = self.sequence;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            track,
            name = seq.name(),
            events = seq.events().len(),
            triggers = seq.triggers().len(),
            "filling track"
        );

        self.fill_header(out, track);

        let mut prev_timestamp = 0;
        for event in seq.events() {
            add_event(out, event, event.timestamp() - prev_timestamp);
            prev_timestamp = event.timestamp();
        }

        self.fill_triggers(out, seq.triggers());
        self.fill_proprietary(out);
        fill_meta_track_end(out, seq.length().saturating_sub(prev_timestamp));
        self.fill_song_footer(out, track);
    }

    fn fill_header<C: MidiContainer>(&self, out: &mut C, track: u16) {
        let seq = self.sequence;
        if seq.number().is_valid() {
            fill_seq_number(out, seq.number().value() as u16);
        }
        if !seq.name().is_empty() || starts_like_header(seq.events()) {
            fill_seq_name(out, seq.name());
        }
        if track == TEMPO_TRACK {
            let bpm = self.song.map(|song| song.bpm).unwrap_or_default();
            fill_time_sig_and_tempo(out, seq.time_signature(), bpm.micros_per_quarter_note());
        }
    }

    fn fill_triggers<C: MidiContainer>(&self, out: &mut C, triggers: &[Trigger]) {
        let mut payload = MidiVector::default();
        encode_triggers(&mut payload, triggers);
        write_track_block(out, ProprietaryTag::TriggersNew, payload.as_slice());
    }

    fn fill_proprietary<C: MidiContainer>(&self, out: &mut C) {
        let seq = self.sequence;
        let ts = seq.time_signature();
        write_track_block(out, ProprietaryTag::Buss, &[seq.buss()]);
        write_track_block(
            out,
            ProprietaryTag::TimeSignature,
            &[ts.beats_per_bar, ts.beat_width],
        );
        write_track_block(out, ProprietaryTag::Channel, &[seq.channel()]);
        if self.options.is_legacy_format() {
            return;
        }
        if let Some(key) = seq.key() {
            write_track_block(out, ProprietaryTag::Key, &[key]);
        }
        if let Some(scale) = seq.scale() {
            write_track_block(out, ProprietaryTag::Scale, &[scale]);
        }
        if seq.background().is_valid() {
            let background = seq.background().value() as u32;
            write_track_block(out, ProprietaryTag::BackSequence, &background.to_be_bytes());
        }
        if self.options.writes_transpose() {
            write_track_block(out, ProprietaryTag::Transpose, &[seq.transpose() as u8]);
        }
    }

    fn fill_song_footer<C: MidiContainer>(&self, out: &mut C, track: u16) {
        if track != TEMPO_TRACK {
            return;
        }
        match self.song {
            Some(song) => write_song_footer(out, song),
            None => write_song_footer(out, &Song::default()),
        }
    }
}

/// Write one event: delta-time, status, then data or length-prefixed data.
pub fn add_event<C: MidiContainer>(out: &mut C, event: &Event, delta: u32) {
    out.add_variable(delta);
    match event.kind() {
        EventKind::Channel { status, data } => {
            out.put(*status);
            out.add_bytes(&data[..channel_data_len(*status)]);
        }
        EventKind::Meta { kind, data } => {
            out.put(0xFF);
            out.put(*kind);
            out.add_variable(data.len() as u32);
            out.add_bytes(data);
        }
        EventKind::SysEx { status, data } => {
            out.put(*status);
            out.add_variable(data.len() as u32);
            out.add_bytes(data);
        }
    }
}

/// True if the first body event would be read back as a header event.
///
/// An unnamed sequence then gets an empty name event so its own `FF 00` or
/// `FF 03` stays in the body.
fn starts_like_header(events: &[Event]) -> bool {
    events.first().is_some_and(|event| {
        event.timestamp() == 0
            && matches!(
                event.kind(),
                EventKind::Meta {
                    kind: META_SEQ_NUMBER | META_TRACK_NAME,
                    ..
                }
            )
    })
}

fn fill_seq_number<C: MidiContainer>(out: &mut C, number: u16) {
    out.add_bytes(&[0x00, 0xFF, META_SEQ_NUMBER, 0x02]);
    out.add_short(number);
}

fn fill_seq_name<C: MidiContainer>(out: &mut C, name: &str) {
    out.add_bytes(&[0x00, 0xFF, META_TRACK_NAME]);
    out.add_variable(name.len() as u32);
    out.add_bytes(name.as_bytes());
}

fn fill_time_sig_and_tempo<C: MidiContainer>(out: &mut C, ts: TimeSignature, micros: u32) {
    out.add_bytes(&[0x00, 0xFF, META_TEMPO, 0x03]);
    out.add_bytes(&micros.to_be_bytes()[1..]);
    out.add_bytes(&[
        0x00,
        0xFF,
        META_TIME_SIGNATURE,
        0x04,
        ts.beats_per_bar,
        ts.width_power(),
        0x18,
        0x08,
    ]);
}

fn fill_meta_track_end<C: MidiContainer>(out: &mut C, delta: u32) {
    out.add_variable(delta);
    out.add_bytes(&[0xFF, META_END_OF_TRACK, 0x00]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SeqNumber, container::MidiList};
    use alloc::vec::Vec;
    use pretty_assertions::assert_eq;

    fn drain<C: MidiContainer>(container: &mut C) -> Vec<u8> {
        let mut out = Vec::new();
        while !container.done() {
            out.push(container.get().unwrap());
        }
        out
    }

    #[test]
    fn legacy_track_bytes() {
        let mut seq = Sequence::new("Hi");
        seq.set_number(SeqNumber::new(5));
        seq.set_length(192);
        seq.set_buss(1);
        seq.set_channel(9);
        seq.set_key(Some(2));
        seq.add_event(Event::channel(0, 0x99, 36, 100));
        seq.add_event(Event::channel(96, 0x89, 36, 0));
        seq.add_trigger(Trigger::new(0, 191, 0));

        let mut out = MidiVector::default();
        TrackFill::new(&seq)
            .options(FillOptions::new().legacy_format(true))
            .fill(&mut out, 1);

        #[rustfmt::skip]
        let expected = [
            0x00, 0xFF, 0x00, 0x02, 0x00, 0x05,
            0x00, 0xFF, 0x03, 0x02, b'H', b'i',
            0x00, 0x99, 36, 100,
            0x60, 0x89, 36, 0,
            0x00, 0xFF, 0x7F, 0x08, 0x24, 0x24, 0x00, 0x08, 0x00, 0x81, 0x3F, 0x00,
            0x00, 0xFF, 0x7F, 0x05, 0x24, 0x24, 0x00, 0x01, 0x01,
            0x00, 0xFF, 0x7F, 0x06, 0x24, 0x24, 0x00, 0x06, 0x04, 0x04,
            0x00, 0xFF, 0x7F, 0x05, 0x24, 0x24, 0x00, 0x02, 0x09,
            0x60, 0xFF, 0x2F, 0x00,
        ];
        assert_eq!(out.as_slice(), expected);
    }

    #[test]
    fn extension_tags() {
        let mut seq = Sequence::default();
        seq.set_key(Some(2));
        seq.set_scale(Some(1));
        seq.set_background(SeqNumber::new(0x0102));
        seq.set_transpose(false);

        let mut out = MidiList::default();
        TrackFill::new(&seq).fill(&mut out, 7);
        let bytes = drain(&mut out);

        #[rustfmt::skip]
        let tail = [
            0x00, 0xFF, 0x7F, 0x05, 0x24, 0x24, 0x00, 0x11, 0x02,
            0x00, 0xFF, 0x7F, 0x05, 0x24, 0x24, 0x00, 0x12, 0x01,
            0x00, 0xFF, 0x7F, 0x08, 0x24, 0x24, 0x00, 0x13, 0x00, 0x00, 0x01, 0x02,
            0x00, 0xFF, 0x7F, 0x05, 0x24, 0x24, 0x00, 0x14, 0x00,
            0x00, 0xFF, 0x2F, 0x00,
        ];
        assert!(bytes.ends_with(&tail));
    }

    #[test]
    fn disabled_background_is_not_written() {
        let mut seq = Sequence::default();
        seq.set_background(SeqNumber::LIMIT);
        let mut out = MidiVector::default();
        TrackFill::new(&seq)
            .options(FillOptions::new().transpose(false))
            .fill(&mut out, 2);
        // only triggers, buss, time signature and channel
        assert_eq!(out.size(), 8 + 9 + 10 + 9 + 4);
    }

    #[test]
    fn unnamed_sequence_keeps_leading_name_events() {
        let mut seq = Sequence::new("");
        seq.add_event(Event::meta(0, META_TRACK_NAME, *b"cue"));
        seq.add_event(Event::meta(0, META_SEQ_NUMBER, [0, 7]));
        let mut out = MidiVector::default();
        TrackFill::new(&seq).fill(&mut out, 1);
        assert_eq!(&out.as_slice()[..4], [0x00, 0xFF, 0x03, 0x00]);

        let parsed = crate::reader::parse_track(&mut out, 1).unwrap();
        assert_eq!(parsed.sequence.events(), seq.events());
        assert_eq!(parsed.sequence.name(), "");
        assert!(parsed.sequence.number().is_null());
    }

    #[test]
    fn tempo_track_header() {
        let mut seq = Sequence::default();
        seq.set_time_signature(TimeSignature::new(3, 8));
        let song = Song {
            bpm: crate::proprietary::Bpm::new(100),
            ..Default::default()
        };
        let mut out = MidiVector::default();
        TrackFill::new(&seq).song(&song).fill(&mut out, TEMPO_TRACK);
        assert_eq!(
            &out.as_slice()[..15],
            [
                0x00, 0xFF, 0x51, 0x03, 0x09, 0x27, 0xC0, 0x00, 0xFF, 0x58, 0x04, 0x03, 0x03,
                0x18, 0x08
            ]
        );
    }

    #[test]
    fn slow_tempo_header() {
        let song = Song {
            bpm: crate::proprietary::Bpm::from_millis(3_000),
            ..Default::default()
        };
        let mut out = MidiVector::default();
        TrackFill::new(&Sequence::default())
            .song(&song)
            .fill(&mut out, TEMPO_TRACK);
        assert_eq!(&out.as_slice()[..7], [0x00, 0xFF, 0x51, 0x03, 0xFF, 0xFF, 0xFF]);

        // the footer still carries the exact tempo
        let parsed = crate::reader::parse_track(&mut out, TEMPO_TRACK).unwrap();
        assert_eq!(parsed.song.unwrap().bpm, song.bpm);
    }

    #[test]
    fn sysex_and_meta_are_length_prefixed() {
        let mut out = MidiVector::default();
        add_event(&mut out, &Event::sysex(0, [0x43, 0x10, 0xF7]), 200);
        add_event(&mut out, &Event::meta(0, 0x01, *b"text"), 0);
        assert_eq!(
            out.as_slice(),
            [
                0x81, 0x48, 0xF0, 0x03, 0x43, 0x10, 0xF7, 0x00, 0xFF, 0x01, 0x04, b't', b'e', b'x',
                b't'
            ]
        );
    }
}
