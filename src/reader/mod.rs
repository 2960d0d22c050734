#![doc = r#"
Decoding a filled container back into a [`Sequence`]

[`parse_track`] walks a container through the same `get` contract the file
writer uses. Two classes of failure exist:

- [`ReaderError`] stops the track. A container that runs dry before the
  end-of-track event reports [`ReaderErrorKind::OutOfBounds`] (a truncated
  file); a byte that cannot start an event reports a [`ParseError`](crate::ParseError).
- [`ProprietaryError`] is confined to one proprietary block. Its bytes have
  already been consumed, so decoding continues and the error lands in
  [`ParsedTrack::warnings`].

Proprietary blocks with an unknown low word are skipped silently.
"#]

mod error;
pub use error::*;

use crate::{
    ParseError, ProprietaryError, SeqNumber,
    container::MidiContainer,
    fill::TEMPO_TRACK,
    proprietary::*,
    sequence::*,
};
use alloc::vec::Vec;

/// The result of [`parse_track`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTrack {
    /// The decoded sequence
    pub sequence: Sequence,
    /// Song-wide state. Only the tempo track has one.
    pub song: Option<Song>,
    /// Proprietary blocks that could not be applied
    pub warnings: Vec<ProprietaryError>,
}

#[doc = r#"
Decode the track body held in `container`.

The read position is rewound first. `track` decides whether tempo and time
signature header events and the song footer are expected.
"#]
pub fn parse_track<C: MidiContainer>(container: &mut C, track: u16) -> ReadResult<ParsedTrack> {
    container.position_reset();
    let reader = TrackReader {
        container,
        tempo_track: track == TEMPO_TRACK,
        sequence: Sequence::default(),
        song: (track == TEMPO_TRACK).then(Song::default),
        warnings: Vec::new(),
        running_status: None,
        timestamp: 0,
        header: HeaderState::default(),
    };
    #[cfg(feature = "tracing")]
    tracing::debug!(track, size = reader.container.size(), "parsing track");
    reader.read()
}

/// Header meta events already claimed by the sequence or song.
///
/// The header is `[number] [name] [tempo time_signature]` at tick 0, in that
/// order. An event is claimed only in its own slot and at most once; anything
/// else is kept as an ordinary event.
#[derive(Default)]
struct HeaderState {
    closed: bool,
    number: bool,
    name: bool,
    tempo: bool,
    time_signature: bool,
}

impl HeaderState {
    fn takes_number(&self) -> bool {
        !self.closed && !(self.number || self.name || self.tempo || self.time_signature)
    }

    fn takes_name(&self) -> bool {
        !self.closed && !(self.name || self.tempo || self.time_signature)
    }

    fn takes_tempo(&self) -> bool {
        !self.closed && !self.tempo
    }

    fn takes_time_signature(&self) -> bool {
        !self.closed && !self.time_signature
    }
}

struct TrackReader<'c, C> {
    container: &'c mut C,
    tempo_track: bool,
    sequence: Sequence,
    song: Option<Song>,
    warnings: Vec<ProprietaryError>,
    running_status: Option<u8>,
    timestamp: u32,
    header: HeaderState,
}

impl<C: MidiContainer> TrackReader<'_, C> {
    fn read(mut self) -> ReadResult<ParsedTrack> {
        loop {
            let delta = self.container.read_variable()?;
            self.timestamp = self.timestamp.saturating_add(delta);
            if self.timestamp > 0 {
                self.header.closed = true;
            }
            let status = self.container.get()?;
            match status {
                0x00..=0x7F => {
                    let Some(running) = self.running_status else {
                        return Err(self.error(ParseError::NoRunningStatus(status)));
                    };
                    self.read_channel(running, Some(status))?;
                }
                0x80..=0xEF => {
                    self.running_status = Some(status);
                    self.read_channel(status, None)?;
                }
                0xF0 | 0xF7 => {
                    self.running_status = None;
                    let len = self.container.read_variable()? as usize;
                    let data = self.container.read_bytes(len)?;
                    self.push(Event::new(self.timestamp, EventKind::SysEx { status, data }));
                }
                0xFF => {
                    self.running_status = None;
                    if self.read_meta()? {
                        break;
                    }
                }
                _ => return Err(self.error(ParseError::InvalidStatus(status))),
            }
        }
        if self.tempo_track {
            self.read_song_footer()?;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            events = self.sequence.events().len(),
            triggers = self.sequence.triggers().len(),
            warnings = self.warnings.len(),
            "parsed track"
        );
        Ok(ParsedTrack {
            sequence: self.sequence,
            song: self.song,
            warnings: self.warnings,
        })
    }

    fn error(&self, error: ParseError) -> ReaderError {
        ReaderError::parse_error(self.container.position(), error)
    }

    fn push(&mut self, event: Event) {
        self.header.closed = true;
        self.sequence.add_event(event);
    }

    fn read_channel(&mut self, status: u8, first: Option<u8>) -> ReadResult<()> {
        let mut data = [0; 2];
        for (i, byte) in data.iter_mut().take(channel_data_len(status)).enumerate() {
            *byte = match (i, first) {
                (0, Some(first)) => first,
                _ => self.container.get()?,
            };
        }
        self.push(Event::new(
            self.timestamp,
            EventKind::Channel { status, data },
        ));
        Ok(())
    }

    /// Returns true at the end of the track.
    fn read_meta(&mut self) -> ReadResult<bool> {
        let kind = self.container.get()?;
        let len = self.container.read_variable()? as usize;
        let data = self.container.read_bytes(len)?;
        match kind {
            META_END_OF_TRACK => {
                self.sequence.set_length(self.timestamp);
                return Ok(true);
            }
            META_SEQ_SPEC if len >= 4 && is_proptag(read_tag(&data)) => {
                self.apply_track_block(read_tag(&data), &data[4..]);
            }
            META_SEQ_NUMBER if self.header.takes_number() && len == 2 => {
                self.header.number = true;
                let number = u16::from_be_bytes([data[0], data[1]]);
                self.sequence.set_number(SeqNumber::from(number));
            }
            META_TRACK_NAME if self.header.takes_name() => {
                self.header.name = true;
                self.sequence
                    .set_name(alloc::string::String::from_utf8_lossy(&data).into_owned());
            }
            META_TEMPO if self.tempo_track && self.header.takes_tempo() && len == 3 => {
                self.header.tempo = true;
                let micros = u32::from_be_bytes([0, data[0], data[1], data[2]]);
                if let Some(song) = &mut self.song {
                    song.bpm = Bpm::from_micros_per_quarter_note(micros);
                }
            }
            META_TIME_SIGNATURE
                if self.tempo_track && self.header.takes_time_signature() && len == 4 =>
            {
                self.header.time_signature = true;
                let width = 1u8.checked_shl(data[1] as u32).unwrap_or(0);
                self.sequence
                    .set_time_signature(TimeSignature::new(data[0], width));
            }
            _ => self.push(Event::new(self.timestamp, EventKind::Meta { kind, data })),
        }
        Ok(false)
    }

    fn apply_track_block(&mut self, tag: u32, payload: &[u8]) {
        match ProprietaryTag::try_from(tag) {
            Ok(tag) => {
                if let Err(e) = apply_track_block(&mut self.sequence, tag, payload) {
                    self.warn(e);
                }
            }
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(tag, len = payload.len(), "skipping unknown track tag");
            }
        }
    }

    fn read_song_footer(&mut self) -> ReadResult<()> {
        while !self.container.done() {
            let tag = self.container.read_long()?;
            if !is_proptag(tag) {
                self.warn(ProprietaryError::NotProprietary(tag));
                return Ok(());
            }
            let len = self.container.read_long()? as usize;
            let payload = self.container.read_bytes(len)?;
            let Ok(tag) = ProprietaryTag::try_from(tag) else {
                #[cfg(feature = "tracing")]
                tracing::trace!(tag, len, "skipping unknown song tag");
                continue;
            };
            let applied = match &mut self.song {
                Some(song) => apply_song_block(song, tag, &payload),
                None => Ok(()),
            };
            if let Err(e) = applied {
                self.warn(e);
            }
        }
        Ok(())
    }

    fn warn(&mut self, error: ProprietaryError) {
        #[cfg(feature = "tracing")]
        tracing::warn!(position = self.container.position(), "{error}");
        self.warnings.push(error);
    }
}

fn read_tag(data: &[u8]) -> u32 {
    u32::from_be_bytes([data[0], data[1], data[2], data[3]])
}
