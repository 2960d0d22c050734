use alloc::vec::Vec;

/// Meta event type for a sequence number
pub const META_SEQ_NUMBER: u8 = 0x00;
/// Meta event type for a track name
pub const META_TRACK_NAME: u8 = 0x03;
/// Meta event type for end of track
pub const META_END_OF_TRACK: u8 = 0x2F;
/// Meta event type for set tempo
pub const META_TEMPO: u8 = 0x51;
/// Meta event type for a time signature
pub const META_TIME_SIGNATURE: u8 = 0x58;
/// Meta event type for sequencer-specific data
pub const META_SEQ_SPEC: u8 = 0x7F;

#[doc = r#"
The payload of an [`Event`].

Channel events keep their full status byte, channel nibble included. Meta and
system exclusive events are written with a variable-length size before their data.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// A channel voice or mode message, `0x80..=0xEF`
    Channel {
        /// Status byte
        status: u8,
        /// Data bytes. Program change and channel pressure only use the first.
        data: [u8; 2],
    },
    /// A meta event, `FF <kind> <len> <data>`
    Meta {
        /// The meta type byte
        kind: u8,
        /// The meta data
        data: Vec<u8>,
    },
    /// A system exclusive event, `F0` or `F7`
    SysEx {
        /// `0xF0` or `0xF7`
        status: u8,
        /// The bytes after the length
        data: Vec<u8>,
    },
}

/// Number of data bytes that follow a channel status byte.
pub const fn channel_data_len(status: u8) -> usize {
    match status & 0xF0 {
        0xC0 | 0xD0 => 1,
        _ => 2,
    }
}

#[doc = r#"
A timestamped event of a [`Sequence`](super::Sequence)
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    timestamp: u32,
    kind: EventKind,
}

impl Event {
    /// Create an event from a timestamp and a payload
    pub const fn new(timestamp: u32, kind: EventKind) -> Self {
        Self { timestamp, kind }
    }

    /// A channel message.
    ///
    /// `d1` is ignored by messages carrying a single data byte.
    pub const fn channel(timestamp: u32, status: u8, d0: u8, d1: u8) -> Self {
        let d1 = if channel_data_len(status) == 1 { 0 } else { d1 };
        Self::new(
            timestamp,
            EventKind::Channel {
                status,
                data: [d0 & 0x7F, d1 & 0x7F],
            },
        )
    }

    /// A meta event
    pub fn meta(timestamp: u32, kind: u8, data: impl Into<Vec<u8>>) -> Self {
        Self::new(
            timestamp,
            EventKind::Meta {
                kind,
                data: data.into(),
            },
        )
    }

    /// A system exclusive event starting with `F0`
    pub fn sysex(timestamp: u32, data: impl Into<Vec<u8>>) -> Self {
        Self::new(
            timestamp,
            EventKind::SysEx {
                status: 0xF0,
                data: data.into(),
            },
        )
    }

    /// Absolute tick of the event
    pub const fn timestamp(&self) -> u32 {
        self.timestamp
    }

    /// The payload
    pub const fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// The status byte. Meta events report `0xFF`.
    pub const fn status(&self) -> u8 {
        match &self.kind {
            EventKind::Channel { status, .. } | EventKind::SysEx { status, .. } => *status,
            EventKind::Meta { .. } => 0xFF,
        }
    }

    /// True for meta and system exclusive events
    pub const fn is_length_prefixed(&self) -> bool {
        !matches!(self.kind, EventKind::Channel { .. })
    }
}

#[test]
fn single_data_byte_messages() {
    let program = Event::channel(0, 0xC3, 12, 99);
    assert_eq!(
        program.kind(),
        &EventKind::Channel {
            status: 0xC3,
            data: [12, 0]
        }
    );
    assert!(!program.is_length_prefixed());
    assert_eq!(channel_data_len(0xE0), 2);
    assert!(Event::sysex(0, [0x7E, 0xF7]).is_length_prefixed());
}
