use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The high word every proprietary tag carries
pub const PROPTAG_HIGHWORD: u32 = 0x2424_0000;

/// True if `value` lies in the proprietary tag namespace, known or not.
pub const fn is_proptag(value: u32) -> bool {
    value & 0xFFFF_0000 == PROPTAG_HIGHWORD
}

#[doc = r#"
The proprietary tags this crate reads and writes.

Tags are written as 32-bit big endian values. Any value with the
[`PROPTAG_HIGHWORD`] but a low word missing from this table is skipped by
its declared length when decoding.

Per-track tags travel inside `FF 7F` sequencer-specific events:
[`Buss`](Self::Buss), [`Channel`](Self::Channel),
[`TimeSignature`](Self::TimeSignature), [`Triggers`](Self::Triggers),
[`TriggersNew`](Self::TriggersNew), [`Key`](Self::Key),
[`Scale`](Self::Scale), [`BackSequence`](Self::BackSequence) and
[`Transpose`](Self::Transpose).

The song footer after the tempo track's end of track holds
[`MidiControl`](Self::MidiControl), [`MidiClocks`](Self::MidiClocks),
[`Notes`](Self::Notes), [`Bpm`](Self::Bpm) and
[`MuteGroups`](Self::MuteGroups).
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum ProprietaryTag {
    /// Track buss number
    Buss = 0x2424_0001,
    /// Track channel number
    Channel = 0x2424_0002,
    /// Song clock mode per buss
    MidiClocks = 0x2424_0003,
    /// Trigger pairs without offsets. Read only.
    Triggers = 0x2424_0004,
    /// Song notes
    Notes = 0x2424_0005,
    /// Track time signature
    TimeSignature = 0x2424_0006,
    /// Song beats per minute
    Bpm = 0x2424_0007,
    /// Track triggers with offsets
    TriggersNew = 0x2424_0008,
    /// Song mute groups
    MuteGroups = 0x2424_0009,
    /// Song MIDI control bindings
    MidiControl = 0x2424_0010,
    /// Track musical key
    Key = 0x2424_0011,
    /// Track musical scale
    Scale = 0x2424_0012,
    /// Track background sequence
    BackSequence = 0x2424_0013,
    /// Track transpose flag
    Transpose = 0x2424_0014,
}

impl ProprietaryTag {
    /// The raw tag
    pub fn value(self) -> u32 {
        self.into()
    }

    /// True for the tags that belong in the song footer
    pub const fn is_song_tag(self) -> bool {
        matches!(
            self,
            Self::MidiControl | Self::MidiClocks | Self::Notes | Self::Bpm | Self::MuteGroups
        )
    }

    /// The fixed payload size of a per-track tag, if it has one
    pub const fn fixed_len(self) -> Option<usize> {
        match self {
            Self::Buss | Self::Channel | Self::Key | Self::Scale | Self::Transpose => Some(1),
            Self::TimeSignature => Some(2),
            Self::BackSequence | Self::Bpm => Some(4),
            _ => None,
        }
    }
}

#[test]
fn tag_namespace() {
    assert!(is_proptag(0x2424_0008));
    assert!(is_proptag(0x2424_7777));
    assert!(!is_proptag(0x2425_0008));
    assert!(!is_proptag(0x0024_2400));

    assert_eq!(
        ProprietaryTag::try_from(0x2424_0008u32).ok(),
        Some(ProprietaryTag::TriggersNew)
    );
    assert!(ProprietaryTag::try_from(0x2424_7777u32).is_err());
    assert_eq!(ProprietaryTag::MidiControl.value(), 0x2424_0010);
    assert!(ProprietaryTag::Bpm.is_song_tag());
    assert!(!ProprietaryTag::Key.is_song_tag());
}
