#![doc = r#"
Proprietary tagged blocks

# Per-track blocks

Every per-track block is a sequencer-specific meta event whose data starts with
the tag:

```text
00 FF 7F <len: variable> <tag: 4 bytes> <payload: len - 4 bytes>
```

The delta-time is always zero, so a player that ignores `FF 7F` keeps the
timing of the surrounding events. A reader that does not know the tag skips
`len - 4` payload bytes and continues.

# Song footer

See [`write_song_footer`] for the blocks written after the tempo track.
"#]

mod tag;
pub use tag::*;

mod song;
pub use song::*;

mod triggers;
pub use triggers::*;

use crate::{
    SeqNumber,
    container::MidiContainer,
    error::ProprietaryError,
    sequence::{META_SEQ_SPEC, Sequence, TimeSignature},
};

/// Write a per-track block wrapped in a zero-delta `FF 7F` event.
pub fn write_track_block<C: MidiContainer>(out: &mut C, tag: ProprietaryTag, payload: &[u8]) {
    out.put(0x00);
    out.put(0xFF);
    out.put(META_SEQ_SPEC);
    out.add_variable(4 + payload.len() as u32);
    out.add_long(tag.value());
    out.add_bytes(payload);
}

/// Apply one per-track block to `seq`.
///
/// Song tags are ignored here; they only mean something in the footer.
pub fn apply_track_block(
    seq: &mut Sequence,
    tag: ProprietaryTag,
    payload: &[u8],
) -> Result<(), ProprietaryError> {
    if let Some(len) = tag.fixed_len() {
        if payload.len() != len && !tag.is_song_tag() {
            return Err(ProprietaryError::MalformedLength {
                tag: tag.value(),
                length: payload.len(),
            });
        }
    }
    match tag {
        ProprietaryTag::Buss => seq.set_buss(payload[0]),
        ProprietaryTag::Channel => seq.set_channel(payload[0]),
        ProprietaryTag::TimeSignature => {
            seq.set_time_signature(TimeSignature::new(payload[0], payload[1]))
        }
        ProprietaryTag::Key => seq.set_key(Some(payload[0])),
        ProprietaryTag::Scale => seq.set_scale(Some(payload[0])),
        ProprietaryTag::Transpose => seq.set_transpose(payload[0] != 0),
        ProprietaryTag::BackSequence => {
            let value = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
            let background = SeqNumber::new(value as i32);
            if !background.is_legal() {
                return Err(ProprietaryError::InvalidValue {
                    tag: tag.value(),
                    value,
                });
            }
            seq.set_background(background);
        }
        ProprietaryTag::TriggersNew => {
            for trigger in decode_triggers(payload)? {
                seq.add_trigger(trigger);
            }
        }
        ProprietaryTag::Triggers => {
            for trigger in decode_legacy_triggers(payload)? {
                seq.add_trigger(trigger);
            }
        }
        ProprietaryTag::MidiClocks
        | ProprietaryTag::Notes
        | ProprietaryTag::Bpm
        | ProprietaryTag::MuteGroups
        | ProprietaryTag::MidiControl => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MidiVector;
    use pretty_assertions::assert_eq;

    #[test]
    fn buss_block_bytes() {
        let mut out = MidiVector::default();
        write_track_block(&mut out, ProprietaryTag::Buss, &[3]);
        assert_eq!(
            out.as_slice(),
            [0x00, 0xFF, 0x7F, 0x05, 0x24, 0x24, 0x00, 0x01, 0x03]
        );
    }

    #[test]
    fn fixed_length_mismatch() {
        let mut seq = Sequence::default();
        assert_eq!(
            apply_track_block(&mut seq, ProprietaryTag::TimeSignature, &[3]),
            Err(ProprietaryError::MalformedLength {
                tag: 0x2424_0006,
                length: 1
            })
        );
        assert_eq!(seq.time_signature(), TimeSignature::default());
    }

    #[test]
    fn background_sequence_out_of_range() {
        let mut seq = Sequence::default();
        let err = apply_track_block(&mut seq, ProprietaryTag::BackSequence, &[0, 0, 0x08, 0x01]);
        assert!(matches!(
            err,
            Err(ProprietaryError::InvalidValue { value: 2049, .. })
        ));
        apply_track_block(&mut seq, ProprietaryTag::BackSequence, &[0, 0, 0x00, 0x05]).unwrap();
        assert_eq!(seq.background(), SeqNumber::new(5));
    }
}
