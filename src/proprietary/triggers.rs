use crate::{container::*, error::ProprietaryError, sequence::Trigger};
use alloc::vec::Vec;

#[doc = r#"
Encode triggers as the payload of [`ProprietaryTag::TriggersNew`](super::ProprietaryTag::TriggersNew).

Each trigger is three variable-length quantities: start, end and offset. There
is no count; the enclosing block's length delimits the list.
"#]
pub fn encode_triggers<C: MidiContainer>(out: &mut C, triggers: &[Trigger]) {
    for trigger in triggers {
        out.add_variable(trigger.start());
        out.add_variable(trigger.end());
        out.add_variable(trigger.offset());
    }
}

/// Decode a [`TriggersNew`](super::ProprietaryTag::TriggersNew) payload.
///
/// Fails if the bytes do not split into whole `(start, end, offset)` records.
pub fn decode_triggers(payload: &[u8]) -> Result<Vec<Trigger>, ProprietaryError> {
    let partial = ProprietaryError::PartialTrigger {
        length: payload.len(),
    };
    let mut reader = MidiVector::from(payload.to_vec());
    let mut triggers = Vec::new();
    while !reader.done() {
        let mut field = || reader.read_variable().map_err(|_| partial);
        let (start, end, offset) = (field()?, field()?, field()?);
        triggers.push(Trigger::new(start, end, offset));
    }
    Ok(triggers)
}

/// Decode a legacy [`Triggers`](super::ProprietaryTag::Triggers) payload:
/// 32-bit start and end pairs with no offset.
pub fn decode_legacy_triggers(payload: &[u8]) -> Result<Vec<Trigger>, ProprietaryError> {
    if payload.len() % 8 != 0 {
        return Err(ProprietaryError::PartialTrigger {
            length: payload.len(),
        });
    }
    Ok(payload
        .chunks_exact(8)
        .map(|pair| {
            let start = u32::from_be_bytes([pair[0], pair[1], pair[2], pair[3]]);
            let end = u32::from_be_bytes([pair[4], pair[5], pair[6], pair[7]]);
            Trigger::new(start, end, 0)
        })
        .collect())
}
