#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![doc = r#"
Track chunk codec for a loop-based MIDI sequencer.

A [`Sequence`](crate::prelude::Sequence) is written into a
[`MidiContainer`](crate::prelude::MidiContainer) as a standard MIDI track body:

```text
[header events][body events][proprietary blocks][end of track][song footer, track 0 only]
```

The proprietary blocks are sequencer-specific meta events (`FF 7F`) whose data
starts with a 32-bit tag in the `0x2424xxxx` namespace. Ordinary players skip
them; this crate reads them back into buss, channel, key, scale and trigger
data. The tempo track additionally carries the song footer (MIDI control map,
clocks, notes, tempo and mute groups).

# Example
```rust
# use seqtrack::prelude::*;
let mut seq = Sequence::new("bass");
seq.set_number(SeqNumber::new(3));
seq.set_length(768);
seq.add_event(Event::channel(0, 0x90, 36, 100));
seq.add_event(Event::channel(96, 0x80, 36, 0));
seq.add_trigger(Trigger::new(0, 1535, 0));

let mut container = MidiVector::default();
TrackFill::new(&seq).fill(&mut container, 1);

let parsed = parse_track(&mut container, 1).unwrap();
assert_eq!(parsed.sequence.events(), seq.events());
assert_eq!(parsed.sequence.triggers(), seq.triggers());
```
"#]

extern crate alloc;

pub mod container;
pub mod fill;
pub mod proprietary;
pub mod reader;
pub mod sequence;

mod seqnum;
pub use seqnum::*;

mod error;
pub use error::*;

#[doc = r#"
Common re-exports
"#]
pub mod prelude {
    pub use crate::{
        container::*, error::*, fill::*, proprietary::*, reader::*, seqnum::*, sequence::*,
    };
}
