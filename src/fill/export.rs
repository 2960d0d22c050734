use super::{TrackFill, add_event, fill_meta_track_end};
use crate::{container::MidiContainer, sequence::Trigger};

impl TrackFill<'_> {
    #[doc = r#"
Append a flattened copy of the song performance for `track` to `out`.

Every trigger is unrolled into plain events: the pattern repeats across the
trigger span, shifted by the trigger offset, and events past the end of the
span are dropped. The exported track then carries a single trigger from tick
0 to the end of the last trigger, so it plays once from the start of the song.

A sequence of length zero exports no events.
"#]
    pub fn fill_song_export<C: MidiContainer>(&self, out: &mut C, track: u16) {
        let seq = self.sequence;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            track,
            name = seq.name(),
            triggers = seq.triggers().len(),
            "exporting song track"
        );

        self.fill_header(out, track);

        let mut prev_timestamp = 0;
        for trigger in seq.triggers() {
            prev_timestamp = self.song_fill_seq_event(out, trigger, prev_timestamp);
        }

        let song_end = seq.triggers().last().map(Trigger::end);
        let triggers = song_end.map(|end| Trigger::new(0, end, 0));
        self.fill_triggers(out, triggers.as_slice());
        self.fill_proprietary(out);
        fill_meta_track_end(
            out,
            song_end.unwrap_or(0).saturating_sub(prev_timestamp),
        );
        self.fill_song_footer(out, track);
    }

    /// Writes the events one trigger plays and returns the last timestamp written.
    fn song_fill_seq_event<C: MidiContainer>(
        &self,
        out: &mut C,
        trigger: &Trigger,
        prev_timestamp: u32,
    ) -> u32 {
        let seq = self.sequence;
        let len = seq.length() as i64;
        if len == 0 {
            return prev_timestamp;
        }
        let start = trigger.start() as i64;
        let end = trigger.end() as i64;
        let trigger_offset = trigger.offset() as i64 % len;
        let start_offset = start % len;

        let mut adjust = start - start_offset + trigger_offset;
        let mut times_played = 1 + (end - start) / len;
        if trigger_offset > start_offset {
            adjust -= len;
            times_played += 1;
        }

        let mut prev = prev_timestamp as i64;
        for _ in 0..times_played {
            for event in seq.events() {
                let timestamp = event.timestamp() as i64 + adjust;
                if timestamp < start {
                    continue;
                }
                if timestamp > end {
                    break;
                }
                add_event(out, event, (timestamp - prev).max(0) as u32);
                prev = timestamp;
            }
            adjust += len;
        }
        prev as u32
    }
}
