#[doc = r#"
One playback span of a sequence in the song arrangement.

The span runs from `start` to `end`, both inclusive. `offset` shifts the
pattern inside the span, so playback begins `offset` ticks into the sequence.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trigger {
    start: u32,
    end: u32,
    offset: u32,
}

impl Trigger {
    /// Create a trigger
    pub const fn new(start: u32, end: u32, offset: u32) -> Self {
        Self { start, end, offset }
    }
    /// First tick of the span
    pub const fn start(&self) -> u32 {
        self.start
    }
    /// Last tick of the span
    pub const fn end(&self) -> u32 {
        self.end
    }
    /// Pattern offset
    pub const fn offset(&self) -> u32 {
        self.offset
    }
}
