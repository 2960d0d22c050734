use thiserror::Error;

#[doc = r#"
Errors that stop decoding of the current track.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A status byte that cannot start an event inside a track chunk
    #[error("Invalid status byte {0:#04X}")]
    InvalidStatus(u8),
    /// A data byte appeared before any status byte could be repeated
    #[error("Data byte {0:#04X} without a running status")]
    NoRunningStatus(u8),
    /// A variable-length quantity spanning more than four bytes
    #[error("Variable-length quantity is longer than four bytes")]
    VariableLength,
}

#[doc = r#"
Errors confined to a single proprietary block.

These never stop decoding. The block's declared length has already been
consumed when one of these is reported, so the decoder continues with the next
event or footer block.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProprietaryError {
    /// The payload length does not match the fixed shape of the tag
    #[error("Tag {tag:#010X} has a malformed length of {length}")]
    MalformedLength {
        /// The tag of the block
        tag: u32,
        /// The declared payload length
        length: usize,
    },
    /// The trigger payload does not split into whole trigger records
    #[error("Trigger payload of {length} bytes does not hold whole triggers")]
    PartialTrigger {
        /// The declared payload length
        length: usize,
    },
    /// A payload byte outside the range of its field
    #[error("Tag {tag:#010X} holds an invalid value {value}")]
    InvalidValue {
        /// The tag of the block
        tag: u32,
        /// The offending value
        value: u32,
    },
    /// Footer data that does not start with a proprietary tag
    #[error("Expected a proprietary tag in the song footer, found {0:#010X}")]
    NotProprietary(u32),
}
