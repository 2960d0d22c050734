use crate::ParseError;
use thiserror::Error;

#[doc = r#"
An error that stops decoding of the current track.

`position` counts the bytes already drained from the container when the
error was detected.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Track byte {position}: {kind}")]
pub struct ReaderError {
    position: usize,
    kind: ReaderErrorKind,
}

/// Why a track could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReaderErrorKind {
    /// A byte that cannot appear where it was found
    #[error("{0}")]
    ParseError(#[from] ParseError),
    /// The container ran dry before the end of track or inside the song footer.
    #[error("Track is truncated")]
    OutOfBounds,
}

impl ReaderError {
    /// A malformed byte at `position`
    pub const fn parse_error(position: usize, error: ParseError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::ParseError(error),
        }
    }

    /// A read past the last byte, `position` being the container size
    pub const fn oob(position: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::OutOfBounds,
        }
    }

    /// True if the track is truncated
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::OutOfBounds)
    }

    /// The malformed-byte error, if that is what stopped decoding
    pub const fn parse(&self) -> Option<ParseError> {
        match self.kind {
            ReaderErrorKind::ParseError(error) => Some(error),
            ReaderErrorKind::OutOfBounds => None,
        }
    }

    /// Why decoding stopped
    pub const fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Bytes drained before the error
    pub const fn position(&self) -> usize {
        self.position
    }
}

/// The result of every container read
pub type ReadResult<T> = Result<T, ReaderError>;
