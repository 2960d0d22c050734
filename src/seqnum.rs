use core::fmt;

#[doc = r#"
The number of a sequence (pattern) in a song.

Numbers `0..2048` address a pattern. [`SeqNumber::LIMIT`] (2048) is still a
*legal* value: it marks a disabled background sequence. [`SeqNumber::NULL`]
means the number has not been assigned yet and is never written to a file.

| value  | legal | valid | disabled | null |
|--------|-------|-------|----------|------|
| 0      | yes   | yes   | no       | no   |
| 2048   | yes   | no    | yes      | no   |
| 2049   | no    | no    | no       | no   |
| `NULL` | no    | no    | no       | yes  |
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeqNumber(i32);

impl SeqNumber {
    /// The first number past the last addressable pattern.
    pub const LIMIT: Self = Self(0x0800);
    /// Number not yet assigned.
    pub const NULL: Self = Self(-1);

    /// Wrap a raw sequence number
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw number
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// `0..=2048`
    pub const fn is_legal(&self) -> bool {
        self.0 >= 0 && self.0 <= Self::LIMIT.0
    }

    /// `0..2048`
    pub const fn is_valid(&self) -> bool {
        self.0 >= 0 && self.0 < Self::LIMIT.0
    }

    /// Equal to [`SeqNumber::LIMIT`]
    pub const fn is_disabled(&self) -> bool {
        self.0 == Self::LIMIT.0
    }

    /// Equal to [`SeqNumber::NULL`]
    pub const fn is_null(&self) -> bool {
        self.0 == Self::NULL.0
    }

    /// Replace an unassigned number with the disabled one, making it safe to write.
    pub const fn or_disabled(self) -> Self {
        if self.is_null() { Self::LIMIT } else { self }
    }
}

impl Default for SeqNumber {
    fn default() -> Self {
        Self::NULL
    }
}

impl From<u16> for SeqNumber {
    fn from(value: u16) -> Self {
        Self(value as i32)
    }
}

impl fmt::Display for SeqNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[test]
fn sequence_number_predicates() {
    let zero = SeqNumber::new(0);
    assert!(zero.is_legal() && zero.is_valid());
    assert!(!zero.is_disabled() && !zero.is_null());

    let limit = SeqNumber::new(2048);
    assert!(limit.is_legal() && limit.is_disabled());
    assert!(!limit.is_valid());

    let past = SeqNumber::new(2049);
    assert!(!past.is_legal() && !past.is_valid() && !past.is_disabled());

    let null = SeqNumber::NULL;
    assert!(null.is_null());
    assert!(!null.is_legal() && !null.is_valid() && !null.is_disabled());
    assert_eq!(null.or_disabled(), SeqNumber::LIMIT);
    assert_eq!(SeqNumber::new(7).or_disabled(), SeqNumber::new(7));
}
