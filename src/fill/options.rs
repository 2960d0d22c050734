#[doc = r#"
Settings for [`TrackFill`](super::TrackFill)

```rust
# use seqtrack::prelude::*;
let options = FillOptions::new().legacy_format(true);
assert!(options.is_legacy_format());
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FillOptions {
    legacy_format: bool,
    transpose: bool,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl FillOptions {
    /// Write every extension tag
    pub const fn new() -> Self {
        Self {
            legacy_format: false,
            transpose: true,
        }
    }

    /// Skip the key, scale, background sequence and transpose tags, which
    /// older readers do not know.
    pub const fn legacy_format(mut self, legacy_format: bool) -> Self {
        self.legacy_format = legacy_format;
        self
    }

    /// Write the transpose tag
    pub const fn transpose(mut self, transpose: bool) -> Self {
        self.transpose = transpose;
        self
    }

    /// See [`FillOptions::legacy_format`]
    pub const fn is_legacy_format(&self) -> bool {
        self.legacy_format
    }

    /// True if the transpose tag gets written
    pub const fn writes_transpose(&self) -> bool {
        self.transpose && !self.legacy_format
    }
}
