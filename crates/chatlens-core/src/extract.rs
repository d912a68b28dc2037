//! Tag-length text recovery from binary blobs.
//!
//! Binary blobs are protobuf-like, but there is no schema for them. Instead of
//! decoding, the scanner walks the bytes left to right looking for a tag
//! marker (`0x0A` or `0x12`) followed by a single length byte, and tries the
//! next `length` bytes as UTF-8. Anything else advances the cursor by one
//! byte, so the scan resynchronizes after noise.
//!
//! Lengths are single bytes (0–255). Longer fields encoded as multi-byte
//! varints are not followed; their payload is scanned as ordinary bytes.

use crate::domain::{Blob, BlobId, FieldTag, TextFragment};

/// Outcome of one scan step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStep {
    Fragment(TextFragment),
    Skip,
}

/// Lazy iterator over the text fragments of a byte sequence.
///
/// Restarting means calling [`extract_text`] again on the same bytes; the
/// scan is pure, so it yields the same fragments.
#[derive(Debug, Clone)]
pub struct TextFragments<'a> {
    data: &'a [u8],
    cursor: usize,
    blob_id: Option<BlobId>,
}

impl<'a> TextFragments<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            cursor: 0,
            blob_id: None,
        }
    }

    /// Stamp every yielded fragment with `blob_id`.
    pub fn with_blob_id(mut self, blob_id: BlobId) -> Self {
        self.blob_id = Some(blob_id);
        self
    }

    /// Advance the cursor by one step. `None` once the input is exhausted.
    fn step(&mut self) -> Option<ScanStep> {
        let start = self.cursor;
        let marker = *self.data.get(start)?;

        let tag = match FieldTag::from_marker(marker) {
            Some(tag) if start + 1 < self.data.len() => tag,
            _ => {
                self.cursor += 1;
                return Some(ScanStep::Skip);
            }
        };

        let len = self.data[start + 1] as usize;
        let body = start + 2;
        self.cursor = body;
        if len == 0 || body + len > self.data.len() {
            return Some(ScanStep::Skip);
        }
        self.cursor = body + len;

        let Ok(text) = std::str::from_utf8(&self.data[body..body + len]) else {
            return Some(ScanStep::Skip);
        };
        let trimmed = trim_segment(text);
        if !tag.accepts(trimmed) {
            return Some(ScanStep::Skip);
        }

        Some(ScanStep::Fragment(TextFragment {
            blob_id: self.blob_id.clone(),
            offset: start,
            tag,
            text: trimmed.to_string(),
        }))
    }
}

/// Trim whitespace plus the ASCII separators `0x1C..=0x1F`.
///
/// Nested fields put a length byte right after the inner marker; lengths
/// 28 to 31 are those separators and must not survive as leading noise.
fn trim_segment(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || ('\x1c'..='\x1f').contains(&c))
}

impl Iterator for TextFragments<'_> {
    type Item = TextFragment;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.step()? {
                ScanStep::Fragment(fragment) => return Some(fragment),
                ScanStep::Skip => continue,
            }
        }
    }
}

impl std::iter::FusedIterator for TextFragments<'_> {}

/// Scan `data` for length-delimited text. Never fails.
pub fn extract_text(data: &[u8]) -> TextFragments<'_> {
    TextFragments::new(data)
}

/// Scan a blob, attributing every fragment to its id.
pub fn extract_blob_text(blob: &Blob) -> TextFragments<'_> {
    TextFragments::new(&blob.data).with_blob_id(blob.id.clone())
}
