//! Immutable submission text indexed by char offset

/// The submission being reviewed.
///
/// Offsets are counted in `char`s. For non-ASCII text the byte position of
/// every char is precomputed so slicing stays O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseText {
    text: String,
    /// Byte index of each char followed by `text.len()`; `None` for ASCII.
    char_starts: Option<Vec<usize>>,
}

impl BaseText {
    /// Index a submission text
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let char_starts = if text.is_ascii() {
            None
        } else {
            Some(
                text.char_indices()
                    .map(|(i, _)| i)
                    .chain(std::iter::once(text.len()))
                    .collect(),
            )
        };
        Self { text, char_starts }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        match &self.char_starts {
            Some(starts) => starts.len() - 1,
            None => self.text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte index of a char offset, `None` past the end
    pub fn byte_index(&self, offset: usize) -> Option<usize> {
        match &self.char_starts {
            Some(starts) => starts.get(offset).copied(),
            None => (offset <= self.text.len()).then_some(offset),
        }
    }

    /// Substring for the char range `[start, end)`
    pub fn slice(&self, start: usize, end: usize) -> Option<&str> {
        if start > end {
            return None;
        }
        let from = self.byte_index(start)?;
        let to = self.byte_index(end)?;
        Some(&self.text[from..to])
    }
}

impl From<String> for BaseText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for BaseText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Length of `s` in UTF-16 code units
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Convert a UTF-16 offset into `s` to a char offset.
///
/// Returns `None` when the offset is past the end or splits a surrogate pair.
pub fn utf16_to_char_offset(s: &str, units: usize) -> Option<usize> {
    let mut seen = 0;
    for (count, ch) in s.chars().enumerate() {
        if seen == units {
            return Some(count);
        }
        seen += ch.len_utf16();
        if seen > units {
            return None;
        }
    }
    (seen == units).then(|| s.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_indexing() {
        let text = BaseText::new("ABCDE");
        assert_eq!(text.len(), 5);
        assert_eq!(text.slice(1, 3), Some("BC"));
        assert_eq!(text.slice(0, 5), Some("ABCDE"));
        assert_eq!(text.slice(5, 5), Some(""));
        assert_eq!(text.slice(3, 6), None);
        assert_eq!(text.slice(3, 2), None);
    }

    #[test]
    fn test_multibyte_indexing() {
        let text = BaseText::new("redação é ótima");
        assert_eq!(text.len(), 15);
        assert_eq!(text.slice(0, 7), Some("redação"));
        assert_eq!(text.slice(8, 9), Some("é"));
        assert_eq!(text.slice(10, 15), Some("ótima"));
        assert_eq!(text.byte_index(15), Some(text.as_str().len()));
        assert_eq!(text.byte_index(16), None);
    }

    #[test]
    fn test_empty_text() {
        let text = BaseText::new("");
        assert!(text.is_empty());
        assert_eq!(text.len(), 0);
        assert_eq!(text.slice(0, 0), Some(""));
    }

    #[test]
    fn test_utf16_offsets() {
        // '😀' is two UTF-16 units and one char
        let s = "a😀b";
        assert_eq!(utf16_len(s), 4);
        assert_eq!(utf16_to_char_offset(s, 0), Some(0));
        assert_eq!(utf16_to_char_offset(s, 1), Some(1));
        assert_eq!(utf16_to_char_offset(s, 2), None);
        assert_eq!(utf16_to_char_offset(s, 3), Some(2));
        assert_eq!(utf16_to_char_offset(s, 4), Some(3));
        assert_eq!(utf16_to_char_offset(s, 5), None);
        assert_eq!(utf16_to_char_offset("", 0), Some(0));
    }

    #[test]
    fn test_utf16_range_maps_to_char_range() {
        // A JS substring(7, 15) over this text is "escrever"
        let base = BaseText::new("Vou 😀 escrever");
        let start = utf16_to_char_offset(base.as_str(), 7).unwrap();
        let end = utf16_to_char_offset(base.as_str(), 15).unwrap();
        assert_eq!((start, end), (6, 14));
        assert_eq!(base.slice(start, end), Some("escrever"));
    }
}
