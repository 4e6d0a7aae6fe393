//! Forward-only character scanner over a byte stream
//!
//! The scanner never rewinds: every primitive consumes the characters it
//! examines, including the delimiter that stops it. Callers must structure
//! their grammar as a single forward pass.

use std::io::{self, BufReader, Bytes, Read};

/// Character used as the line boundary for delimited reads
pub const LINE_BOUNDARY: char = '\n';

/// Lazy sequence of characters decoded from a UTF-8 byte stream
///
/// Finite and not restartable: once `None` is returned the sequence stays
/// exhausted. Invalid byte sequences decode to U+FFFD.
pub struct Chars<R: Read> {
    bytes: Bytes<BufReader<R>>,
    /// A byte read while decoding a multi-byte sequence that did not belong to it
    pending: Option<u8>,
    exhausted: bool,
}

impl<R: Read> Chars<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: BufReader::new(reader).bytes(),
            pending: None,
            exhausted: false,
        }
    }

    /// Returns true once the underlying stream has reported end of input
    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.pending.is_none()
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.pending.take() {
            return Ok(Some(b));
        }
        if self.exhausted {
            return Ok(None);
        }
        match self.bytes.next() {
            Some(Ok(b)) => Ok(Some(b)),
            Some(Err(e)) => {
                self.exhausted = true;
                Err(e)
            }
            None => {
                self.exhausted = true;
                Ok(None)
            }
        }
    }

    fn decode_next(&mut self) -> io::Result<Option<char>> {
        let lead = match self.next_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };

        let width = utf8_width(lead);
        if width == 1 {
            return Ok(Some(lead as char));
        }
        if width == 0 {
            return Ok(Some(char::REPLACEMENT_CHARACTER));
        }

        let mut buf = [lead, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            match self.next_byte()? {
                Some(b) if b & 0xC0 == 0x80 => *slot = b,
                Some(b) => {
                    self.pending = Some(b);
                    return Ok(Some(char::REPLACEMENT_CHARACTER));
                }
                None => return Ok(Some(char::REPLACEMENT_CHARACTER)),
            }
        }

        Ok(Some(
            std::str::from_utf8(&buf[..width])
                .ok()
                .and_then(|s| s.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER),
        ))
    }
}

impl<R: Read> Iterator for Chars<R> {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        self.decode_next().transpose()
    }
}

/// Length of the UTF-8 sequence introduced by `lead`, or 0 if `lead` cannot start one
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn eq_fold(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Low-level consume-until primitives used by the tag interpreter
pub struct StreamScanner<R: Read> {
    chars: Chars<R>,
}

impl<R: Read> StreamScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            chars: Chars::new(reader),
        }
    }

    /// Returns true once the stream has no more characters to give
    pub fn is_exhausted(&self) -> bool {
        self.chars.is_exhausted()
    }

    fn next_char(&mut self) -> io::Result<Option<char>> {
        self.chars.next().transpose()
    }

    /// Consumes characters until `target_a` or `target_b` is seen (case-insensitive)
    ///
    /// Returns true if `target_a` matched first, false if `target_b` matched
    /// first or the stream ended.
    pub fn read_until(&mut self, target_a: char, target_b: char) -> io::Result<bool> {
        while let Some(c) = self.next_char()? {
            if eq_fold(c, target_a) {
                return Ok(true);
            }
            if eq_fold(c, target_b) {
                return Ok(false);
            }
        }
        Ok(false)
    }

    /// Consumes whitespace and returns the first non-whitespace character
    ///
    /// The returned character is consumed too. `None` means the stream ended.
    pub fn skip_space(&mut self) -> io::Result<Option<char>> {
        while let Some(c) = self.next_char()? {
            if !c.is_whitespace() {
                return Ok(Some(c));
            }
        }
        Ok(None)
    }

    /// Reads text up to `delim_a` or `delim_b` (case-insensitive), excluding the delimiter
    ///
    /// Returns `None` if the stream ends before either delimiter.
    pub fn read_string(&mut self, delim_a: char, delim_b: char) -> io::Result<Option<String>> {
        let mut text = String::new();
        while let Some(c) = self.next_char()? {
            if eq_fold(c, delim_a) || eq_fold(c, delim_b) {
                return Ok(Some(text));
            }
            text.push(c);
        }
        Ok(None)
    }

    /// Reads text up to the first character satisfying `is_end`
    ///
    /// Returns the text and the terminating character, which is consumed.
    /// The terminator is `None` when the stream ended first.
    pub fn read_token<F>(&mut self, is_end: F) -> io::Result<(String, Option<char>)>
    where
        F: Fn(char) -> bool,
    {
        let mut text = String::new();
        while let Some(c) = self.next_char()? {
            if is_end(c) {
                return Ok((text, Some(c)));
            }
            text.push(c);
        }
        Ok((text, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner(input: &str) -> StreamScanner<&[u8]> {
        StreamScanner::new(input.as_bytes())
    }

    /// Reader that fails after yielding its data
    struct FailingReader {
        data: Vec<u8>,
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
            }
            self.served = true;
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            Ok(n)
        }
    }

    #[test]
    fn test_chars_decodes_multibyte() {
        let chars: Vec<char> = Chars::new("a\u{e9}\u{4e2d}\u{1f600}".as_bytes())
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(chars, vec!['a', '\u{e9}', '\u{4e2d}', '\u{1f600}']);
    }

    #[test]
    fn test_chars_invalid_bytes_become_replacement() {
        let bytes: &[u8] = &[b'x', 0xFF, b'y'];
        let chars: String = Chars::new(bytes).collect::<io::Result<_>>().unwrap();
        assert_eq!(chars, "x\u{fffd}y");
    }

    #[test]
    fn test_chars_truncated_sequence_keeps_following_byte() {
        // 0xC3 expects a continuation byte; '<' must survive
        let bytes: &[u8] = &[0xC3, b'<', b'a'];
        let chars: String = Chars::new(bytes).collect::<io::Result<_>>().unwrap();
        assert_eq!(chars, "\u{fffd}<a");
    }

    #[test]
    fn test_chars_stays_exhausted() {
        let mut chars = Chars::new("a".as_bytes());
        assert!(matches!(chars.next(), Some(Ok('a'))));
        assert!(chars.next().is_none());
        assert!(chars.is_exhausted());
        assert!(chars.next().is_none());
    }

    #[test]
    fn test_read_until_first_target() {
        let mut s = scanner("hello <a");
        assert!(s.read_until('<', '\n').unwrap());
        assert_eq!(s.skip_space().unwrap(), Some('a'));
    }

    #[test]
    fn test_read_until_second_target() {
        let mut s = scanner("line one\n<a");
        assert!(!s.read_until('<', '\n').unwrap());
        assert!(s.read_until('<', '\n').unwrap());
    }

    #[test]
    fn test_read_until_end_of_stream() {
        let mut s = scanner("no tags here");
        assert!(!s.read_until('<', '\n').unwrap());
        assert!(s.is_exhausted());
    }

    #[test]
    fn test_read_until_is_case_insensitive() {
        let mut s = scanner("xxHyy");
        assert!(s.read_until('h', 'z').unwrap());
        assert_eq!(s.read_string('z', 'z').unwrap(), None);
    }

    #[test]
    fn test_skip_space() {
        let mut s = scanner(" \t\n  body");
        assert_eq!(s.skip_space().unwrap(), Some('b'));
        assert_eq!(s.skip_space().unwrap(), Some('o'));
    }

    #[test]
    fn test_skip_space_end_of_stream() {
        let mut s = scanner("   ");
        assert_eq!(s.skip_space().unwrap(), None);
    }

    #[test]
    fn test_read_string_excludes_delimiter() {
        let mut s = scanner("http://x.test/\" rest");
        assert_eq!(
            s.read_string('"', LINE_BOUNDARY).unwrap(),
            Some("http://x.test/".to_string())
        );
        assert_eq!(s.skip_space().unwrap(), Some('r'));
    }

    #[test]
    fn test_read_string_stops_at_second_delimiter() {
        let mut s = scanner("broken\nvalue\"");
        assert_eq!(
            s.read_string('"', LINE_BOUNDARY).unwrap(),
            Some("broken".to_string())
        );
    }

    #[test]
    fn test_read_string_end_of_stream() {
        let mut s = scanner("unterminated");
        assert_eq!(s.read_string('"', LINE_BOUNDARY).unwrap(), None);
    }

    #[test]
    fn test_read_token_reports_terminator() {
        let mut s = scanner("ody>rest");
        let (text, end) = s.read_token(|c| c == '>' || c.is_whitespace()).unwrap();
        assert_eq!(text, "ody");
        assert_eq!(end, Some('>'));

        let (text, end) = s.read_token(|c| c == '>').unwrap();
        assert_eq!(text, "rest");
        assert_eq!(end, None);
    }

    #[test]
    fn test_read_error_propagates() {
        let reader = FailingReader {
            data: b"abc".to_vec(),
            served: false,
        };
        let mut s = StreamScanner::new(reader);
        assert!(s.read_until('<', '\n').is_err());
        assert!(s.is_exhausted());
    }
}
