// encodings/ascii.rs - Single-byte decoder.
//
// Every byte is one code point: bytes below 0x80 map to ASCII, the rest to
// U+0080..U+00FF (Latin-1), so binary input scans without replacement.

use super::Decoder;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ascii;

impl Decoder for Ascii {
    #[inline]
    fn decode(&self, text: &[u8], at: usize) -> Option<(char, usize)> {
        text.get(at).map(|&b| (b as char, 1))
    }

    #[inline]
    fn decode_prev(&self, text: &[u8], at: usize) -> Option<(char, usize)> {
        if at == 0 {
            return None;
        }
        text.get(at - 1).map(|&b| (b as char, 1))
    }

    fn ascii_compatible(&self) -> bool {
        true
    }
}
