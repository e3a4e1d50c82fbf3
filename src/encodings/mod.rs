// encodings/mod.rs - Code-point decoding of the scanned text.
//
// The scan only needs to step forward one code point at a time and, once
// per call, to recover the code point just before the start offset so
// boundary assertions see the right left context.

pub mod ascii;
pub mod utf8;

pub use ascii::Ascii;
pub use utf8::Utf8;

/// Code-point decoder over a byte slice.
pub trait Decoder {
    /// Code point starting at byte `at` and its encoded length, or `None`
    /// at or past the end of `text`.
    fn decode(&self, text: &[u8], at: usize) -> Option<(char, usize)>;

    /// Code point ending right before byte `at` and its encoded length, or
    /// `None` when `at` is 0.
    fn decode_prev(&self, text: &[u8], at: usize) -> Option<(char, usize)>;

    /// `true` if every ASCII code point is encoded as its own byte and no
    /// byte below 0x80 occurs inside a longer sequence.
    fn ascii_compatible(&self) -> bool {
        false
    }
}

impl<D: Decoder + ?Sized> Decoder for &D {
    #[inline]
    fn decode(&self, text: &[u8], at: usize) -> Option<(char, usize)> {
        (**self).decode(text, at)
    }

    #[inline]
    fn decode_prev(&self, text: &[u8], at: usize) -> Option<(char, usize)> {
        (**self).decode_prev(text, at)
    }

    #[inline]
    fn ascii_compatible(&self) -> bool {
        (**self).ascii_compatible()
    }
}
