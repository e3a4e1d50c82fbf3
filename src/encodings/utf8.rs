// encodings/utf8.rs - UTF-8 decoder (RFC 3629 range: U+0000 - U+10FFFF).
//
// Malformed input never stops a scan: a byte that does not start a valid
// sequence decodes as U+FFFD with length 1.

use super::Decoder;

// === UTF-8 Helpers ===

#[inline]
fn utf8_istail(c: u8) -> bool {
    (c & 0xc0) == 0x80
}

// === EncLen_UTF8 Table ===
// Maps first byte to sequence length (RFC 3629: max 4 bytes).

static ENC_LEN_UTF8: [u8; 256] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
    3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1,
];

const MAX_ENC_LEN: usize = 4;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Utf8;

impl Decoder for Utf8 {
    fn decode(&self, text: &[u8], at: usize) -> Option<(char, usize)> {
        let lead = *text.get(at)?;
        let len = ENC_LEN_UTF8[lead as usize] as usize;
        if len == 1 {
            return Some(if lead < 0x80 {
                (lead as char, 1)
            } else {
                (char::REPLACEMENT_CHARACTER, 1)
            });
        }

        let Some(tail) = text.get(at + 1..at + len) else {
            return Some((char::REPLACEMENT_CHARACTER, 1));
        };
        if !tail.iter().all(|&b| utf8_istail(b)) {
            return Some((char::REPLACEMENT_CHARACTER, 1));
        }
        let mut n = (lead as u32) & ((1u32 << (7 - len)) - 1);
        for &b in tail {
            n = (n << 6) | ((b as u32) & 0x3f);
        }
        match char::from_u32(n) {
            Some(c) => Some((c, len)),
            None => Some((char::REPLACEMENT_CHARACTER, 1)),
        }
    }

    fn decode_prev(&self, text: &[u8], at: usize) -> Option<(char, usize)> {
        if at == 0 || at > text.len() {
            return None;
        }
        // left-adjust to the lead byte of the sequence ending at `at`
        let floor = at.saturating_sub(MAX_ENC_LEN);
        let mut p = at - 1;
        while p > floor && utf8_istail(text[p]) {
            p -= 1;
        }
        match self.decode(text, p) {
            Some((c, len)) if p + len == at => Some((c, len)),
            _ => Some((char::REPLACEMENT_CHARACTER, 1)),
        }
    }

    fn ascii_compatible(&self) -> bool {
        true
    }
}
