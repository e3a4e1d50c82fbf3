// prefilter.rs - First-byte skip for scans with no live threads.
//
// When every transition out of the entry state is a plain ASCII literal,
// a match can only begin at one of those bytes. While the entry attempt is
// the only thread alive the scan jumps straight to the next such byte.

use memchr::{memchr, memchr2, memchr3};
use smallvec::SmallVec;

use crate::nfa::{Nfa, State, ENTRY};
use crate::node::{Atom, END};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prefilter {
    bytes: SmallVec<[u8; 3]>,
}

impl Prefilter {
    /// Start-byte set of `nfa`, or `None` if a match may begin with
    /// anything else, carries zero-width work, or may be empty.
    pub fn new<A: Atom>(nfa: &Nfa<A>) -> Option<Prefilter> {
        let mut bytes: SmallVec<[u8; 3]> = SmallVec::new();
        for tr in nfa.transitions(ENTRY) {
            if tr.closure.is_some() || tr.target == END {
                return None;
            }
            let State::Atom(atom) = nfa.state(tr.target) else {
                return None;
            };
            let c = atom.literal().filter(char::is_ascii)?;
            let b = c as u8;
            if !bytes.contains(&b) {
                if bytes.len() == 3 {
                    return None;
                }
                bytes.push(b);
            }
        }
        if bytes.is_empty() {
            None
        } else {
            Some(Prefilter { bytes })
        }
    }

    /// The start bytes, at most three.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Offset of the first start byte in `haystack`.
    #[inline]
    pub fn find(&self, haystack: &[u8]) -> Option<usize> {
        match *self.bytes.as_slice() {
            [a] => memchr(a, haystack),
            [a, b] => memchr2(a, b, haystack),
            [a, b, c] => memchr3(a, b, c, haystack),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn alternatives(chars: &str) -> Nfa<char> {
        let mut postfix = Vec::new();
        for (i, c) in chars.chars().enumerate() {
            postfix.push(Node::atom(c));
            if i > 0 {
                postfix.push(Node::alternate());
            }
        }
        Nfa::new(postfix).unwrap()
    }

    #[test]
    fn collects_up_to_three_start_bytes() {
        assert_eq!(Prefilter::new(&alternatives("a")).unwrap().bytes(), b"a");
        assert_eq!(Prefilter::new(&alternatives("aba")).unwrap().bytes(), b"ab");
        assert_eq!(Prefilter::new(&alternatives("abc")).unwrap().bytes(), b"abc");
        assert_eq!(Prefilter::new(&alternatives("abcd")), None);
    }

    #[test]
    fn rejects_non_literal_starts() {
        assert_eq!(Prefilter::new(&alternatives("é")), None);
        // a*
        let star = Nfa::new(vec![Node::atom('a'), Node::zero_or_more(true)]).unwrap();
        assert_eq!(Prefilter::new(&star), None);
        // (a)
        let group = Nfa::new(vec![Node::atom('a'), Node::group_start(1), Node::group_end(1)]).unwrap();
        assert_eq!(Prefilter::new(&group), None);
    }

    #[test]
    fn finds_nearest_start_byte() {
        let pre = Prefilter::new(&alternatives("xy")).unwrap();
        assert_eq!(pre.find(b"abcyx"), Some(3));
        assert_eq!(pre.find(b"abc"), None);
        assert_eq!(pre.find(b""), None);
    }
}
