// api.rs - Match-oriented API over the scan driver.
//
// Match, Captures and FindIter turn the buffered candidates of
// `exec::find_all` into owned results tied to the scanned text.

use std::collections::VecDeque;
use std::ops::Range;

use smallvec::SmallVec;

use crate::encodings::{Decoder, Utf8};
use crate::exec::{find_all, ScanEnd, ScanFlags, Scratch};
use crate::matchbuf::Candidate;
use crate::nfa::Nfa;
use crate::node::Atom;

impl<A: Atom> Nfa<A> {
    /// Return the first match in `text`, or `None` if no match.
    ///
    /// ```
    /// use nfascan::node::Node;
    /// use nfascan::nfa::Nfa;
    ///
    /// let nfa = Nfa::new(vec![Node::atom('b'), Node::atom('c'), Node::concat()]).unwrap();
    /// let caps = nfa.find("abcd").unwrap();
    /// assert_eq!(caps.get(0).unwrap().range(), 1..3);
    /// ```
    pub fn find<'t, T>(&self, text: &'t T) -> Option<Captures<'t>>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        let text = text.as_ref();
        let mut scratch = Scratch::new();
        find_all(self, &Utf8, text, 0, &mut scratch, ScanFlags::empty())?;
        let first = scratch.matches().first()?;
        Some(Captures::resolve(self, &scratch, first, text))
    }

    /// Check whether `text` matches anywhere.
    pub fn is_match<T>(&self, text: &T) -> bool
    where
        T: AsRef<[u8]> + ?Sized,
    {
        let mut scratch = Scratch::new();
        find_all(self, &Utf8, text.as_ref(), 0, &mut scratch, ScanFlags::empty()).is_some()
    }

    /// Iterate over all non-overlapping matches in UTF-8 `text`.
    pub fn find_iter<'n, 't, T>(&'n self, text: &'t T) -> FindIter<'n, 't, A>
    where
        T: AsRef<[u8]> + ?Sized,
    {
        FindIter::new(self, text.as_ref(), Utf8, ScanFlags::empty())
    }

    /// Iterate over all non-overlapping matches using a custom decoder
    /// and scan flags.
    pub fn find_iter_with<'n, 't, D>(
        &'n self,
        text: &'t [u8],
        decoder: D,
        flags: ScanFlags,
    ) -> FindIter<'n, 't, A, D>
    where
        D: Decoder,
    {
        FindIter::new(self, text, decoder, flags)
    }
}

// === Match ===

/// A matched span referencing the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'t> {
    text: &'t [u8],
    start: usize,
    end: usize,
}

impl<'t> Match<'t> {
    /// Byte offset of the start of the match.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset of the end of the match (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The matched text as a byte slice.
    pub fn as_bytes(&self) -> &'t [u8] {
        &self.text[self.start..self.end]
    }

    /// The matched text as a `&str`, or `None` if it is not valid UTF-8.
    pub fn as_str(&self) -> Option<&'t str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Length of the match in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for a zero-length match.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// === Captures ===

/// All capture groups from a single match.
///
/// Group 0 is the entire match. Groups that did not take part in the match
/// are `None`.
#[derive(Clone, PartialEq, Eq)]
pub struct Captures<'t> {
    text: &'t [u8],
    spans: SmallVec<[Option<Range<usize>>; 4]>,
    synthetic: bool,
}

impl<'t> Captures<'t> {
    fn resolve<A>(nfa: &Nfa<A>, scratch: &Scratch, candidate: &Candidate, text: &'t [u8]) -> Self {
        Captures {
            text,
            spans: candidate.resolve(scratch.captures(), nfa.groups()),
            synthetic: candidate.synthetic,
        }
    }

    /// Get capture group `i`, or `None` if the group did not participate.
    pub fn get(&self, i: usize) -> Option<Match<'t>> {
        let span = self.spans.get(i)?.as_ref()?;
        Some(Match {
            text: self.text,
            start: span.start,
            end: span.end,
        })
    }

    /// Number of capture groups (including group 0).
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// `true` for the end-of-input marker requested with
    /// [`ScanFlags::END_BOUNDARY`].
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Iterate over all capture groups.
    pub fn iter(&self) -> CapturesIter<'_, 't> {
        CapturesIter {
            captures: self,
            index: 0,
        }
    }
}

impl std::fmt::Debug for Captures<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for span in &self.spans {
            list.entry(span);
        }
        list.finish()
    }
}

// === CapturesIter ===

/// Iterator over capture groups in a [`Captures`].
pub struct CapturesIter<'c, 't> {
    captures: &'c Captures<'t>,
    index: usize,
}

impl<'c, 't> Iterator for CapturesIter<'c, 't> {
    type Item = Option<Match<'t>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.captures.len() {
            return None;
        }
        let m = self.captures.get(self.index);
        self.index += 1;
        Some(m)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.captures.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CapturesIter<'_, '_> {}

// === FindIter ===

/// Iterator over all non-overlapping matches in a text.
///
/// Each scan may buffer several final matches; they are resolved into
/// [`Captures`] before the next scan reuses the scratch space.
pub struct FindIter<'n, 't, A, D = Utf8> {
    nfa: &'n Nfa<A>,
    decoder: D,
    text: &'t [u8],
    flags: ScanFlags,
    scratch: Scratch,
    pending: VecDeque<Captures<'t>>,
    // `None` once the text is exhausted
    resume: Option<usize>,
}

impl<'n, 't, A, D> FindIter<'n, 't, A, D> {
    fn new(nfa: &'n Nfa<A>, text: &'t [u8], decoder: D, flags: ScanFlags) -> Self {
        FindIter {
            nfa,
            decoder,
            text,
            flags,
            scratch: Scratch::new(),
            pending: VecDeque::new(),
            resume: Some(0),
        }
    }
}

impl<'n, 't, A: Atom, D: Decoder> Iterator for FindIter<'n, 't, A, D> {
    type Item = Captures<'t>;

    fn next(&mut self) -> Option<Captures<'t>> {
        loop {
            if let Some(caps) = self.pending.pop_front() {
                return Some(caps);
            }
            let at = self.resume?;
            let end = find_all(
                self.nfa,
                &self.decoder,
                self.text,
                at,
                &mut self.scratch,
                self.flags,
            );
            self.resume = match end {
                Some(ScanEnd::Resume(next)) => Some(next),
                Some(ScanEnd::Exhausted) | None => None,
            };
            for candidate in self.scratch.matches() {
                self.pending
                    .push_back(Captures::resolve(self.nfa, &self.scratch, candidate, self.text));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encodings::Ascii;
    use crate::node::Node;

    fn lit(s: &str) -> Vec<Node<char>> {
        let mut out = Vec::new();
        for (i, c) in s.chars().enumerate() {
            out.push(Node::atom(c));
            if i > 0 {
                out.push(Node::concat());
            }
        }
        out
    }

    #[test]
    fn nfa_find() {
        let nfa = Nfa::new(lit("42")).unwrap();
        let caps = nfa.find("hello 42 world").unwrap();
        let m = caps.get(0).unwrap();
        assert_eq!(m.as_str(), Some("42"));
        assert_eq!(m.start(), 6);
        assert_eq!(m.end(), 8);
        assert_eq!(m.range(), 6..8);
        assert_eq!(m.len(), 2);
        assert!(!m.is_empty());
        assert!(!caps.is_synthetic());
    }

    #[test]
    fn nfa_no_match() {
        let nfa = Nfa::new(lit("42")).unwrap();
        assert!(nfa.find("no digits here").is_none());
        assert!(!nfa.is_match("no digits here"));
        assert!(nfa.is_match("x42"));
    }

    #[test]
    fn find_iter_spans_successive_scans() {
        let nfa = Nfa::new(lit("ab")).unwrap();
        let starts: Vec<usize> = nfa
            .find_iter("ab ab xab")
            .map(|c| c.get(0).unwrap().start())
            .collect();
        assert_eq!(starts, vec![0, 3, 7]);
    }

    #[test]
    fn captures_groups() {
        // (a)(b)?
        let postfix = vec![
            Node::atom('a'),
            Node::group_start(1),
            Node::group_end(1),
            Node::atom('b'),
            Node::group_start(2),
            Node::group_end(2),
            Node::zero_or_one(true),
            Node::concat(),
        ];
        let nfa = Nfa::new(postfix).unwrap();
        let caps = nfa.find("a").unwrap();
        let items: Vec<_> = caps.iter().collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].map(|m| m.range()), Some(0..1));
        assert_eq!(items[1].map(|m| m.range()), Some(0..1));
        assert!(items[2].is_none());
        assert!(caps.get(3).is_none());
    }

    #[test]
    fn match_as_bytes() {
        let nfa = Nfa::new(lit("world")).unwrap();
        let caps = nfa.find(b"hello world").unwrap();
        assert_eq!(caps.get(0).unwrap().as_bytes(), b"world");
    }

    #[test]
    fn empty_expression_matches_between_chars() {
        let nfa = Nfa::new(vec![Node::<char>::empty()]).unwrap();
        let starts: Vec<usize> = nfa
            .find_iter("ab")
            .map(|c| c.get(0).unwrap().start())
            .collect();
        assert_eq!(starts, vec![0, 1, 2]);
    }

    #[test]
    fn custom_decoder_and_flags() {
        let nfa = Nfa::new(lit("\u{e9}")).unwrap();
        let all: Vec<_> = nfa
            .find_iter_with(b"a\xe9", Ascii, ScanFlags::END_BOUNDARY)
            .collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].get(0).unwrap().range(), 1..2);
        assert!(all[0].get(0).unwrap().as_str().is_none());
        assert!(all[1].is_synthetic());
        assert_eq!(all[1].get(0).unwrap().range(), 2..2);
    }
}
