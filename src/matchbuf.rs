// matchbuf.rs - Completed candidate matches, kept sorted and non-overlapping.

use std::ops::Range;

use smallvec::SmallVec;

use crate::capture::{CapturePtr, CaptureTree};

/// A completed match awaiting hand-off to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub captures: CapturePtr,
    /// Byte span of the whole match.
    pub span: Range<usize>,
    /// End-of-input marker requested through `ScanFlags::END_BOUNDARY`;
    /// not produced by the expression.
    pub synthetic: bool,
}

impl Candidate {
    #[inline]
    pub fn start(&self) -> usize {
        self.span.start
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Group spans with group 0 set to the whole match.
    pub fn resolve(&self, tree: &CaptureTree, groups: usize) -> SmallVec<[Option<Range<usize>>; 4]> {
        let mut spans = tree.resolve(self.captures, groups);
        spans[0] = Some(self.span.clone());
        spans
    }
}

#[derive(Clone, Debug, Default)]
pub struct MatchBuffer {
    matches: Vec<Candidate>,
}

impl MatchBuffer {
    pub fn new() -> Self {
        MatchBuffer {
            matches: Vec::new(),
        }
    }

    /// Add `candidate`, first discarding every buffered match it subsumes.
    ///
    /// Matches arrive in scan order, so the candidate never ends before a
    /// buffered one; any buffered match starting at or after the
    /// candidate's start lies inside it and loses to it.
    pub fn insert(&mut self, candidate: Candidate) {
        while let Some(last) = self.matches.last() {
            if last.start() < candidate.start() {
                break;
            }
            debug_assert!(last.end() <= candidate.end());
            self.matches.pop();
        }
        debug_assert!(self
            .matches
            .last()
            .map_or(true, |last| last.end() <= candidate.start()));
        self.matches.push(candidate);
    }

    /// Append the synthetic end-of-input marker at `at`. It prunes nothing.
    pub fn push_boundary(&mut self, at: usize) {
        debug_assert!(self.matches.last().map_or(true, |last| last.end() <= at));
        self.matches.push(Candidate {
            captures: CapturePtr::NONE,
            span: at..at,
            synthetic: true,
        });
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn clear(&mut self) {
        self.matches.clear();
    }
}
