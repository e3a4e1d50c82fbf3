// exec.rs - Lock-step multi-match scan.
//
// Every live path through the automaton is a thread; all threads advance
// together one code point at a time. A generation never holds two threads
// in the same state, and threads stay ordered by start offset and then by
// priority, so the first thread to reach the end of expression in a step
// is the best completion of that step. Completed matches go to the match
// buffer, which keeps them sorted and non-overlapping.

use std::mem;

use bitflags::bitflags;
use log::trace;

use crate::capture::{CapturePtr, CaptureTree};
use crate::encodings::{Decoder, Utf8};
use crate::matchbuf::{Candidate, MatchBuffer};
use crate::nfa::{Nfa, State, ZOp, ENTRY};
use crate::node::{Atom, StateId, END};
use crate::sparse_set::SparseSet;

bitflags! {
    /// Options for [`find_all`].
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ScanFlags: u8 {
        /// Keep scanning to the end of the text instead of returning as
        /// soon as the buffered matches are final.
        const NO_EARLY_RETURN = 1 << 0;
        /// At end of text, append a synthetic empty candidate at
        /// `text.len()` marking "matched through end of input".
        const END_BOUNDARY = 1 << 1;
    }
}

/// How a scan that found matches ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanEnd {
    /// The buffered matches are final; the next scan starts at this offset.
    Resume(usize),
    /// The end of the text was reached and flushed.
    Exhausted,
}

// === Thread / Submatches ===

/// One live path: its state, its capture history, and where it started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thread {
    pub state: StateId,
    pub captures: CapturePtr,
    pub start: usize,
}

impl Thread {
    #[inline]
    fn entry(at: usize) -> Thread {
        Thread {
            state: ENTRY,
            captures: CapturePtr::NONE,
            start: at,
        }
    }
}

/// One generation of threads, in priority order, at most one per state.
#[derive(Clone, Debug, Default)]
pub struct Submatches {
    threads: Vec<Thread>,
    states: SparseSet,
}

impl Submatches {
    fn reset(&mut self, states: usize) {
        self.threads.clear();
        self.states.reserve(states);
    }

    #[inline]
    fn clear(&mut self) {
        self.threads.clear();
        self.states.clear();
    }

    #[inline]
    pub fn contains(&self, state: StateId) -> bool {
        self.states.contains(state)
    }

    #[inline]
    fn add(&mut self, thread: Thread) {
        let fresh = self.states.insert(thread.state);
        debug_assert!(fresh, "state {} already in generation", thread.state);
        self.threads.push(thread);
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}

// === Scratch ===

/// Reusable per-caller scan state.
///
/// Reset (not reallocated) at the start of every [`find_all`]; the matches
/// it holds stay valid until the next call.
#[derive(Clone, Debug, Default)]
pub struct Scratch {
    curr: Submatches,
    next: Submatches,
    captures: CaptureTree,
    matches: MatchBuffer,
}

impl Scratch {
    pub fn new() -> Self {
        Scratch::default()
    }

    fn reset(&mut self, states: usize) {
        self.curr.reset(states);
        self.next.reset(states);
        self.captures.clear();
        self.matches.clear();
    }

    /// Matches buffered by the last scan, in text order.
    pub fn matches(&self) -> &[Candidate] {
        self.matches.as_slice()
    }

    pub fn captures(&self) -> &CaptureTree {
        &self.captures
    }

    /// Advance every thread of `curr` over the code point `cur` at `at`.
    fn step<A: Atom>(&mut self, nfa: &Nfa<A>, at: usize, prev: Option<char>, cur: Option<char>) {
        let Scratch {
            curr,
            next,
            captures,
            matches,
        } = self;
        let mut cut = false;

        for &thread in &curr.threads {
            // a match this step cuts every lower-priority thread except the
            // attempt anchored here, which may start the next match
            if cut && thread.start != at {
                continue;
            }
            for tr in nfa.transitions(thread.state) {
                if next.contains(tr.target) {
                    continue;
                }
                if tr.target != END {
                    let State::Atom(atom) = nfa.state(tr.target) else {
                        continue;
                    };
                    match cur {
                        Some(c) if atom.is_match(c) => {}
                        _ => continue,
                    }
                }

                let mut ptr = thread.captures;
                if let Some(id) = tr.closure {
                    let ops = nfa.closure(id);
                    let holds = ops.iter().all(|op| match *op {
                        ZOp::Assert(i) => nfa.assertion(i).check(prev, cur),
                        _ => true,
                    });
                    if !holds {
                        continue;
                    }
                    for op in ops {
                        match *op {
                            ZOp::Open(g) => ptr = captures.push(ptr, at, 2 * g as u32),
                            ZOp::Close(g) => ptr = captures.push(ptr, at, 2 * g as u32 + 1),
                            ZOp::Assert(_) => {}
                        }
                    }
                }

                if tr.target == END {
                    matches.insert(Candidate {
                        captures: ptr,
                        span: thread.start..at,
                        synthetic: false,
                    });
                    cut = true;
                    break;
                }
                next.add(Thread {
                    state: tr.target,
                    captures: ptr,
                    start: thread.start,
                });
            }
        }
    }

    /// Make `next` the current generation.
    #[inline]
    fn swap(&mut self) {
        mem::swap(&mut self.curr, &mut self.next);
        self.next.clear();
    }
}

// === Scan driver ===

/// Scan `text` from byte offset `start`, buffering matches in `scratch`.
///
/// Returns `None` when no match exists in the rest of the text. Otherwise
/// `scratch.matches()` holds one or more final, non-overlapping matches
/// and the [`ScanEnd`] says where to continue.
pub fn find_all<A, D>(
    nfa: &Nfa<A>,
    decoder: &D,
    text: &[u8],
    start: usize,
    scratch: &mut Scratch,
    flags: ScanFlags,
) -> Option<ScanEnd>
where
    A: Atom,
    D: Decoder + ?Sized,
{
    scratch.reset(nfa.len());
    if start > text.len() {
        return None;
    }

    let prefilter = if decoder.ascii_compatible() {
        nfa.prefilter()
    } else {
        None
    };
    let mut prev = decoder.decode_prev(text, start).map(|(c, _)| c);
    let mut at = start;
    scratch.curr.add(Thread::entry(at));

    loop {
        // only the entry attempt is alive: jump to the next possible start
        if let Some(pre) = prefilter {
            if scratch.curr.len() == 1 {
                let skip = pre.find(&text[at..]).unwrap_or(text.len() - at);
                if skip > 0 {
                    at += skip;
                    prev = decoder.decode_prev(text, at).map(|(c, _)| c);
                    scratch.curr.clear();
                    scratch.curr.add(Thread::entry(at));
                }
            }
        }
        let (cur, next_at) = match decoder.decode(text, at) {
            Some((c, len)) => (Some(c), at + len),
            None => (None, at),
        };
        scratch.step(nfa, at, prev, cur);

        if cur.is_none() {
            break;
        }
        if !flags.contains(ScanFlags::NO_EARLY_RETURN)
            && scratch.next.is_empty()
            && !scratch.matches.is_empty()
        {
            trace!(
                "scan {}..{}: {} final matches",
                start,
                next_at,
                scratch.matches.len()
            );
            return Some(ScanEnd::Resume(next_at));
        }

        scratch.next.add(Thread::entry(next_at));
        scratch.swap();
        prev = cur;
        at = next_at;
    }

    if flags.contains(ScanFlags::END_BOUNDARY) {
        scratch.matches.push_boundary(text.len());
    }
    trace!(
        "scan {}..{}: {} matches at end of text",
        start,
        text.len(),
        scratch.matches.len()
    );
    if scratch.matches.is_empty() {
        None
    } else {
        Some(ScanEnd::Exhausted)
    }
}

impl<A: Atom> Nfa<A> {
    /// [`find_all`] over UTF-8 text with default flags.
    pub fn find_all(&self, text: &[u8], start: usize, scratch: &mut Scratch) -> Option<ScanEnd> {
        find_all(self, &Utf8, text, start, scratch, ScanFlags::empty())
    }
}
