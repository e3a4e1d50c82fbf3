// nfa.rs - The compiled, consuming-only automaton.
//
// Built once per expression (Thompson construction followed by epsilon
// elimination) and shared read-only by every scan.

use log::debug;
use smallvec::SmallVec;

use crate::epsilon;
use crate::error::Result;
use crate::node::{Atom, Node, StateId, STATE_LIMIT};
use crate::prefilter::Prefilter;
use crate::thompson::Thompson;

/// Id of the entry state every search attempt starts from.
pub const ENTRY: StateId = 1;

/// Index into the Z-closure pool.
pub type ZClosureId = u32;

/// One zero-width operation applied while taking a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZOp {
    /// Opening boundary of a capture group.
    Open(u16),
    /// Closing boundary of a capture group.
    Close(u16),
    /// Assertion, indexing [`Nfa::assertion`].
    Assert(u32),
}

/// Ordered zero-width work attached to a transition.
pub type ZClosure = SmallVec<[ZOp; 4]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub target: StateId,
    /// `None` when the transition carries no zero-width work.
    pub closure: Option<ZClosureId>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum State<A> {
    End,
    Entry,
    Atom(A),
}

/// Consuming-only automaton with priority-ordered transitions.
///
/// State 0 is the end of expression, state 1 the entry; the rest are
/// numbered in breadth-first discovery order. Transitions of state `s` are
/// `transitions[offsets[s]..offsets[s + 1]]`, highest priority first.
#[derive(Clone, Debug)]
pub struct Nfa<A> {
    pub(crate) states: Vec<State<A>>,
    pub(crate) offsets: Vec<u32>,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) closures: Vec<ZClosure>,
    pub(crate) assertions: Vec<A>,
    pub(crate) groups: u16,
    pub(crate) prefilter: Option<Prefilter>,
}

impl<A: Atom> Nfa<A> {
    /// Compile a post-order node sequence with default settings.
    pub fn new<I>(postfix: I) -> Result<Nfa<A>>
    where
        I: IntoIterator<Item = Node<A>>,
    {
        NfaBuilder::new().build(postfix)
    }
}

impl<A> Nfa<A> {

    pub fn builder() -> NfaBuilder {
        NfaBuilder::new()
    }

    /// Number of states, including END and the entry.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false; END and the entry exist in every automaton.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn state(&self, id: StateId) -> &State<A> {
        &self.states[id as usize]
    }

    #[inline]
    pub fn transitions(&self, id: StateId) -> &[Transition] {
        let id = id as usize;
        &self.transitions[self.offsets[id] as usize..self.offsets[id + 1] as usize]
    }

    #[inline]
    pub fn closure(&self, id: ZClosureId) -> &[ZOp] {
        &self.closures[id as usize]
    }

    #[inline]
    pub fn assertion(&self, index: u32) -> &A {
        &self.assertions[index as usize]
    }

    /// Highest capture group index; group 0 is the whole match.
    pub fn groups(&self) -> usize {
        self.groups as usize
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn closure_count(&self) -> usize {
        self.closures.len()
    }

    /// Start-byte skip computed at build time, if the expression has one.
    #[inline]
    pub fn prefilter(&self) -> Option<&Prefilter> {
        self.prefilter.as_ref()
    }
}

// === NfaBuilder ===

/// Builder for compiling an [`Nfa`] with custom settings.
///
/// ```
/// use nfascan::node::Node;
/// use nfascan::nfa::Nfa;
///
/// let postfix = vec![Node::atom('a'), Node::atom('b'), Node::concat()];
/// let nfa = Nfa::<char>::builder().state_limit(16).build(postfix).unwrap();
/// assert_eq!(nfa.len(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct NfaBuilder {
    state_limit: usize,
}

impl NfaBuilder {
    pub fn new() -> Self {
        NfaBuilder {
            state_limit: STATE_LIMIT,
        }
    }

    /// Cap the Thompson automaton at `limit` states. Values above
    /// [`STATE_LIMIT`] are clamped.
    pub fn state_limit(mut self, limit: usize) -> Self {
        self.state_limit = limit.min(STATE_LIMIT);
        self
    }

    pub fn build<A, I>(&self, postfix: I) -> Result<Nfa<A>>
    where
        A: Atom,
        I: IntoIterator<Item = Node<A>>,
    {
        let automaton = Thompson::new(self.state_limit).build(postfix)?;
        let nodes = automaton.nodes.len();
        let mut nfa = epsilon::eliminate(automaton);
        nfa.prefilter = Prefilter::new(&nfa);
        debug!(
            "compiled {} nodes into {} states, {} transitions, {} closures, start bytes {:?}",
            nodes,
            nfa.len(),
            nfa.transition_count(),
            nfa.closure_count(),
            nfa.prefilter().map(Prefilter::bytes)
        );
        Ok(nfa)
    }
}

impl Default for NfaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
