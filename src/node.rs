// node.rs - Automaton node types shared by the builder and the transducer.
//
// A parser hands in nodes in post-order with no edges set; the builder
// fills in `out`. Nodes are addressed by dense `StateId`, never by
// reference, so quantifier loops are plain back edges.

use bitflags::bitflags;
use smallvec::SmallVec;

/// Dense automaton state id.
pub type StateId = u16;

/// Largest number of states an automaton may hold (16-bit signed range).
pub const STATE_LIMIT: usize = i16::MAX as usize;

/// Id of the end-of-expression sentinel in both the Thompson automaton and
/// the eliminated `Nfa`.
pub const END: StateId = 0;

// === Matcher predicate ===

/// The character predicate a consuming or assertion node carries.
///
/// The crate defines no syntax of its own: a parser picks an atom type
/// (literal, class, word boundary, ...) and implements this trait for it.
pub trait Atom {
    /// Does this atom accept `c`?
    fn is_match(&self, c: char) -> bool;

    /// Zero-width check at the boundary between `prev` and `next`.
    /// `None` stands for the start or end of the text.
    fn check(&self, prev: Option<char>, next: Option<char>) -> bool {
        let _ = (prev, next);
        true
    }

    /// `Some(c)` when this atom accepts `c` and nothing else. Lets the scan
    /// skip ahead to the next possible match start.
    fn literal(&self) -> Option<char> {
        None
    }
}

impl Atom for char {
    fn is_match(&self, c: char) -> bool {
        *self == c
    }

    fn literal(&self) -> Option<char> {
        Some(*self)
    }
}

bitflags! {
    /// Per-node attribute bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Quantifier prefers another iteration over exiting.
        const GREEDY = 1 << 0;
        /// Group records its boundaries in the capture tree.
        const CAPTURING = 1 << 1;
    }
}

// === Node ===

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind<A> {
    /// Consumes one code point accepted by the atom.
    Atom(A),
    /// Zero-width boundary assertion.
    Assert(A),
    /// Branch between the two preceding operands.
    Alternate,
    ZeroOrMore,
    OneOrMore,
    ZeroOrOne,
    GroupStart,
    GroupEnd,
    /// End of expression.
    End,
    /// Concatenation of the two preceding operands.
    Concat,
    /// Matches the empty string.
    Empty,
    /// Entry point appended by the builder.
    Entry,
}

impl<A> NodeKind<A> {
    /// Name used in error messages and dumps.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Atom(_) => "atom",
            NodeKind::Assert(_) => "assert",
            NodeKind::Alternate => "alternate",
            NodeKind::ZeroOrMore => "zero-or-more",
            NodeKind::OneOrMore => "one-or-more",
            NodeKind::ZeroOrOne => "zero-or-one",
            NodeKind::GroupStart => "group-start",
            NodeKind::GroupEnd => "group-end",
            NodeKind::End => "end",
            NodeKind::Concat => "concat",
            NodeKind::Empty => "empty",
            NodeKind::Entry => "entry",
        }
    }
}

/// One automaton element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<A> {
    pub kind: NodeKind<A>,
    pub flags: NodeFlags,
    /// Capture group index, meaningful for group markers only.
    pub group: u16,
    /// Outgoing edges, highest priority first.
    pub out: SmallVec<[StateId; 2]>,
}

impl<A> Node<A> {
    pub fn new(kind: NodeKind<A>) -> Self {
        Node {
            kind,
            flags: NodeFlags::empty(),
            group: 0,
            out: SmallVec::new(),
        }
    }

    pub fn atom(atom: A) -> Self {
        Node::new(NodeKind::Atom(atom))
    }

    pub fn assertion(atom: A) -> Self {
        Node::new(NodeKind::Assert(atom))
    }

    pub fn alternate() -> Self {
        Node::new(NodeKind::Alternate)
    }

    pub fn concat() -> Self {
        Node::new(NodeKind::Concat)
    }

    pub fn empty() -> Self {
        Node::new(NodeKind::Empty)
    }

    pub fn zero_or_more(greedy: bool) -> Self {
        Node::new(NodeKind::ZeroOrMore).greedy(greedy)
    }

    pub fn one_or_more(greedy: bool) -> Self {
        Node::new(NodeKind::OneOrMore).greedy(greedy)
    }

    pub fn zero_or_one(greedy: bool) -> Self {
        Node::new(NodeKind::ZeroOrOne).greedy(greedy)
    }

    /// Opening marker of capture group `group`.
    pub fn group_start(group: u16) -> Self {
        let mut node = Node::new(NodeKind::GroupStart);
        node.group = group;
        node.flags |= NodeFlags::CAPTURING;
        node
    }

    /// Closing marker of capture group `group`.
    pub fn group_end(group: u16) -> Self {
        let mut node = Node::new(NodeKind::GroupEnd);
        node.group = group;
        node.flags |= NodeFlags::CAPTURING;
        node
    }

    /// Opening marker of a non-capturing group.
    pub fn bare_group_start() -> Self {
        Node::new(NodeKind::GroupStart)
    }

    /// Closing marker of a non-capturing group.
    pub fn bare_group_end() -> Self {
        Node::new(NodeKind::GroupEnd)
    }

    fn greedy(mut self, yes: bool) -> Self {
        self.flags.set(NodeFlags::GREEDY, yes);
        self
    }

    #[inline]
    pub fn is_greedy(&self) -> bool {
        self.flags.contains(NodeFlags::GREEDY)
    }

    #[inline]
    pub fn is_capturing(&self) -> bool {
        self.flags.contains(NodeFlags::CAPTURING)
    }

    /// True for nodes that consume input or terminate a match; everything
    /// else is collapsed away by epsilon elimination.
    #[inline]
    pub fn is_consuming(&self) -> bool {
        matches!(self.kind, NodeKind::Atom(_) | NodeKind::End)
    }
}
