// thompson.rs - Thompson construction over a post-order node sequence.
//
// Sub-expressions are kept on a stack of open state ids. Every open state
// carries its end set: the edges that still point at the END sentinel.
// Concatenation rewires exactly those edges, so joining two fragments
// costs O(ends) instead of a walk over the automaton built so far.

use std::mem;

use crate::error::{BuildError, Result};
use crate::node::{Node, NodeKind, StateId, END, STATE_LIMIT};

/// An edge still pointing at END: (state, edge index).
type Dangle = (StateId, u8);

/// Epsilon-containing automaton produced by [`Thompson::build`].
#[derive(Clone, Debug)]
pub struct Automaton<A> {
    /// All states; `nodes[END]` is the end-of-expression sentinel.
    pub nodes: Vec<Node<A>>,
    /// The appended entry node.
    pub entry: StateId,
    /// Highest capturing group index seen.
    pub groups: u16,
}

pub struct Thompson<A> {
    nodes: Vec<Node<A>>,
    ends: Vec<Vec<Dangle>>,
    stack: Vec<StateId>,
    limit: usize,
    groups: u16,
}

impl<A> Thompson<A> {
    /// New builder whose automaton may hold at most `limit` states
    /// (clamped to [`STATE_LIMIT`]).
    pub fn new(limit: usize) -> Self {
        Thompson {
            nodes: vec![Node::new(NodeKind::End)],
            ends: vec![Vec::new()],
            stack: Vec::new(),
            limit: limit.min(STATE_LIMIT),
            groups: 0,
        }
    }

    /// Build the automaton for `postfix` (operators after their operands).
    pub fn build<I>(mut self, postfix: I) -> Result<Automaton<A>>
    where
        I: IntoIterator<Item = Node<A>>,
    {
        let mut count = 0;
        for (index, node) in postfix.into_iter().enumerate() {
            self.push_node(index, node)?;
            count = index + 1;
        }

        if self.stack.len() != 1 {
            return Err(BuildError::Malformed { op: "end", index: count });
        }
        let root = self.stack[0];
        let entry = self.alloc(Node::new(NodeKind::Entry), &[root])?;

        Ok(Automaton {
            nodes: self.nodes,
            entry,
            groups: self.groups,
        })
    }

    fn push_node(&mut self, index: usize, node: Node<A>) -> Result<()> {
        let op = node.kind.name();
        match node.kind {
            NodeKind::Atom(_) | NodeKind::Assert(_) | NodeKind::Empty => {
                let s = self.alloc(node, &[END])?;
                self.ends[s as usize].push((s, 0));
                self.stack.push(s);
            }
            NodeKind::Concat => {
                let b = self.pop(op, index)?;
                let a = self.pop(op, index)?;
                self.combine(a, b);
                self.stack.push(a);
            }
            NodeKind::Alternate => {
                let right = self.pop(op, index)?;
                let left = self.pop(op, index)?;
                let s = self.alloc(node, &[left, right])?;
                let mut ends = mem::take(&mut self.ends[left as usize]);
                ends.append(&mut self.ends[right as usize]);
                self.ends[s as usize] = ends;
                self.stack.push(s);
            }
            NodeKind::ZeroOrMore | NodeKind::OneOrMore => {
                let repeat_once = matches!(node.kind, NodeKind::OneOrMore);
                let a = self.pop(op, index)?;
                let (out, exit) = if node.is_greedy() {
                    ([a, END], 1)
                } else {
                    ([END, a], 0)
                };
                let s = self.alloc(node, &out)?;
                self.combine(a, s);
                if repeat_once {
                    self.ends[a as usize] = vec![(s, exit)];
                    self.stack.push(a);
                } else {
                    self.ends[s as usize] = vec![(s, exit)];
                    self.stack.push(s);
                }
            }
            NodeKind::ZeroOrOne => {
                let a = self.pop(op, index)?;
                let (out, exit) = if node.is_greedy() {
                    ([a, END], 1)
                } else {
                    ([END, a], 0)
                };
                let s = self.alloc(node, &out)?;
                let mut ends = mem::take(&mut self.ends[a as usize]);
                ends.push((s, exit));
                self.ends[s as usize] = ends;
                self.stack.push(s);
            }
            NodeKind::GroupStart => {
                let a = self.pop(op, index)?;
                self.note_group(&node);
                let s = self.alloc(node, &[a])?;
                self.ends[s as usize] = mem::take(&mut self.ends[a as usize]);
                self.stack.push(s);
            }
            NodeKind::GroupEnd => {
                let a = self.pop(op, index)?;
                self.note_group(&node);
                let s = self.alloc(node, &[END])?;
                self.combine(a, s);
                self.ends[a as usize] = vec![(s, 0)];
                self.stack.push(a);
            }
            NodeKind::End | NodeKind::Entry => {
                return Err(BuildError::Malformed { op, index });
            }
        }
        Ok(())
    }

    fn alloc(&mut self, mut node: Node<A>, out: &[StateId]) -> Result<StateId> {
        if self.nodes.len() >= self.limit {
            return Err(BuildError::CapacityExceeded { limit: self.limit });
        }
        let id = self.nodes.len() as StateId;
        node.out.clear();
        node.out.extend_from_slice(out);
        self.nodes.push(node);
        self.ends.push(Vec::new());
        Ok(id)
    }

    fn pop(&mut self, op: &'static str, index: usize) -> Result<StateId> {
        self.stack.pop().ok_or(BuildError::Malformed { op, index })
    }

    /// Point every dangling edge of `a` at `b`; `a` inherits `b`'s end set.
    fn combine(&mut self, a: StateId, b: StateId) {
        for (s, edge) in mem::take(&mut self.ends[a as usize]) {
            self.nodes[s as usize].out[edge as usize] = b;
        }
        self.ends[a as usize] = mem::take(&mut self.ends[b as usize]);
    }

    fn note_group(&mut self, node: &Node<A>) {
        if node.is_capturing() {
            self.groups = self.groups.max(node.group);
        }
    }
}
