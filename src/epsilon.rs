// epsilon.rs - Epsilon elimination.
//
// Branches, loops, group markers and assertions consume nothing. They are
// folded into the transitions between consuming states as Z-closures: the
// ordered capture and assertion operations met along the way.

use std::mem;

use smallvec::SmallVec;

use crate::nfa::{Nfa, State, Transition, ZClosure, ZOp, ENTRY};
use crate::node::{Node, NodeKind, StateId, END};
use crate::sparse_set::SparseSet;
use crate::thompson::Automaton;

const UNASSIGNED: StateId = StateId::MAX;

enum Step {
    Visit(StateId),
    /// Leave a non-consuming node: take it off the current path and drop
    /// the operation it pushed, if any.
    Leave { id: StateId, op: bool },
}

/// Depth-first closure walker. Reused across source states so the
/// bookkeeping is allocated once.
///
/// Every distinct path to a consuming state yields its own transition, so
/// a failed assertion on one path never hides a sibling path to the same
/// target. Two rules keep the walk finite and small:
/// a node already on the current path is a cycle and is skipped, and a
/// node reached earlier through a prefix without assertions is settled.
/// A settled node cannot be reached usefully again: the earlier path has
/// higher priority and fails only where every later path fails too.
struct Closure {
    on_path: Vec<bool>,
    settled: SparseSet,
    work: Vec<Step>,
    ops: ZClosure,
    asserts: usize,
    reached: Vec<(StateId, ZClosure)>,
    /// Assertion node id -> assertion pool index.
    assert_index: Vec<u32>,
    assert_nodes: Vec<StateId>,
}

impl Closure {
    fn new(len: usize) -> Self {
        Closure {
            on_path: vec![false; len],
            settled: SparseSet::new(len),
            work: Vec::new(),
            ops: SmallVec::new(),
            asserts: 0,
            reached: Vec::new(),
            assert_index: vec![u32::MAX; len],
            assert_nodes: Vec::new(),
        }
    }

    /// Consuming states (and END) reachable from `from` through
    /// non-consuming nodes, in priority order, with their Z-closures. A
    /// target appears once per path that can still succeed where the
    /// paths before it fail.
    fn compute<A>(&mut self, nodes: &[Node<A>], from: StateId) -> &[(StateId, ZClosure)] {
        self.settled.clear();
        self.reached.clear();
        self.ops.clear();
        self.asserts = 0;
        self.work.clear();
        self.work
            .extend(nodes[from as usize].out.iter().rev().map(|&t| Step::Visit(t)));

        while let Some(step) = self.work.pop() {
            let id = match step {
                Step::Leave { id, op } => {
                    self.on_path[id as usize] = false;
                    if op {
                        if let Some(ZOp::Assert(_)) = self.ops.pop() {
                            self.asserts -= 1;
                        }
                    }
                    continue;
                }
                Step::Visit(id) => id,
            };
            if self.on_path[id as usize] || self.settled.contains(id) {
                continue;
            }
            if self.asserts == 0 {
                self.settled.insert(id);
            }
            let node = &nodes[id as usize];
            if node.is_consuming() {
                let ops = &self.ops;
                if !self.reached.iter().any(|(t, z)| *t == id && z == ops) {
                    self.reached.push((id, self.ops.clone()));
                }
                continue;
            }

            let op = match node.kind {
                NodeKind::GroupStart if node.is_capturing() => Some(ZOp::Open(node.group)),
                NodeKind::GroupEnd if node.is_capturing() => Some(ZOp::Close(node.group)),
                NodeKind::Assert(_) => Some(ZOp::Assert(self.assertion(id))),
                _ => None,
            };
            if let Some(op) = op {
                if let ZOp::Assert(_) = op {
                    self.asserts += 1;
                }
                self.ops.push(op);
            }
            self.on_path[id as usize] = true;
            self.work.push(Step::Leave {
                id,
                op: op.is_some(),
            });
            self.work
                .extend(node.out.iter().rev().map(|&t| Step::Visit(t)));
        }
        &self.reached
    }

    fn assertion(&mut self, id: StateId) -> u32 {
        let slot = &mut self.assert_index[id as usize];
        if *slot == u32::MAX {
            *slot = self.assert_nodes.len() as u32;
            self.assert_nodes.push(id);
        }
        *slot
    }
}

/// Collapse every non-consuming state of `automaton` into transition
/// annotations.
///
/// States are renumbered breadth-first from the entry; the discovery order
/// is the priority order the scan relies on.
pub fn eliminate<A>(automaton: Automaton<A>) -> Nfa<A> {
    let Automaton {
        mut nodes,
        entry,
        groups,
    } = automaton;

    let mut ids = vec![UNASSIGNED; nodes.len()];
    ids[END as usize] = END;
    ids[entry as usize] = ENTRY;
    // output id -> Thompson id; doubles as the BFS queue
    let mut order: Vec<StateId> = vec![END, entry];

    let mut walk = Closure::new(nodes.len());
    let mut offsets: Vec<u32> = vec![0, 0];
    let mut transitions = Vec::new();
    let mut closures: Vec<ZClosure> = Vec::new();

    let mut next = ENTRY as usize;
    while next < order.len() {
        let from = order[next];
        next += 1;

        for (target, ops) in walk.compute(&nodes, from) {
            let id = &mut ids[*target as usize];
            if *id == UNASSIGNED {
                *id = order.len() as StateId;
                order.push(*target);
            }
            let closure = if ops.is_empty() {
                None
            } else {
                closures.push(ops.clone());
                Some((closures.len() - 1) as u32)
            };
            transitions.push(Transition {
                target: *id,
                closure,
            });
        }
        offsets.push(transitions.len() as u32);
    }

    let states = order
        .iter()
        .map(|&id| match mem::replace(&mut nodes[id as usize].kind, NodeKind::Empty) {
            NodeKind::End => State::End,
            NodeKind::Entry => State::Entry,
            NodeKind::Atom(atom) => State::Atom(atom),
            _ => unreachable!("only consuming states are renumbered"),
        })
        .collect();

    let assertions = walk
        .assert_nodes
        .iter()
        .map(|&id| match mem::replace(&mut nodes[id as usize].kind, NodeKind::Empty) {
            NodeKind::Assert(atom) => atom,
            _ => unreachable!("assertion pool holds assertion nodes"),
        })
        .collect();

    Nfa {
        states,
        offsets,
        transitions,
        closures,
        assertions,
        groups,
        prefilter: None,
    }
}
