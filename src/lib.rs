//! # nfascan
//!
//! Linear-time NFA matching core with leftmost, priority-correct
//! semantics and capture groups.
//!
//! An expression arrives as a post-order sequence of [`node::Node`]s from
//! an external parser. It is compiled once into a consuming-only
//! automaton ([`nfa::Nfa`]) and then scanned by simulating every live path
//! in lock step, one code point at a time. A single scan reports every
//! non-overlapping match it can finalize.
//!
//! ## Quick Start
//!
//! ```rust
//! use nfascan::prelude::*;
//!
//! // ab|b
//! let postfix = vec![
//!     Node::atom('a'),
//!     Node::atom('b'),
//!     Node::concat(),
//!     Node::atom('b'),
//!     Node::alternate(),
//! ];
//! let nfa = Nfa::new(postfix).unwrap();
//! let spans: Vec<_> = nfa
//!     .find_iter("abb")
//!     .map(|caps| caps.get(0).unwrap().range())
//!     .collect();
//! assert_eq!(spans, vec![0..2, 2..3]);
//! ```
//!
//! ## Low-Level Scan API
//!
//! [`exec::find_all`] exposes the scan directly: the caller owns the
//! [`exec::Scratch`], picks the [`encodings::Decoder`] and the
//! [`exec::ScanFlags`], and resumes from the returned offset.
//!
//! ```rust
//! use nfascan::encodings::Utf8;
//! use nfascan::exec::{find_all, ScanEnd, ScanFlags, Scratch};
//! use nfascan::nfa::Nfa;
//! use nfascan::node::Node;
//!
//! let nfa = Nfa::new(vec![Node::atom('a')]).unwrap();
//! let mut scratch = Scratch::new();
//! let end = find_all(&nfa, &Utf8, b"aba", 0, &mut scratch, ScanFlags::empty());
//! assert_eq!(end, Some(ScanEnd::Resume(2)));
//! assert_eq!(scratch.matches()[0].span, 0..1);
//! ```
//!
//! ## Module Structure
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`node`] | Expression nodes and the [`node::Atom`] predicate trait |
//! | [`thompson`] | Thompson construction from post-order nodes |
//! | [`epsilon`] | Epsilon elimination into Z-closures |
//! | [`nfa`] | Compiled automaton and its builder |
//! | [`exec`] | Lock-step scan driver |
//! | [`capture`] | Capture history tree |
//! | [`matchbuf`] | Buffered, non-overlapping matches |
//! | [`prefilter`] | Start-byte skip for literal-led expressions |
//! | [`encodings`] | Code-point decoders |
//! | [`api`] | `Match`, `Captures`, `FindIter` |

pub mod api;
pub mod capture;
pub mod encodings;
pub mod epsilon;
pub mod error;
pub mod exec;
pub mod matchbuf;
pub mod nfa;
pub mod node;
pub mod prefilter;
pub mod prelude;
pub mod sparse_set;
pub mod thompson;
