// prelude.rs - Convenient re-exports for the match API.
//
//! # Prelude
//!
//! ```
//! use nfascan::prelude::*;
//!
//! let nfa = Nfa::new(vec![Node::atom('4'), Node::atom('2'), Node::concat()]).unwrap();
//! let caps = nfa.find("answer: 42").unwrap();
//! assert_eq!(caps.get(0).unwrap().as_str(), Some("42"));
//! ```

pub use crate::api::{Captures, CapturesIter, FindIter, Match};
pub use crate::error::BuildError;
pub use crate::exec::{ScanEnd, ScanFlags, Scratch};
pub use crate::nfa::{Nfa, NfaBuilder};
pub use crate::node::{Atom, Node};
