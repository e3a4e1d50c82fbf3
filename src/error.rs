// error.rs - Construction errors.
//
// Both kinds originate while building the automaton. Scanning has no
// error path: a built automaton only ever reaches valid states.

/// Error returned when a post-order node sequence cannot be turned into an
/// automaton.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// An operator found too few operands on the stack, or the sequence did
    /// not reduce to exactly one sub-expression.
    ///
    /// Only a broken parser produces this.
    #[error("malformed expression: `{op}` at node {index} lacks operands")]
    Malformed { op: &'static str, index: usize },
    /// The automaton would need more states than the id space allows.
    #[error("automaton exceeds {limit} states")]
    CapacityExceeded { limit: usize },
}

pub type Result<T> = std::result::Result<T, BuildError>;
