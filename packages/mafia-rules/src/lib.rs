pub mod error;
pub mod events;
pub mod night;
pub mod roles;
pub mod roster;
pub mod rules;
pub mod session;
pub mod verdict;
pub mod voting;

pub use error::*;
pub use events::*;
pub use night::*;
pub use roles::*;
pub use roster::*;
pub use rules::*;
pub use session::*;
pub use verdict::*;
pub use voting::*;

/// Result of asking a collector (night actions or votes) to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<T> {
    /// Some required participant has not acted yet.
    Pending,
    /// Everyone required has acted; the outcome has been applied.
    Resolved(T),
    /// Resolution already fired for this phase. Nothing was changed.
    Closed,
}

impl<T> Resolution<T> {
    pub fn resolved(self) -> Option<T> {
        match self {
            Resolution::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }
}
