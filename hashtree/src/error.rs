use thiserror::Error;

/// Errors raised while building a hash tree or handling its proofs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A hash tree needs at least one leaf.
    #[error("cannot build a hash tree without any leaf")]
    EmptyInput,

    #[error("no leaf matches the given hash")]
    NotFound,

    #[error("leaf index {index} is out of bounds (the tree has {len} leaves)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Every sibling hash of a proof comes with exactly one position.
    #[error("invalid proof shape: {hashes} sibling hashes for {positions} positions")]
    InvalidProofShape { hashes: usize, positions: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
