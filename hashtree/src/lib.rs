//! A simple crate providing hash tree features (aka. Merkle tree and Merkle proof).
//!
//! A [`HashTree`] is built once from an ordered set of leaf hashes, which are expected to be
//! already digested by the caller. It can then hand out [`HashProof`]s proving that a given leaf
//! was committed under the root hash, without requiring the verifier to know any other leaf.
//!
//! # Pros of the current implementation
//! - No need for smart pointers to link parents and children together, eg. using `Rc` / `Weak` pointers:
//!   nodes live in a single arena and refer to each other by index.
//! - A hash tree is immutable once built, so it can be shared across threads to serve proofs concurrently.
//!
//! # Known limitations of the current implementation
//! - No incremental insertion: changing the leaf set means building a new hash tree.
//! - An odd node at any level is paired with itself, so proofs for such nodes carry their own hash as sibling.
//! - Proof lookup by hash matches the first leaf only, use [`HashTree::proof_at`] to pick among duplicate leaves.

mod error;
mod hash;

pub use error::{Error, Result};
pub use hash::{verify, HashNode, HashProof, HashTree, Hasher, NodeId, Position};

#[cfg(feature = "digest_compat")]
pub mod compat;
#[cfg(feature = "digest_compat")]
pub use compat::{Sha256, Sha256Proof, Sha256Tree};
