use super::{HashTree, Hasher, NodeId};
use crate::{Error, Result};

/// The position of the node being proven at a given step of a hash proof.
///
/// Its sibling always sits on the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// The current node is a left child, its sibling is on the right.
    Left,
    /// The current node is a right child, its sibling is on the left.
    Right,
}

impl Position {
    /// Compute the parent hash of the current hash value and its sibling one.
    fn hash<H: Hasher>(self, current: &H::Hash, sibling: &H::Hash) -> H::Hash {
        match self {
            Self::Left => H::hash(current, sibling),
            Self::Right => H::hash(sibling, current),
        }
    }

    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A hash proof.
///
/// It is built with all sibling hashes required to compute the root hash for a given leaf hash value, ordered from
/// the leaf up to the root.
#[derive(Debug)]
pub struct HashProof<H: Hasher> {
    hashes: Vec<H::Hash>,
    positions: Vec<Position>,
}

// Don't use `#[derive(PartialEq, Clone)]` here as it would require `Hasher` to implement them as well.
impl<H: Hasher> PartialEq for HashProof<H> {
    fn eq(&self, other: &Self) -> bool {
        self.hashes == other.hashes && self.positions == other.positions
    }
}

impl<H: Hasher> Clone for HashProof<H> {
    fn clone(&self) -> Self {
        Self {
            hashes: self.hashes.clone(),
            positions: self.positions.clone(),
        }
    }
}

impl<H: Hasher> HashProof<H> {
    /// Assemble a hash proof from its sibling hashes and the matching positions.
    pub fn new(hashes: Vec<H::Hash>, positions: Vec<Position>) -> Result<Self> {
        check_shape(hashes.len(), positions.len())?;

        Ok(Self { hashes, positions })
    }

    /// The number of steps from the leaf to the root.
    #[inline]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// An empty proof is the one of a single leaf tree, whose root is the leaf itself.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    #[inline]
    pub fn hashes(&self) -> &[H::Hash] {
        &self.hashes
    }

    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn steps(&self) -> impl Iterator<Item = (&H::Hash, Position)> {
        self.hashes.iter().zip(self.positions.iter().copied())
    }

    pub fn into_parts(self) -> (Vec<H::Hash>, Vec<Position>) {
        (self.hashes, self.positions)
    }

    /// Compute the hash proof wrt. the given leaf hash value.
    pub fn compute(&self, leaf: H::Hash) -> H::Hash {
        fold::<H>(leaf, &self.hashes, &self.positions)
    }

    /// Compute the hash proof wrt. the given leaf hash value, comparing it to the expected root hash value.
    pub fn verify(&self, root: &H::Hash, leaf: H::Hash) -> bool {
        let verified = self.compute(leaf) == *root;
        log::trace!("hash proof of {} steps verified: {verified}", self.len());
        verified
    }
}

/// Verify that `leaf` is included under `root`, given the sibling hashes and positions of its proof path.
///
/// Fails when the proof path doesn't have as many positions as sibling hashes.
pub fn verify<H: Hasher>(root: &H::Hash, leaf: H::Hash, hashes: &[H::Hash], positions: &[Position]) -> Result<bool> {
    check_shape(hashes.len(), positions.len())?;

    Ok(fold::<H>(leaf, hashes, positions) == *root)
}

fn check_shape(hashes: usize, positions: usize) -> Result<()> {
    match hashes == positions {
        true => Ok(()),
        false => Err(Error::InvalidProofShape { hashes, positions }),
    }
}

fn fold<H: Hasher>(leaf: H::Hash, hashes: &[H::Hash], positions: &[Position]) -> H::Hash {
    hashes
        .iter()
        .zip(positions)
        .fold(leaf, |current, (sibling, position)| position.hash::<H>(&current, sibling))
}

impl<H: Hasher> HashTree<H> {
    /// Build the proof of the first leaf matching the given hash.
    pub fn proof(&self, leaf: &H::Hash) -> Result<HashProof<H>> {
        let index = self.leaf_index(leaf).ok_or(Error::NotFound)?;

        self.proof_at(index)
    }

    /// Build the proof of the leaf at the given position.
    pub fn proof_at(&self, index: usize) -> Result<HashProof<H>> {
        if index >= self.len() {
            return Err(Error::IndexOutOfBounds { index, len: self.len() });
        }

        let (hashes, positions) = self
            .ancestors(NodeId(index))
            .map(|(current, parent)| match self.at(parent).children() {
                Some((left, right)) if left == current => (self.at(right).hash().clone(), Position::Left),
                Some((left, _)) => (self.at(left).hash().clone(), Position::Right),
                None => unreachable!("a parent node always has children"),
            })
            .inspect(|(sibling, position)| log::trace!("proof step: {position:?} of {sibling:?}"))
            .unzip();

        Ok(HashProof { hashes, positions })
    }
}
