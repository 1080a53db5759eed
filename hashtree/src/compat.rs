pub use digest::{Digest, Output};
pub use sha2::Sha256;

/// A hash tree over SHA-256 leaf digests.
pub type Sha256Tree = crate::HashTree<Sha256>;

/// A hash proof from a [`Sha256Tree`].
pub type Sha256Proof = crate::HashProof<Sha256>;

impl<D: Digest + Default> crate::Hasher for D {
    type Hash = Output<D>;

    fn write(&mut self, bytes: &[u8]) {
        self.update(bytes);
    }

    fn finish(self) -> Self::Hash {
        self.finalize()
    }
}
