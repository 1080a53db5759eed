use std::fmt::Debug;

use crate::{Error, Result};

mod proof;
pub use proof::{verify, HashProof, Position};

/// A hasher trait to produce hash values.
pub trait Hasher: Default {
    type Hash: AsRef<[u8]> + Clone + PartialEq + Debug;

    fn write(&mut self, bytes: &[u8]);
    fn finish(self) -> Self::Hash;

    /// Combine two hash values into their parent one, ie. `H(first || second)`.
    fn hash(first: impl AsRef<[u8]>, second: impl AsRef<[u8]>) -> Self::Hash
    where
        Self: Sized,
    {
        let mut hasher = Self::default();
        hasher.write(first.as_ref());
        hasher.write(second.as_ref());
        hasher.finish()
    }
}

/// The position of a node in the arena of its hash tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A hash node in the hash tree.
///
/// A leaf has no children, a branch always has two of them (possibly the same node twice when an odd node got
/// paired with itself). The parent link is only a back-reference used to climb up the tree.
#[derive(Debug)]
pub struct HashNode<H: Hasher> {
    hash: H::Hash,
    children: Option<(NodeId, NodeId)>,
    parent: Option<NodeId>,
}

impl<H: Hasher> HashNode<H> {
    fn leaf(hash: H::Hash) -> Self {
        Self {
            hash,
            children: None,
            parent: None,
        }
    }

    fn branch(hash: H::Hash, left: NodeId, right: NodeId) -> Self {
        Self {
            hash,
            children: Some((left, right)),
            parent: None,
        }
    }

    #[inline]
    pub fn hash(&self) -> &H::Hash {
        &self.hash
    }

    #[inline]
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.children
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A hash tree.
///
/// Leaves are stored first in the arena, in the exact order they were given, followed by branches level by level.
#[derive(Debug)]
pub struct HashTree<H: Hasher> {
    nodes: Vec<HashNode<H>>,
    leaves: usize,
    root: NodeId,
}

#[allow(clippy::len_without_is_empty)]
impl<H: Hasher> HashTree<H> {
    /// Build a hash tree over the given ordered leaf hashes.
    ///
    /// Whenever a level holds an odd number of nodes, its last node is paired with itself.
    pub fn build<I>(hashes: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<H::Hash>,
    {
        let mut nodes = hashes
            .into_iter()
            .map(|hash| HashNode::leaf(hash.into()))
            .collect::<Vec<_>>();

        let leaves = nodes.len();
        if leaves == 0 {
            return Err(Error::EmptyInput);
        }

        let mut level = (0..leaves).map(NodeId).collect::<Vec<_>>();
        while level.len() > 1 {
            if level.len() % 2 != 0 {
                let last = level[level.len() - 1];
                level.push(last);
            }

            level = level
                .chunks_exact(2)
                .map(|pair| {
                    let (left, right) = (pair[0], pair[1]);
                    let parent = NodeId(nodes.len());
                    let hash = H::hash(&nodes[left.0].hash, &nodes[right.0].hash);

                    nodes[left.0].parent = Some(parent);
                    nodes[right.0].parent = Some(parent);
                    nodes.push(HashNode::branch(hash, left, right));

                    parent
                })
                .collect();
        }

        let tree = Self {
            root: level[0],
            nodes,
            leaves,
        };

        log::debug!(
            "built hash tree with {} leaves ({} nodes, depth {})",
            tree.len(),
            tree.nodes.len(),
            tree.depth()
        );

        Ok(tree)
    }

    #[inline]
    pub fn root(&self) -> &HashNode<H> {
        self.at(self.root)
    }

    /// The root hash, committing to the whole set of leaves.
    #[inline]
    pub fn hash(&self) -> &H::Hash {
        self.root().hash()
    }

    /// The number of leaves, which is never zero.
    #[inline]
    pub fn len(&self) -> usize {
        self.leaves
    }

    /// The number of levels above the leaves, a single leaf tree having a depth of zero.
    pub fn depth(&self) -> usize {
        self.ancestors(NodeId(0)).count()
    }

    /// Get a node from its identifier, if it belongs to this hash tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&HashNode<H>> {
        self.nodes.get(id.0)
    }

    // identifiers handed out by this hash tree always point into its arena
    #[inline]
    fn at(&self, id: NodeId) -> &HashNode<H> {
        &self.nodes[id.0]
    }

    /// Iterate over leaf hashes, in insertion order.
    pub fn leaves(&self) -> impl Iterator<Item = &H::Hash> {
        self.nodes[..self.leaves].iter().map(HashNode::hash)
    }

    /// Find the position of the first leaf matching the given hash.
    pub fn leaf_index(&self, hash: &H::Hash) -> Option<usize> {
        self.leaves().position(|leaf| leaf == hash)
    }

    /// Climb up the hash tree from the given node, yielding `(node, parent)` pairs up to the root.
    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        std::iter::successors(self.at(id).parent().map(|parent| (id, parent)), |&(_, node)| {
            self.at(node).parent().map(|parent| (node, parent))
        })
    }
}

impl<H: Hasher> TryFrom<Vec<H::Hash>> for HashTree<H> {
    type Error = Error;

    fn try_from(hashes: Vec<H::Hash>) -> Result<Self> {
        Self::build(hashes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;

    #[derive(Debug, Default)]
    pub(super) struct SimpleHasher(Vec<u8>);
    impl Hasher for SimpleHasher {
        type Hash = String;

        fn write(&mut self, bytes: &[u8]) {
            self.0.extend_from_slice(bytes)
        }

        fn finish(self) -> Self::Hash {
            String::from_utf8(self.0).unwrap()
        }
    }

    pub(super) fn tree(leaves: impl IntoIterator<Item = char>) -> HashTree<SimpleHasher> {
        HashTree::build(leaves.into_iter().map(String::from)).unwrap()
    }

    #[test]
    fn empty_tree() {
        assert_matches!(HashTree::<SimpleHasher>::build(Vec::<String>::new()), Err(Error::EmptyInput));
        assert_matches!(HashTree::<SimpleHasher>::try_from(Vec::<String>::new()), Err(Error::EmptyInput));
    }

    #[test]
    fn single_leaf_tree() {
        let tree = tree(['a']);

        assert_eq!(tree.hash(), "a");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.nodes.len(), 1);

        assert!(tree.root().is_leaf());
        assert!(tree.root().is_root());
        assert!(tree.root().children().is_none());
    }

    #[test]
    fn build_trees() {
        for (leaves, root_hash, depth, nodes) in [
            ('a'..='b', "ab", 1, 3),
            ('a'..='c', "abcc", 2, 6),
            ('a'..='d', "abcd", 2, 7),
            ('a'..='e', "abcdeeee", 3, 11),
            ('a'..='f', "abcdefef", 3, 12),
            ('a'..='h', "abcdefgh", 3, 15),
        ] {
            let len = leaves.clone().count();
            let tree = tree(leaves);

            assert_eq!(tree.hash(), root_hash);
            assert_eq!(tree.len(), len);
            assert_eq!(tree.depth(), depth);
            assert_eq!(tree.nodes.len(), nodes);
        }
    }

    #[test]
    fn keep_leaf_order() {
        const LEAVES: &str = "zyxwvu";
        let tree = tree(LEAVES.chars());

        assert!(tree.leaves().zip(LEAVES.chars()).all(|(hash, c)| hash.chars().eq(Some(c))));
        assert_eq!(tree.leaves().count(), LEAVES.len());
        assert_eq!(tree.hash(), "zyxwvuvu");
    }

    #[test]
    fn link_nodes() {
        for leaves in ['a'..='a', 'a'..='b', 'a'..='c', 'a'..='g', 'a'..='z'] {
            let tree = tree(leaves);

            // only the root is parentless
            assert_eq!(tree.nodes.iter().filter(|node| node.is_root()).count(), 1);
            assert!(tree.root().is_root());

            for (index, node) in tree.nodes.iter().enumerate() {
                assert_eq!(node.is_leaf(), index < tree.len());

                if let Some((left, right)) = node.children() {
                    let (left, right) = (tree.at(left), tree.at(right));

                    assert_eq!(node.hash(), &SimpleHasher::hash(left.hash(), right.hash()));
                    assert_eq!(left.parent(), Some(NodeId(index)));
                    assert_eq!(right.parent(), Some(NodeId(index)));
                }
            }

            // every leaf reaches the root
            for index in 0..tree.len() {
                let top = tree.ancestors(NodeId(index)).last().map_or(NodeId(index), |(_, parent)| parent);
                assert_eq!(top, tree.root);
            }
        }
    }

    #[test]
    fn pair_odd_node_with_itself() {
        let tree = tree('a'..='c');

        let parent = tree.node(NodeId(2)).and_then(HashNode::parent).unwrap();
        assert_eq!(tree.node(parent).and_then(HashNode::children), Some((NodeId(2), NodeId(2))));
        assert_eq!(tree.node(parent).map(HashNode::hash).unwrap(), "cc");
    }

    #[test]
    fn foreign_node_id() {
        let small = tree('a'..='b');
        let large = tree('a'..='h');

        // the root of a larger tree lies past the end of a smaller one
        assert_eq!(large.root, NodeId(14));
        assert!(large.node(large.root).is_some_and(HashNode::is_root));
        assert!(small.node(large.root).is_none());
        assert!(small.node(small.root).is_some_and(HashNode::is_root));
    }

    #[test]
    fn find_leaves() {
        let tree = tree("abcab".chars());

        assert_eq!(tree.leaf_index(&String::from("a")), Some(0));
        assert_eq!(tree.leaf_index(&String::from("b")), Some(1));
        assert_eq!(tree.leaf_index(&String::from("c")), Some(2));
        assert_eq!(tree.leaf_index(&String::from("ab")), None); // branches are not leaves
        assert_eq!(tree.leaf_index(&String::from("d")), None);
    }
}
