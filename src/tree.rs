//! Arena of decoding tree nodes.
//!
//! Nodes refer to each other by [`NodeId`]. Parents are only followed when
//! reading a path back out of the tree; the arena owns every node and drops
//! them all at once.

/// Index of a node in its [`CandidateTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One hypothesised message chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The chunk value this node hypothesises.
    pub message_value: u32,
    /// Spine value after appending `message_value` to the parent's spine.
    pub spine_value: u32,
    /// Accumulated prediction error from the root down to this node.
    pub cost: f64,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Distance from the root; also the number of chunks on the path.
    pub depth: usize,
}

#[derive(Debug, Clone)]
pub struct CandidateTree {
    nodes: Vec<Node>,
}

impl CandidateTree {
    /// A tree holding only the virtual root: no chunk, spine `0`, cost `0`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                message_value: 0,
                spine_value: crate::spine::ROOT_SEED,
                cost: 0.0,
                parent: None,
                children: Vec::new(),
                depth: 0,
            }],
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).children
    }

    /// Appends a child to `parent` and returns its id.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        message_value: u32,
        spine_value: u32,
        cost: f64,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self.get(parent).depth + 1;
        self.nodes.push(Node {
            message_value,
            spine_value,
            cost,
            parent: Some(parent),
            children: Vec::new(),
            depth,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Descendants of `id` exactly `depth` levels below it, in child-index
    /// order. Depth zero yields `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId, depth: usize) -> Vec<NodeId> {
        let mut level = vec![id];
        for _ in 0..depth {
            level = level
                .iter()
                .flat_map(|&node| self.children(node).iter().copied())
                .collect();
        }
        level
    }

    /// Chunk values on the path from the root to `id`, root side first.
    #[must_use]
    pub fn path(&self, id: NodeId) -> Vec<u32> {
        let mut values = Vec::with_capacity(self.get(id).depth);
        let mut current = id;
        while let Some(parent) = self.get(current).parent {
            values.push(self.get(current).message_value);
            current = parent;
        }
        values.reverse();
        values
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i), node))
    }
}

impl Default for CandidateTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> CandidateTree {
        let mut tree = CandidateTree::new();
        let root = tree.root();
        for m in 0..2 {
            let child = tree.add_child(root, m, 10 + m, f64::from(m));
            for n in 0..2 {
                tree.add_child(child, n, 20 + n, f64::from(m + n));
            }
        }
        tree
    }

    #[test]
    fn test_root() {
        let tree = CandidateTree::new();
        let root = tree.get(tree.root());
        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(root.depth, 0);
        assert_eq!(root.cost, 0.0);
        assert!(root.parent.is_none());
        assert!(tree.path(tree.root()).is_empty());
    }

    #[test]
    fn test_add_child() {
        let tree = small_tree();
        assert_eq!(tree.len(), 7);
        let children = tree.children(tree.root()).to_vec();
        assert_eq!(children.len(), 2);
        let second = tree.get(children[1]);
        assert_eq!(second.message_value, 1);
        assert_eq!(second.spine_value, 11);
        assert_eq!(second.parent, Some(tree.root()));
        assert_eq!(second.depth, 1);
    }

    #[test]
    fn test_descendants_order() {
        let tree = small_tree();
        let root = tree.root();
        assert_eq!(tree.descendants(root, 0), vec![root]);
        let leaves = tree.descendants(root, 2);
        let spines: Vec<u32> = leaves.iter().map(|&id| tree.get(id).spine_value).collect();
        assert_eq!(spines, vec![20, 21, 20, 21]);
        let values: Vec<Vec<u32>> = leaves.iter().map(|&id| tree.path(id)).collect();
        assert_eq!(values, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
        assert!(tree.descendants(root, 3).is_empty());
    }

    #[test]
    fn test_iter() {
        let tree = small_tree();
        let ids: Vec<usize> = tree.iter().map(|(id, _)| id.index()).collect();
        assert_eq!(ids, (0..7).collect::<Vec<_>>());
    }
}
