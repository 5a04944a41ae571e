use std::cmp::{Eq, Ord, Ordering, PartialEq, PartialOrd, Reverse};
use std::collections::BinaryHeap;
use std::fmt;

use super::{FrequencyTable, Symbol};

/// Rule deciding which of two equally frequent candidates is merged first.
///
/// Every node carries a sequence number: leaves are numbered in
/// first-occurrence order, merged nodes continue the numbering in the order
/// they are created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Smallest sequence number first. Leaves win over merged nodes, which
    /// keeps the spread of code lengths minimal.
    #[default]
    OldestFirst,
    /// Largest sequence number first.
    NewestFirst,
}

impl TieBreak {
    pub fn id(self) -> u8 {
        match self {
            Self::OldestFirst => 0,
            Self::NewestFirst => 1,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::OldestFirst),
            1 => Some(Self::NewestFirst),
            _ => None,
        }
    }

    fn compare(self, sequence: usize, other_sequence: usize) -> Ordering {
        match self {
            Self::OldestFirst => sequence.cmp(&other_sequence),
            Self::NewestFirst => other_sequence.cmp(&sequence),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum NodeKind<S> {
    Leaf { symbol: S },
    Inner { left: usize, right: usize },
}

#[derive(Clone, Debug)]
pub(crate) struct Node<S> {
    pub(crate) frequency: usize,
    pub(crate) kind: NodeKind<S>,
}

/// Heap entry; the arena index doubles as sequence number.
#[derive(Clone, Copy)]
struct MergeCandidate {
    frequency: usize,
    index: usize,
    tie_break: TieBreak,
}

impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.frequency
            .cmp(&other.frequency)
            .then_with(|| self.tie_break.compare(self.index, other.index))
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MergeCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MergeCandidate {}

/// Huffman tree stored as an arena of nodes.
///
/// The first `leaf_count` nodes are the leaves in first-occurrence order,
/// every following node is an inner node whose children precede it.
#[derive(Clone, Debug)]
pub struct HuffmanTree<S> {
    nodes: Vec<Node<S>>,
    root_index: Option<usize>,
    leaf_count: usize,
    tie_break: TieBreak,
}

impl<S: Symbol> HuffmanTree<S> {
    pub fn new(table: &FrequencyTable<S>) -> HuffmanTree<S> {
        Self::with_tie_break(table, TieBreak::default())
    }

    pub fn with_tie_break(table: &FrequencyTable<S>, tie_break: TieBreak) -> HuffmanTree<S> {
        let leaf_count = table.len();
        let mut nodes: Vec<Node<S>> = Vec::with_capacity(2 * leaf_count);
        nodes.extend(table.iter().map(|entry| Node {
            frequency: entry.frequency,
            kind: NodeKind::Leaf {
                symbol: entry.symbol.clone(),
            },
        }));

        let mut heap: BinaryHeap<Reverse<MergeCandidate>> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                Reverse(MergeCandidate {
                    frequency: node.frequency,
                    index,
                    tie_break,
                })
            })
            .collect();

        // merge nodes until only the root is left
        while heap.len() > 1 {
            let (Some(Reverse(lower)), Some(Reverse(upper))) = (heap.pop(), heap.pop()) else {
                unreachable!("heap holds at least two candidates");
            };
            let merged = MergeCandidate {
                frequency: lower.frequency + upper.frequency,
                index: nodes.len(),
                tie_break,
            };
            nodes.push(Node {
                frequency: merged.frequency,
                kind: NodeKind::Inner {
                    left: lower.index,
                    right: upper.index,
                },
            });
            heap.push(Reverse(merged));
        }
        let root_index = heap.pop().map(|Reverse(root)| root.index);

        let tree = HuffmanTree {
            nodes,
            root_index,
            leaf_count,
            tie_break,
        };
        log::debug!(
            "Built Huffman tree with {} leaves, {} inner nodes and depth {}",
            tree.leaf_count(),
            tree.inner_node_count(),
            tree.depth()
        );
        tree
    }
}

impl<S> HuffmanTree<S> {
    pub fn is_empty(&self) -> bool {
        self.root_index.is_none()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn inner_node_count(&self) -> usize {
        self.nodes.len() - self.leaf_count
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Sum of all leaf frequencies, 0 for the empty tree
    pub fn total_frequency(&self) -> usize {
        self.root_index
            .map(|index| self.nodes[index].frequency)
            .unwrap_or(0)
    }

    /// Length of the longest root-to-leaf path. A lone leaf still has depth 1
    /// since it is coded with a single bit.
    pub fn depth(&self) -> usize {
        let Some(root_index) = self.root_index else {
            return 0;
        };
        if let NodeKind::Leaf { .. } = self.nodes[root_index].kind {
            return 1;
        }
        let mut max_depth = 0;
        let mut stack = vec![(root_index, 0)];
        while let Some((index, depth)) = stack.pop() {
            match self.nodes[index].kind {
                NodeKind::Leaf { .. } => max_depth = max_depth.max(depth),
                NodeKind::Inner { left, right } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max_depth
    }

    pub(crate) fn root_index(&self) -> Option<usize> {
        self.root_index
    }

    pub(crate) fn node(&self, index: usize) -> Option<&Node<S>> {
        self.nodes.get(index)
    }
}

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const CONTINUATION: &str = "│   ";
const SPACE: &str = "    ";

// Tree visualization
impl<S: fmt::Debug> HuffmanTree<S> {
    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        index: usize,
        indent: &str,
        last: bool,
    ) -> fmt::Result {
        let node = &self.nodes[index];
        let (branch, continuation) = if last {
            (LAST_BRANCH, SPACE)
        } else {
            (BRANCH, CONTINUATION)
        };
        match &node.kind {
            NodeKind::Leaf { symbol } => writeln!(
                f,
                "{}{}[symbol: {:?} freq: {}]",
                indent, branch, symbol, node.frequency
            ),
            NodeKind::Inner { left, right } => {
                writeln!(f, "{}{}[sum: {}]", indent, branch, node.frequency)?;
                let child_indent = format!("{}{}", indent, continuation);
                self.fmt_node(f, *left, &child_indent, false)?;
                self.fmt_node(f, *right, &child_indent, true)
            }
        }
    }
}

impl<S: fmt::Debug> fmt::Display for HuffmanTree<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root_index {
            Some(root_index) => self.fmt_node(f, root_index, "", true),
            None => writeln!(f, "(empty)"),
        }
    }
}
