use std::collections::HashMap;
use std::fmt;

use super::tree::NodeKind;
use super::{HuffmanTree, Symbol};

/// A code word held right-aligned in `pattern`.
///
/// A leaf at depth d needs a total frequency of at least Fib(d + 2), so no
/// tree over a `usize` total grows deeper than the 128 bits kept here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CodeWord {
    pattern: u128,
    length: u32,
}

impl CodeWord {
    const EMPTY: CodeWord = CodeWord {
        pattern: 0,
        length: 0,
    };

    pub fn pattern(&self) -> u128 {
        self.pattern
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    fn push(self, bit: bool) -> CodeWord {
        if self.length >= u128::BITS {
            panic!("In CodeWord: attempted to push further than 128 bits");
        }
        CodeWord {
            pattern: (self.pattern << 1) | bit as u128,
            length: self.length + 1,
        }
    }

    /// Bits from the first to the last transmitted one
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.length)
            .rev()
            .map(move |shift| (self.pattern >> shift) & 1 == 1)
    }

    pub fn is_prefix_of(&self, other: &CodeWord) -> bool {
        self.length <= other.length
            && other
                .pattern
                .checked_shr(other.length - self.length)
                .unwrap_or(0)
                == self.pattern
    }
}

impl fmt::Display for CodeWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// Code word per symbol, enumerated in depth-first (left before right) order
#[derive(Clone, Debug)]
pub struct CodeTable<S> {
    entries: Vec<(S, CodeWord)>,
    lookup: HashMap<S, usize>,
}

fn fill_table<S: Symbol>(tree: &HuffmanTree<S>, root_index: usize) -> Vec<(S, CodeWord)> {
    let mut table = Vec::with_capacity(tree.leaf_count());
    let mut stack = vec![(root_index, CodeWord::EMPTY)];
    while let Some((index, code_word)) = stack.pop() {
        let Some(node) = tree.node(index) else {
            panic!("node index {} outside of the tree", index);
        };
        match &node.kind {
            NodeKind::Leaf { symbol } => table.push((symbol.clone(), code_word)),
            NodeKind::Inner { left, right } => {
                // right first, so the left subtree is visited first
                stack.push((*right, code_word.push(true)));
                stack.push((*left, code_word.push(false)));
            }
        }
    }
    table
}

impl<S: Symbol> From<&HuffmanTree<S>> for CodeTable<S> {
    fn from(tree: &HuffmanTree<S>) -> Self {
        let entries = match tree.root_index() {
            None => Vec::new(),
            Some(root_index) => {
                let mut entries = fill_table(tree, root_index);
                if let [(_, code_word)] = entries.as_mut_slice() {
                    // a lone leaf has no path, it is coded as "0"
                    if code_word.length == 0 {
                        *code_word = CodeWord::EMPTY.push(false);
                    }
                }
                entries
            }
        };
        let lookup = entries
            .iter()
            .enumerate()
            .map(|(position, (symbol, _))| (symbol.clone(), position))
            .collect();
        CodeTable { entries, lookup }
    }
}

impl<S: Symbol> CodeTable<S> {
    pub fn get(&self, symbol: &S) -> Option<&CodeWord> {
        self.lookup
            .get(symbol)
            .map(|&position| &self.entries[position].1)
    }
}

impl<S> CodeTable<S> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &CodeWord)> {
        self.entries
            .iter()
            .map(|(symbol, code_word)| (symbol, code_word))
    }

    pub fn max_length(&self) -> u32 {
        self.entries
            .iter()
            .map(|(_, code_word)| code_word.length)
            .max()
            .unwrap_or(0)
    }
}
