use std::cmp::{Eq, Ord, Ordering, PartialEq, PartialOrd, Reverse};
use std::collections::BinaryHeap;
use std::fmt;

use super::code::{BitString, CodeTable};
use crate::error::Error;
use crate::model::{FrequencyTable, Symbol};
use crate::Result;

#[derive(Clone, Copy)]
enum NodeKind<S> {
    Leaf { symbol: S },
    Inner { left: usize, right: usize },
}

#[derive(Clone, Copy)]
struct Node<S> {
    weight: usize,
    index: usize,
    kind: NodeKind<S>,
}

/// Huffman tree kept in an arena, children are referenced by index.
///
/// Leaves are created first in ascending symbol order, inner nodes get
/// increasing indices as they are merged. Nodes of equal weight are taken
/// from the heap by lower index, so ties resolve towards leaves, towards
/// smaller symbols and towards older inner nodes. The first node taken
/// becomes the left child (bit 0).
pub struct HuffmanTree<S: Symbol> {
    nodes: Vec<Node<S>>,
    root_index: usize,
}

impl<S> Ord for Node<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then(self.index.cmp(&other.index))
    }
}

impl<S> PartialOrd for Node<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> PartialEq for Node<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S> Eq for Node<S> {}

fn fill_table<S: Symbol>(
    table: &mut CodeTable<S>,
    node: Node<S>,
    tree: &HuffmanTree<S>,
    current_pattern: BitString,
) {
    match node.kind {
        NodeKind::Leaf { symbol } => {
            table.insert(symbol, current_pattern);
        }
        NodeKind::Inner { left, right } => {
            fill_table(table, tree.nodes[left], tree, current_pattern.push(false));
            fill_table(table, tree.nodes[right], tree, current_pattern.push(true));
        }
    }
}

impl<S: Symbol> HuffmanTree<S> {
    pub fn new(frequencies: &FrequencyTable<S>) -> HuffmanTree<S> {
        let mut heap = BinaryHeap::new();
        // frequency tables are never empty, both constructors reject it
        let mut nodes: Vec<Node<S>> = Vec::with_capacity(2 * frequencies.alphabet_size() - 1);

        // create the initial nodeset
        for sf in frequencies.iter() {
            let node = Node {
                weight: sf.frequency,
                index: nodes.len(),
                kind: NodeKind::Leaf { symbol: sf.symbol },
            };
            heap.push(Reverse(node));
            nodes.push(node);
        }
        if frequencies.is_degenerate() {
            log::warn!("Huffman tree over a single symbol, its code will be one bit long");
        }
        // merge nodes until one is left
        let root_index = loop {
            match (heap.pop(), heap.pop()) {
                (Some(Reverse(left)), Some(Reverse(right))) => {
                    let node = Node {
                        weight: left.weight + right.weight,
                        index: nodes.len(),
                        kind: NodeKind::Inner {
                            left: left.index,
                            right: right.index,
                        },
                    };
                    heap.push(Reverse(node));
                    nodes.push(node);
                }
                (Some(Reverse(root)), None) => break root.index,
                (None, _) => unreachable!("frequency tables always hold a symbol"),
            }
        };
        log::debug!(
            "Built huffman tree with {} nodes, root weight {}",
            nodes.len(),
            nodes[root_index].weight
        );
        HuffmanTree { nodes, root_index }
    }

    fn root(&self) -> Node<S> {
        self.nodes[self.root_index]
    }

    /// Derives the code table; a lone symbol is given the code `0`.
    pub fn generate_codes(&self) -> CodeTable<S> {
        let mut table = CodeTable::new();
        let root = self.root();
        match root.kind {
            NodeKind::Leaf { symbol } => table.insert(symbol, BitString::new().push(false)),
            NodeKind::Inner { .. } => fill_table(&mut table, root, self, BitString::new()),
        }
        table
    }

    /// Decodes `length` symbols by walking the tree bit by bit.
    pub fn decode(&self, bits: &BitString, length: usize) -> Result<Vec<S>> {
        let mut out = Vec::with_capacity(length);
        let mut bits = bits.iter();
        let mut current_index = self.root_index;
        while out.len() < length {
            let take_right = bits.next().ok_or(Error::TruncatedBitString(out.len()))?;
            match self.nodes[current_index].kind {
                NodeKind::Inner { left, right } => {
                    current_index = if take_right { right } else { left };
                }
                NodeKind::Leaf { .. } if take_right => {
                    return Err(Error::InvalidBitString(String::from("1")));
                }
                NodeKind::Leaf { .. } => {}
            }
            if let NodeKind::Leaf { symbol } = self.nodes[current_index].kind {
                out.push(symbol);
                current_index = self.root_index;
            }
        }
        Ok(out)
    }
}

const BOX_DRAWINGS_DOUBLE_HORIZONTAL: &str = "═";
const SPACE: &str = " ";

// Node & Tree visualization
impl<S: Symbol> Node<S> {
    fn get_string(&self, tree: &HuffmanTree<S>) -> Vec<String> {
        match self.kind {
            NodeKind::Leaf { symbol } => vec![format!("(s:{:?},f:{})", symbol, self.weight)],
            NodeKind::Inner { left, right } => {
                let left_box: Vec<String> = tree.nodes[left].get_string(tree);
                let right_box: Vec<String> = tree.nodes[right].get_string(tree);
                let left_width = left_box[0].chars().count();
                let right_width = right_box[0].chars().count();
                let mut result: Vec<String> = Vec::new();

                result.push(format!(
                    "{}•{}",
                    SPACE.repeat(left_width),
                    SPACE.repeat(right_width)
                ));
                result.push(format!(
                    "{}║{}",
                    SPACE.repeat(left_width),
                    SPACE.repeat(right_width)
                ));

                let left_pos = anchor_position(&left_box[0]);
                let right_pos = anchor_position(&right_box[0]);
                result.push(format!(
                    "{}╔{}╩{}╗{}",
                    SPACE.repeat(left_pos),
                    BOX_DRAWINGS_DOUBLE_HORIZONTAL.repeat(left_width - left_pos - 1),
                    BOX_DRAWINGS_DOUBLE_HORIZONTAL.repeat(right_pos),
                    SPACE.repeat(right_width - right_pos - 1)
                ));

                let left_depth = left_box.len();
                let right_depth = right_box.len();
                for i in 0..std::cmp::max(left_depth, right_depth) {
                    let left_str = left_box
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| SPACE.repeat(left_width));
                    let right_str = right_box
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| SPACE.repeat(right_width));
                    result.push(format!("{} {}", left_str, right_str));
                }
                result
            }
        }
    }
}

/// Column of the middle of the drawn label in the first line of a box.
fn anchor_position(line: &str) -> usize {
    let indent = line.chars().take_while(|&c| c == ' ').count();
    (indent * 2 + line.trim().chars().count()) / 2
}

impl<S: Symbol> fmt::Display for HuffmanTree<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strs = self.root().get_string(self);
        for s in strs.iter() {
            writeln!(f, "{}", s)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::{HuffmanTree, NodeKind};
    use crate::error::Error;
    use crate::huffman::code::BitString;
    use crate::model::FrequencyTable;

    fn calculate_depth_for_each_node<S: crate::model::Symbol>(tree: &HuffmanTree<S>) -> Vec<usize> {
        let mut return_value = vec![usize::default(); tree.nodes.len()];
        let mut node_index_stack = vec![tree.root_index];
        while let Some(index) = node_index_stack.pop() {
            if let NodeKind::Inner { left, right } = tree.nodes[index].kind {
                return_value[left] = return_value[index] + 1;
                return_value[right] = return_value[index] + 1;
                node_index_stack.push(left);
                node_index_stack.push(right);
            }
        }
        return_value
    }

    const SYMBOLS_AND_FREQUENCIES_ODD_LEN: &[(u8, usize); 7] =
        &[(1, 17), (2, 3), (3, 12), (4, 3), (5, 18), (6, 12), (7, 13)];

    fn create_test_tree() -> HuffmanTree<u8> {
        let frequencies = FrequencyTable::from_counts(SYMBOLS_AND_FREQUENCIES_ODD_LEN).unwrap();
        HuffmanTree::new(&frequencies)
    }

    #[test]
    fn test_leaves_come_first_in_symbol_order() {
        let tree = create_test_tree();
        for (index, &(symbol, frequency)) in SYMBOLS_AND_FREQUENCIES_ODD_LEN.iter().enumerate() {
            let node = tree.nodes[index];
            assert_eq!(node.index, index);
            assert_eq!(node.weight, frequency);
            match node.kind {
                NodeKind::Leaf { symbol: leaf } => assert_eq!(leaf, symbol),
                NodeKind::Inner { .. } => panic!("Node {} should be a leaf", index),
            }
        }
    }

    #[test]
    fn test_root_weight_is_total() {
        let tree = create_test_tree();
        assert_eq!(tree.nodes.len(), 2 * SYMBOLS_AND_FREQUENCIES_ODD_LEN.len() - 1);
        assert_eq!(tree.root().weight, 78);
    }

    #[test]
    fn test_calculate_depth_for_each_symbol() {
        let tree = create_test_tree();
        let symbol_depths = calculate_depth_for_each_node(&tree);
        let expected_symbol_depths = [2, 4, 3, 4, 2, 3, 3];
        for (index, (depth, expected_depth)) in symbol_depths
            .into_iter()
            .zip(expected_symbol_depths)
            .enumerate()
        {
            assert_eq!(
                depth, expected_depth,
                "Depth at index {} does not match",
                index
            );
        }
    }

    #[test]
    fn test_equal_weights_resolve_by_symbol_order() {
        let frequencies = FrequencyTable::from_counts(&[('c', 1), ('b', 1), ('a', 1)]).unwrap();
        let codes = HuffmanTree::new(&frequencies).generate_codes();
        assert_eq!(codes.get(&'c').unwrap().to_string(), "0");
        assert_eq!(codes.get(&'a').unwrap().to_string(), "10");
        assert_eq!(codes.get(&'b').unwrap().to_string(), "11");
    }

    #[test]
    fn test_generated_codes_are_prefix_free() {
        let codes = create_test_tree().generate_codes();
        assert_eq!(codes.len(), SYMBOLS_AND_FREQUENCIES_ODD_LEN.len());
        assert!(codes.is_prefix_free());
        assert!(codes.iter().all(|(_, code)| !code.is_empty()));
    }

    #[test]
    fn test_generate_codes_starts_from_empty_table() {
        let tree = create_test_tree();
        let first = tree.generate_codes();
        let other = HuffmanTree::new(&FrequencyTable::from_counts(&[(9u8, 1), (8, 2)]).unwrap());
        let _ = other.generate_codes();
        let second = tree.generate_codes();
        assert_eq!(first, second);
        assert_eq!(other.generate_codes().len(), 2);
    }

    #[test]
    fn test_single_symbol_gets_one_bit_code() {
        let frequencies = FrequencyTable::from_counts(&[('a', 4)]).unwrap();
        let tree = HuffmanTree::new(&frequencies);
        let codes = tree.generate_codes();
        assert_eq!(codes.len(), 1);
        assert_eq!(codes.get(&'a').unwrap().to_string(), "0");
        let decoded = tree.decode(&"0000".parse().unwrap(), 4).unwrap();
        assert_eq!(decoded, vec!['a'; 4]);
        assert!(matches!(
            tree.decode(&"01".parse().unwrap(), 2),
            Err(Error::InvalidBitString(_))
        ));
    }

    #[test]
    fn test_decode_stops_after_length() {
        let frequencies = FrequencyTable::from_counts(&[('a', 2), ('b', 1)]).unwrap();
        let tree = HuffmanTree::new(&frequencies);
        let bits: BitString = "11001".parse().unwrap();
        assert_eq!(tree.decode(&bits, 3).unwrap(), vec!['a', 'a', 'b']);
        assert!(matches!(
            tree.decode(&bits, 6),
            Err(Error::TruncatedBitString(5))
        ));
    }

    #[test]
    fn test_tree_drawing_shows_every_leaf() {
        let frequencies = FrequencyTable::from_counts(&[('a', 2), ('b', 1), (' ', 1)]).unwrap();
        let drawing = HuffmanTree::new(&frequencies).to_string();
        assert!(drawing.starts_with(' '));
        for label in ["(s:'a',f:2)", "(s:'b',f:1)", "(s:' ',f:1)"] {
            assert!(drawing.contains(label), "{} missing in\n{}", label, drawing);
        }
    }
}
