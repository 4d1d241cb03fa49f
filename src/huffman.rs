//! Static Huffman coding: tree construction, code table derivation,
//! encoding and tree-walk decoding.

pub mod code;
pub mod encoder;
pub mod tree;

pub use code::{BitString, CodeTable};
pub use encoder::HuffmanEncoder;
pub use tree::HuffmanTree;
