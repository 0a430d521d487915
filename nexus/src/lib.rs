pub mod block;
pub mod parser;

use crate::block::mrbayes::MrBayesBlock;
use crate::block::{Block, BlockBody, MRBAYES_BLOCK};
use crate::parser::ParseError;

/// A parsed NEXUS file.
#[derive(Debug, Clone)]
pub struct NexusDocument {
    /// Blocks in source order. Names are not required to be unique.
    pub blocks: Vec<Block>,
    /// Non-fatal diagnostics collected while parsing.
    pub warnings: Vec<ParseError>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

impl NexusDocument {
    /// First block whose name matches `name`, ignoring ASCII case.
    pub fn find_block(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.is_named(name))
    }

    /// The first `mrbayes` block. Any later `mrbayes` blocks are ignored.
    pub fn mrbayes_block(&self) -> Option<&MrBayesBlock> {
        match &self.find_block(MRBAYES_BLOCK)?.body {
            BlockBody::MrBayes(block) => Some(block),
            BlockBody::Opaque(_) => None,
        }
    }
}
