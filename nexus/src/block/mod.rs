pub mod command;
pub mod mrbayes;

use std::ops::Range;

use crate::block::command::Command;
use crate::block::mrbayes::MrBayesBlock;

/// Name of the block kind that configures a MrBayes run.
pub const MRBAYES_BLOCK: &str = "mrbayes";

/// A `BEGIN <name>; ... END;` construct.
#[derive(Debug, Clone)]
pub struct Block {
    /// The block name as written in the source.
    pub name: String,
    /// Interpreted contents, depending on the block kind.
    pub body: BlockBody,
    /// Byte span from `BEGIN` through the `;` that closes `END`.
    pub span: Range<usize>,
}

#[derive(Debug, Clone)]
pub enum BlockBody {
    MrBayes(MrBayesBlock),
    /// A block kind that is not interpreted. Its commands are kept verbatim.
    Opaque(Vec<Command>),
}

impl Block {
    /// Block names compare case-insensitively.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Every command of the block, in source order.
    pub fn commands(&self) -> &[Command] {
        match &self.body {
            BlockBody::MrBayes(block) => &block.commands,
            BlockBody::Opaque(commands) => commands,
        }
    }
}
