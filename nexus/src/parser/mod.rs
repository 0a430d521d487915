pub mod error;
pub mod lexer;
mod mrbayes;
mod structural;

pub use error::ParseError;

use crate::NexusDocument;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse the source into a document. Only the `mrbayes` block kind is
    /// interpreted; every other block is kept as a list of commands.
    pub fn parse(&self) -> Result<NexusDocument, Vec<ParseError>> {
        let (blocks, warnings) = structural::parse_blocks(&self.source, self.file_id)?;
        Ok(NexusDocument {
            blocks,
            warnings,
            source_id: self.file_id,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}
