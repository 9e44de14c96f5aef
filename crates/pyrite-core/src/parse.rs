use crate::{CfgError, Result};
use tree_sitter::{Parser, Tree};

/// Parse Python source into a tree-sitter syntax tree.
///
/// The parser is the one external boundary of this crate; the returned tree is
/// owned by the caller and every graph built from it borrows it.
pub fn parse_module(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|_| CfgError::Parse)?;
    parser.parse(source, None).ok_or(CfgError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_module() {
        let tree = parse_module("x = 1\n").unwrap();
        assert_eq!(tree.root_node().kind(), "module");
    }
}
