use crate::{CfgError, Result};

/// Closed set of syntax-node kinds the walker understands.
///
/// Classification happens once at dispatch; every variant is handled by an
/// exhaustive match in the builder, so a new variant without a walker rule is
/// a compile error rather than a runtime surprise. A kind string outside this
/// set aborts the build with `UnsupportedSyntax` - skipping it would silently
/// produce an incomplete graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    Module,
    ExpressionStatement,
    Assignment,
    AugmentedAssignment,
    IfStatement,
    ElifClause,
    ElseClause,
    WhileStatement,
    ForStatement,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    PassStatement,
    FunctionDefinition,
    DecoratedDefinition,
    ImportStatement,
    ImportFromStatement,
    Call,
    KeywordArgument,
    BinaryOperator,
    BooleanOperator,
    ComparisonOperator,
    UnaryOperator,
    NotOperator,
    ParenthesizedExpression,
    Attribute,
    Identifier,
    Literal,
    Composite,
    Pair,
    Comment,
}

/// Map a tree-sitter kind string into the closed set.
pub fn classify(kind: &str) -> Result<SyntaxKind> {
    let classified = match kind {
        "module" => SyntaxKind::Module,
        "expression_statement" => SyntaxKind::ExpressionStatement,
        "assignment" => SyntaxKind::Assignment,
        "augmented_assignment" => SyntaxKind::AugmentedAssignment,
        "if_statement" => SyntaxKind::IfStatement,
        "elif_clause" => SyntaxKind::ElifClause,
        "else_clause" => SyntaxKind::ElseClause,
        "while_statement" => SyntaxKind::WhileStatement,
        "for_statement" => SyntaxKind::ForStatement,
        "break_statement" => SyntaxKind::BreakStatement,
        "continue_statement" => SyntaxKind::ContinueStatement,
        "return_statement" => SyntaxKind::ReturnStatement,
        "pass_statement" => SyntaxKind::PassStatement,
        "function_definition" => SyntaxKind::FunctionDefinition,
        "decorated_definition" => SyntaxKind::DecoratedDefinition,
        "import_statement" => SyntaxKind::ImportStatement,
        "import_from_statement" => SyntaxKind::ImportFromStatement,
        "call" => SyntaxKind::Call,
        "keyword_argument" => SyntaxKind::KeywordArgument,
        "binary_operator" => SyntaxKind::BinaryOperator,
        "boolean_operator" => SyntaxKind::BooleanOperator,
        "comparison_operator" => SyntaxKind::ComparisonOperator,
        "unary_operator" => SyntaxKind::UnaryOperator,
        "not_operator" => SyntaxKind::NotOperator,
        "parenthesized_expression" => SyntaxKind::ParenthesizedExpression,
        "attribute" => SyntaxKind::Attribute,
        "identifier" => SyntaxKind::Identifier,
        "integer" | "float" | "string" | "concatenated_string" | "true" | "false" | "none" => {
            SyntaxKind::Literal
        }
        "list" | "tuple" | "set" | "dictionary" | "subscript" | "expression_list" => {
            SyntaxKind::Composite
        }
        "pair" => SyntaxKind::Pair,
        "comment" => SyntaxKind::Comment,
        other => return Err(CfgError::UnsupportedSyntax(other.to_string())),
    };
    Ok(classified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_kinds_classify() {
        assert_eq!(classify("module").unwrap(), SyntaxKind::Module);
        assert_eq!(classify("while_statement").unwrap(), SyntaxKind::WhileStatement);
        assert_eq!(classify("integer").unwrap(), SyntaxKind::Literal);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = classify("class_definition").unwrap_err();
        assert!(err.to_string().contains("class_definition"));
    }
}
