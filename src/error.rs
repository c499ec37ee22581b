use thiserror::Error;

/// Reasons a revision's raw declaration tree cannot be turned into a public surface.
///
/// Any of these aborts extraction for the whole revision: a partially extracted
/// surface would show up later as spurious additions or removals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("unsupported declaration in {file}: {decl}")]
    UnsupportedDeclaration { file: String, decl: String },

    #[error("unsupported type expression: {expr}")]
    UnsupportedExpression { expr: String },

    #[error("unsupported method receiver: {receiver}")]
    UnsupportedReceiver { receiver: String },

    #[error("unsupported embedded field: {field}")]
    UnsupportedEmbeddedField { field: String },

    #[error("variadic parameter must be last: {signature}")]
    MisplacedVariadic { signature: String },

    #[error("interface {name} embeds itself")]
    EmbeddingCycle { name: String },
}
