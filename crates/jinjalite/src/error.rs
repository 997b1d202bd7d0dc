/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template parsing and rendering.

use thiserror::Error;

/// Errors raised while parsing a template source.
///
/// Parsing happens once, at template construction; any of these means no
/// usable template exists.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A control tag opener with no closing delimiter.
    #[error("unterminated control tag at offset {offset}")]
    UnterminatedTag { offset: usize },

    /// A `for`/`if` section with no matching end tag before end of input.
    #[error("unterminated '{keyword}' section at offset {offset}: missing end tag")]
    UnterminatedSection { keyword: String, offset: usize },

    /// An end tag with no matching open section.
    #[error("unexpected '{keyword}' tag at offset {offset}")]
    UnexpectedEndTag { keyword: String, offset: usize },

    /// A control tag body that matches no recognized grammar.
    #[error("unrecognized control tag '{body}' at offset {offset}")]
    MalformedTag { body: String, offset: usize },

    /// A `range(...)` bound that is neither an integer literal nor a name
    /// bound to an integer at parse time.
    #[error("cannot resolve range bound '{bound}' to an integer at offset {offset}")]
    UnresolvedRangeBound { bound: String, offset: usize },
}

/// Errors raised while rendering a parsed template.
///
/// Rendering aborts on the first error; text accumulated so far is
/// discarded.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A `{{ name }}` reference to a name with no binding in the context.
    #[error("variable '{name}' is not bound in this context")]
    UnboundVariable { name: String },

    /// A substitution opener with no closing delimiter.
    #[error("unterminated substitution tag")]
    UnterminatedSubstitution,

    /// A loop variable name that is already bound when the loop begins.
    #[error("variable '{name}' already exists in this context")]
    LoopVariableCollision { name: String },
}

/// Umbrella error for callers that funnel both phases through one type.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
