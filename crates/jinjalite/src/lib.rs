/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Minimal Jinja-style text template engine.
//!
//! This crate expands a template source string against a set of named
//! scalar values. It supports:
//!
//! - Variable substitution: `{{ name }}`
//! - For loops over integer ranges: `{% for i in range(10) %}...{% endfor %}`
//! - Conditionals: `{% if flag %}...{% endif %}` and `{% if not flag %}...{% endif %}`
//!
//! Templates are parsed once, at construction time, into a tree of control
//! nodes; rendering walks the cached tree against a name→value context and
//! can be repeated with different bindings between calls.
//!
//! # Architecture
//!
//! Parsing and rendering are separate stages. [`Template::compile`] runs a
//! single left-to-right scan over the source and builds the node tree (a
//! parse failure means no template value exists). [`Template::render`]
//! walks the tree against a [`Context`], binding loop variables into it
//! transiently and substituting `{{ name }}` references from it.
//!
//! # Example
//!
//! ```ignore
//! use jinjalite::Template;
//!
//! let mut template = Template::compile("Hello {{name}}!")?;
//! template.set_value("name", "World");
//! assert_eq!(template.render()?, "Hello World!");
//! ```

pub mod ast;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod substitute;

// Re-export main types at crate root
pub use ast::{Code, Container, ForSection, IfSection, Node};
pub use context::{Context, Value};
pub use error::{ParseError, RenderError, TemplateError, TemplateResult};
pub use parser::Template;
pub use substitute::substitute;
