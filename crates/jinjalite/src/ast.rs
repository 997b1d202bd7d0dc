/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Control-node tree for parsed templates.
//!
//! The parser builds this tree once per template; it is immutable
//! afterwards. Each composite node exclusively owns its children (strict
//! tree, no sharing). Rendering lives in [`crate::evaluator`]; this module
//! holds the data shapes and the indented debug dump.

use std::fmt::Write as _;

/// A node in the parsed template tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An ordered sequence of child nodes with no text of its own.
    Container(Container),

    /// Verbatim template text outside any control tag.
    Code(Code),

    /// `{% for var in range(n) %}...{% endfor %}`
    For(ForSection),

    /// `{% if [not] var %}...{% endif %}`
    If(IfSection),
}

/// An ordered sequence of child nodes. The parse root is a container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    /// Child nodes, in source order.
    pub children: Vec<Node>,
}

/// A leaf holding a verbatim slice of the template source.
///
/// By construction the slice contains no control tags; substitution tags
/// (`{{ name }}`) inside it are expanded at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    /// The verbatim source slice this leaf covers.
    pub text: String,
}

/// A `for` loop over a half-open integer range.
#[derive(Debug, Clone, PartialEq)]
pub struct ForSection {
    /// Loop variable name, bound to each integer of the range in turn.
    pub var_name: String,

    /// Inclusive start of the iteration range.
    pub start: i64,

    /// Exclusive end of the iteration range.
    pub end: i64,

    /// Loop body, in source order.
    pub children: Vec<Node>,
}

/// An `if` conditional over a single, optionally negated variable.
///
/// There is no `else` branch.
#[derive(Debug, Clone, PartialEq)]
pub struct IfSection {
    /// Whether the condition is written `if not`.
    pub negated: bool,

    /// The tested variable name.
    pub var_name: String,

    /// Body rendered when the condition holds.
    pub children: Vec<Node>,
}

impl Node {
    /// Write an indented human-readable dump of this node into `out`.
    pub fn dump_into(&self, prefix: &str, out: &mut String) {
        match self {
            Node::Container(container) => container.dump_into(prefix, out),
            Node::Code(code) => code.dump_into(prefix, out),
            Node::For(section) => section.dump_into(prefix, out),
            Node::If(section) => section.dump_into(prefix, out),
        }
    }
}

fn dump_children(children: &[Node], prefix: &str, out: &mut String) {
    let inner = format!("{prefix}    ");
    for child in children {
        child.dump_into(&inner, out);
    }
}

impl Container {
    pub fn dump_into(&self, prefix: &str, out: &mut String) {
        let _ = writeln!(out, "{prefix}Container {{");
        dump_children(&self.children, prefix, out);
        let _ = writeln!(out, "{prefix}}}");
    }
}

impl Code {
    pub fn dump_into(&self, prefix: &str, out: &mut String) {
        let _ = writeln!(out, "{prefix}Code {:?}", self.text);
    }
}

impl ForSection {
    pub fn dump_into(&self, prefix: &str, out: &mut String) {
        let _ = writeln!(
            out,
            "{prefix}For ( {} in range({}, {}) ) {{",
            self.var_name, self.start, self.end
        );
        dump_children(&self.children, prefix, out);
        let _ = writeln!(out, "{prefix}}}");
    }
}

impl IfSection {
    pub fn dump_into(&self, prefix: &str, out: &mut String) {
        let not = if self.negated { "not " } else { "" };
        let _ = writeln!(out, "{prefix}If ( {}{} ) {{", not, self.var_name);
        dump_children(&self.children, prefix, out);
        let _ = writeln!(out, "{prefix}}}");
    }
}
