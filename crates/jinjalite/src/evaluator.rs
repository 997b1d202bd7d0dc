/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Rendering of parsed templates against a context.
//!
//! Every node kind renders to text by recursing into its children. The
//! tree itself is never mutated; the context is, transiently, when a loop
//! binds its induction variable.

use crate::ast::{Code, Container, ForSection, IfSection, Node};
use crate::context::{Context, Value};
use crate::error::RenderError;
use crate::parser::Template;
use crate::substitute::substitute;

impl Template {
    /// Render this template against its own bindings.
    ///
    /// The bindings are copied into a working context for the duration of
    /// the call, so repeated renders are independent and the caller's
    /// bindings are never disturbed by loop scoping.
    ///
    /// # Returns
    /// The rendered output string, or an error if rendering fails.
    pub fn render(&self) -> Result<String, RenderError> {
        let mut context = self.context.clone();
        self.render_with(&mut context)
    }

    /// Render this template against a caller-supplied context.
    ///
    /// Loop variables are bound into `context` transiently and removed on
    /// every exit path, so the context comes back in its pre-call shape.
    /// Independent contexts make independent concurrent renders of one
    /// template possible.
    pub fn render_with(&self, context: &mut Context) -> Result<String, RenderError> {
        tracing::debug!(len = self.source().len(), "rendering template");
        self.root.render(context)
    }
}

/// Render a node list in order and concatenate the results.
pub fn render_nodes(nodes: &[Node], context: &mut Context) -> Result<String, RenderError> {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&node.render(context)?);
    }
    Ok(out)
}

impl Node {
    /// Render this node against `context`.
    pub fn render(&self, context: &mut Context) -> Result<String, RenderError> {
        match self {
            Node::Container(container) => container.render(context),
            Node::Code(code) => code.render(context),
            Node::For(section) => section.render(context),
            Node::If(section) => section.render(context),
        }
    }
}

impl Container {
    /// Concatenate the rendered text of every child, in order.
    pub fn render(&self, context: &mut Context) -> Result<String, RenderError> {
        render_nodes(&self.children, context)
    }
}

impl Code {
    /// Expand `{{ name }}` references in this leaf's verbatim text.
    pub fn render(&self, context: &Context) -> Result<String, RenderError> {
        substitute(&self.text, context)
    }
}

impl ForSection {
    /// Run the loop body once per integer in `[start, end)`.
    ///
    /// The loop variable is bound before each iteration and removed after
    /// it — error path included — so it never leaks out of the loop's
    /// lexical scope and a nested rebinding of the same name is caught on
    /// the next check. An empty range renders to empty text.
    pub fn render(&self, context: &mut Context) -> Result<String, RenderError> {
        if context.contains(&self.var_name) {
            return Err(RenderError::LoopVariableCollision {
                name: self.var_name.clone(),
            });
        }

        let mut out = String::new();
        for i in self.start..self.end {
            context.insert(self.var_name.as_str(), Value::Int(i));
            let body = render_nodes(&self.children, context);
            context.remove(&self.var_name);
            out.push_str(&body?);
        }
        Ok(out)
    }
}

impl IfSection {
    /// Render the body when the condition holds, empty text otherwise.
    ///
    /// The condition is "the name is bound and its value is truthy",
    /// inverted under `not`. An absent name counts as false here, not an
    /// error; substitution is the strict one.
    pub fn render(&self, context: &mut Context) -> Result<String, RenderError> {
        let truthy = context.get(&self.var_name).is_some_and(|v| v.is_true());
        if truthy != self.negated {
            render_nodes(&self.children, context)
        } else {
            Ok(String::new())
        }
    }
}
