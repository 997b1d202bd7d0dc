/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template facade and the hand-written template parser.
//!
//! Parsing is a single left-to-right scan over the source with a cursor,
//! mutually recursive with "eat a section body until its end tag". Nesting
//! falls out of the recursion: an inner `{% endfor %}`/`{% endif %}` is
//! consumed by the innermost open section and can never terminate an outer
//! one.

use crate::ast::{Code, Container, ForSection, IfSection, Node};
use crate::context::{Context, Value};
use crate::error::ParseError;

/// A compiled template ready for rendering.
///
/// Owns the original source, the parsed node tree (built once at
/// construction, immutable afterwards) and the long-lived context of
/// caller bindings. Rendering never mutates the tree; only the context
/// changes between calls.
#[derive(Debug, Clone)]
pub struct Template {
    pub(crate) source: String,
    pub(crate) root: Container,
    pub(crate) context: Context,
}

impl Template {
    /// Compile a template from source text.
    ///
    /// Parsing happens immediately; on failure no template value exists.
    /// A `range(identifier)` bound cannot be resolved without bindings —
    /// use [`Template::compile_with_bindings`] for those templates.
    ///
    /// # Arguments
    /// * `source` - The template source text
    ///
    /// # Returns
    /// A compiled template, or an error if parsing fails.
    pub fn compile(source: impl Into<String>) -> Result<Self, ParseError> {
        Self::compile_with_bindings(source, Context::new())
    }

    /// Compile a template with initial bindings.
    ///
    /// The bindings seed the template's context and are consulted at parse
    /// time to resolve `range(identifier)` loop bounds, which must name an
    /// integer binding.
    pub fn compile_with_bindings(
        source: impl Into<String>,
        bindings: Context,
    ) -> Result<Self, ParseError> {
        let source = source.into();
        tracing::debug!(len = source.len(), "compiling template");
        let mut parser = Parser {
            source: &source,
            bindings: &bindings,
            pos: 0,
        };
        let children = parser.parse_children(None)?;
        Ok(Template {
            source,
            root: Container { children },
            context: bindings,
        })
    }

    /// Bind `name` to a value, replacing any earlier binding of that name.
    ///
    /// Chainable, so several values can be bound in one expression.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.context.insert(name, value);
        self
    }

    /// The original template source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The children of the parsed root container.
    pub fn nodes(&self) -> &[Node] {
        &self.root.children
    }

    /// The template's own bindings.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Human-readable indented dump of the parsed tree.
    ///
    /// Debug aid only; the exact shape is not a stable contract.
    pub fn dump_tree(&self) -> String {
        let mut out = String::new();
        self.root.dump_into("", &mut out);
        out
    }
}

/// An open section the recursive parser is currently inside.
#[derive(Clone, Copy)]
struct OpenSection {
    /// Keyword that opened the section.
    keyword: &'static str,
    /// Keyword that closes it.
    end_keyword: &'static str,
    /// Byte offset of the opening tag, for error reporting.
    offset: usize,
}

struct Parser<'a> {
    source: &'a str,
    /// Parse-time bindings, used only to resolve `range(identifier)`.
    bindings: &'a Context,
    pos: usize,
}

impl Parser<'_> {
    /// Parse child nodes until the end tag of `open` is consumed, or until
    /// end of input at top level (`open` is `None`).
    fn parse_children(&mut self, open: Option<OpenSection>) -> Result<Vec<Node>, ParseError> {
        let mut children = Vec::new();

        loop {
            let Some(rel) = self.source[self.pos..].find("{%") else {
                if let Some(open) = open {
                    return Err(ParseError::UnterminatedSection {
                        keyword: open.keyword.to_string(),
                        offset: open.offset,
                    });
                }
                if self.pos < self.source.len() {
                    children.push(Node::Code(Code {
                        text: self.source[self.pos..].to_string(),
                    }));
                    self.pos = self.source.len();
                }
                return Ok(children);
            };

            let tag_start = self.pos + rel;
            if tag_start > self.pos {
                children.push(Node::Code(Code {
                    text: self.source[self.pos..tag_start].to_string(),
                }));
            }

            let body_start = tag_start + 2;
            let close = self.source[body_start..]
                .find("%}")
                .ok_or(ParseError::UnterminatedTag { offset: tag_start })?;
            let body = self.source[body_start..body_start + close].trim();
            self.pos = body_start + close + 2;

            let mut words = body.split_whitespace();
            match words.next() {
                Some("for") => {
                    let section = self.parse_for(body, tag_start)?;
                    children.push(Node::For(section));
                }
                Some("if") => {
                    let section = self.parse_if(body, tag_start)?;
                    children.push(Node::If(section));
                }
                Some(keyword @ ("endfor" | "endif")) => {
                    if words.next().is_some() {
                        return Err(ParseError::MalformedTag {
                            body: body.to_string(),
                            offset: tag_start,
                        });
                    }
                    if open.is_some_and(|o| o.end_keyword == keyword) {
                        return Ok(children);
                    }
                    return Err(ParseError::UnexpectedEndTag {
                        keyword: keyword.to_string(),
                        offset: tag_start,
                    });
                }
                _ => {
                    return Err(ParseError::MalformedTag {
                        body: body.to_string(),
                        offset: tag_start,
                    });
                }
            }
        }
    }

    /// Parse a `for <name> in range(<bound>)` tag body and its section.
    ///
    /// The cursor is just past the opening tag; on success it is past the
    /// matching `{% endfor %}`.
    fn parse_for(&mut self, body: &str, offset: usize) -> Result<ForSection, ParseError> {
        let tokens: Vec<&str> = body.split_whitespace().collect();
        if tokens.len() < 4 || tokens[2] != "in" {
            return Err(ParseError::MalformedTag {
                body: body.to_string(),
                offset,
            });
        }
        let var_name = tokens[1];
        // Rejoin so whitespace inside the parens is irrelevant.
        let range_expr = tokens[3..].concat();
        let bound = range_expr
            .strip_prefix("range(")
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| ParseError::MalformedTag {
                body: body.to_string(),
                offset,
            })?;
        let end = self.resolve_range_bound(bound, offset)?;

        let children = self.parse_children(Some(OpenSection {
            keyword: "for",
            end_keyword: "endfor",
            offset,
        }))?;
        tracing::trace!(var = var_name, end, "parsed for section");
        Ok(ForSection {
            var_name: var_name.to_string(),
            start: 0,
            end,
            children,
        })
    }

    /// Parse an `if [not] <name>` tag body and its section.
    fn parse_if(&mut self, body: &str, offset: usize) -> Result<IfSection, ParseError> {
        let tokens: Vec<&str> = body.split_whitespace().collect();
        let (negated, var_name) = match tokens.as_slice() {
            ["if", name] => (false, *name),
            ["if", "not", name] => (true, *name),
            _ => {
                return Err(ParseError::MalformedTag {
                    body: body.to_string(),
                    offset,
                });
            }
        };

        let children = self.parse_children(Some(OpenSection {
            keyword: "if",
            end_keyword: "endif",
            offset,
        }))?;
        tracing::trace!(var = var_name, negated, "parsed if section");
        Ok(IfSection {
            negated,
            var_name: var_name.to_string(),
            children,
        })
    }

    /// Resolve a range bound: an integer literal, or an identifier already
    /// bound to an integer at parse time.
    fn resolve_range_bound(&self, bound: &str, offset: usize) -> Result<i64, ParseError> {
        if let Ok(value) = bound.parse::<i64>() {
            return Ok(value);
        }
        match self.bindings.get(bound) {
            Some(Value::Int(value)) => Ok(*value),
            _ => Err(ParseError::UnresolvedRangeBound {
                bound: bound.to_string(),
                offset,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(source: &str) -> Template {
        Template::compile(source).expect("template should parse")
    }

    #[test]
    fn test_plain_text_is_a_single_code_leaf() {
        let template = compile("no tags here");
        assert_eq!(
            template.nodes(),
            &[Node::Code(Code {
                text: "no tags here".to_string()
            })]
        );
    }

    #[test]
    fn test_empty_source_parses_to_empty_root() {
        let template = compile("");
        assert!(template.nodes().is_empty());
    }

    #[test]
    fn test_adjacent_tags_produce_no_empty_code_leaf() {
        let template = compile("{% if a %}{% endif %}{% if b %}{% endif %}");
        assert_eq!(template.nodes().len(), 2);
        assert!(
            template
                .nodes()
                .iter()
                .all(|n| matches!(n, Node::If(IfSection { children, .. }) if children.is_empty()))
        );
    }

    #[test]
    fn test_for_with_literal_bound() {
        let template = compile("{% for i in range(3) %}x{% endfor %}");
        match &template.nodes()[0] {
            Node::For(section) => {
                assert_eq!(section.var_name, "i");
                assert_eq!(section.start, 0);
                assert_eq!(section.end, 3);
                assert_eq!(section.children.len(), 1);
            }
            other => panic!("expected for section, got {other:?}"),
        }
    }

    #[test]
    fn test_for_bound_whitespace_inside_parens() {
        let template = compile("{% for i in range( 4 ) %}{% endfor %}");
        match &template.nodes()[0] {
            Node::For(section) => assert_eq!(section.end, 4),
            other => panic!("expected for section, got {other:?}"),
        }
    }

    #[test]
    fn test_for_bound_from_binding() {
        let mut bindings = Context::new();
        bindings.insert("count", 5);
        let template =
            Template::compile_with_bindings("{% for i in range(count) %}{% endfor %}", bindings)
                .unwrap();
        match &template.nodes()[0] {
            Node::For(section) => assert_eq!(section.end, 5),
            other => panic!("expected for section, got {other:?}"),
        }
    }

    #[test]
    fn test_for_bound_unresolvable_without_binding() {
        let err = Template::compile("{% for i in range(count) %}{% endfor %}").unwrap_err();
        assert!(matches!(err, ParseError::UnresolvedRangeBound { bound, .. } if bound == "count"));
    }

    #[test]
    fn test_for_bound_must_be_integer_binding() {
        let mut bindings = Context::new();
        bindings.insert("count", "five");
        let err =
            Template::compile_with_bindings("{% for i in range(count) %}{% endfor %}", bindings)
                .unwrap_err();
        assert!(matches!(err, ParseError::UnresolvedRangeBound { .. }));
    }

    #[test]
    fn test_if_and_if_not() {
        let template = compile("{% if a %}{% endif %}{% if not b %}{% endif %}");
        match (&template.nodes()[0], &template.nodes()[1]) {
            (Node::If(plain), Node::If(negated)) => {
                assert!(!plain.negated);
                assert_eq!(plain.var_name, "a");
                assert!(negated.negated);
                assert_eq!(negated.var_name, "b");
            }
            other => panic!("expected two if sections, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_sections_attach_to_innermost() {
        let template = compile("{% for i in range(2) %}{% if x %}a{% endif %}{% endfor %}");
        match &template.nodes()[0] {
            Node::For(outer) => match &outer.children[0] {
                Node::If(inner) => assert_eq!(inner.children.len(), 1),
                other => panic!("expected nested if, got {other:?}"),
            },
            other => panic!("expected for section, got {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_section() {
        let err = Template::compile("{% for i in range(2) %}no end tag").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedSection { keyword, .. } if keyword == "for"));
    }

    #[test]
    fn test_unterminated_tag() {
        let err = Template::compile("text {% for i in range(2)").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedTag { offset: 5 }));
    }

    #[test]
    fn test_stray_end_tag() {
        let err = Template::compile("{% endfor %}").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEndTag { keyword, .. } if keyword == "endfor"));
    }

    #[test]
    fn test_mismatched_end_tag() {
        let err = Template::compile("{% for i in range(2) %}{% endif %}{% endfor %}").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEndTag { keyword, .. } if keyword == "endif"));
    }

    #[test]
    fn test_unknown_keyword() {
        let err = Template::compile("{% while x %}{% endwhile %}").unwrap_err();
        assert!(matches!(err, ParseError::MalformedTag { body, .. } if body == "while x"));
    }

    #[test]
    fn test_malformed_for_body() {
        let err = Template::compile("{% for i range(2) %}{% endfor %}").unwrap_err();
        assert!(matches!(err, ParseError::MalformedTag { .. }));
    }

    #[test]
    fn test_malformed_if_body() {
        let err = Template::compile("{% if a and b %}{% endif %}").unwrap_err();
        assert!(matches!(err, ParseError::MalformedTag { .. }));
    }

    #[test]
    fn test_dump_tree() {
        let template = compile("hi {% for i in range(2) %}{{i}}{% endfor %}");
        let expected = "\
Container {
    Code \"hi \"
    For ( i in range(0, 2) ) {
        Code \"{{i}}\"
    }
}
";
        assert_eq!(template.dump_tree(), expected);
    }
}
