/*
 * substitute.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Variable substitution over flat text fragments.

use crate::context::Context;
use crate::error::RenderError;

/// Replace every `{{ name }}` occurrence in `text` with the bound value's
/// rendered form.
///
/// `text` is a flat fragment: code leaves never contain unparsed control
/// tags. Text outside the delimiters passes through unchanged; the
/// identifier between them is trimmed of surrounding whitespace before
/// lookup.
///
/// Fails when an identifier is unbound, or when a `{{` has no matching
/// `}}`. Unlike `if` conditions, which treat an absent name as false,
/// substitution is strict about unbound names.
pub fn substitute(text: &str, context: &Context) -> Result<String, RenderError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            return Err(RenderError::UnterminatedSubstitution);
        };
        let name = after[..close].trim();
        let value = context.get(name).ok_or_else(|| RenderError::UnboundVariable {
            name: name.to_string(),
        })?;
        out.push_str(&value.render());
        rest = &after[close + 2..];
    }

    out.push_str(rest);
    Ok(out)
}
