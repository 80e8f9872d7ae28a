use tssc_common::Span;
use tssc_syntax::{Ident, NodeId};

use super::Emitter;
use crate::context::GenContext;
use crate::names::{BUILTIN_CLASS_PREFIX, ESCAPED_CLASS_PREFIX, ESCAPED_VAR_PREFIX, sanitize};

const NIL_WARNING: &str = "Please use SCLang's \"nil\" instead of TypeScript's \"null\" or \"undefined\", \
since SCLang only have \"nil\" for empty values, and using \"null\" or \"undefined\" may result in confusing result.";

fn is_word_tail(name: &str) -> bool {
    name.chars().skip(1).all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// `^[a-z]\w*$`
pub(crate) fn is_legal_var(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) && is_word_tail(name)
}

/// `^[A-Z]\w*$`
pub(crate) fn is_legal_class(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) && is_word_tail(name)
}

/// Legal class name for a declared class: `my-widget` becomes `My_widget`.
pub(crate) fn to_class_name(name: &str) -> String {
    let sanitized = sanitize(name);
    let mut chars = sanitized.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => sanitized,
    }
}

impl Emitter<'_> {
    // =========================================================================
    // Escaping
    // =========================================================================

    /// Variable, function or method name legal in sclang.
    pub(crate) fn escape_var(&mut self, name: &str, span: Span) -> String {
        if is_legal_var(name) {
            return name.to_string();
        }
        let escaped = format!("{ESCAPED_VAR_PREFIX}{}", sanitize(name));
        self.warn(
            span,
            format!("The variable name \"{name}\" is illegal in SCLang, and will be replaced to \"{escaped}\"."),
        );
        escaped
    }

    /// As [`Self::escape_var`], for names already reported once.
    pub(crate) fn escape_var_quiet(name: &str) -> String {
        if is_legal_var(name) {
            name.to_string()
        } else {
            format!("{ESCAPED_VAR_PREFIX}{}", sanitize(name))
        }
    }

    pub(crate) fn escape_class(&mut self, name: &str, span: Span) -> String {
        if is_legal_class(name) {
            return name.to_string();
        }
        let escaped = format!("{ESCAPED_CLASS_PREFIX}{}", sanitize(name));
        self.warn(
            span,
            format!("The class name \"{name}\" is illegal in SCLang, and will be replaced to \"{escaped}\"."),
        );
        escaped
    }

    pub(crate) fn warn_nil(&mut self, span: Span) {
        self.warn(span, NIL_WARNING.to_string());
    }

    // =========================================================================
    // Identifier references
    // =========================================================================

    /// An identifier in expression position.
    pub(crate) fn lower_identifier(&mut self, ident: &Ident, id: NodeId, ctx: &GenContext) -> String {
        if ident.text == "undefined" {
            self.warn_nil(ident.span);
            return "nil".to_string();
        }
        let descriptor = self.types.type_of(id);
        if descriptor.from_default_library {
            return format!("{BUILTIN_CLASS_PREFIX}{}", ident.text);
        }
        if ctx.is_generating_class_name || descriptor.is_class {
            self.escape_class(&ident.text, ident.span)
        } else {
            self.escape_var(&ident.text, ident.span)
        }
    }
}
