//! Generation context threaded through every lowering call.
//!
//! `GenContext` is a plain value with no behavior of its own. The free
//! derivation functions below read a context and return a modified copy, so
//! a callee can never leak state into a sibling call. Lowering functions take
//! `&GenContext` and derive what they pass down:
//!
//! ```ignore
//! let body_ctx = make_break_means(&indent(ctx, 1), BreakMeans::StopALoop);
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;

/// What an unlabeled `break` compiles to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BreakMeans {
    #[default]
    Nothing,
    EndSwitchCase,
    StopALoop,
}

/// What `super` compiles to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SuperMeans {
    #[default]
    Nothing,
    /// `super(...)` inside a constructor: the superclass factory.
    Constructor,
    /// Static context: the superclass itself.
    ClassName,
    AsItIs,
}

/// What `this` compiles to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThisBinding {
    #[default]
    Nothing,
    ObjectLiteralParameter,
    BuiltInstance,
    Itself,
}

/// Whether the loop body being lowered contains `break`/`continue`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopInterrupt {
    #[default]
    Unknown,
    Present,
    Absent,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassInfo {
    pub name: String,
    pub super_class_name: String,
}

impl Default for ClassInfo {
    fn default() -> Self {
        ClassInfo {
            name: String::new(),
            super_class_name: "Object".to_string(),
        }
    }
}

/// L-value text to reference-cell name, for the expression being rewritten.
pub type Temporaries = FxHashMap<String, String>;

#[derive(Clone, Debug)]
pub struct GenContext {
    pub indent_level: usize,
    pub class_info: ClassInfo,
    pub is_generating_method: bool,
    pub is_generating_constructor: bool,
    pub is_generating_class_name: bool,
    pub is_generating_object_literal_member: bool,
    pub with_early_return: bool,
    pub loop_interrupt: LoopInterrupt,
    /// Empty when the statement being lowered has no label.
    pub statement_label: String,
    pub is_nested_loop: bool,
    pub break_means: BreakMeans,
    pub super_means: SuperMeans,
    pub this_binding: ThisBinding,
    pub temporaries: Arc<Temporaries>,
    pub is_standalone_statement: bool,
    pub has_unhandled_self_increment: bool,
}

impl Default for GenContext {
    fn default() -> Self {
        GenContext {
            indent_level: 0,
            class_info: ClassInfo::default(),
            is_generating_method: false,
            is_generating_constructor: false,
            is_generating_class_name: false,
            is_generating_object_literal_member: false,
            with_early_return: false,
            loop_interrupt: LoopInterrupt::Unknown,
            statement_label: String::new(),
            is_nested_loop: false,
            break_means: BreakMeans::Nothing,
            super_means: SuperMeans::Nothing,
            this_binding: ThisBinding::Nothing,
            temporaries: Arc::default(),
            is_standalone_statement: true,
            has_unhandled_self_increment: false,
        }
    }
}

impl GenContext {
    pub fn new() -> Self {
        GenContext::default()
    }
}

// =============================================================================
// Derivations
// =============================================================================

#[must_use]
pub fn indent(ctx: &GenContext, n: usize) -> GenContext {
    GenContext {
        indent_level: ctx.indent_level + n,
        ..ctx.clone()
    }
}

/// Saturates at zero.
#[must_use]
pub fn outdent(ctx: &GenContext, n: usize) -> GenContext {
    GenContext {
        indent_level: ctx.indent_level.saturating_sub(n),
        ..ctx.clone()
    }
}

/// An empty superclass name means `Object`.
#[must_use]
pub fn with_class_info(ctx: &GenContext, name: &str, super_class_name: &str) -> GenContext {
    let super_class_name = if super_class_name.is_empty() {
        "Object"
    } else {
        super_class_name
    };
    GenContext {
        class_info: ClassInfo {
            name: name.to_string(),
            super_class_name: super_class_name.to_string(),
        },
        ..ctx.clone()
    }
}

/// Context for a sub-expression whose text is embedded in another line.
#[must_use]
pub fn at_value_position(ctx: &GenContext) -> GenContext {
    standalone(ctx, false)
}

#[must_use]
pub fn standalone(ctx: &GenContext, value: bool) -> GenContext {
    GenContext {
        is_standalone_statement: value,
        ..ctx.clone()
    }
}

#[must_use]
pub fn generating_method(ctx: &GenContext, value: bool) -> GenContext {
    GenContext {
        is_generating_method: value,
        ..ctx.clone()
    }
}

#[must_use]
pub fn generating_constructor(ctx: &GenContext, value: bool) -> GenContext {
    GenContext {
        is_generating_constructor: value,
        ..ctx.clone()
    }
}

#[must_use]
pub fn generating_class_name(ctx: &GenContext, value: bool) -> GenContext {
    GenContext {
        is_generating_class_name: value,
        ..ctx.clone()
    }
}

#[must_use]
pub fn generating_object_literal_member(ctx: &GenContext, value: bool) -> GenContext {
    GenContext {
        is_generating_object_literal_member: value,
        ..ctx.clone()
    }
}

#[must_use]
pub fn with_early_return(ctx: &GenContext, value: bool) -> GenContext {
    GenContext {
        with_early_return: value,
        ..ctx.clone()
    }
}

#[must_use]
pub fn with_loop_interrupt(ctx: &GenContext, value: LoopInterrupt) -> GenContext {
    GenContext {
        loop_interrupt: value,
        ..ctx.clone()
    }
}

#[must_use]
pub fn with_statement_label(ctx: &GenContext, label: &str) -> GenContext {
    GenContext {
        statement_label: label.to_string(),
        ..ctx.clone()
    }
}

#[must_use]
pub fn cleared_statement_label(ctx: &GenContext) -> GenContext {
    with_statement_label(ctx, "")
}

#[must_use]
pub fn nested_loop(ctx: &GenContext, value: bool) -> GenContext {
    GenContext {
        is_nested_loop: value,
        ..ctx.clone()
    }
}

#[must_use]
pub fn make_break_means(ctx: &GenContext, value: BreakMeans) -> GenContext {
    GenContext {
        break_means: value,
        ..ctx.clone()
    }
}

#[must_use]
pub fn make_super_means(ctx: &GenContext, value: SuperMeans) -> GenContext {
    GenContext {
        super_means: value,
        ..ctx.clone()
    }
}

#[must_use]
pub fn make_this_binding(ctx: &GenContext, value: ThisBinding) -> GenContext {
    GenContext {
        this_binding: value,
        ..ctx.clone()
    }
}

#[must_use]
pub fn with_temporaries(ctx: &GenContext, temporaries: Temporaries) -> GenContext {
    GenContext {
        temporaries: Arc::new(temporaries),
        ..ctx.clone()
    }
}

#[must_use]
pub fn with_unhandled_self_increment(ctx: &GenContext, value: bool) -> GenContext {
    GenContext {
        has_unhandled_self_increment: value,
        ..ctx.clone()
    }
}

pub fn has_label(ctx: &GenContext) -> bool {
    !ctx.statement_label.is_empty()
}

#[cfg(test)]
#[path = "../tests/context.rs"]
mod tests;
