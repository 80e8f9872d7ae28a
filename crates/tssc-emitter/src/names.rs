//! Generated-name prefixes and fixed identifiers in emitted sclang.
//!
//! Everything the generator invents starts with `tstosc` in some casing so it
//! can never collide with an escaped user identifier.

/// Runtime polyfill class for default-library symbols (`Math` becomes
/// `TSTOSC__Math`).
pub const BUILTIN_CLASS_PREFIX: &str = "TSTOSC__";
/// Runtime polyfill namespace for free helpers (`TSTOSC.orElse`).
pub const RUNTIME_NAMESPACE: &str = "TSTOSC";
pub const OBJECT_LITERAL_CLASS: &str = "TSTOSC__ObjectLiteral";

pub const ESCAPED_VAR_PREFIX: &str = "escvar_";
pub const ESCAPED_CLASS_PREFIX: &str = "ESCCLASS_";

/// Receiver parameter prepended to object-literal methods.
pub const THIS_PARAM: &str = "tstosc__this_param";
/// Instance under construction inside `*new`.
pub const BUILT_INSTANCE: &str = "tstosc__built_instance";
/// Positional stand-in for a destructured parameter (`tstosc_dvar_0`).
pub const DESTRUCTURED_PARAM_PREFIX: &str = "tstosc_dvar_";
/// Name of a rest parameter bound to a pattern (`...[a, b]`).
pub const REST_FALLBACK: &str = "tstosc_cvar";
pub const LOOP_VAR: &str = "tstosc__loopvar";
pub const CATCH_VAR: &str = "tstosc__catchvar";
pub const DROP_ARG: &str = "tstosc__drop_arg";
pub const SETTER_ARG: &str = "tstosc__setter_arg";
pub const FIELD_STORE_PREFIX: &str = "prtstosc__store__";
pub const INIT_METHOD_PREFIX: &str = "initTStoSC";

pub const LABEL_PREFIX: &str = "tstosc__label__";
pub const LOOP_SHOULD_BREAK: &str = "tstosc__loop_should_break";
pub const LOOP_END: &str = "loop_end";
pub const RETURN_WITH: &str = "return_with";
pub const SWITCH_BREAK: &str = "tstosc__switch_break";
pub const SWITCH_TEST_VALUE: &str = "tstosc__test_value";
pub const DO_BODY_PREFIX: &str = "~tstosc__do_body__";

pub const TEMP_CELL_PREFIX: &str = "~tstosc__temp__";
pub const TEMP_RESULT_PREFIX: &str = "~tstosc__temp_result__";
pub const PRE_INCREMENT: &str = "~tstosc__pre_incr";
pub const POST_INCREMENT: &str = "~tstosc__post_incr";
pub const PRE_DECREMENT: &str = "~tstosc__pre_decr";
pub const POST_DECREMENT: &str = "~tstosc__post_decr";

/// Emitted once per unit when any `++`/`--` occurs.
pub const HELPER_ENVIRONMENT: [&str; 4] = [
    "~tstosc__pre_incr = {|r|r.value=r.value+1;r.value} ;",
    "~tstosc__post_incr = {|r|var t=r.value;r.value=r.value+1;t} ;",
    "~tstosc__pre_decr = {|r|r.value=r.value-1;r.value} ;",
    "~tstosc__post_decr = {|r|var t=r.value;r.value=r.value-1;t} ;",
];

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

pub fn label(label: &str) -> String {
    format!("{LABEL_PREFIX}{label}")
}

pub fn destructured_param(index: usize) -> String {
    format!("{DESTRUCTURED_PARAM_PREFIX}{index}")
}

pub fn field_store(name: &str) -> String {
    format!("{FIELD_STORE_PREFIX}{name}")
}
