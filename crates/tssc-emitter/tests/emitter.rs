use super::*;
use super::literals::{NumericBand, numeric_band};
use super::switch::resolve_jumps;
use crate::context::{GenContext, at_value_position, with_unhandled_self_increment};
use crate::error::EmitError;
use tssc_syntax::query::unit_has_self_increment;
use tssc_syntax::{
    AstBuilder, BinaryOp, ClassDecl, Expr, ForInit, NoTypeInfo, PostfixOp, Stmt, TypeDescriptor, TypeTable,
    VarKind,
};

fn lower_stmts(b: &AstBuilder, stmts: Vec<Stmt>) -> Result<(String, usize), EmitError> {
    let unit = b.unit("test.ts", stmts);
    let has_self_increment = unit_has_self_increment(&unit.statements);
    let mut emitter = Emitter::new(&unit, &NoTypeInfo).with_self_increment(has_self_increment);
    let ctx = with_unhandled_self_increment(&GenContext::new(), has_self_increment);
    let text = emitter.lower_block(&unit.statements, &ctx)?;
    Ok((text, emitter.warnings().len()))
}

fn emit(b: &AstBuilder, stmts: Vec<Stmt>) -> String {
    lower_stmts(b, stmts).expect("lowering succeeds").0
}

fn emit_expr(b: &AstBuilder, expr: &Expr) -> String {
    let unit = b.unit("test.ts", Vec::new());
    let mut emitter = Emitter::new(&unit, &NoTypeInfo);
    emitter
        .lower_expr(expr, &at_value_position(&GenContext::new()))
        .expect("lowering succeeds")
}

fn emit_class(b: &AstBuilder, class: &ClassDecl, name: &str) -> String {
    let unit = b.unit("test.ts", Vec::new());
    let mut emitter = Emitter::new(&unit, &NoTypeInfo);
    emitter
        .lower_class(class, name, &GenContext::new())
        .expect("lowering succeeds")
}

// =============================================================================
// Declarations and expressions
// =============================================================================

#[test]
fn test_let_list_hoists_into_one_line() {
    let b = AstBuilder::new();
    // let a = 1, b = a + 1;
    let stmt = b.var_stmt(
        VarKind::Let,
        vec![
            (b.bind("a"), Some(b.num("1"))),
            (b.bind("b"), Some(b.binary(b.id("a"), BinaryOp::Add, b.num("1")))),
        ],
    );
    assert_eq!(emit(&b, vec![stmt]), "var /* let */ a = 1, b = a + 1 ;");
}

#[test]
fn test_numeric_bands() {
    assert_eq!(numeric_band("4294967294", 10), NumericBand::Integer);
    assert_eq!(numeric_band("4294967295", 10), NumericBand::Exact);
    assert_eq!(numeric_band("ffffffffffffffff", 16), NumericBand::Lossy);
    assert_eq!(numeric_band("101", 2), NumericBand::Integer);
}

#[test]
fn test_number_literals() {
    let b = AstBuilder::new();
    let unit = b.unit("test.ts", Vec::new());
    let mut emitter = Emitter::new(&unit, &NoTypeInfo);
    let ctx = GenContext::new();
    let mut render = |raw: &str| emitter.lower_expr(&b.num(raw), &ctx).unwrap();
    assert_eq!(render("42"), "42");
    assert_eq!(render("1_000"), "1000");
    assert_eq!(render("007"), "7");
    assert_eq!(render("0b101"), "2r101");
    assert_eq!(render("0o17"), "8r17");
    assert_eq!(render("1.5e3"), "1.5e3");
    assert_eq!(render("4294967296"), "4294967296.0");
    assert_eq!(emitter.warnings().len(), 1);
}

#[test]
fn test_operator_forms() {
    let b = AstBuilder::new();
    let and = b.binary(b.id("a"), BinaryOp::BitAnd, b.id("b"));
    assert_eq!(emit_expr(&b, &and), "bitAnd(a, b)");

    let strict = b.binary(b.id("a"), BinaryOp::StrictNotEq, b.id("b"));
    assert_eq!(emit_expr(&b, &strict), "a != b");

    let compound = b.binary(b.id("total"), BinaryOp::MulAssign, b.num("2"));
    assert_eq!(emit_expr(&b, &compound), "total = total * 2");

    let ternary = b.conditional(b.id("c"), b.num("1"), b.num("2"));
    assert_eq!(emit_expr(&b, &ternary), "if(c, 1, 2)");
}

#[test]
fn test_unsupported_operator_is_an_error() {
    let b = AstBuilder::new();
    let unit = b.unit("test.ts", Vec::new());
    let mut emitter = Emitter::new(&unit, &NoTypeInfo);
    let comma = b.binary(b.id("a"), BinaryOp::Comma, b.id("b"));
    let err = emitter.lower_expr(&comma, &GenContext::new()).unwrap_err();
    assert!(matches!(err, EmitError::UnsupportedType { .. }));
}

#[test]
fn test_this_outside_class_is_a_type_error() {
    let b = AstBuilder::new();
    let unit = b.unit("test.ts", Vec::new());
    let mut emitter = Emitter::new(&unit, &NoTypeInfo);
    let err = emitter.lower_expr(&b.this(), &GenContext::new()).unwrap_err();
    assert!(matches!(err, EmitError::Type { .. }));
}

#[test]
fn test_template_literal_concatenates_segments() {
    let b = AstBuilder::new();
    // `a${x}b${y}`
    let template = b.template("a", vec![(b.id("x"), "b"), (b.id("y"), "")]);
    assert_eq!(emit_expr(&b, &template), "\"a\" ++ x ++ \"b\" ++ y");
}

#[test]
fn test_object_literal_members() {
    let b = AstBuilder::new();
    // { k: 1, v, ...rest }
    let object = b.object(vec![
        b.prop("k", b.num("1")),
        b.shorthand("v"),
        b.spread_member(b.id("rest")),
    ]);
    assert_eq!(
        emit_expr(&b, &object),
        "TSTOSC__ObjectLiteral.new(Dictionary[\"k\" -> 1, \"v\" -> v].putAll(rest))"
    );
}

#[test]
fn test_object_literal_method_reads_receiver_by_key() {
    let b = AstBuilder::new();
    // { n: 1, get() { return this.n; } }
    let object = b.object(vec![
        b.prop("n", b.num("1")),
        b.method_member("get", vec![], vec![b.ret(Some(b.member(b.this(), "n")))]),
    ]);
    assert_eq!(
        emit_expr(&b, &object),
        "TSTOSC__ObjectLiteral.new(Dictionary[\"n\" -> 1, \"get\" -> { arg tstosc__this_param ; ^tstosc__this_param[\"n\"] ; }])"
    );
}

#[test]
fn test_wrap_helpers() {
    assert_eq!(wrap_braces(""), "{ }");
    assert_eq!(wrap_braces("f.() ;"), "{ f.() ; }");
    assert_eq!(wrap_braces("a ;\nb ;"), "{\n    a ;\n    b ;\n}");
    assert_eq!(wrap_label("x ;".to_string(), ""), "x ;");
    assert_eq!(
        wrap_label("x ;".to_string(), "outer"),
        "block { |tstosc__label__outer|\n    x ;\n} ;"
    );
}

// =============================================================================
// Self increment
// =============================================================================

#[test]
fn test_post_increment_in_call_uses_one_cell() {
    let b = AstBuilder::new();
    // foo(x++, x);
    let call = b.call(
        b.id("foo"),
        vec![b.postfix(PostfixOp::Increment, b.id("x")), b.id("x")],
    );
    assert_eq!(
        emit(&b, vec![b.expr_stmt(call)]),
        "~tstosc__temp__x = `(x) ;\n\
         ~tstosc__temp_result__0 = foo.(~tstosc__post_incr.(~tstosc__temp__x), x) ;\n\
         x = ~tstosc__temp__x.value ;\n\
         ~tstosc__temp_result__0 ;"
    );
}

#[test]
fn test_repeated_target_shares_its_cell() {
    let b = AstBuilder::new();
    // x++ + x++;
    let sum = b.binary(
        b.postfix(PostfixOp::Increment, b.id("x")),
        BinaryOp::Add,
        b.postfix(PostfixOp::Increment, b.id("x")),
    );
    let text = emit(&b, vec![b.expr_stmt(sum)]);
    assert_eq!(text.matches("`(x)").count(), 1);
    assert!(text.contains(
        "~tstosc__post_incr.(~tstosc__temp__x) + ~tstosc__post_incr.(~tstosc__temp__x)"
    ));
}

#[test]
fn test_initializer_with_increment_is_declared_bare() {
    let b = AstBuilder::new();
    // let y = x++;
    let stmt = b.let_("y", Some(b.postfix(PostfixOp::Increment, b.id("x"))));
    assert_eq!(
        emit(&b, vec![stmt]),
        "var /* let */ y ;\n\
         ~tstosc__temp__x = `(x) ;\n\
         ~tstosc__temp_result__0 = ~tstosc__post_incr.(~tstosc__temp__x) ;\n\
         x = ~tstosc__temp__x.value ;\n\
         /* let */ y = ~tstosc__temp_result__0 ;"
    );
}

#[test]
fn test_element_targets_with_different_calls_get_own_cells() {
    let b = AstBuilder::new();
    // a[f()]++ + a[g()]++;
    let sum = b.binary(
        b.postfix(PostfixOp::Increment, b.index(b.id("a"), b.call(b.id("f"), vec![]))),
        BinaryOp::Add,
        b.postfix(PostfixOp::Increment, b.index(b.id("a"), b.call(b.id("g"), vec![]))),
    );
    assert_eq!(
        emit(&b, vec![b.expr_stmt(sum)]),
        "~tstosc__temp__a_f___ = `(a[f.()]) ;\n\
         ~tstosc__temp__a_g___ = `(a[g.()]) ;\n\
         ~tstosc__temp_result__0 = ~tstosc__post_incr.(~tstosc__temp__a_f___) + ~tstosc__post_incr.(~tstosc__temp__a_g___) ;\n\
         a[f.()] = ~tstosc__temp__a_f___.value ;\n\
         a[g.()] = ~tstosc__temp__a_g___.value ;\n\
         ~tstosc__temp_result__0 ;"
    );
}

#[test]
fn test_targets_sanitizing_alike_get_distinct_cells() {
    let b = AstBuilder::new();
    // o.b++ + o_b++;
    let sum = b.binary(
        b.postfix(PostfixOp::Increment, b.member(b.id("o"), "b")),
        BinaryOp::Add,
        b.postfix(PostfixOp::Increment, b.id("o_b")),
    );
    assert_eq!(
        emit(&b, vec![b.expr_stmt(sum)]),
        "~tstosc__temp__o_b = `(o.b) ;\n\
         ~tstosc__temp__o_b_1 = `(o_b) ;\n\
         ~tstosc__temp_result__0 = ~tstosc__post_incr.(~tstosc__temp__o_b) + ~tstosc__post_incr.(~tstosc__temp__o_b_1) ;\n\
         o.b = ~tstosc__temp__o_b.value ;\n\
         o_b = ~tstosc__temp__o_b_1.value ;\n\
         ~tstosc__temp_result__0 ;"
    );
}

#[test]
fn test_increment_of_call_result_is_rejected() {
    let b = AstBuilder::new();
    // f()++;
    let stmt = b.expr_stmt(b.postfix(PostfixOp::Increment, b.call(b.id("f"), vec![])));
    let err = lower_stmts(&b, vec![stmt]).unwrap_err();
    assert!(matches!(err, EmitError::UnsupportedSyntax { .. }));
}

// =============================================================================
// Loops
// =============================================================================

#[test]
fn test_for_loop_without_jumps_has_no_sentinel() {
    let b = AstBuilder::new();
    // for (let i = 0; i < 3; i++) { sum += i; }
    let init = ForInit::VarDecls(b.var_list(VarKind::Let, vec![(b.bind("i"), Some(b.num("0")))]));
    let stmt = b.for_(
        Some(init),
        Some(b.binary(b.id("i"), BinaryOp::Lt, b.num("3"))),
        Some(b.postfix(PostfixOp::Increment, b.id("i"))),
        b.block(vec![b.expr_stmt(b.binary(b.id("sum"), BinaryOp::AddAssign, b.id("i")))]),
    );
    let text = emit(&b, vec![stmt]);
    assert_eq!(
        text,
        "var /* loopvar */ i = 0 ;\n\
         /* let */ i = 0 ;\n\
         while(\n\
         \x20   { i < 3 },\n\
         \x20   {\n\
         \x20       sum = sum + i ;\n\
         \x20       /* increment */\n\
         \x20       i = i + 1 ;\n\
         \x20   }\n\
         ) ;"
    );
    assert!(!text.contains("loop_end"));
}

#[test]
fn test_break_in_while_uses_sentinel_block() {
    let b = AstBuilder::new();
    // while (c) { if (d) break; f(); }
    let body = b.block(vec![
        b.if_(b.id("d"), b.break_(None), None),
        b.expr_stmt(b.call(b.id("f"), vec![])),
    ]);
    let stmt = b.while_(b.id("c"), body);
    assert_eq!(
        emit(&b, vec![stmt]),
        "while(\n\
         \x20   { c },\n\
         \x20   {\n\
         \x20       /* loop body */\n\
         \x20       var tstosc__loop_should_break = block { |loop_end|\n\
         \x20           if(\n\
         \x20               d,\n\
         \x20               { /* break */ loop_end.value(true) ; },\n\
         \x20               { }\n\
         \x20           ) ;\n\
         \x20           f.() ;\n\
         \x20           /* Dafault value for tstosc__loop_should_break */\n\
         \x20           false ;\n\
         \x20       } ;\n\
         \x20       /* Loop-Should-Break Checkpoint */\n\
         \x20       if (tstosc__loop_should_break) { ^nil ; } ;\n\
         \x20   }\n\
         ) ;"
    );
}

#[test]
fn test_nested_loop_checkpoint_stops_enclosing_iteration() {
    let b = AstBuilder::new();
    // while (a) { while (c) { break; } break; }
    let inner = b.while_(b.id("c"), b.block(vec![b.break_(None)]));
    let outer = b.while_(b.id("a"), b.block(vec![inner, b.break_(None)]));
    let text = emit(&b, vec![outer]);
    assert!(text.contains("if (tstosc__loop_should_break) { loop_end.value(true) ; } ;"));
    assert!(text.ends_with("if (tstosc__loop_should_break) { ^nil ; } ;\n    }\n) ;"));
}

#[test]
fn test_for_of_binds_item_argument() {
    let b = AstBuilder::new();
    // for (const item of items) { log(item); }
    let stmt = b.for_of(
        VarKind::Const,
        b.bind("item"),
        b.id("items"),
        b.block(vec![b.expr_stmt(b.call(b.id("log"), vec![b.id("item")]))]),
    );
    assert_eq!(
        emit(&b, vec![stmt]),
        "var /* loopvar */ item ;\n\
         items.do { /* for-of */ |item, tstosc__drop_arg| log.(item) ; } ;"
    );
}

#[test]
fn test_for_in_binds_key_argument() {
    let b = AstBuilder::new();
    // for (const key in obj) { log(key); }
    let stmt = b.for_in(
        VarKind::Const,
        b.bind("key"),
        b.id("obj"),
        b.block(vec![b.expr_stmt(b.call(b.id("log"), vec![b.id("key")]))]),
    );
    assert_eq!(
        emit(&b, vec![stmt]),
        "var /* loopvar */ key ;\n\
         obj.do { /* for-in */ |tstosc__drop_arg, key| log.(key) ; } ;"
    );
}

#[test]
fn test_do_while_runs_body_once_first() {
    let b = AstBuilder::new();
    // do { f(); } while (c);
    let stmt = b.do_(b.block(vec![b.expr_stmt(b.call(b.id("f"), vec![]))]), b.id("c"));
    let text = emit(&b, vec![stmt]);
    let (name, _) = text.split_once(" = ").unwrap();
    let tag = name.strip_prefix("~tstosc__do_body__").unwrap();
    assert_eq!(tag.len(), 8);
    assert!(tag.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(
        text,
        format!("{name} = {{ f.() ; }} ;\n{name}.() ;\nwhile({{ c }}, {{ {name}.() }}) ;")
    );
}

#[test]
fn test_labeled_continue_exits_through_label() {
    let b = AstBuilder::new();
    // outer: while (a) { if (b) continue outer; f(); }
    let body = b.block(vec![
        b.if_(b.id("b"), b.continue_(Some("outer")), None),
        b.expr_stmt(b.call(b.id("f"), vec![])),
    ]);
    let stmt = b.labeled("outer", b.while_(b.id("a"), body));
    assert_eq!(
        emit(&b, vec![stmt]),
        "while(\n\
         \x20   { a },\n\
         \x20   {\n\
         \x20       /* loop body */\n\
         \x20       var tstosc__loop_should_break = block { |loop_end|\n\
         \x20           var /* label */ tstosc__label__outer = loop_end ;\n\
         \x20           if(\n\
         \x20               b,\n\
         \x20               { /* continue */ tstosc__label__outer.value(false) ; },\n\
         \x20               { }\n\
         \x20           ) ;\n\
         \x20           f.() ;\n\
         \x20           /* Dafault value for tstosc__loop_should_break */\n\
         \x20           false ;\n\
         \x20       } ;\n\
         \x20       /* Loop-Should-Break Checkpoint */\n\
         \x20       if (tstosc__loop_should_break) { ^nil ; } ;\n\
         \x20   }\n\
         ) ;"
    );
}

#[test]
fn test_labeled_block_break_leaves_block() {
    let b = AstBuilder::new();
    // done: { if (c) break done; f(); }
    let body = b.block(vec![
        b.if_(b.id("c"), b.break_(Some("done")), None),
        b.expr_stmt(b.call(b.id("f"), vec![])),
    ]);
    assert_eq!(
        emit(&b, vec![b.labeled("done", body)]),
        "block { |tstosc__label__done|\n\
         \x20   if(\n\
         \x20       c,\n\
         \x20       { /* break */ tstosc__label__done.value(true) ; },\n\
         \x20       { }\n\
         \x20   ) ;\n\
         \x20   f.() ;\n\
         } ;"
    );
}

#[test]
fn test_break_outside_loop_is_a_type_error() {
    let b = AstBuilder::new();
    let err = lower_stmts(&b, vec![b.break_(None)]).unwrap_err();
    assert!(matches!(err, EmitError::Type { .. }));
}

// =============================================================================
// Switch
// =============================================================================

#[test]
fn test_fallthrough_resolution() {
    // case 1: case 2: ...; case 3: case 4:
    let jumps = resolve_jumps(&[(true, "1"), (false, "2"), (true, "3"), (true, "4")]);
    assert_eq!(
        jumps,
        vec![Some("2".to_string()), None, Some("2".to_string()), Some("2".to_string())]
    );

    // A run followed by a concrete clause resolves to it.
    let jumps = resolve_jumps(&[(true, "a"), (true, "b"), (false, "c")]);
    assert_eq!(jumps, vec![Some("c".to_string()), Some("c".to_string()), None]);

    // Nothing concrete at all: each trailing clause falls to its own value.
    let jumps = resolve_jumps(&[(true, "only")]);
    assert_eq!(jumps, vec![Some("only".to_string())]);
}

#[test]
fn test_switch_with_fallthrough_dispatches_through_closure() {
    let b = AstBuilder::new();
    // switch (x) { case 1: case 2: foo(); break; default: bar(); }
    let stmt = b.switch(
        b.id("x"),
        vec![
            b.case(b.num("1"), vec![]),
            b.case(
                b.num("2"),
                vec![b.expr_stmt(b.call(b.id("foo"), vec![])), b.break_(None)],
            ),
            b.default_case(vec![b.expr_stmt(b.call(b.id("bar"), vec![]))]),
        ],
    );
    assert_eq!(
        emit(&b, vec![stmt]),
        "{ |tstosc__test_value| /* switch(x) */\n\
         \x20   switch( tstosc__test_value,\n\
         \x20       /* case */ { 1 }, { /* fallthough */ thisFunction.value(2); },\n\
         \x20       /* case */ { 2 }, { foo.() ; },\n\
         \x20       /* otherwise */ { bar.() ; }\n\
         \x20   ) ;\n\
         }.value(x) ;"
    );
}

#[test]
fn test_switch_early_break_gets_private_block() {
    let b = AstBuilder::new();
    // switch (x) { case 1: if (c) break; f(); }
    let stmt = b.switch(
        b.id("x"),
        vec![b.case(
            b.num("1"),
            vec![
                b.if_(b.id("c"), b.break_(None), None),
                b.expr_stmt(b.call(b.id("f"), vec![])),
            ],
        )],
    );
    let text = emit(&b, vec![stmt]);
    assert!(text.starts_with("switch( x,\n"));
    assert!(text.contains("{ block { |tstosc__switch_break|"));
    assert!(text.contains("{ /* break */ tstosc__switch_break.value(nil) ; }"));
}

#[test]
fn test_switch_default_moves_last() {
    let b = AstBuilder::new();
    // switch (x) { case 1: a(); break; default: d(); break; case 2: e(); }
    let stmt = b.switch(
        b.id("x"),
        vec![
            b.case(b.num("1"), vec![b.expr_stmt(b.call(b.id("a"), vec![])), b.break_(None)]),
            b.default_case(vec![b.expr_stmt(b.call(b.id("d"), vec![])), b.break_(None)]),
            b.case(b.num("2"), vec![b.expr_stmt(b.call(b.id("e"), vec![]))]),
        ],
    );
    assert_eq!(
        emit(&b, vec![stmt]),
        "switch( x,\n\
         \x20   /* case */ { 1 }, { a.() ; },\n\
         \x20   /* case */ { 2 }, { e.() ; },\n\
         \x20   /* otherwise */ { d.() ; }\n\
         ) ;"
    );
}

// =============================================================================
// Functions
// =============================================================================

#[test]
fn test_early_return_detection() {
    let b = AstBuilder::new();
    let trailing = vec![b.expr_stmt(b.id("a")), b.ret(Some(b.num("1")))];
    assert!(!has_early_return(&trailing, true));
    assert!(has_early_return(&trailing, false));

    let in_branch = vec![
        b.if_(b.id("c"), b.block(vec![b.ret(Some(b.num("1")))]), None),
        b.ret(Some(b.num("2"))),
    ];
    assert!(has_early_return(&in_branch, true));

    // A loop's value is discarded, so even a trailing loop returns early.
    let in_loop = vec![b.while_(b.id("c"), b.block(vec![b.ret(None)]))];
    assert!(has_early_return(&in_loop, true));

    let in_try = vec![
        b.try_(vec![b.ret(None)], None, None),
        b.expr_stmt(b.id("after")),
    ];
    assert!(has_early_return(&in_try, true));

    assert!(!has_early_return(&[b.expr_stmt(b.id("a"))], true));
}

#[test]
fn test_nested_returns_before_the_tail_are_early() {
    let b = AstBuilder::new();
    // switch (x) { case 1: if (x) { return 1; } break; } return 2;
    let in_clause = vec![
        b.switch(
            b.id("x"),
            vec![b.case(
                b.num("1"),
                vec![b.if_(b.id("x"), b.block(vec![b.ret(Some(b.num("1")))]), None), b.break_(None)],
            )],
        ),
        b.ret(Some(b.num("2"))),
    ];
    assert!(has_early_return(&in_clause, true));

    // { if (c) return 1; } foo(); return 2;
    let in_block = vec![
        b.block(vec![b.if_(b.id("c"), b.ret(Some(b.num("1"))), None)]),
        b.expr_stmt(b.call(b.id("foo"), vec![])),
        b.ret(Some(b.num("2"))),
    ];
    assert!(has_early_return(&in_block, true));

    // if (c) { return 1; } else { return 2; }
    let both_tails = vec![b.if_(
        b.id("c"),
        b.block(vec![b.ret(Some(b.num("1")))]),
        Some(b.block(vec![b.ret(Some(b.num("2")))])),
    )];
    assert!(!has_early_return(&both_tails, true));
}

#[test]
fn test_return_in_switch_clause_is_wrapped() {
    let b = AstBuilder::new();
    // function f(x) { switch (x) { case 1: return 1; } return 2; }
    let stmt = b.function_decl(
        "f",
        vec![b.param("x")],
        vec![
            b.switch(b.id("x"), vec![b.case(b.num("1"), vec![b.ret(Some(b.num("1")))])]),
            b.ret(Some(b.num("2"))),
        ],
    );
    assert_eq!(
        emit(&b, vec![stmt]),
        "var /* function */ f ;\n\
         f = { arg x ;\n\
         \x20   block { |return_with|\n\
         \x20       switch( x,\n\
         \x20           /* case */ { 1 }, { return_with.value(1) ; }\n\
         \x20       ) ;\n\
         \x20       return_with.value(2) ;\n\
         \x20   }\n\
         } ;"
    );
}

#[test]
fn test_function_with_early_return_is_wrapped() {
    let b = AstBuilder::new();
    // function f(a) { if (a) { return 1; } return 2; }
    let stmt = b.function_decl(
        "f",
        vec![b.param("a")],
        vec![
            b.if_(b.id("a"), b.block(vec![b.ret(Some(b.num("1")))]), None),
            b.ret(Some(b.num("2"))),
        ],
    );
    assert_eq!(
        emit(&b, vec![stmt]),
        "var /* function */ f ;\n\
         f = { arg a ;\n\
         \x20   block { |return_with|\n\
         \x20       if(\n\
         \x20           a,\n\
         \x20           { return_with.value(1) ; },\n\
         \x20           { }\n\
         \x20       ) ;\n\
         \x20       return_with.value(2) ;\n\
         \x20   }\n\
         } ;"
    );
}

#[test]
fn test_arrow_parameters() {
    let b = AstBuilder::new();
    // (a, b = 1, {c}, ...rest) => a
    let arrow = b.arrow(
        vec![
            b.param("a"),
            b.param_with("b", b.num("1")),
            b.param_pattern(b.object_pattern(vec![b.element(b.bind("c"))]), None),
            b.rest_param("rest"),
        ],
        b.id("a"),
    );
    assert_eq!(
        emit_expr(&b, &arrow),
        "{ arg a, b=1, tstosc_dvar_0, *rest ;\n\
         \x20   var /* param */ c = tstosc_dvar_0[\"c\"] ;\n\
         \x20   a\n\
         }"
    );
}

// =============================================================================
// Exceptions
// =============================================================================

#[test]
fn test_throw_wraps_non_errors() {
    let b = AstBuilder::new();
    assert_eq!(emit(&b, vec![b.throw(b.str("boom"))]), "Error(\"boom\").throw() ;");

    let err = b.new_(b.id("RangeError"), vec![b.str("x")]);
    assert_eq!(emit(&b, vec![b.throw(err)]), "RangeError.new(\"x\").throw() ;");
}

#[test]
fn test_throw_consults_base_types() {
    let b = AstBuilder::new();
    let value = b.id("failure");
    let mut types = TypeTable::new();
    types.insert(
        value.id,
        TypeDescriptor {
            symbol_name: Some("ParseFailure".to_string()),
            base_type_names: vec!["Error".to_string()],
            ..TypeDescriptor::default()
        },
    );
    let unit = b.unit("test.ts", vec![b.throw(value)]);
    let mut emitter = Emitter::new(&unit, &types);
    let text = emitter.lower_block(&unit.statements, &GenContext::new()).unwrap();
    assert_eq!(text, "failure.throw() ;");
}

#[test]
fn test_try_catch_finally() {
    let b = AstBuilder::new();
    let stmt = b.try_(
        vec![b.expr_stmt(b.call(b.id("f"), vec![]))],
        Some((Some(b.bind("e")), vec![b.expr_stmt(b.call(b.id("g"), vec![b.id("e")]))])),
        Some(vec![b.expr_stmt(b.call(b.id("h"), vec![]))]),
    );
    assert_eq!(
        emit(&b, vec![stmt]),
        "protect\n\
         {\n\
         \x20   try { f.() ; }\n\
         \x20   /* catch */ { |e| g.(e) ; } ;\n\
         }\n\
         /* finally */\n\
         {\n\
         \x20   h.() ;\n\
         } ;"
    );
}

#[test]
fn test_catch_pattern_goes_through_catchvar() {
    let b = AstBuilder::new();
    let pattern = b.object_pattern(vec![b.element(b.bind("message"))]);
    let stmt = b.try_(
        vec![b.expr_stmt(b.call(b.id("f"), vec![]))],
        Some((Some(pattern), vec![b.expr_stmt(b.call(b.id("log"), vec![b.id("message")]))])),
        None,
    );
    assert_eq!(
        emit(&b, vec![stmt]),
        "try { f.() ; }\n\
         /* catch */\n\
         { |tstosc__catchvar|\n\
         \x20   var /* catchvar */ message = tstosc__catchvar.message ;\n\
         \x20   log.(message) ;\n\
         } ;"
    );
}

#[test]
fn test_catch_pattern_default_with_increment() {
    let b = AstBuilder::new();
    // try { f(); } catch ({ message = n++ }) { log(message); }
    let pattern = b.object_pattern(vec![b.element_with(
        b.bind("message"),
        b.postfix(PostfixOp::Increment, b.id("n")),
    )]);
    let stmt = b.try_(
        vec![b.expr_stmt(b.call(b.id("f"), vec![]))],
        Some((Some(pattern), vec![b.expr_stmt(b.call(b.id("log"), vec![b.id("message")]))])),
        None,
    );
    let text = emit(&b, vec![stmt]);
    let expected = [
        "var /* catchvar */ message ;",
        "~tstosc__temp__n = `(n) ;",
        "~tstosc__temp_result__0 = TSTOSC.orElse(tstosc__catchvar.message, ~tstosc__post_incr.(~tstosc__temp__n)) ;",
        "n = ~tstosc__temp__n.value ;",
        "/* catchvar */ message = ~tstosc__temp_result__0 ;",
        "log.(message) ;",
    ];
    let mut rest = text.as_str();
    for line in expected {
        let at = rest.find(line).unwrap_or_else(|| panic!("missing `{line}` in:\n{text}"));
        rest = &rest[at + line.len()..];
    }
}

// =============================================================================
// Classes
// =============================================================================

#[test]
fn test_constructor_split_at_super_call() {
    let b = AstBuilder::new();
    // class A extends X { constructor(a) { let b = a + 1; super(b); this.x = a; } }
    let ctor = b.constructor(
        vec![b.param("a")],
        vec![
            b.let_("b", Some(b.binary(b.id("a"), BinaryOp::Add, b.num("1")))),
            b.expr_stmt(b.call(b.super_(), vec![b.id("b")])),
            b.expr_stmt(b.assign(b.member(b.this(), "x"), b.id("a"))),
        ],
    );
    let class = b.class(Some("A"), Some(b.id("X")), vec![ctor]);
    assert_eq!(
        emit_class(&b, &class, "A"),
        "A : X\n\
         {\n\
         \x20   *new\n\
         \x20   { arg a ;\n\
         \x20       var /* let */ tstosc__built_instance, b = a + 1 ;\n\
         \x20       (tstosc__built_instance = super.new(b)) ;\n\
         \x20       ^tstosc__built_instance.initTStoSCA(a, TSTOSC__ObjectLiteral.new(Dictionary[\"b\" -> b])) ;\n\
         \x20   }\n\
         \x20   initTStoSCA\n\
         \x20   { arg a, tstosc_dvar_0 ;\n\
         \x20       var /* param */ b = tstosc_dvar_0[\"b\"] ;\n\
         \x20       this.x = a ;\n\
         \x20       ^this ;\n\
         \x20   }\n\
         }"
    );
}

#[test]
fn test_constructor_without_super_gets_one() {
    let b = AstBuilder::new();
    let ctor = b.constructor(vec![], vec![b.expr_stmt(b.assign(b.member(b.this(), "n"), b.num("0")))]);
    let class = b.class(Some("Counter"), None, vec![ctor]);
    let text = emit_class(&b, &class, "Counter");
    assert!(text.contains("(tstosc__built_instance = super.new()) ;"));
    assert!(text.contains("^tstosc__built_instance.initTStoSCCounter(TSTOSC__ObjectLiteral.new(Dictionary[])) ;"));
    assert!(text.contains("this.n = 0 ;"));
}

#[test]
fn test_fields_accessors_and_methods() {
    let b = AstBuilder::new();
    let class = b.class(
        Some("Point"),
        None,
        vec![
            b.field("x", Some(b.num("0")), false),
            b.field("count", Some(b.num("1")), true),
            b.method("getX", vec![], vec![b.ret(Some(b.member(b.this(), "x")))], false),
        ],
    );
    assert_eq!(
        emit_class(&b, &class, "Point"),
        "Point\n\
         {\n\
         \x20   var <>prtstosc__store__x = 0 ;\n\
         \x20   classvar <>prtstosc__store__count = 1 ;\n\
         \n\
         \x20   x { ^this.prtstosc__store__x ; }\n\
         \x20   x_ { |tstosc__setter_arg| this.prtstosc__store__x = tstosc__setter_arg ; }\n\
         \x20   *count { ^this.prtstosc__store__count ; }\n\
         \x20   *count_ { |tstosc__setter_arg| this.prtstosc__store__count = tstosc__setter_arg ; }\n\
         \n\
         \x20   getX { ^this.x ; }\n\
         }"
    );
}

#[test]
fn test_accessors_and_static_block() {
    let b = AstBuilder::new();
    // class Box { get size() { return this.n; } set size(v) { this.n = v; } static { count = 0; } }
    let class = b.class(
        Some("Box"),
        None,
        vec![
            b.getter("size", vec![b.ret(Some(b.member(b.this(), "n")))]),
            b.setter(
                "size",
                b.param("v"),
                vec![b.expr_stmt(b.assign(b.member(b.this(), "n"), b.id("v")))],
            ),
            b.static_block(vec![b.expr_stmt(b.assign(b.id("count"), b.num("0")))]),
        ],
    );
    assert_eq!(
        emit_class(&b, &class, "Box"),
        "Box\n\
         {\n\
         \x20   size { ^this.n ; }\n\
         \x20   size_ { arg v ; this.n = v ; }\n\
         \n\
         \x20   *initClass { count = 0 ; }\n\
         }"
    );
}

#[test]
fn test_qualified_superclass_is_rejected() {
    let b = AstBuilder::new();
    let class = b.class(Some("A"), Some(b.member(b.id("ns"), "Base")), vec![]);
    let unit = b.unit("test.ts", Vec::new());
    let mut emitter = Emitter::new(&unit, &NoTypeInfo);
    let err = emitter.lower_class(&class, "A", &GenContext::new()).unwrap_err();
    assert!(matches!(err, EmitError::UnsupportedType { .. }));
}

#[test]
fn test_private_member_warns() {
    let b = AstBuilder::new();
    let member = tssc_syntax::ClassMember {
        span: tssc_common::Span::DUMMY,
        kind: tssc_syntax::ClassMemberKind::Property {
            name: tssc_syntax::PropertyName::Private(b.ident("secret")),
            init: None,
            is_static: false,
            is_readonly: false,
            auto_accessor: false,
        },
    };
    let class = b.class(Some("Vault"), None, vec![member]);
    let unit = b.unit("test.ts", Vec::new());
    let mut emitter = Emitter::new(&unit, &NoTypeInfo);
    let text = emitter.lower_class(&class, "Vault", &GenContext::new()).unwrap();
    assert!(text.contains("var <>prtstosc__store__secret ;"));
    assert_eq!(emitter.warnings().len(), 1);
}
