use super::*;
use tssc_syntax::{NoTypeInfo, SourceUnit};

fn names(collection: &DeclCollection) -> Vec<&str> {
    collection.iter().map(|(name, _)| name.as_str()).collect()
}

fn render(unit: &SourceUnit) -> String {
    let mut emitter = Emitter::new(unit, &NoTypeInfo);
    emitter
        .hoist_declarations(&unit.statements, &GenContext::new())
        .expect("hoisting succeeds")
}

#[test]
fn test_kinds_are_grouped() {
    let b = AstBuilder::new();
    let stmts = vec![
        b.let_("a", Some(b.num("1"))),
        b.const_("c", b.num("2")),
        b.var("v", None),
        b.function_decl("f", vec![], vec![]),
        b.let_("d", None),
    ];
    let decls = extract_declarations(&stmts).unwrap();
    assert_eq!(names(&decls.lets), ["a", "d"]);
    assert_eq!(names(&decls.consts), ["c"]);
    assert_eq!(names(&decls.vars), ["v"]);
    assert_eq!(names(&decls.functions), ["f"]);
    assert!(decls.loopvars.is_empty());
    assert_eq!(decls.captured_names(), ["a", "d", "c", "v", "f"]);

    let unit = b.unit("test.ts", stmts);
    assert_eq!(
        render(&unit),
        "var /* let */ a = 1, d ;\n\
         var /* const */ c = 2 ;\n\
         var /* var */ v ;\n\
         var /* function */ f ;"
    );
}

#[test]
fn test_loop_heads_are_loopvars() {
    let b = AstBuilder::new();
    let for_head = ForInit::VarDecls(b.var_list(VarKind::Let, vec![(b.bind("i"), Some(b.num("0")))]));
    let stmts = vec![
        b.for_(Some(for_head), None, None, b.block(vec![])),
        b.for_of(VarKind::Const, b.bind("item"), b.id("items"), b.block(vec![])),
        b.labeled(
            "outer",
            b.for_in(VarKind::Let, b.bind("key"), b.id("table"), b.block(vec![])),
        ),
    ];
    let decls = extract_declarations(&stmts).unwrap();
    assert_eq!(names(&decls.loopvars), ["i", "item", "key"]);
    assert!(decls.captured_names().is_empty());
}

#[test]
fn test_nested_blocks_are_not_hoisted() {
    let b = AstBuilder::new();
    let stmts = vec![b.block(vec![b.let_("inner", None)])];
    assert!(extract_declarations(&stmts).unwrap().is_empty());
}

#[test]
fn test_class_initializers_are_skipped() {
    let b = AstBuilder::new();
    let class = b.class_expr(b.class(None, None, vec![]));
    let stmts = vec![b.const_("Shape", class), b.const_("n", b.num("1"))];
    let decls = extract_declarations(&stmts).unwrap();
    assert_eq!(names(&decls.consts), ["n"]);
}

#[test]
fn test_pattern_without_initializer_lists_names() {
    let b = AstBuilder::new();
    // [a, {b, c: [d]}]
    let inner = b.object_pattern(vec![
        b.element(b.bind("b")),
        b.keyed_element("c", b.array_pattern(vec![Some(b.element(b.bind("d")))])),
    ]);
    let pattern = b.array_pattern(vec![Some(b.element(b.bind("a"))), Some(b.element(inner))]);
    let collection = solve_binding(&pattern, None).unwrap();
    assert_eq!(names(&collection), ["a", "b", "d"]);
    assert!(collection.iter().all(|(_, init)| init.is_none()));
}

#[test]
fn test_array_pattern_against_literal_zips() {
    let b = AstBuilder::new();
    // let [x, y] = [1, 2, 3];
    let stmt = b.var_stmt(
        VarKind::Let,
        vec![(
            b.array_pattern(vec![Some(b.element(b.bind("x"))), Some(b.element(b.bind("y")))]),
            Some(b.array(vec![b.num("1"), b.num("2"), b.num("3")])),
        )],
    );
    let unit = b.unit("test.ts", vec![stmt]);
    assert_eq!(render(&unit), "var /* let */ x = 1, y = 2 ;");
}

#[test]
fn test_array_pattern_against_value_indexes() {
    let b = AstBuilder::new();
    // const [head, , third = 0, ...tail] = list;
    let pattern = b.array_pattern(vec![
        Some(b.element(b.bind("head"))),
        None,
        Some(b.element_with(b.bind("third"), b.num("0"))),
        Some(b.rest_element(b.bind("tail"))),
    ]);
    let stmt = b.var_stmt(VarKind::Const, vec![(pattern, Some(b.id("list")))]);
    let unit = b.unit("test.ts", vec![stmt]);
    assert_eq!(
        render(&unit),
        "var /* const */ head = list[0], third = TSTOSC.orElse(list[2], 0), tail = list.copyToEnd(3) ;"
    );
}

#[test]
fn test_object_pattern_against_value() {
    let b = AstBuilder::new();
    // const {name, size: {w = 1}} = props;
    let pattern = b.object_pattern(vec![
        b.element(b.bind("name")),
        b.keyed_element(
            "size",
            b.object_pattern(vec![b.element_with(b.bind("w"), b.num("1"))]),
        ),
    ]);
    let stmt = b.var_stmt(VarKind::Const, vec![(pattern, Some(b.id("props")))]);
    let unit = b.unit("test.ts", vec![stmt]);
    assert_eq!(
        render(&unit),
        "var /* const */ name = props.name, w = TSTOSC.orElse(props.size.w, 1) ;"
    );
}

#[test]
fn test_object_pattern_against_literal_picks_members() {
    let b = AstBuilder::new();
    let pattern = b.object_pattern(vec![b.element(b.bind("a")), b.element_with(b.bind("z"), b.num("9"))]);
    let literal = b.object(vec![b.prop("a", b.num("1")), b.prop("b", b.num("2"))]);
    let collection = solve_binding(&pattern, Some(&literal)).unwrap();
    assert_eq!(names(&collection), ["a", "z"]);
    assert!(matches!(
        collection[1].1.as_ref().map(|expr| &expr.kind),
        Some(ExprKind::Number(_))
    ));
}

#[test]
fn test_object_rest_is_rejected() {
    let b = AstBuilder::new();
    let pattern = b.object_pattern(vec![b.element(b.bind("a")), b.rest_element(b.bind("others"))]);
    let err = solve_binding(&pattern, Some(&b.id("value"))).unwrap_err();
    assert!(matches!(err, EmitError::UnsupportedSyntax { .. }));
}

#[test]
fn test_self_increment_initializer_is_declared_bare() {
    let b = AstBuilder::new();
    let stmt = b.var_stmt(
        VarKind::Let,
        vec![
            (b.bind("a"), Some(b.num("1"))),
            (
                b.bind("n"),
                Some(b.postfix(tssc_syntax::PostfixOp::Increment, b.id("count"))),
            ),
        ],
    );
    let unit = b.unit("test.ts", vec![stmt]);
    assert_eq!(render(&unit), "var /* let */ a = 1, n ;");
}
