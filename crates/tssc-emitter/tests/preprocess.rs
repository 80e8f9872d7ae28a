use super::*;
use tssc_syntax::{AstBuilder, PostfixOp};

fn class_names(pack: &PreprocessingPack) -> Vec<&str> {
    pack.classes.iter().map(|class| class.name.as_str()).collect()
}

#[test]
fn test_collects_classes_under_emitted_names() {
    let b = AstBuilder::new();
    let stmts = vec![
        b.class_decl(b.class(Some("shape"), None, vec![])),
        b.const_("Circle", b.class_expr(b.class(None, None, vec![]))),
        b.class_decl(b.class(None, None, vec![])),
    ];
    let unit = b.unit("src/my-shapes.ts", stmts);
    let mut counter = 1;
    let pack = find_preprocessing_needed(&unit, &mut counter);
    assert_eq!(
        class_names(&pack),
        ["Shape", "Circle", "My_shapes__default_export"]
    );
    assert!(!pack.has_self_increment);
    assert_eq!(counter, 1);
}

#[test]
fn test_unnamed_class_expressions_are_numbered() {
    let b = AstBuilder::new();
    let make = |b: &AstBuilder| b.class_expr(b.class(None, None, vec![]));
    let stmts = vec![
        b.expr_stmt(b.call(b.id("register"), vec![make(&b)])),
        b.expr_stmt(b.call(b.id("register"), vec![make(&b)])),
    ];
    let unit = b.unit("plugins.ts", stmts);
    let mut counter = 4;
    let pack = find_preprocessing_needed(&unit, &mut counter);
    assert_eq!(class_names(&pack), ["UnnamedClass4", "UnnamedClass5"]);
    assert_eq!(counter, 6);
}

#[test]
fn test_nested_class_inside_function_is_found() {
    let b = AstBuilder::new();
    let inner = b.class_decl(b.class(Some("Local"), None, vec![]));
    let stmts = vec![b.function_decl("factory", vec![], vec![inner])];
    let unit = b.unit("factory.ts", stmts);
    let pack = find_preprocessing_needed(&unit, &mut 1);
    assert_eq!(class_names(&pack), ["Local"]);
}

#[test]
fn test_self_increment_flag() {
    let b = AstBuilder::new();
    let body = vec![b.expr_stmt(b.postfix(PostfixOp::Increment, b.id("n")))];
    let stmts = vec![b.function_decl("tick", vec![], body)];
    let unit = b.unit("tick.ts", stmts);
    assert!(find_preprocessing_needed(&unit, &mut 1).has_self_increment);
}

#[test]
fn test_cache_memoizes_per_unit() {
    let b = AstBuilder::new();
    let unit = b.unit(
        "a.ts",
        vec![b.expr_stmt(b.call(b.id("use"), vec![b.class_expr(b.class(None, None, vec![]))]))],
    );
    let mut cache = PreprocessingCache::new();
    assert!(cache.is_empty());

    let first = cache.get_or_scan(&unit);
    let second = cache.get_or_scan(&unit);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
    // A hit does not consume another unnamed-class number.
    assert_eq!(class_names(&second), ["UnnamedClass1"]);
}

#[test]
fn test_invalidate_forces_rescan() {
    let b = AstBuilder::new();
    let unit = b.unit("a.ts", vec![b.class_decl(b.class(Some("A"), None, vec![]))]);
    let mut cache = PreprocessingCache::new();
    let first = cache.get_or_scan(&unit);

    assert!(cache.invalidate("a.ts"));
    assert!(!cache.invalidate("a.ts"));
    assert!(cache.is_empty());

    let rescanned = cache.get_or_scan(&unit);
    assert!(!Arc::ptr_eq(&first, &rescanned));
    assert_eq!(class_names(&rescanned), ["A"]);
}

#[test]
fn test_unnamed_counter_spans_units() {
    let b = AstBuilder::new();
    let anonymous = |b: &AstBuilder| b.expr_stmt(b.class_expr(b.class(None, None, vec![])));
    let first = b.unit("one.ts", vec![anonymous(&b)]);
    let second = b.unit("two.ts", vec![anonymous(&b)]);
    let mut cache = PreprocessingCache::new();
    assert_eq!(class_names(&cache.get_or_scan(&first)), ["UnnamedClass1"]);
    assert_eq!(class_names(&cache.get_or_scan(&second)), ["UnnamedClass2"]);
}
