//! Whole-unit scan run once before lowering.
//!
//! The scan answers two questions: does the unit use `++`/`--` anywhere (the
//! helper closures are then emitted once at the top), and which classes does
//! it define. Classes are lowered into their own artifacts, never into the
//! unit body, so they are collected with the name they will be emitted under.
//!
//! Results are memoized per unit in a [`PreprocessingCache`] owned by the
//! session.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tssc_syntax::query::unit_has_self_increment;
use tssc_syntax::visit::{self, Visit};
use tssc_syntax::{BindingName, ClassDecl, Expr, ExprKind, SourceUnit, Stmt, StmtKind};

use crate::emitter::to_class_name;

/// A class found in a unit, with the name it is emitted under.
#[derive(Clone, Debug)]
pub struct ExtractedClass {
    pub name: String,
    pub class: ClassDecl,
}

#[derive(Clone, Debug, Default)]
pub struct PreprocessingPack {
    pub has_self_increment: bool,
    pub classes: Vec<ExtractedClass>,
}

struct ClassCollector<'a> {
    unit_stem: &'a str,
    unnamed_classes: &'a mut u32,
    classes: Vec<ExtractedClass>,
}

impl ClassCollector<'_> {
    fn push(&mut self, name: String, class: &ClassDecl) {
        tracing::debug!(class = %name, "extracted class");
        self.classes.push(ExtractedClass {
            name,
            class: class.clone(),
        });
    }

    fn next_unnamed(&mut self) -> String {
        let name = format!("UnnamedClass{}", *self.unnamed_classes);
        *self.unnamed_classes += 1;
        name
    }
}

fn class_expr(expr: &Expr) -> Option<&ClassDecl> {
    match &expr.skip_parens().kind {
        ExprKind::Class(class) => Some(class),
        _ => None,
    }
}

impl<'ast> Visit<'ast> for ClassCollector<'_> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match &stmt.kind {
            StmtKind::ClassDecl(class) => {
                let name = match &class.name {
                    Some(ident) => to_class_name(&ident.text),
                    None => to_class_name(&format!("{}__default_export", self.unit_stem)),
                };
                self.push(name, class);
                self.visit_class(class);
            }
            // `const Foo = class { }` is emitted as `Foo`.
            StmtKind::Variable(list) => {
                for decl in &list.decls {
                    let bound = match (&decl.name, decl.init.as_ref().and_then(class_expr)) {
                        (BindingName::Ident(ident), Some(class)) => Some((ident, class)),
                        _ => None,
                    };
                    match bound {
                        Some((ident, class)) => {
                            self.push(ident.text.clone(), class);
                            self.visit_class(class);
                        }
                        None => {
                            self.visit_binding(&decl.name);
                            if let Some(init) = &decl.init {
                                self.visit_expr(init);
                            }
                        }
                    }
                }
            }
            _ => visit::walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        if let ExprKind::Class(class) = &expr.kind {
            let name = match &class.name {
                Some(ident) => to_class_name(&ident.text),
                None => self.next_unnamed(),
            };
            self.push(name, class);
        }
        visit::walk_expr(self, expr);
    }
}

/// Scan `unit`. Unnamed class expressions are numbered from `unnamed_classes`,
/// which is advanced past the names used.
pub fn find_preprocessing_needed(unit: &SourceUnit, unnamed_classes: &mut u32) -> PreprocessingPack {
    let mut collector = ClassCollector {
        unit_stem: unit.file_stem(),
        unnamed_classes,
        classes: Vec::new(),
    };
    visit::walk_stmts(&mut collector, &unit.statements);

    PreprocessingPack {
        has_self_increment: unit_has_self_increment(&unit.statements),
        classes: collector.classes,
    }
}

/// Scan results per unit file name, for one session.
#[derive(Debug)]
pub struct PreprocessingCache {
    packs: FxHashMap<String, Arc<PreprocessingPack>>,
    /// Next `UnnamedClass<N>`; shared by every unit of the session.
    unnamed_classes: u32,
}

impl Default for PreprocessingCache {
    fn default() -> Self {
        PreprocessingCache {
            packs: FxHashMap::default(),
            unnamed_classes: 1,
        }
    }
}

impl PreprocessingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_scan(&mut self, unit: &SourceUnit) -> Arc<PreprocessingPack> {
        if let Some(pack) = self.packs.get(&unit.file_name) {
            tracing::debug!(unit = %unit.file_name, "preprocessing cache hit");
            return Arc::clone(pack);
        }
        tracing::debug!(unit = %unit.file_name, "preprocessing cache miss");
        let pack = Arc::new(find_preprocessing_needed(unit, &mut self.unnamed_classes));
        self.packs.insert(unit.file_name.clone(), Arc::clone(&pack));
        pack
    }

    /// Drop the cached scan of a unit whose tree changed.
    pub fn invalidate(&mut self, file_name: &str) -> bool {
        self.packs.remove(file_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/preprocess.rs"]
mod tests;
