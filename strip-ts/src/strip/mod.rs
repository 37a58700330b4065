//! The single walk over the parsed module. Each TypeScript-only node is
//! erased, rewritten in place or lowered; every other node is walked
//! unchanged. A node handled here never has its children walked again, so no
//! range of the source is edited twice.

use crate::erase::EraseMode;
use crate::erase::Eraser;
use crate::err::StripError;
use crate::parse::hi;
use crate::parse::lo;
use crate::scan::keyword_before;
use crate::scan::marker_after;
use crate::scan::skip_ident;
use crate::scan::skip_whitespace_back;
use crate::splice::Splice;
use crate::StripOptions;
use ahash::AHashSet;
use std::ops::Range;
use swc_core::common::Span;
use swc_core::common::Spanned;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::Visit;
use swc_core::ecma::visit::VisitWith;
use tracing::debug;

mod class;
mod export;
mod func;

pub(crate) struct Stripper<'a> {
  pub(crate) src: &'a str,
  eraser: Eraser<'a>,
  pub(crate) options: &'a StripOptions,
  pub(crate) depth: usize,
  // Enums already exported from the module, so a later `export enum` of the
  // same name merges instead of exporting twice.
  exported_enums: AHashSet<String>,
  // One entry per enclosing class: whether it has a superclass.
  derived: Vec<bool>,
  error: Option<StripError>,
}

impl<'a> Stripper<'a> {
  pub fn new(eraser: Eraser<'a>, options: &'a StripOptions, depth: usize) -> Self {
    Self {
      src: eraser.src(),
      eraser,
      options,
      depth,
      exported_enums: AHashSet::new(),
      derived: Vec::new(),
      error: None,
    }
  }

  pub fn finish(self) -> Result<Eraser<'a>, StripError> {
    match self.error {
      Some(err) => Err(err),
      None => Ok(self.eraser),
    }
  }

  pub(crate) fn erase(&mut self, range: Range<usize>, mode: EraseMode) {
    self.eraser.erase(range, mode);
  }

  pub(crate) fn splice(&mut self) -> &mut Splice<'a> {
    self.eraser.splice()
  }

  /// Records the first failure; the rest of the walk becomes a no-op.
  pub(crate) fn fail(&mut self, err: StripError) {
    self.error.get_or_insert(err);
  }

  fn erase_marker_after(&mut self, pos: usize, marker: u8) {
    if let Some(at) = marker_after(self.src, pos, marker) {
      self.erase(at..at + 1, EraseMode::Inline);
    }
  }

  /// Erases the `?` of an optional binding pattern that ends at `end`, or
  /// whose annotation is `ann`.
  fn erase_optional_pat(&mut self, span: Span, ann: Option<&TsTypeAnn>) {
    let end = match ann {
      Some(ann) => annotation_start(self.src, ann),
      None => hi(span),
    };
    let before = skip_whitespace_back(self.src, end);
    if before > 0 && self.src.as_bytes()[before - 1] == b'?' {
      self.erase(before - 1..before, EraseMode::Inline);
    } else {
      self.erase_marker_after(end, b'?');
    }
  }

  /// Erases what follows `expr` within `span`: `as T`, `satisfies T`, `!`.
  fn erase_after_expr(&mut self, expr: &Expr, span: Span) {
    self.erase(hi(expr.span())..hi(span), EraseMode::Unknown);
    expr.visit_with(self);
  }
}

/// Offset of the `:` that starts `ann`.
pub(crate) fn annotation_start(src: &str, ann: &TsTypeAnn) -> usize {
  let start = lo(ann.span);
  if src.as_bytes().get(start) == Some(&b':') {
    return start;
  }
  let before = skip_whitespace_back(src, start);
  if before > 0 && src.as_bytes()[before - 1] == b':' {
    before - 1
  } else {
    start
  }
}

/// Declarations with no runtime counterpart.
pub(crate) fn is_erased_decl(decl: &Decl) -> bool {
  match decl {
    Decl::TsInterface(_) | Decl::TsTypeAlias(_) | Decl::TsModule(_) => true,
    Decl::Class(c) => c.declare,
    Decl::Fn(f) => f.declare || f.function.body.is_none(),
    Decl::Var(v) => v.declare,
    Decl::TsEnum(e) => e.declare,
    _ => false,
  }
}

/// Start of `decl`, including any `declare`, `abstract` or `const` keyword
/// in front of it.
pub(crate) fn decl_start(src: &str, decl: &Decl) -> usize {
  let (declare, is_abstract, is_const) = match decl {
    Decl::Class(c) => (c.declare, c.class.is_abstract, false),
    Decl::Fn(f) => (f.declare, false, false),
    Decl::Var(v) => (v.declare, false, false),
    Decl::TsInterface(i) => (i.declare, false, false),
    Decl::TsTypeAlias(t) => (t.declare, false, false),
    Decl::TsEnum(e) => (e.declare, false, e.is_const),
    Decl::TsModule(m) => (m.declare, false, false),
    _ => (false, false, false),
  };
  let keywords = [
    (declare, "declare"),
    (is_abstract, "abstract"),
    (is_const, "const"),
  ];
  let mut start = lo(decl.span());
  while let Some(at) = keywords
    .iter()
    .filter(|(present, _)| *present)
    .find_map(|(_, kw)| keyword_before(src, start, kw))
  {
    start = at;
  }
  start
}

fn is_super_call(stmt: &Stmt) -> bool {
  match stmt {
    Stmt::Expr(ExprStmt { expr, .. }) => matches!(
      &**expr,
      Expr::Call(CallExpr {
        callee: Callee::Super(_),
        ..
      })
    ),
    _ => false,
  }
}

impl Visit for Stripper<'_> {
  fn visit_module_decl(&mut self, n: &ModuleDecl) {
    if self.error.is_none() {
      self.strip_module_decl(n);
    }
  }

  fn visit_stmt(&mut self, n: &Stmt) {
    if self.error.is_none() {
      n.visit_children_with(self);
    }
  }

  fn visit_decl(&mut self, n: &Decl) {
    if is_erased_decl(n) {
      if let Decl::TsModule(module) = n {
        debug!(offset = lo(module.span), "erasing namespace without lowering it");
      }
      let range = decl_start(self.src, n)..hi(n.span());
      self.erase(range, EraseMode::Block);
      return;
    }
    match n {
      Decl::TsEnum(decl) => self.lower_enum(decl),
      _ => n.visit_children_with(self),
    }
  }

  fn visit_var_declarator(&mut self, n: &VarDeclarator) {
    if n.definite {
      if let Pat::Ident(binding) = &n.name {
        let name_end = skip_ident(self.src, lo(binding.id.span));
        self.erase_marker_after(name_end, b'!');
      }
    }
    n.visit_children_with(self);
  }

  fn visit_class(&mut self, n: &Class) {
    self.strip_class(n);
  }

  fn visit_class_member(&mut self, n: &ClassMember) {
    self.strip_class_member(n);
  }

  fn visit_function(&mut self, n: &Function) {
    self.strip_function(n);
  }

  fn visit_arrow_expr(&mut self, n: &ArrowExpr) {
    self.strip_arrow(n);
  }

  fn visit_setter_prop(&mut self, n: &SetterProp) {
    self.strip_setter(n);
  }

  fn visit_binding_ident(&mut self, n: &BindingIdent) {
    if n.id.optional {
      let name_end = skip_ident(self.src, lo(n.id.span));
      self.erase_marker_after(name_end, b'?');
    }
    n.type_ann.visit_with(self);
  }

  fn visit_array_pat(&mut self, n: &ArrayPat) {
    if n.optional {
      self.erase_optional_pat(n.span, n.type_ann.as_deref());
    }
    n.visit_children_with(self);
  }

  fn visit_object_pat(&mut self, n: &ObjectPat) {
    if n.optional {
      self.erase_optional_pat(n.span, n.type_ann.as_deref());
    }
    n.visit_children_with(self);
  }

  fn visit_ts_as_expr(&mut self, n: &TsAsExpr) {
    self.erase_after_expr(&n.expr, n.span);
  }

  fn visit_ts_satisfies_expr(&mut self, n: &TsSatisfiesExpr) {
    self.erase_after_expr(&n.expr, n.span);
  }

  fn visit_ts_const_assertion(&mut self, n: &TsConstAssertion) {
    self.erase_after_expr(&n.expr, n.span);
  }

  fn visit_ts_non_null_expr(&mut self, n: &TsNonNullExpr) {
    self.erase_after_expr(&n.expr, n.span);
  }

  fn visit_ts_instantiation(&mut self, n: &TsInstantiation) {
    self.erase_after_expr(&n.expr, n.span);
  }

  fn visit_ts_type_assertion(&mut self, n: &TsTypeAssertion) {
    self.erase(lo(n.span)..lo(n.expr.span()), EraseMode::Inline);
    n.expr.visit_with(self);
  }

  fn visit_ts_type_ann(&mut self, n: &TsTypeAnn) {
    let start = annotation_start(self.src, n);
    self.erase(start..hi(n.span), EraseMode::Inline);
  }

  fn visit_ts_type_param_decl(&mut self, n: &TsTypeParamDecl) {
    self.erase(lo(n.span)..hi(n.span), EraseMode::Inline);
  }

  fn visit_ts_type_param_instantiation(&mut self, n: &TsTypeParamInstantiation) {
    self.erase(lo(n.span)..hi(n.span), EraseMode::Inline);
  }

  // Types are only ever erased as a whole.
  fn visit_ts_type(&mut self, _: &TsType) {}

  fn visit_ts_expr_with_type_args(&mut self, _: &TsExprWithTypeArgs) {}

  fn visit_ts_interface_decl(&mut self, _: &TsInterfaceDecl) {}

  fn visit_ts_type_alias_decl(&mut self, _: &TsTypeAliasDecl) {}

  fn visit_ts_module_decl(&mut self, _: &TsModuleDecl) {}
}
