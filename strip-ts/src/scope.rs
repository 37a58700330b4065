//! Value-level scope analysis over a stripped module: which names are read
//! without a local declaration, and which names a pattern binds.
//!
//! Type positions are never visited, so a name that only appears in erased
//! syntax is not a reference.

use crate::strip::is_erased_decl;
use ahash::AHashSet;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::Visit;
use swc_core::ecma::visit::VisitWith;

/// Names bound by `pat`, in source order.
pub fn bound_names(pat: &Pat) -> Vec<String> {
  let mut names = Vec::new();
  collect_bound_names(pat, &mut names);
  names
}

fn collect_bound_names(pat: &Pat, out: &mut Vec<String>) {
  match pat {
    Pat::Ident(id) => out.push(id.id.sym.to_string()),
    Pat::Array(arr) => {
      for elem in arr.elems.iter().flatten() {
        collect_bound_names(elem, out);
      }
    }
    Pat::Rest(rest) => collect_bound_names(&rest.arg, out),
    Pat::Object(obj) => {
      for prop in &obj.props {
        match prop {
          ObjectPatProp::KeyValue(kv) => collect_bound_names(&kv.value, out),
          ObjectPatProp::Assign(assign) => out.push(assign.key.id.sym.to_string()),
          ObjectPatProp::Rest(rest) => collect_bound_names(&rest.arg, out),
        }
      }
    }
    Pat::Assign(assign) => collect_bound_names(&assign.left, out),
    Pat::Invalid(_) | Pat::Expr(_) => {}
  }
}

pub fn param_prop_names(param: &TsParamPropParam) -> Vec<String> {
  match param {
    TsParamPropParam::Ident(id) => vec![id.id.sym.to_string()],
    TsParamPropParam::Assign(assign) => bound_names(&assign.left),
  }
}

/// Collects `var`-scoped names of a function body without entering nested
/// functions or classes.
#[derive(Default)]
struct VarNames {
  names: AHashSet<String>,
}

impl Visit for VarNames {
  fn visit_var_decl(&mut self, n: &VarDecl) {
    if n.kind == VarDeclKind::Var && !n.declare {
      for decl in &n.decls {
        self.names.extend(bound_names(&decl.name));
      }
    }
  }

  fn visit_ts_enum_decl(&mut self, n: &TsEnumDecl) {
    // Lowered to a `var`.
    if !n.declare {
      self.names.insert(n.id.sym.to_string());
    }
  }

  fn visit_ts_import_equals_decl(&mut self, n: &TsImportEqualsDecl) {
    if !n.is_type_only && matches!(n.module_ref, TsModuleRef::TsEntityName(_)) {
      self.names.insert(n.id.sym.to_string());
    }
  }

  fn visit_expr(&mut self, _: &Expr) {}

  fn visit_function(&mut self, _: &Function) {}

  fn visit_class(&mut self, _: &Class) {}

  fn visit_ts_module_decl(&mut self, _: &TsModuleDecl) {}

  fn visit_import_decl(&mut self, _: &ImportDecl) {}
}

fn lexical_decl_names(decl: &Decl, out: &mut AHashSet<String>) {
  if is_erased_decl(decl) {
    return;
  }
  match decl {
    Decl::Var(var) if var.kind != VarDeclKind::Var => {
      for d in &var.decls {
        out.extend(bound_names(&d.name));
      }
    }
    Decl::Using(using) => {
      for d in &using.decls {
        out.extend(bound_names(&d.name));
      }
    }
    Decl::Fn(f) => {
      out.insert(f.ident.sym.to_string());
    }
    Decl::Class(c) => {
      out.insert(c.ident.sym.to_string());
    }
    _ => {}
  }
}

fn lexical_stmt_names(stmts: &[Stmt], out: &mut AHashSet<String>) {
  for stmt in stmts {
    if let Stmt::Decl(decl) = stmt {
      lexical_decl_names(decl, out);
    }
  }
}

fn lexical_item_names(item: &ModuleItem, out: &mut AHashSet<String>) {
  match item {
    ModuleItem::Stmt(Stmt::Decl(decl)) => lexical_decl_names(decl, out),
    ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => lexical_decl_names(&export.decl, out),
    ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &export.decl {
      DefaultDecl::Class(ClassExpr {
        ident: Some(ident), ..
      })
      | DefaultDecl::Fn(FnExpr {
        ident: Some(ident), ..
      }) => {
        out.insert(ident.sym.to_string());
      }
      _ => {}
    },
    _ => {}
  }
}

fn var_names<N: VisitWith<VarNames> + ?Sized>(node: &N) -> AHashSet<String> {
  let mut collector = VarNames::default();
  node.visit_children_with(&mut collector);
  collector.names
}

#[derive(Default)]
struct FreeNames {
  frames: Vec<AHashSet<String>>,
  free: AHashSet<String>,
}

impl FreeNames {
  fn reference(&mut self, name: &str) {
    if !self.frames.iter().rev().any(|frame| frame.contains(name)) {
      self.free.insert(name.to_string());
    }
  }

  fn scoped(&mut self, frame: AHashSet<String>, f: impl FnOnce(&mut Self)) {
    self.frames.push(frame);
    f(self);
    self.frames.pop();
  }

  /// Visits only the expressions inside a binding pattern: defaults and
  /// computed keys.
  fn visit_binding_pat(&mut self, pat: &Pat) {
    match pat {
      Pat::Ident(_) | Pat::Invalid(_) => {}
      Pat::Array(arr) => {
        for elem in arr.elems.iter().flatten() {
          self.visit_binding_pat(elem);
        }
      }
      Pat::Rest(rest) => self.visit_binding_pat(&rest.arg),
      Pat::Object(obj) => {
        for prop in &obj.props {
          match prop {
            ObjectPatProp::KeyValue(kv) => {
              kv.key.visit_with(self);
              self.visit_binding_pat(&kv.value);
            }
            ObjectPatProp::Assign(assign) => assign.value.visit_with(self),
            ObjectPatProp::Rest(rest) => self.visit_binding_pat(&rest.arg),
          }
        }
      }
      Pat::Assign(assign) => {
        self.visit_binding_pat(&assign.left);
        assign.right.visit_with(self);
      }
      Pat::Expr(expr) => expr.visit_with(self),
    }
  }

  fn visit_entity_root(&mut self, name: &TsEntityName) {
    match name {
      TsEntityName::Ident(id) => self.reference(&id.sym),
      TsEntityName::TsQualifiedName(q) => self.visit_entity_root(&q.left),
      #[allow(unreachable_patterns)]
      _ => {}
    }
  }
}

impl Visit for FreeNames {
  fn visit_module_decl(&mut self, n: &ModuleDecl) {
    match n {
      ModuleDecl::Import(_)
      | ModuleDecl::ExportAll(_)
      | ModuleDecl::TsNamespaceExport(_) => {}
      ModuleDecl::ExportNamed(export) => {
        if export.type_only || export.src.is_some() {
          return;
        }
        for spec in &export.specifiers {
          if let ExportSpecifier::Named(ExportNamedSpecifier {
            orig: ModuleExportName::Ident(orig),
            is_type_only: false,
            ..
          }) = spec
          {
            self.reference(&orig.sym);
          }
        }
      }
      ModuleDecl::TsImportEquals(import) => {
        if let (false, TsModuleRef::TsEntityName(name)) =
          (import.is_type_only, &import.module_ref)
        {
          self.visit_entity_root(name);
        }
      }
      _ => n.visit_children_with(self),
    }
  }

  fn visit_decl(&mut self, n: &Decl) {
    if !is_erased_decl(n) {
      n.visit_children_with(self);
    }
  }

  fn visit_expr(&mut self, n: &Expr) {
    match n {
      Expr::Ident(id) => self.reference(&id.sym),
      _ => n.visit_children_with(self),
    }
  }

  fn visit_prop(&mut self, n: &Prop) {
    match n {
      Prop::Shorthand(id) => self.reference(&id.sym),
      _ => n.visit_children_with(self),
    }
  }

  // Reached only for assignment targets and `for (x of ...)` heads; binding
  // sites go through `visit_binding_pat`.
  fn visit_binding_ident(&mut self, n: &BindingIdent) {
    self.reference(&n.id.sym);
  }

  fn visit_jsx_element_name(&mut self, n: &JSXElementName) {
    match n {
      JSXElementName::Ident(id) if !id.sym.starts_with(|c: char| c.is_ascii_lowercase()) => {
        self.reference(&id.sym)
      }
      JSXElementName::JSXMemberExpr(member) => {
        let mut obj = &member.obj;
        loop {
          match obj {
            JSXObject::Ident(id) => {
              self.reference(&id.sym);
              break;
            }
            JSXObject::JSXMemberExpr(inner) => obj = &inner.obj,
          }
        }
      }
      _ => {}
    }
  }

  fn visit_var_declarator(&mut self, n: &VarDeclarator) {
    self.visit_binding_pat(&n.name);
    n.init.visit_with(self);
  }

  fn visit_fn_expr(&mut self, n: &FnExpr) {
    let frame = n.ident.iter().map(|id| id.sym.to_string()).collect();
    self.scoped(frame, |this| n.function.visit_with(this));
  }

  fn visit_class_expr(&mut self, n: &ClassExpr) {
    let frame = n.ident.iter().map(|id| id.sym.to_string()).collect();
    self.scoped(frame, |this| n.class.visit_with(this));
  }

  fn visit_function(&mut self, n: &Function) {
    if n.body.is_none() {
      return;
    }
    let mut frame = var_names(&n.body);
    for param in &n.params {
      frame.extend(bound_names(&param.pat));
    }
    self.scoped(frame, |this| {
      n.decorators.visit_with(this);
      for param in &n.params {
        param.decorators.visit_with(this);
        this.visit_binding_pat(&param.pat);
      }
      n.body.visit_with(this);
    });
  }

  fn visit_arrow_expr(&mut self, n: &ArrowExpr) {
    let mut frame = match &*n.body {
      BlockStmtOrExpr::BlockStmt(block) => var_names(block),
      _ => AHashSet::new(),
    };
    for param in &n.params {
      frame.extend(bound_names(param));
    }
    self.scoped(frame, |this| {
      for param in &n.params {
        this.visit_binding_pat(param);
      }
      n.body.visit_with(this);
    });
  }

  fn visit_constructor(&mut self, n: &Constructor) {
    if n.body.is_none() {
      return;
    }
    let mut frame = var_names(&n.body);
    for param in &n.params {
      match param {
        ParamOrTsParamProp::Param(p) => frame.extend(bound_names(&p.pat)),
        ParamOrTsParamProp::TsParamProp(p) => frame.extend(param_prop_names(&p.param)),
      }
    }
    n.key.visit_with(self);
    self.scoped(frame, |this| {
      for param in &n.params {
        match param {
          ParamOrTsParamProp::Param(p) => {
            p.decorators.visit_with(this);
            this.visit_binding_pat(&p.pat);
          }
          ParamOrTsParamProp::TsParamProp(p) => {
            p.decorators.visit_with(this);
            if let TsParamPropParam::Assign(assign) = &p.param {
              this.visit_binding_pat(&assign.left);
              assign.right.visit_with(this);
            }
          }
        }
      }
      n.body.visit_with(this);
    });
  }

  fn visit_getter_prop(&mut self, n: &GetterProp) {
    n.key.visit_with(self);
    let frame = var_names(&n.body);
    self.scoped(frame, |this| n.body.visit_with(this));
  }

  fn visit_setter_prop(&mut self, n: &SetterProp) {
    n.key.visit_with(self);
    let mut frame = var_names(&n.body);
    frame.extend(bound_names(&n.param));
    self.scoped(frame, |this| {
      this.visit_binding_pat(&n.param);
      n.body.visit_with(this);
    });
  }

  fn visit_static_block(&mut self, n: &StaticBlock) {
    let frame = var_names(&n.body);
    self.scoped(frame, |this| n.body.visit_with(this));
  }

  fn visit_block_stmt(&mut self, n: &BlockStmt) {
    let mut frame = AHashSet::new();
    lexical_stmt_names(&n.stmts, &mut frame);
    self.scoped(frame, |this| n.stmts.visit_with(this));
  }

  fn visit_switch_stmt(&mut self, n: &SwitchStmt) {
    n.discriminant.visit_with(self);
    let mut frame = AHashSet::new();
    for case in &n.cases {
      lexical_stmt_names(&case.cons, &mut frame);
    }
    self.scoped(frame, |this| n.cases.visit_with(this));
  }

  fn visit_for_stmt(&mut self, n: &ForStmt) {
    let mut frame = AHashSet::new();
    if let Some(VarDeclOrExpr::VarDecl(var)) = &n.init {
      if var.kind != VarDeclKind::Var {
        for d in &var.decls {
          frame.extend(bound_names(&d.name));
        }
      }
    }
    self.scoped(frame, |this| n.visit_children_with(this));
  }

  fn visit_for_in_stmt(&mut self, n: &ForInStmt) {
    let frame = for_head_names(&n.left);
    self.scoped(frame, |this| n.visit_children_with(this));
  }

  fn visit_for_of_stmt(&mut self, n: &ForOfStmt) {
    let frame = for_head_names(&n.left);
    self.scoped(frame, |this| n.visit_children_with(this));
  }

  fn visit_catch_clause(&mut self, n: &CatchClause) {
    let frame = n
      .param
      .iter()
      .flat_map(bound_names)
      .collect::<AHashSet<_>>();
    self.scoped(frame, |this| {
      if let Some(param) = &n.param {
        this.visit_binding_pat(param);
      }
      n.body.visit_with(this);
    });
  }

  fn visit_class_member(&mut self, n: &ClassMember) {
    let erased = match n {
      ClassMember::ClassProp(p) => p.declare || p.is_abstract,
      ClassMember::Method(m) => m.is_abstract || m.function.body.is_none(),
      ClassMember::PrivateMethod(m) => m.is_abstract || m.function.body.is_none(),
      ClassMember::AutoAccessor(a) => a.is_abstract,
      ClassMember::TsIndexSignature(_) => true,
      _ => false,
    };
    if !erased {
      n.visit_children_with(self);
    }
  }

  fn visit_ts_enum_decl(&mut self, n: &TsEnumDecl) {
    if n.declare {
      return;
    }
    let frame = n
      .members
      .iter()
      .filter_map(|m| match &m.id {
        TsEnumMemberId::Ident(id) => Some(id.sym.to_string()),
        _ => None,
      })
      .collect();
    self.scoped(frame, |this| {
      for member in &n.members {
        member.init.visit_with(this);
      }
    });
  }

  fn visit_ts_type(&mut self, _: &TsType) {}

  fn visit_ts_type_ann(&mut self, _: &TsTypeAnn) {}

  fn visit_ts_type_param_decl(&mut self, _: &TsTypeParamDecl) {}

  fn visit_ts_type_param_instantiation(&mut self, _: &TsTypeParamInstantiation) {}

  fn visit_ts_expr_with_type_args(&mut self, _: &TsExprWithTypeArgs) {}

  fn visit_ts_interface_decl(&mut self, _: &TsInterfaceDecl) {}

  fn visit_ts_type_alias_decl(&mut self, _: &TsTypeAliasDecl) {}

  fn visit_ts_module_decl(&mut self, _: &TsModuleDecl) {}

  fn visit_ts_index_signature(&mut self, _: &TsIndexSignature) {}
}

fn for_head_names(head: &ForHead) -> AHashSet<String> {
  match head {
    ForHead::VarDecl(var) if var.kind != VarDeclKind::Var => var
      .decls
      .iter()
      .flat_map(|d| bound_names(&d.name))
      .collect(),
    _ => AHashSet::new(),
  }
}

/// Names read as values by `items` but declared by none of their enclosing
/// scopes. Imports among `items` are ignored, so imported names referenced
/// elsewhere come back as free.
pub fn free_value_names<'a>(
  items: impl IntoIterator<Item = &'a ModuleItem> + Clone,
) -> AHashSet<String> {
  let mut top = AHashSet::new();
  let mut vars = VarNames::default();
  for item in items.clone() {
    lexical_item_names(item, &mut top);
    item.visit_with(&mut vars);
  }
  top.extend(vars.names);
  let mut analysis = FreeNames::default();
  analysis.scoped(top, |this| {
    for item in items {
      item.visit_with(this);
    }
  });
  analysis.free
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parse::parse;
  use crate::parse::ParseOptions;

  fn free(src: &str) -> Vec<String> {
    let module = parse(src, ParseOptions::default()).unwrap();
    let mut names: Vec<_> = free_value_names(module.body.iter()).into_iter().collect();
    names.sort();
    names
  }

  #[test]
  fn locals_shadow_free_names() {
    assert_eq!(
      free("let a = b; function f(c) { return c + d; } { let d = 1; }"),
      vec!["b", "d"]
    );
    assert_eq!(free("function f() { var x = 1; { x; } } x;"), vec!["x"]);
  }

  #[test]
  fn type_positions_are_not_references() {
    assert_eq!(
      free("const x: T = 1; type A = typeof y; function f(a: U): V { return a as W; }"),
      Vec::<String>::new()
    );
  }

  #[test]
  fn exports_and_shorthand_are_references() {
    assert_eq!(free("export { a, type B }; const o = { c };"), vec!["a", "c"]);
    assert_eq!(free("export default d;"), vec!["d"]);
  }

  #[test]
  fn hoisting_covers_the_whole_scope() {
    assert_eq!(free("f(); function f() { return g; var g; }"), Vec::<String>::new());
    assert_eq!(free("[a, b] = c;"), vec!["a", "b", "c"]);
  }

  #[test]
  fn enum_members_are_local_to_the_enum() {
    assert_eq!(free("enum E { A = 1, B = A + k }"), vec!["k"]);
  }

  #[test]
  fn import_equals_references_its_root() {
    assert_eq!(free("import X = NS.inner.X; X;"), vec!["NS"]);
  }

  #[test]
  fn bound_names_are_positional() {
    let module = parse("let [a, { b, c: [d] }, ...e] = x;", ParseOptions::default()).unwrap();
    let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = &module.body[0] else {
      panic!("expected a variable declaration");
    };
    assert_eq!(bound_names(&var.decls[0].name), vec!["a", "b", "d", "e"]);
  }
}
