use super::decl_start;
use super::is_erased_decl;
use super::Stripper;
use crate::erase::EraseMode;
use crate::parse::hi;
use crate::parse::lo;
use crate::scan::keyword_at;
use crate::scan::keyword_before;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::VisitWith;

impl Stripper<'_> {
  pub(super) fn strip_module_decl(&mut self, decl: &ModuleDecl) {
    match decl {
      // Imports and `import x = ...` are left to the liveness pass.
      ModuleDecl::Import(_) | ModuleDecl::TsImportEquals(_) => {}
      ModuleDecl::ExportDecl(export) => self.strip_export_decl(export),
      ModuleDecl::ExportNamed(export) => self.strip_named_export(export),
      ModuleDecl::ExportAll(export) if export.type_only => {
        self.erase(lo(export.span)..hi(export.span), EraseMode::Block);
      }
      ModuleDecl::ExportDefaultDecl(export) => {
        let erased = match &export.decl {
          DefaultDecl::TsInterfaceDecl(_) => true,
          DefaultDecl::Fn(f) => f.function.body.is_none(),
          _ => false,
        };
        if erased {
          self.erase(lo(export.span)..hi(export.span), EraseMode::Block);
        } else {
          export.visit_children_with(self);
        }
      }
      ModuleDecl::TsExportAssignment(assign) => {
        let start = lo(assign.span);
        if keyword_at(self.src, start, "export") {
          self
            .splice()
            .overwrite(start..start + "export".len(), "module.exports");
        }
        assign.expr.visit_with(self);
      }
      ModuleDecl::TsNamespaceExport(export) => {
        self.erase(lo(export.span)..hi(export.span), EraseMode::Block);
      }
      _ => decl.visit_children_with(self),
    }
  }

  fn strip_export_decl(&mut self, export: &ExportDecl) {
    if is_erased_decl(&export.decl) {
      self.erase(lo(export.span)..hi(export.span), EraseMode::Block);
      return;
    }
    if let Decl::TsEnum(decl) = &export.decl {
      // A second `export enum E` merges into the first; exporting `E`
      // twice would be a syntax error.
      if !self.exported_enums.insert(decl.id.sym.to_string()) {
        let start = decl_start(self.src, &export.decl);
        self.erase(lo(export.span)..start, EraseMode::Inline);
      }
    }
    export.decl.visit_with(self);
  }

  fn strip_named_export(&mut self, export: &NamedExport) {
    if export.type_only {
      self.erase(lo(export.span)..hi(export.span), EraseMode::Block);
      return;
    }
    let items: Vec<_> = export
      .specifiers
      .iter()
      .map(|spec| match spec {
        ExportSpecifier::Named(named) => {
          let start = if named.is_type_only {
            keyword_before(self.src, lo(named.span), "type").unwrap_or(lo(named.span))
          } else {
            lo(named.span)
          };
          (start..hi(named.span), named.is_type_only)
        }
        ExportSpecifier::Namespace(ns) => (lo(ns.span)..hi(ns.span), false),
        ExportSpecifier::Default(default) => {
          (lo(default.exported.span)..hi(default.exported.span), false)
        }
      })
      .collect();
    if items.iter().any(|(_, dead)| *dead) {
      self.eraser.erase_dead_items(&items);
    }
  }
}
