//! After the walk: drops import bindings that nothing reads as a value.
//!
//! With type syntax gone, an import used only in type positions looks exactly
//! like an unused one, so both go.

use crate::erase::EraseMode;
use crate::erase::Eraser;
use crate::parse::hi;
use crate::parse::lo;
use crate::scan::closing_after;
use crate::scan::find_keyword;
use crate::scan::keyword_before;
use crate::scan::past_trailing_comma;
use crate::scope::free_value_names;
use ahash::AHashSet;
use swc_core::ecma::ast::*;
use tracing::trace;

fn entity_root(name: &TsEntityName) -> &str {
  match name {
    TsEntityName::Ident(id) => &id.sym,
    TsEntityName::TsQualifiedName(q) => entity_root(&q.left),
    #[allow(unreachable_patterns)]
    _ => "",
  }
}

fn specifier_local(spec: &ImportSpecifier) -> &str {
  match spec {
    ImportSpecifier::Named(named) => &named.local.sym,
    ImportSpecifier::Default(default) => &default.local.sym,
    ImportSpecifier::Namespace(ns) => &ns.local.sym,
  }
}

fn is_live(spec: &ImportSpecifier, live: &AHashSet<String>) -> bool {
  let type_only = matches!(spec, ImportSpecifier::Named(named) if named.is_type_only);
  !type_only && live.contains(specifier_local(spec))
}

pub(crate) fn prune_imports(eraser: &mut Eraser<'_>, module: &Module) {
  let mut imports = Vec::new();
  let mut import_equals = Vec::new();
  let mut rest = Vec::new();
  for item in &module.body {
    match item {
      ModuleItem::ModuleDecl(ModuleDecl::Import(decl)) => imports.push(decl),
      ModuleItem::ModuleDecl(ModuleDecl::TsImportEquals(decl)) => import_equals.push(&**decl),
      _ => rest.push(item),
    }
  }
  if imports.is_empty() && import_equals.is_empty() {
    return;
  }

  let mut live = free_value_names(rest.iter().copied());
  // `import B = A.b` reads `A`, but only once `B` itself survives.
  loop {
    let mut grew = false;
    for decl in &import_equals {
      if let TsModuleRef::TsEntityName(target) = &decl.module_ref {
        if !decl.is_type_only && (decl.is_export || live.contains(&*decl.id.sym)) {
          grew |= live.insert(entity_root(target).to_string());
        }
      }
    }
    if !grew {
      break;
    }
  }

  for decl in import_equals {
    prune_import_equals(eraser, decl, &live);
  }
  for decl in imports {
    prune_import(eraser, decl, &live);
  }
}

fn prune_import_equals(
  eraser: &mut Eraser<'_>,
  decl: &TsImportEqualsDecl,
  live: &AHashSet<String>,
) {
  let range = lo(decl.span)..hi(decl.span);
  if decl.is_type_only || !(decl.is_export || live.contains(&*decl.id.sym)) {
    trace!(name = %decl.id.sym, "dropping import-equals");
    eraser.erase(range, EraseMode::Block);
    return;
  }
  let Some(import) = find_keyword(eraser.src(), range.start, range.end, "import") else {
    return;
  };
  let binding = match decl.module_ref {
    TsModuleRef::TsEntityName(_) => "var   ",
    _ => "const ",
  };
  eraser
    .splice()
    .overwrite(import..import + "import".len(), binding);
}

fn prune_import(eraser: &mut Eraser<'_>, decl: &ImportDecl, live: &AHashSet<String>) {
  let src = eraser.src();
  let whole = lo(decl.span)..hi(decl.span);
  if decl.type_only {
    eraser.erase(whole, EraseMode::Block);
    return;
  }
  // `import "m"` is kept for its side effects.
  if decl.specifiers.is_empty() {
    return;
  }
  if !decl.specifiers.iter().any(|spec| is_live(spec, live)) {
    trace!(offset = whole.start, "dropping import");
    eraser.erase(whole, EraseMode::Block);
    return;
  }

  let (default, rest) = match decl.specifiers.split_first() {
    Some((ImportSpecifier::Default(default), rest)) => (Some(default), rest),
    _ => (None, &decl.specifiers[..]),
  };
  if let Some(default) = default {
    if !live.contains(&*default.local.sym) {
      let end = past_trailing_comma(src, hi(default.span));
      eraser.erase(lo(default.span)..end, EraseMode::Inline);
    } else if !rest.iter().any(|spec| is_live(spec, live)) {
      // Drop `, { ... }` or `, * as ns` along with its comma.
      let end = match rest.last() {
        Some(ImportSpecifier::Namespace(ns)) => Some(hi(ns.span)),
        Some(last) => {
          let last_end = match last {
            ImportSpecifier::Named(named) => hi(named.span),
            _ => hi(decl.span),
          };
          closing_after(src, last_end, b'}').map(|close| close + 1)
        }
        None => None,
      };
      if let Some(end) = end {
        eraser.erase(hi(default.span)..end, EraseMode::Inline);
      }
      return;
    }
  }

  let items: Vec<_> = rest
    .iter()
    .filter_map(|spec| match spec {
      ImportSpecifier::Named(named) => {
        let start = if named.is_type_only {
          keyword_before(src, lo(named.span), "type").unwrap_or(lo(named.span))
        } else {
          lo(named.span)
        };
        Some((start..hi(named.span), !is_live(spec, live)))
      }
      _ => None,
    })
    .collect();
  if items.iter().any(|(_, dead)| *dead) {
    eraser.erase_dead_items(&items);
  }
}
