use super::Stripper;
use crate::erase::EraseMode;
use crate::parse::hi;
use crate::parse::lo;
use crate::scan::closing_after;
use crate::scan::keyword_at;
use crate::scan::marker_after;
use crate::scan::past_trailing_comma;
use crate::scan::skip_trivia;
use swc_core::common::Spanned;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::VisitWith;

/// End of `pat` including its type annotation, which the pattern's own span
/// may leave out.
fn pat_end(pat: &Pat) -> usize {
  let ann = match pat {
    Pat::Ident(binding) => binding.type_ann.as_deref(),
    Pat::Array(array) => array.type_ann.as_deref(),
    Pat::Object(object) => object.type_ann.as_deref(),
    Pat::Rest(rest) => rest.type_ann.as_deref(),
    _ => None,
  };
  hi(pat.span()).max(ann.map_or(0, |ann| hi(ann.span)))
}

fn is_this_param(pat: &Pat) -> bool {
  matches!(pat, Pat::Ident(binding) if &*binding.id.sym == "this")
}

/// Offset of the `)` ending an arrow's parameter list, found by scanning
/// forward from the last parameter (or the `(`) over trivia.
fn arrow_close_paren(src: &str, arrow: &ArrowExpr) -> Option<usize> {
  let after = match arrow.params.last() {
    Some(last) => {
      let end = pat_end(last);
      marker_after(src, end, b'?').map_or(end, |at| at + 1)
    }
    None => {
      let mut open = match &arrow.type_params {
        Some(type_params) => hi(type_params.span),
        None => lo(arrow.span),
      };
      if arrow.is_async && keyword_at(src, skip_trivia(src, open), "async") {
        open = skip_trivia(src, open) + "async".len();
      }
      let open = skip_trivia(src, open);
      if src.as_bytes().get(open) != Some(&b'(') {
        return None;
      }
      open + 1
    }
  };
  closing_after(src, after, b')')
}

impl Stripper<'_> {
  pub(super) fn strip_function(&mut self, func: &Function) {
    let skip = match func.params.first() {
      Some(first) if is_this_param(&first.pat) => {
        let end = match func.params.get(1) {
          Some(next) => lo(next.span),
          None => past_trailing_comma(self.src, pat_end(&first.pat).max(hi(first.span))),
        };
        self.erase(lo(first.span)..end, EraseMode::Inline);
        1
      }
      _ => 0,
    };
    func.decorators.visit_with(self);
    func.type_params.visit_with(self);
    for param in &func.params[skip..] {
      param.visit_with(self);
    }
    func.return_type.visit_with(self);
    func.body.visit_with(self);
  }

  pub(super) fn strip_setter(&mut self, setter: &SetterProp) {
    if let Some(this) = &setter.this_param {
      self.erase(lo(this.span())..lo(setter.param.span()), EraseMode::Inline);
    }
    setter.key.visit_with(self);
    setter.param.visit_with(self);
    setter.body.visit_with(self);
  }

  /// Moves the opening paren in front of the type parameters and the closing
  /// paren behind the return type, so a line break inside either cannot end
  /// up between `async` and the parameters or between `)` and `=>`.
  pub(super) fn strip_arrow(&mut self, arrow: &ArrowExpr) {
    let src = self.src;
    if let Some(type_params) = &arrow.type_params {
      let open = skip_trivia(src, hi(type_params.span));
      if src.as_bytes().get(open) == Some(&b'(') {
        self.splice().move_range(open..open + 1, lo(type_params.span));
      }
    }
    if let Some(return_type) = &arrow.return_type {
      if let Some(close) = arrow_close_paren(src, arrow) {
        self.splice().move_range(close..close + 1, hi(return_type.span));
      }
    }
    arrow.visit_children_with(self);
  }
}
