use super::is_super_call;
use super::Stripper;
use crate::erase::whiteout;
use crate::erase::EraseMode;
use crate::parse::hi;
use crate::parse::lo;
use crate::scan::find_keyword;
use crate::scan::keyword_at;
use crate::scan::keyword_before;
use crate::scan::keyword_leading_to;
use crate::scope::param_prop_names;
use aho_corasick::AhoCorasick;
use aho_corasick::AhoCorasickBuilder;
use aho_corasick::MatchKind;
use once_cell::sync::Lazy;
use std::ops::Range;
use swc_core::common::Span;
use swc_core::common::Spanned;
use swc_core::ecma::ast::*;
use swc_core::ecma::visit::VisitWith;

/// Member modifiers that only exist in TypeScript.
const TS_MODIFIERS: &[&str] = &[
  "abstract",
  "declare",
  "override",
  "private",
  "protected",
  "public",
  "readonly",
];

static TS_MODIFIER_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
  AhoCorasickBuilder::new()
    .match_kind(MatchKind::LeftmostLongest)
    .build(TS_MODIFIERS)
    .unwrap()
});

/// Extends `pos` backwards over any of `keywords`.
fn extend_over_keywords(src: &str, mut pos: usize, keywords: &[&str]) -> usize {
  while let Some(at) = keywords.iter().find_map(|kw| keyword_before(src, pos, kw)) {
    pos = at;
  }
  pos
}

/// The text between a member's decorators and its key.
struct MemberHead {
  start: usize,
  key: usize,
  decorated: bool,
}

impl MemberHead {
  fn new(span: Span, decorators: &[Decorator], key: Span) -> Self {
    match decorators.last() {
      Some(last) => MemberHead {
        start: hi(last.span),
        key: lo(key),
        decorated: true,
      },
      None => MemberHead {
        start: lo(span),
        key: lo(key),
        decorated: false,
      },
    }
  }
}

fn modifier_ranges(src: &str, head: &MemberHead) -> Vec<Range<usize>> {
  let Some(text) = src.get(head.start..head.key) else {
    return Vec::new();
  };
  TS_MODIFIER_MATCHER
    .find_iter(text)
    .map(|m| head.start + m.start()..head.start + m.end())
    .filter(|m| keyword_at(src, m.start, &src[m.clone()]))
    .collect()
}

impl Stripper<'_> {
  pub(super) fn strip_class(&mut self, class: &Class) {
    let src = self.src;
    if class.is_abstract {
      if let Some(at) = abstract_keyword(src, class) {
        self.erase(at..at + "abstract".len(), EraseMode::Inline);
      }
    }
    if let (Some(first), Some(last)) = (class.implements.first(), class.implements.last()) {
      let start = keyword_leading_to(src, lo(class.span), lo(first.span), "implements")
        .unwrap_or(lo(first.span));
      self.erase(start..hi(last.span), EraseMode::Inline);
    }

    self.derived.push(class.super_class.is_some());
    class.decorators.visit_with(self);
    class.type_params.visit_with(self);
    class.super_class.visit_with(self);
    class.super_type_params.visit_with(self);
    class.body.visit_with(self);
    self.derived.pop();
  }

  pub(super) fn strip_class_member(&mut self, member: &ClassMember) {
    match member {
      ClassMember::Constructor(ctor) => self.strip_constructor(ctor),
      ClassMember::Method(method) => {
        let head = MemberHead::new(method.span, &method.function.decorators, method.key.span());
        if method.is_abstract || method.function.body.is_none() {
          self.erase_member(&head, method.span, &method.function.decorators);
          return;
        }
        self.strip_member_head(&head);
        if method.is_optional {
          self.erase_marker_after(hi(method.key.span()), b'?');
        }
        method.key.visit_with(self);
        method.function.visit_with(self);
      }
      ClassMember::PrivateMethod(method) => {
        let head = MemberHead::new(method.span, &method.function.decorators, method.key.span);
        if method.is_abstract || method.function.body.is_none() {
          self.erase_member(&head, method.span, &method.function.decorators);
          return;
        }
        self.strip_member_head(&head);
        if method.is_optional {
          self.erase_marker_after(hi(method.key.span), b'?');
        }
        method.function.visit_with(self);
      }
      ClassMember::ClassProp(prop) => {
        let head = MemberHead::new(prop.span, &prop.decorators, prop.key.span());
        if prop.declare || prop.is_abstract {
          self.erase_member(&head, prop.span, &prop.decorators);
          return;
        }
        self.strip_member_head(&head);
        self.strip_prop_markers(hi(prop.key.span()), prop.is_optional, prop.definite);
        prop.decorators.visit_with(self);
        prop.key.visit_with(self);
        prop.type_ann.visit_with(self);
        prop.value.visit_with(self);
      }
      ClassMember::PrivateProp(prop) => {
        let head = MemberHead::new(prop.span, &prop.decorators, prop.key.span);
        self.strip_member_head(&head);
        self.strip_prop_markers(hi(prop.key.span), prop.is_optional, prop.definite);
        prop.decorators.visit_with(self);
        prop.type_ann.visit_with(self);
        prop.value.visit_with(self);
      }
      ClassMember::AutoAccessor(accessor) => {
        let head = MemberHead::new(accessor.span, &accessor.decorators, accessor.key.span());
        if accessor.is_abstract {
          self.erase_member(&head, accessor.span, &accessor.decorators);
          return;
        }
        self.strip_member_head(&head);
        self.strip_prop_markers(hi(accessor.key.span()), false, accessor.definite);
        accessor.decorators.visit_with(self);
        accessor.key.visit_with(self);
        accessor.type_ann.visit_with(self);
        accessor.value.visit_with(self);
      }
      ClassMember::TsIndexSignature(sig) => {
        let head = MemberHead::new(sig.span, &[], sig.span);
        self.erase_member(&head, sig.span, &[]);
      }
      _ => member.visit_children_with(self),
    }
  }

  /// Replaces a whole member with `;` and whitespace, so whatever follows
  /// cannot continue the previous member's initializer.
  fn erase_member(&mut self, head: &MemberHead, span: Span, decorators: &[Decorator]) {
    let start = match decorators.first() {
      Some(first) => lo(first.span).min(lo(span)),
      None => head.start,
    };
    let end = hi(span);
    if start >= end {
      return;
    }
    let mut text = whiteout(&self.src[start..end]);
    if text.starts_with(' ') {
      text.replace_range(..1, ";");
    }
    self.splice().overwrite(start..end, text);
  }

  /// Blanks the TypeScript modifiers in front of a member's key. An
  /// undecorated member that starts with one gets a `;` in its place.
  fn strip_member_head(&mut self, head: &MemberHead) {
    let ranges = modifier_ranges(self.src, head);
    let (Some(first), Some(last)) = (ranges.first(), ranges.last()) else {
      return;
    };
    let region = first.start..last.end;
    let mut text = self.src[region.clone()].to_string();
    for m in &ranges {
      let local = m.start - region.start..m.end - region.start;
      text.replace_range(local.clone(), &" ".repeat(local.len()));
    }
    if !head.decorated && first.start == head.start {
      text.replace_range(..1, ";");
    }
    self.splice().overwrite(region, text);
  }

  fn strip_prop_markers(&mut self, key_end: usize, optional: bool, definite: bool) {
    if optional {
      self.erase_marker_after(key_end, b'?');
    }
    if definite {
      self.erase_marker_after(key_end, b'!');
    }
  }

  fn strip_constructor(&mut self, ctor: &Constructor) {
    let head = MemberHead::new(ctor.span, &[], ctor.key.span());
    let Some(body) = &ctor.body else {
      self.erase_member(&head, ctor.span, &[]);
      return;
    };
    self.strip_member_head(&head);

    let mut fields = String::new();
    let mut assignments = String::new();
    for param in &ctor.params {
      let prop = match param {
        ParamOrTsParamProp::Param(param) => {
          param.visit_with(self);
          continue;
        }
        ParamOrTsParamProp::TsParamProp(prop) => prop,
      };
      let start = match prop.decorators.last() {
        Some(last) => hi(last.span),
        None => extend_over_keywords(self.src, lo(prop.span), TS_MODIFIERS),
      };
      let pat_start = match &prop.param {
        TsParamPropParam::Ident(binding) => lo(binding.id.span),
        TsParamPropParam::Assign(assign) => lo(assign.left.span()),
      };
      if start < pat_start {
        self.erase(start..pat_start, EraseMode::Inline);
      }
      prop.decorators.visit_with(self);
      prop.param.visit_with(self);
      for name in param_prop_names(&prop.param) {
        fields.push_str(&name);
        fields.push(';');
        assignments.push_str(&format!("this.{name}={name};"));
      }
    }

    if !fields.is_empty() {
      self.splice().insert_before(head.start, fields);
      let derived = self.derived.last().copied().unwrap_or(false);
      match body.stmts.iter().find(|stmt| derived && is_super_call(stmt)) {
        Some(stmt) => {
          let end = hi(stmt.span());
          self.splice().insert_after(end, format!(";{assignments}"));
        }
        None => {
          let open = lo(body.span) + 1;
          self.splice().insert_after(open, assignments);
        }
      }
    }
    body.visit_with(self);
  }
}

/// Offset of the `abstract` keyword of an abstract class.
fn abstract_keyword(src: &str, class: &Class) -> Option<usize> {
  let start = class
    .decorators
    .last()
    .map_or(lo(class.span), |last| hi(last.span).max(lo(class.span)));
  if let Some(at) = keyword_before(src, start, "abstract") {
    return Some(at);
  }
  let class_kw = find_keyword(src, start, hi(class.span), "class")?;
  find_keyword(src, start, class_kw, "abstract")
}
