//! Lowering of `enum` declarations to a `var` plus an immediately invoked
//! function that fills in both the name-to-value and value-to-name maps.
//!
//! ```text
//! enum E { A, B = f() }
//! ```
//! becomes, on the same lines,
//! ```text
//! var E;(function (E) { const A = 0;E[E["A"] = A] = "A"; const B = f();E[E["B"] = B] = "B"; })(E || (E = {}));
//! ```

use crate::err::StripError;
use crate::parse::hi;
use crate::parse::lo;
use crate::scan::keyword_before;
use crate::scan::past_trailing_comma;
use crate::strip::Stripper;
use crate::strip_at_depth;
use ahash::AHashSet;
use swc_core::common::Spanned;
use swc_core::ecma::ast::*;
use tracing::debug;

// Names that cannot be bound by `const`.
const RESERVED: &[&str] = &[
  "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
  "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
  "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let", "new",
  "null", "package", "private", "protected", "public", "return", "static", "super", "switch",
  "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Parameter name for the enum object inside the lowered function: the enum's
/// own name unless a member shadows it.
pub(crate) fn enum_alias(name: &str, members: &AHashSet<String>) -> String {
  if !members.contains(name) {
    return name.to_string();
  }
  let mut i = 0;
  loop {
    let candidate = if i == 0 {
      format!("{name}_")
    } else {
      format!("{name}_{i}")
    };
    if !members.contains(&candidate) {
      return candidate;
    }
    i += 1;
  }
}

/// Appends the line breaks `text` lost relative to `original`, so the lines
/// after it keep their numbers.
fn keep_line_breaks(mut text: String, original: &str) -> String {
  let lost = original
    .matches('\n')
    .count()
    .saturating_sub(text.matches('\n').count());
  text.extend(std::iter::repeat('\n').take(lost));
  text
}

impl Stripper<'_> {
  pub(crate) fn lower_enum(&mut self, decl: &TsEnumDecl) {
    let src = self.src;
    let name = decl.id.sym.to_string();
    let member_names: AHashSet<String> = decl
      .members
      .iter()
      .filter_map(|m| match &m.id {
        TsEnumMemberId::Ident(id) => Some(id.sym.to_string()),
        _ => None,
      })
      .collect();
    let alias = enum_alias(&name, &member_names);
    debug!(name = %name, members = decl.members.len(), "lowering enum");

    let start = if decl.is_const {
      keyword_before(src, lo(decl.span), "const").unwrap_or(lo(decl.span))
    } else {
      lo(decl.span)
    };
    self.splice().overwrite(
      start..hi(decl.id.span),
      format!("var {name};(function ({alias})"),
    );

    let mut prev: Option<String> = None;
    for (index, member) in decl.members.iter().enumerate() {
      let (local, key) = match &member.id {
        TsEnumMemberId::Ident(id) if !RESERVED.contains(&&*id.sym) => {
          (id.sym.to_string(), serde_json::Value::from(&*id.sym).to_string())
        }
        TsEnumMemberId::Ident(id) => (
          format!("{alias}${index}"),
          serde_json::Value::from(&*id.sym).to_string(),
        ),
        TsEnumMemberId::Str(lit) => (
          format!("{alias}${index}"),
          src[lo(lit.span)..hi(lit.span)].to_string(),
        ),
        #[allow(unreachable_patterns)]
        _ => continue,
      };
      let value = match &member.init {
        Some(init) => {
          let init = &src[lo(init.span())..hi(init.span())];
          match self.strip_initializer(&local, init) {
            Ok(value) => value,
            Err(err) => return self.fail(err),
          }
        }
        None => match &prev {
          Some(prev) => format!("const {local} = {prev} + 1"),
          None => format!("const {local} = 0"),
        },
      };
      let member_end = member
        .init
        .as_ref()
        .map_or(hi(member.span), |init| hi(init.span()).max(hi(member.span)));
      let end = past_trailing_comma(src, member_end);
      let text = format!("{value};{alias}[{alias}[{key}] = {local}] = {key};");
      let range = lo(member.span)..end;
      let text = keep_line_breaks(text, &src[range.clone()]);
      self.splice().overwrite(range, text);
      prev = Some(local);
    }

    let close = hi(decl.span).saturating_sub(1);
    if src.as_bytes().get(close) == Some(&b'}') {
      self
        .splice()
        .overwrite(close..close + 1, format!("}})({name} || ({name} = {{}}));"));
    }
  }

  /// Strips `const <local> = <init>` as a program of its own.
  fn strip_initializer(&self, local: &str, init: &str) -> Result<String, StripError> {
    let depth = self.depth + 1;
    if depth > self.options.max_enum_depth {
      return Err(StripError::RecursionLimit { depth });
    }
    let snippet = format!("const {local} = {init}");
    let stripped = strip_at_depth(&snippet, self.options, depth)?;
    Ok(stripped.code.trim_end().to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn alias_avoids_member_names() {
    let members: AHashSet<String> = ["E", "E_"].iter().map(|s| s.to_string()).collect();
    assert_eq!(enum_alias("E", &members), "E_1");
    assert_eq!(enum_alias("F", &members), "F");
  }

  #[test]
  fn lost_line_breaks_are_restored() {
    assert_eq!(keep_line_breaks("a;b".into(), "x =\n  1,"), "a;b\n");
    assert_eq!(keep_line_breaks("a\n".into(), "x =\n  1,"), "a\n");
  }
}
