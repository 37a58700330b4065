use crate::scan::is_js_whitespace;
use crate::scan::past_trailing_comma;
use crate::scan::skip_trivia;
use crate::splice::Splice;
use serde::Serialize;
use std::ops::Range;
use tracing::warn;

/// What the caller knows about the statement boundary after an erased range.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EraseMode {
  /// A whole statement or declaration; nothing can continue it.
  Block,
  /// Erasure inside an expression or signature.
  Inline,
  /// May end a statement; check what follows for an ASI hazard.
  Unknown,
}

/// A place where erasure left a statement whose end is followed by `(` or
/// `[`, so the following line may now parse as a call or index of it.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct AsiHazard {
  pub erased: Range<usize>,
  /// Byte offset of the `(` or `[`.
  pub next: usize,
  pub line: usize,
  pub col: usize,
}

/// 1-based line and 0-based character column of `offset`.
pub fn line_col(src: &str, offset: usize) -> (usize, usize) {
  let offset = offset.min(src.len());
  let head = &src[..offset];
  let line_start = head.rfind('\n').map_or(0, |i| i + 1);
  let line = head.bytes().filter(|&b| b == b'\n').count() + 1;
  (line, head[line_start..].chars().count())
}

/// Every non-whitespace character becomes one space; whitespace, including
/// line terminators, is kept.
pub fn whiteout(text: &str) -> String {
  text
    .chars()
    .map(|c| if is_js_whitespace(c) { c } else { ' ' })
    .collect()
}

/// Offset of a `(` or `[` that is the next token after `end`.
pub fn asi_hazard_after(src: &str, end: usize) -> Option<usize> {
  let next = skip_trivia(src, end);
  matches!(src.as_bytes().get(next), Some(b'(' | b'[')).then_some(next)
}

/// The erasure primitive plus the splice buffer it writes to. Every edit of a
/// stripping run goes through here.
pub struct Eraser<'a> {
  src: &'a str,
  splice: Splice<'a>,
  hazards: Vec<AsiHazard>,
}

impl<'a> Eraser<'a> {
  pub fn new(src: &'a str) -> Self {
    Self {
      src,
      splice: Splice::new(src),
      hazards: Vec::new(),
    }
  }

  pub fn src(&self) -> &'a str {
    self.src
  }

  pub fn splice(&mut self) -> &mut Splice<'a> {
    &mut self.splice
  }

  pub fn erase(&mut self, range: Range<usize>, mode: EraseMode) {
    if range.is_empty() {
      return;
    }
    if mode == EraseMode::Unknown {
      if let Some(next) = asi_hazard_after(self.src, range.end) {
        let (line, col) = line_col(self.src, next);
        warn!(line, col, "erasure leaves a statement followed by `(` or `[`");
        self.hazards.push(AsiHazard {
          erased: range.clone(),
          next,
          line,
          col,
        });
      }
    }
    let text = whiteout(&self.src[range.clone()]);
    self.splice.overwrite(range, text);
  }

  /// Erases the dead entries of a comma-separated list. Each goes together
  /// with everything up to the next entry, or, for the last entry, with its
  /// trailing comma if there is one.
  pub fn erase_dead_items(&mut self, items: &[(Range<usize>, bool)]) {
    for (i, (range, dead)) in items.iter().enumerate() {
      if !dead {
        continue;
      }
      let end = match items.get(i + 1) {
        Some((next, _)) => next.start,
        None => past_trailing_comma(self.src, range.end),
      };
      self.erase(range.start..end, EraseMode::Inline);
    }
  }

  pub fn render(self) -> (String, Vec<AsiHazard>) {
    (self.splice.render(), self.hazards)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn whiteout_keeps_line_layout() {
    assert_eq!(whiteout("a: {\n  b: é\r\n}"), "    \n      \r\n ");
    assert_eq!(whiteout("é"), " ");
  }

  #[test]
  fn empty_range_is_a_no_op() {
    let mut eraser = Eraser::new("abc");
    eraser.erase(1..1, EraseMode::Unknown);
    assert_eq!(eraser.render(), ("abc".to_string(), Vec::new()));
  }

  #[test]
  fn unknown_mode_flags_a_following_paren() {
    let src = "foo as Bar\n(x)";
    let mut eraser = Eraser::new(src);
    eraser.erase(3..10, EraseMode::Unknown);
    let (code, hazards) = eraser.render();
    assert_eq!(code, "foo       \n(x)");
    assert_eq!(hazards.len(), 1);
    assert_eq!(hazards[0].next, 11);
    assert_eq!((hazards[0].line, hazards[0].col), (2, 0));
  }

  #[test]
  fn known_modes_never_flag() {
    let src = "a!\n[0]";
    let mut eraser = Eraser::new(src);
    eraser.erase(1..2, EraseMode::Inline);
    assert!(eraser.render().1.is_empty());
    assert_eq!(asi_hazard_after(src, 2), Some(3));
  }

  #[test]
  fn dead_list_items_take_their_commas() {
    let src = "{ a, b, c, }";
    let mut eraser = Eraser::new(src);
    eraser.erase_dead_items(&[(2..3, true), (5..6, false), (8..9, true)]);
    assert_eq!(eraser.render().0, "{    b,    }");
  }

  #[test]
  fn line_col_counts_characters() {
    assert_eq!(line_col("ab\né x", 6), (2, 2));
    assert_eq!(line_col("abc", 0), (1, 0));
  }
}
