use std::collections::BTreeMap;
use std::ops::Range;

// Render order of attachments sharing a position.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
enum Side {
  After,
  Moved,
  Before,
}

#[derive(Debug)]
struct Attachment {
  pos: usize,
  side: Side,
  seq: usize,
  text: String,
}

/// Accumulates edits against an immutable source and renders them in one
/// pass.
///
/// Replaced ranges (overwrites, removals, and the origin of moves) must never
/// overlap, and nothing may be attached strictly inside a replaced range.
/// Both are bugs in the caller and panic.
#[derive(Debug)]
pub struct Splice<'a> {
  source: &'a str,
  // Start -> (end, replacement).
  replaced: BTreeMap<usize, (usize, String)>,
  attached: Vec<Attachment>,
}

impl<'a> Splice<'a> {
  pub fn new(source: &'a str) -> Self {
    Self {
      source,
      replaced: BTreeMap::new(),
      attached: Vec::new(),
    }
  }

  fn check_pos(&self, pos: usize) {
    assert!(
      pos <= self.source.len() && self.source.is_char_boundary(pos),
      "splice position {pos} is not a character boundary of the {}-byte source",
      self.source.len()
    );
  }

  fn claim(&mut self, range: Range<usize>, text: String) {
    assert!(range.start < range.end, "empty splice range {range:?}");
    self.check_pos(range.start);
    self.check_pos(range.end);
    if let Some((&start, &(end, _))) = self.replaced.range(..range.end).next_back() {
      assert!(
        end <= range.start,
        "splice range {range:?} overlaps earlier edit {:?}",
        start..end
      );
    }
    self.replaced.insert(range.start, (range.end, text));
  }

  fn attach(&mut self, pos: usize, side: Side, text: String) {
    self.check_pos(pos);
    let seq = self.attached.len();
    self.attached.push(Attachment {
      pos,
      side,
      seq,
      text,
    });
  }

  pub fn overwrite(&mut self, range: Range<usize>, text: impl Into<String>) {
    self.claim(range, text.into());
  }

  pub fn remove(&mut self, range: Range<usize>) {
    self.claim(range, String::new());
  }

  /// Attaches `text` to the end of whatever precedes `pos`.
  pub fn insert_after(&mut self, pos: usize, text: impl Into<String>) {
    self.attach(pos, Side::After, text.into());
  }

  /// Attaches `text` to the start of whatever follows `pos`.
  pub fn insert_before(&mut self, pos: usize, text: impl Into<String>) {
    self.attach(pos, Side::Before, text.into());
  }

  /// Removes `range` and renders its original text at `dest` instead.
  pub fn move_range(&mut self, range: Range<usize>, dest: usize) {
    let text = self.source[range.clone()].to_string();
    self.remove(range);
    self.attach(dest, Side::Moved, text);
  }

  fn is_untouched(&self) -> bool {
    self.replaced.is_empty() && self.attached.is_empty()
  }

  pub fn render(mut self) -> String {
    let source = self.source;
    if self.is_untouched() {
      return source.to_string();
    }
    self.attached.sort_by_key(|a| (a.pos, a.side, a.seq));
    let mut out = String::with_capacity(source.len() + source.len() / 8);
    let mut cursor = 0;
    let mut pending = self.attached.iter().peekable();
    let mut flush_until = |limit: usize, cursor: &mut usize, out: &mut String| {
      while let Some(a) = pending.next_if(|a| a.pos <= limit) {
        assert!(
          a.pos >= *cursor,
          "insertion at {} falls inside a replaced range ending at {}",
          a.pos,
          cursor
        );
        out.push_str(&source[*cursor..a.pos]);
        *cursor = a.pos;
        out.push_str(&a.text);
      }
    };
    for (&start, (end, text)) in self.replaced.iter() {
      flush_until(start, &mut cursor, &mut out);
      out.push_str(&source[cursor..start]);
      out.push_str(text);
      cursor = *end;
    }
    flush_until(source.len(), &mut cursor, &mut out);
    out.push_str(&source[cursor..]);
    out
  }
}

#[cfg(test)]
mod tests {
  use super::Splice;

  #[test]
  fn renders_untouched_source_verbatim() {
    assert_eq!(Splice::new("let a = 1;").render(), "let a = 1;");
  }

  #[test]
  fn overwrites_and_removes() {
    let mut s = Splice::new("abcdef");
    s.overwrite(1..3, "XY");
    s.remove(4..5);
    assert_eq!(s.render(), "aXYdf");
  }

  #[test]
  fn attachments_order_around_replaced_ranges() {
    let mut s = Splice::new("0123456789");
    s.overwrite(2..4, "__");
    s.overwrite(4..6, "..");
    s.insert_before(4, "<b>");
    s.insert_after(4, "<a>");
    s.insert_before(2, "[");
    s.insert_after(6, "]");
    assert_eq!(s.render(), "01[__<a><b>..]6789");
  }

  #[test]
  fn moves_text() {
    let mut s = Splice::new("<T>(a): R => a");
    s.move_range(3..4, 0);
    s.overwrite(0..3, "   ");
    s.move_range(5..6, 9);
    s.overwrite(6..9, "   ");
    assert_eq!(s.render(), "(   a   ) => a");
  }

  #[test]
  #[should_panic(expected = "overlaps")]
  fn overlapping_overwrites_panic() {
    let mut s = Splice::new("abcdef");
    s.overwrite(1..4, "x");
    s.overwrite(3..5, "y");
  }

  #[test]
  #[should_panic(expected = "inside a replaced range")]
  fn insertion_inside_replaced_range_panics() {
    let mut s = Splice::new("abcdef");
    s.overwrite(1..4, "x");
    s.insert_before(2, "y");
    s.render();
  }
}
