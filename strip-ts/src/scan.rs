//! Byte-level lookups over the source text for tokens the AST does not give
//! spans for: modifier keywords, `?`/`!` markers, separating commas.

use memchr::memmem;

pub fn is_js_whitespace(c: char) -> bool {
  c.is_whitespace() || c == '\u{feff}'
}

pub fn is_ident_char(c: char) -> bool {
  c == '$' || c == '_' || c == '\\' || c.is_alphanumeric()
}

fn char_at(src: &str, pos: usize) -> Option<char> {
  src.get(pos..).and_then(|rest| rest.chars().next())
}

fn char_before(src: &str, pos: usize) -> Option<char> {
  src.get(..pos).and_then(|head| head.chars().next_back())
}

/// Skips whitespace, line terminators and comments starting at `pos`.
pub fn skip_trivia(src: &str, mut pos: usize) -> usize {
  let bytes = src.as_bytes();
  loop {
    match char_at(src, pos) {
      Some(c) if is_js_whitespace(c) => pos += c.len_utf8(),
      Some('/') if bytes.get(pos + 1) == Some(&b'*') => {
        pos = match memmem::find(&bytes[pos + 2..], b"*/") {
          Some(i) => pos + 2 + i + 2,
          None => src.len(),
        };
      }
      Some('/') if bytes.get(pos + 1) == Some(&b'/') => {
        let rest = &src[pos..];
        pos += rest
          .find(['\n', '\r', '\u{2028}', '\u{2029}'])
          .unwrap_or(rest.len());
      }
      _ => return pos,
    }
  }
}

/// Skips whitespace backwards from `pos`; comments are not recognized.
pub fn skip_whitespace_back(src: &str, mut pos: usize) -> usize {
  while let Some(c) = char_before(src, pos) {
    if !is_js_whitespace(c) {
      break;
    }
    pos -= c.len_utf8();
  }
  pos
}

pub fn skip_ident(src: &str, mut pos: usize) -> usize {
  while let Some(c) = char_at(src, pos) {
    if !is_ident_char(c) {
      break;
    }
    pos += c.len_utf8();
  }
  pos
}

/// Whether the word `kw` starts exactly at `pos`.
pub fn keyword_at(src: &str, pos: usize, kw: &str) -> bool {
  src.get(pos..).is_some_and(|rest| rest.starts_with(kw))
    && !char_before(src, pos).is_some_and(is_ident_char)
    && !char_at(src, pos + kw.len()).is_some_and(is_ident_char)
}

/// Start of the word `kw` if it is the last token before `pos`.
pub fn keyword_before(src: &str, pos: usize, kw: &str) -> Option<usize> {
  let end = skip_whitespace_back(src, pos);
  let start = end.checked_sub(kw.len())?;
  (src.is_char_boundary(start) && keyword_at(src, start, kw)).then_some(start)
}

/// First occurrence of the word `kw` within `from..to`.
pub fn find_keyword(src: &str, from: usize, to: usize, kw: &str) -> Option<usize> {
  let hay = src.get(from..to)?.as_bytes();
  memmem::find_iter(hay, kw.as_bytes())
    .map(|i| from + i)
    .find(|&at| keyword_at(src, at, kw))
}

/// Start of the word `kw` within `from..to` whose next token starts at `to`,
/// with comments treated as trivia. Occurrences inside comments never qualify
/// since what follows them is the rest of the comment.
pub fn keyword_leading_to(src: &str, from: usize, to: usize, kw: &str) -> Option<usize> {
  let hay = src.get(from..to)?.as_bytes();
  memmem::find_iter(hay, kw.as_bytes())
    .map(|i| from + i)
    .find(|&at| keyword_at(src, at, kw) && skip_trivia(src, at + kw.len()) == to)
}

/// Position of `marker` if it is the next non-trivia byte at or after `pos`.
pub fn marker_after(src: &str, pos: usize, marker: u8) -> Option<usize> {
  let at = skip_trivia(src, pos);
  (src.as_bytes().get(at) == Some(&marker)).then_some(at)
}

/// Position after a comma that directly follows `pos` (modulo trivia), or
/// `pos` itself when there is none.
pub fn past_trailing_comma(src: &str, pos: usize) -> usize {
  match marker_after(src, pos, b',') {
    Some(at) => at + 1,
    None => pos,
  }
}

/// Position of the closing `close` that ends a list whose last item ends at
/// `pos`, stepping over trivia and elision commas.
pub fn closing_after(src: &str, mut pos: usize, close: u8) -> Option<usize> {
  loop {
    pos = skip_trivia(src, pos);
    match src.as_bytes().get(pos) {
      Some(b',') => pos += 1,
      Some(&b) if b == close => return Some(pos),
      _ => return None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn trivia_includes_comments() {
    let src = "a /* x */ // y\n  (b)";
    assert_eq!(skip_trivia(src, 1), src.find('(').unwrap());
  }

  #[test]
  fn keywords_respect_word_boundaries() {
    let src = "publicity public x";
    assert!(!keyword_at(src, 0, "public"));
    assert_eq!(find_keyword(src, 0, src.len(), "public"), Some(10));
    assert_eq!(keyword_before(src, 17, "public"), Some(10));
    assert_eq!(keyword_before(src, 9, "public"), None);
  }

  #[test]
  fn keyword_leading_to_skips_comments() {
    let src = "A /* implements */ implements // implements\n  I";
    let to = src.find('I').unwrap();
    assert_eq!(keyword_leading_to(src, 0, to, "implements"), Some(19));
    assert_eq!(keyword_leading_to(src, 0, to - 1, "implements"), None);
  }

  #[test]
  fn markers_and_commas() {
    let src = "x ?: T, y";
    assert_eq!(marker_after(src, 1, b'?'), Some(2));
    assert_eq!(marker_after(src, 1, b'!'), None);
    assert_eq!(past_trailing_comma(src, 6), 7);
    assert_eq!(past_trailing_comma(src, 8), 8);
    assert_eq!(closing_after("[a, , ]", 2, b']'), Some(6));
  }
}
