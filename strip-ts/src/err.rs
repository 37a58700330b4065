use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// A parse failure, surfaced unchanged from the parser.
///
/// `offset` is a byte offset into the input, `line` is 1-based and `col` is
/// a 0-based count of characters from the start of the line.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct SyntaxError {
  pub offset: usize,
  pub line: usize,
  pub col: usize,
  pub message: String,
}

impl SyntaxError {
  pub fn at(source: &str, offset: usize, message: impl Into<String>) -> SyntaxError {
    let (line, col) = crate::erase::line_col(source, offset);
    SyntaxError {
      offset,
      line,
      col,
      message: message.into(),
    }
  }
}

impl Display for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{} [{}:{}]", self.message, self.line, self.col)
  }
}

impl Error for SyntaxError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StripError {
  Syntax(SyntaxError),
  /// Enum member initializers nested deeper than `StripOptions::max_enum_depth`.
  RecursionLimit { depth: usize },
}

impl Display for StripError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      StripError::Syntax(err) => write!(f, "syntax error: {err}"),
      StripError::RecursionLimit { depth } => {
        write!(f, "enum initializers nested too deeply (depth {depth})")
      }
    }
  }
}

impl Error for StripError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      StripError::Syntax(err) => Some(err),
      StripError::RecursionLimit { .. } => None,
    }
  }
}

impl From<SyntaxError> for StripError {
  fn from(err: SyntaxError) -> Self {
    StripError::Syntax(err)
  }
}
