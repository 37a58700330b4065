//! Strips TypeScript-only syntax from a module while keeping every surviving
//! token at its original line and column.
//!
//! Type annotations, interfaces, overloads and the like are replaced by
//! whitespace of equal width. A few constructs that have runtime meaning are
//! rewritten in place instead: enums, constructor parameter properties,
//! `import X = ...` and `export = ...`.

use erase::Eraser;
use parse::ParseOptions;
use strip::Stripper;
use swc_core::ecma::visit::VisitWith;
use tracing::debug_span;

pub use erase::AsiHazard;
pub use err::StripError;
pub use err::SyntaxError;
pub use parse::parse;
pub use parse::Dialect;

mod enums;
mod erase;
mod err;
mod liveness;
pub mod parse;
mod scan;
mod scope;
mod splice;
mod strip;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StripOptions {
  /// Parse JSX-bearing TypeScript.
  pub tsx: bool,
  /// How deeply enum member initializers may recurse into the stripper.
  pub max_enum_depth: usize,
}

impl Default for StripOptions {
  fn default() -> Self {
    Self {
      tsx: false,
      max_enum_depth: 32,
    }
  }
}

impl StripOptions {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_tsx(mut self, tsx: bool) -> Self {
    self.tsx = tsx;
    self
  }

  pub fn with_max_enum_depth(mut self, depth: usize) -> Self {
    self.max_enum_depth = depth;
    self
  }
}

/// Result of a successful strip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stripped {
  pub code: String,
  /// Erasures that left a statement followed by `(` or `[`. They are reported
  /// but not repaired.
  pub asi_hazards: Vec<AsiHazard>,
}

/// Strips TypeScript-only syntax from `source`.
///
/// # Examples
///
/// ```
/// use strip_ts::strip_types;
///
/// let code = strip_types("let x: number = 1;").unwrap();
/// assert_eq!(code, "let x         = 1;");
/// ```
pub fn strip_types(source: &str) -> Result<String, StripError> {
  strip_types_with_options(source, StripOptions::default()).map(|s| s.code)
}

pub fn strip_types_with_options(
  source: &str,
  options: StripOptions,
) -> Result<Stripped, StripError> {
  strip_at_depth(source, &options, 0)
}

pub(crate) fn strip_at_depth(
  source: &str,
  options: &StripOptions,
  depth: usize,
) -> Result<Stripped, StripError> {
  let span = debug_span!("strip_types", len = source.len(), depth);
  let _guard = span.enter();

  let dialect = if options.tsx { Dialect::Tsx } else { Dialect::Ts };
  let module = parse(source, ParseOptions::new(dialect))?;
  let mut stripper = Stripper::new(Eraser::new(source), options, depth);
  module.visit_with(&mut stripper);
  let mut eraser = stripper.finish()?;
  liveness::prune_imports(&mut eraser, &module);
  let (code, asi_hazards) = eraser.render();
  Ok(Stripped { code, asi_hazards })
}
