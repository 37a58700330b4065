use crate::err::SyntaxError;
use swc_core::common::BytePos;
use swc_core::common::Span;
use swc_core::common::Spanned;
use swc_core::ecma::ast::EsVersion;
use swc_core::ecma::ast::Module;
use swc_core::ecma::parser::lexer::Lexer;
use swc_core::ecma::parser::EsSyntax;
use swc_core::ecma::parser::Parser;
use swc_core::ecma::parser::StringInput;
use swc_core::ecma::parser::Syntax;
use swc_core::ecma::parser::TsSyntax;

/// swc reserves `BytePos(0)` for dummy spans, so input starts one past it.
const BASE: u32 = 1;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Dialect {
  Js,
  Jsx,
  #[default]
  Ts,
  Tsx,
}

#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
  pub dialect: Dialect,
  /// Tolerate "already declared" diagnostics. Lowering can leave duplicate
  /// generated bindings behind, so the stripper always turns this on.
  pub allow_redeclaration: bool,
}

impl Default for ParseOptions {
  fn default() -> Self {
    Self {
      dialect: Dialect::Ts,
      allow_redeclaration: true,
    }
  }
}

impl ParseOptions {
  pub fn new(dialect: Dialect) -> Self {
    Self {
      dialect,
      ..Self::default()
    }
  }
}

/// Byte offset of the start of `span` within the parsed source.
pub fn lo(span: Span) -> usize {
  span.lo.0.saturating_sub(BASE) as usize
}

/// Byte offset one past the end of `span` within the parsed source.
pub fn hi(span: Span) -> usize {
  span.hi.0.saturating_sub(BASE) as usize
}

fn syntax(dialect: Dialect) -> Syntax {
  match dialect {
    Dialect::Js | Dialect::Jsx => Syntax::Es(EsSyntax {
      jsx: dialect == Dialect::Jsx,
      decorators: true,
      ..Default::default()
    }),
    Dialect::Ts | Dialect::Tsx => Syntax::Typescript(TsSyntax {
      tsx: dialect == Dialect::Tsx,
      decorators: true,
      ..Default::default()
    }),
  }
}

fn is_redeclaration(message: &str) -> bool {
  message.contains("has already been declared") || message.contains("defined multiple times")
}

/// Parses `source` as an ES module. Errors the parser recovered from still
/// fail the parse; only redeclarations are let through when configured.
pub fn parse(source: &str, options: ParseOptions) -> Result<Module, SyntaxError> {
  let input = StringInput::new(source, BytePos(BASE), BytePos(BASE + source.len() as u32));
  let lexer = Lexer::new(syntax(options.dialect), EsVersion::EsNext, input, None);
  let mut parser = Parser::new_from(lexer);
  let module = parser
    .parse_module()
    .map_err(|err| SyntaxError::at(source, lo(err.span()), err.kind().msg()))?;
  for err in parser.take_errors() {
    let message = err.kind().msg();
    if options.allow_redeclaration && is_redeclaration(&message) {
      continue;
    }
    return Err(SyntaxError::at(source, lo(err.span()), message));
  }
  Ok(module)
}
