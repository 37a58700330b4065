use strip_ts::strip_types_with_options;
use strip_ts::StripError;
use strip_ts::StripOptions;

const SOURCE: &str = r#"export const answer: number = 42;
export function add(a: number, b: number): number {
  return a + b;
}
export enum Color { Red, Green = "green" }
"#;

fn main() {
  match strip_types_with_options(SOURCE, StripOptions::new()) {
    Ok(stripped) => {
      println!("{}", stripped.code);
      for hazard in stripped.asi_hazards {
        eprintln!("possible ASI hazard at {}:{}", hazard.line, hazard.col);
      }
    }
    Err(StripError::Syntax(err)) => {
      eprintln!("{}:{}: {}", err.line, err.col, err.message);
      std::process::exit(1);
    }
    Err(err) => {
      eprintln!("{err}");
      std::process::exit(1);
    }
  }
}
