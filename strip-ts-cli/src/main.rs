use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::io::stdin;
use std::io::stdout;
use std::io::Read;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use strip_ts::strip_types_with_options;
use strip_ts::AsiHazard;
use strip_ts::StripError;
use strip_ts::StripOptions;
use tracing::debug;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
  name = "strip-ts",
  about = "Strip TypeScript types, keeping every token where it was"
)]
struct Cli {
  /// File to strip; omit for stdin.
  #[arg(short, long)]
  input: Option<PathBuf>,

  /// Output destination; omit for stdout.
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Parse the input as TSX.
  #[arg(long)]
  tsx: bool,

  /// Write a JSON report to stdout instead of the stripped code.
  #[arg(long)]
  json: bool,

  /// Report places where erasure may change how a statement ends.
  #[arg(long)]
  warn_asi: bool,

  /// Emit tracing events to stderr (filtered by `RUST_LOG`).
  #[arg(long)]
  trace: bool,
}

#[derive(Serialize)]
struct JsonDiagnostic {
  message: String,
  line: usize,
  col: usize,
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonReport<'a> {
  Success {
    schema_version: u32,
    output: &'a str,
    asi_hazards: &'a [AsiHazard],
  },
  Failure {
    schema_version: u32,
    diagnostics: Vec<JsonDiagnostic>,
  },
}

const SCHEMA_VERSION: u32 = 1;

fn init_tracing(enabled: bool) {
  if !enabled {
    return;
  }
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE)
    .with_writer(std::io::stderr)
    .with_ansi(false)
    .try_init();
}

fn exit_with_io_error(message: impl AsRef<str>) -> ! {
  eprintln!("error: {}", message.as_ref());
  process::exit(1);
}

fn print_json(report: &JsonReport<'_>) {
  match serde_json::to_string(report) {
    Ok(json) => println!("{json}"),
    Err(err) => exit_with_io_error(format!("failed to serialize report: {err}")),
  }
}

/// `file:line:col: message`, then the offending line with a caret under the
/// column.
fn render_error(name: &str, source: &str, line: usize, col: usize, message: &str) -> String {
  let text = source.lines().nth(line.saturating_sub(1)).unwrap_or("");
  let pad: String = text
    .chars()
    .take(col)
    .map(|c| if c == '\t' { '\t' } else { ' ' })
    .collect();
  format!("{name}:{line}:{col}: {message}\n{text}\n{pad}^")
}

fn diagnostic(err: &StripError) -> JsonDiagnostic {
  match err {
    StripError::Syntax(syntax) => JsonDiagnostic {
      message: syntax.message.clone(),
      line: syntax.line,
      col: syntax.col,
    },
    other => JsonDiagnostic {
      message: other.to_string(),
      line: 1,
      col: 0,
    },
  }
}

fn main() {
  let args = Cli::parse();
  init_tracing(args.trace);

  let input_name = args
    .input
    .as_ref()
    .map(|p| p.to_string_lossy().into_owned())
    .unwrap_or_else(|| "<stdin>".to_string());
  let mut input = Vec::new();
  let mut input_file: Box<dyn Read> = match args.input.as_ref() {
    Some(p) => match File::open(p) {
      Ok(f) => Box::new(f),
      Err(err) => exit_with_io_error(format!("failed to open {}: {err}", p.display())),
    },
    None => Box::new(stdin()),
  };
  if let Err(err) = input_file.read_to_end(&mut input) {
    exit_with_io_error(format!("failed to read {input_name}: {err}"));
  }
  let source = match std::str::from_utf8(&input) {
    Ok(source) => source,
    Err(err) => exit_with_io_error(format!("{input_name} is not valid UTF-8: {err}")),
  };

  debug!(input = %input_name, bytes = source.len(), tsx = args.tsx, "stripping");
  let options = StripOptions::new().with_tsx(args.tsx);
  let stripped = match strip_types_with_options(source, options) {
    Ok(stripped) => stripped,
    Err(err) => {
      if args.json {
        print_json(&JsonReport::Failure {
          schema_version: SCHEMA_VERSION,
          diagnostics: vec![diagnostic(&err)],
        });
      } else if let StripError::Syntax(syntax) = &err {
        eprintln!(
          "{}",
          render_error(&input_name, source, syntax.line, syntax.col, &syntax.message)
        );
      } else {
        eprintln!("{input_name}: {err}");
      }
      process::exit(1);
    }
  };

  debug!(
    bytes = stripped.code.len(),
    asi_hazards = stripped.asi_hazards.len(),
    "stripped"
  );
  if args.warn_asi {
    for hazard in &stripped.asi_hazards {
      eprintln!(
        "{input_name}:{}:{}: warning: statement may now continue onto this line",
        hazard.line, hazard.col
      );
    }
  }

  if args.json {
    print_json(&JsonReport::Success {
      schema_version: SCHEMA_VERSION,
      output: &stripped.code,
      asi_hazards: &stripped.asi_hazards,
    });
    return;
  }

  let write_result = match args.output.as_ref() {
    Some(p) => File::create(p)
      .and_then(|mut file| file.write_all(stripped.code.as_bytes()))
      .map_err(|err| (p.display().to_string(), err)),
    None => stdout()
      .write_all(stripped.code.as_bytes())
      .map_err(|err| ("<stdout>".to_string(), err)),
  };
  if let Err((dest, err)) = write_result {
    exit_with_io_error(format!("failed to write {dest}: {err}"));
  }
}
