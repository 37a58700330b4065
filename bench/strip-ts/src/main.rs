use std::env;
use std::fs::read_to_string;
use std::time::Instant;
use strip_ts::strip_types_with_options;
use strip_ts::StripOptions;

fn main() {
  let args: Vec<String> = env::args().collect();
  let code = read_to_string(&args[1]).expect("read file");

  let iterations = u64::from_str_radix(&args[2], 10).expect("parse iterations argument");
  let options = StripOptions::new().with_tsx(args[1].ends_with(".tsx"));
  let mut output_len = 0;
  let started = Instant::now();
  for _ in 0..iterations {
    let stripped = strip_types_with_options(&code, options.clone()).expect("strip");
    output_len = stripped.code.len();
  }
  let elapsed_ns = started.elapsed().as_nanos();

  println!("{} {}", output_len, elapsed_ns);
}
