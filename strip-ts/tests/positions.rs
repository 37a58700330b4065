use strip_ts::parse;
use strip_ts::parse::ParseOptions;
use strip_ts::strip_types;
use strip_ts::strip_types_with_options;
use strip_ts::Dialect;
use strip_ts::StripOptions;

const SERVICE: &str = r#"import { EventEmitter } from "events";
import type { Logger } from "./logger";
import { type Clock, systemClock } from "./clock";

export interface Job<T = unknown> {
  id: string;
  run(input: T): Promise<void>;
}

type Status = "idle" | "running" | "stopped";

declare const process: { env: Record<string, string | undefined> };

export abstract class Scheduler<T> extends EventEmitter implements Iterable<Job<T>> {
  private readonly jobs: Map<string, Job<T>> = new Map();
  protected status: Status = "idle";
  declare logger?: Logger;
  abstract describe(): string;

  public add(job: Job<T>): this {
    this.jobs.set(job.id, job);
    return this;
  }

  get size(): number {
    return this.jobs.size;
  }

  *[Symbol.iterator](): Iterator<Job<T>> {
    yield* this.jobs.values();
  }

  async runAll<R extends T>(input: R, clock: Clock = systemClock): Promise<number> {
    const started = clock.now()!;
    for (const job of this.jobs.values() as Iterable<Job<T>>) {
      await job.run(<T>input);
    }
    const limit = Number(process.env.LIMIT ?? "0") satisfies number;
    return clock.now()! - started + limit;
  }
}

export function pick<K extends string, V>(entries: Array<[K, V]>, key?: K): V | undefined {
  const found = entries.find(([k]: [K, V]) => k === key);
  return found?.[1];
}

export const identity = function <T>(value: T): T {
  return value;
};
export type { Status };
"#;

fn assert_positions_kept(src: &str, out: &str) {
  assert_eq!(out.len(), src.len());
  assert_eq!(out.lines().count(), src.lines().count());
  for (i, (a, b)) in src.bytes().zip(out.bytes()).enumerate() {
    // Erased text becomes spaces, or a `;` where a member used to start.
    let ok = if a.is_ascii_whitespace() {
      a == b
    } else {
      a == b || b == b' ' || b == b';'
    };
    assert!(ok, "byte {i} changed from {:?} to {:?}", a as char, b as char);
  }
}

#[test]
fn surviving_tokens_keep_their_offsets() {
  let out = strip_types(SERVICE).unwrap();
  assert_positions_kept(SERVICE, &out);
  parse(&out, ParseOptions::new(Dialect::Js)).expect("output should parse as JavaScript");
}

#[test]
fn runtime_code_survives() {
  let out = strip_types(SERVICE).unwrap();
  for kept in [
    "import { EventEmitter } from \"events\";",
    "systemClock } from \"./clock\";",
    "this.jobs.set(job.id, job);",
    "yield* this.jobs.values();",
    "await job.run(",
    "return found?.[1];",
    "export const identity = ",
  ] {
    assert!(out.contains(kept), "missing {kept:?} in\n{out}");
  }
  for erased in ["interface", "Logger", "Status", "implements", "satisfies", "abstract"] {
    assert!(!out.contains(erased), "{erased:?} survived in\n{out}");
  }
}

#[test]
fn stripping_is_deterministic() {
  let first = strip_types_with_options(SERVICE, StripOptions::new()).unwrap();
  let second = strip_types_with_options(SERVICE, StripOptions::new()).unwrap();
  assert_eq!(first, second);
}

#[test]
fn multibyte_text_keeps_its_bytes() {
  let src = "const greeting: string = \"héllo ✓\";\nlet n: number = 1; // ünïcode\n";
  let out = strip_types(src).unwrap();
  assert_positions_kept(src, &out);
  assert!(out.contains("\"héllo ✓\""));
  assert!(out.ends_with("// ünïcode\n"));
}
