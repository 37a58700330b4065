use strip_ts::parse;
use strip_ts::parse::ParseOptions;
use strip_ts::strip_types;
use strip_ts::Dialect;

fn check(src: &str, expected: &str) {
  let actual = strip_types(src).unwrap();
  assert_eq!(actual, expected, "stripping {src:?}");
  assert_eq!(actual.lines().count(), src.lines().count());
  parse(&actual, ParseOptions::new(Dialect::Js)).expect("output should parse as JavaScript");
}

#[test]
fn merged_enums_are_exported_once() {
  check(
    "export enum E { A }\nexport enum E { B = 2 }",
    "export var E;(function (E) { const A = 0;E[E[\"A\"] = A] = \"A\"; })(E || (E = {}));\n       var E;(function (E) { const B = 2;E[E[\"B\"] = B] = \"B\"; })(E || (E = {}));",
  );
}

#[test]
fn enum_members_refer_to_earlier_members() {
  check(
    "enum E { A = 1, B = A * 2 }",
    "var E;(function (E) { const A = 1;E[E[\"A\"] = A] = \"A\"; const B = A * 2;E[E[\"B\"] = B] = \"B\"; })(E || (E = {}));",
  );
}

#[test]
fn enum_initializers_lose_their_types() {
  check(
    "enum E { A = <number>f() }",
    "var E;(function (E) { const A =         f();E[E[\"A\"] = A] = \"A\"; })(E || (E = {}));",
  );
}

#[test]
fn nested_class_parameter_property() {
  check(
    "function f() {\n  class C {\n    constructor(private y) {}\n  }\n}",
    "function f() {\n  class C {\n    y;constructor(        y) {this.y=y;}\n  }\n}",
  );
}
