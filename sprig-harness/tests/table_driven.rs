//! Suites declared from tables: groups and tests created in loops with formatted names.

use anyhow::Result;
use pretty_assertions::assert_eq;
use sprig_core::{Suite, check};
use sprig_harness::{RunConfig, RunSummary, run_suite};

/// Length of the prefix of `input` made only of bytes found in `accept`.
fn span(input: &str, accept: &str) -> usize {
    input
        .bytes()
        .take_while(|b| accept.as_bytes().contains(b))
        .count()
}

fn plus(a: i32, b: i32) -> i32 {
    a + b
}

fn times(a: i32, b: i32) -> i32 {
    a * b
}

type CopyFn = fn(&mut [u8], &[u8]);
type Operator = fn(i32, i32) -> i32;

const SPAN_CASES: [(&str, &str, usize); 3] =
    [("food", "abc", 0), ("back", "abc", 3), ("abacus", "abc", 4)];

const PLUS_EXAMPLES: [(i32, i32, i32); 3] = [(0, 1, 1), (1, 0, 1), (1, 1, 2)];
const TIMES_EXAMPLES: [(i32, i32, i32); 4] = [(0, 1, 0), (1, 0, 0), (1, 1, 1), (2, 2, 4)];

fn dynamic_tests(s: &mut Suite<'_, '_, ()>) {
    s.describe("character spans", |s| {
        s.describe("span", |s| {
            for (input, accept, expected) in SPAN_CASES {
                s.it(format!("span({input:?}, {accept:?}) == {expected}"), move |_| {
                    let got = span(input, accept);
                    check!(got == expected, "got {}", got);
                    Ok(())
                });
            }
        });
    });

    s.describe("functions that copy data", |s| {
        let copy_functions: [(&str, CopyFn); 2] = [
            ("copy_from_slice", |dst, src| dst.copy_from_slice(src)),
            ("clone_from_slice", |dst, src| dst.clone_from_slice(src)),
        ];

        for (name, copy) in copy_functions {
            s.describe(format!("the {name} function"), |s| {
                s.it("should copy a string to a buffer", move |_| {
                    let data = b"hello, world";
                    let mut buffer = [0u8; 12];

                    copy(&mut buffer, data);
                    check!(&buffer == data);
                    Ok(())
                });
            });
        }
    });

    s.describe("arithmetic", |s| {
        let operators: [(&str, Operator, &[(i32, i32, i32)]); 2] =
            [("+", plus, &PLUS_EXAMPLES), ("*", times, &TIMES_EXAMPLES)];

        for (symbol, operator, examples) in operators {
            s.describe(format!("operator {symbol}"), |s| {
                for &(a, b, c) in examples {
                    s.it(format!("{a} {symbol} {b} == {c}"), move |_| {
                        let result = operator(a, b);
                        check!(result == c, "got {}", result);
                        Ok(())
                    });
                }

                s.it("should be associative", move |_| {
                    let left = operator(operator(1, 2), 3);
                    let right = operator(1, operator(2, 3));
                    check!(left == right);
                    Ok(())
                });

                s.it("should be commutative", move |_| {
                    check!(operator(3, 7) == operator(7, 3));
                    Ok(())
                });
            });
        }
    });
}

fn render(config: &RunConfig) -> Result<(String, RunSummary)> {
    let mut out = vec![];
    let summary = run_suite("dynamic tests", config, &mut out, dynamic_tests)?;
    Ok((String::from_utf8(out)?, summary))
}

#[test]
fn every_row_becomes_a_test() -> Result<()> {
    let (output, summary) = render(&RunConfig::new())?;

    assert_eq!(summary, RunSummary { tests_run: 16, failed: 0 }, "{output}");
    Ok(())
}

#[test]
fn names_are_formatted_from_the_row() -> Result<()> {
    let (output, _) = render(&RunConfig::new())?;

    for line in [
        "  character spans",
        "    span",
        "      span(\"abacus\", \"abc\") == 4 (OK)",
        "    the clone_from_slice function",
        "      should copy a string to a buffer (OK)",
        "    operator *",
        "      2 * 2 == 4 (OK)",
    ] {
        assert!(output.lines().any(|l| l == line), "missing {line:?} in:\n{output}");
    }

    Ok(())
}

#[test]
fn tap_plan_counts_every_row() -> Result<()> {
    let (output, _) = render(&RunConfig::new().with_tap(true))?;

    let lines: Vec<_> = output.lines().collect();
    assert_eq!(
        lines[..3],
        ["TAP version 13", "1..16", "ok 1 - span(\"food\", \"abc\") == 0"]
    );
    assert_eq!(lines.last(), Some(&"ok 16 - should be commutative"));

    Ok(())
}
