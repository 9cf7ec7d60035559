//! testloom CLI entry point
//!
//! Runs a small bundled suite. Test binaries call `testloom::cli::run` with their own suite.

use testloom::proptest::prelude::*;
use testloom::{Suite, batch, describe, expect, fuzz, test};

fn demo_suite() -> Suite {
    batch(vec![
        describe(
            "expect",
            vec![
                test("equal passes on equal values", || expect::equal(2 + 2, 4)),
                test("all keeps the first failure", || {
                    expect::equal(expect::all(vec![expect::pass(), expect::fail("first")]), expect::fail("first"))
                }),
            ],
        ),
        describe(
            "strings",
            vec![
                fuzz(".*", "reversing twice is identity", |s: String| {
                    let twice: String = s.chars().rev().collect::<String>().chars().rev().collect();
                    expect::equal(twice, s)
                }),
                fuzz(
                    prop::collection::vec(any::<u8>(), 0..32),
                    "sorting is idempotent",
                    |mut v: Vec<u8>| {
                        v.sort_unstable();
                        let once = v.clone();
                        v.sort_unstable();
                        expect::equal(v, once)
                    },
                ),
            ],
        ),
    ])
}

fn main() {
    // Initialize structured logging with env-based filter, defaulting to warn
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    testloom::cli::run(demo_suite());
}
