//! Host-level tests: the event loop, the render task and the reporters together.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use testloom::clock::ScriptedClock;
use testloom::host::run_reported;
use testloom::report::{JsonReporter, Reporter};
use testloom::{Program, RunConfig, Seed, Snapshot, Suite, describe, expect, test};

/// Reporter that records every snapshot it is handed.
#[derive(Clone, Default)]
struct Recording(Arc<Mutex<Vec<Snapshot>>>);

impl Reporter for Recording {
    fn render(&mut self, snapshot: &Snapshot) {
        self.0.lock().unwrap().push(snapshot.clone());
    }
}

/// JSON reporter output shared with the test after the render task exits.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn three_tests() -> Suite {
    describe(
        "group",
        vec![
            test("a", expect::pass),
            test("b", || expect::fail("b broke")),
            test("c", expect::pass),
        ],
    )
}

#[tokio::test]
async fn renderer_is_scheduled_between_tests() {
    let recording = Recording::default();
    let program = Program::new(three_tests(), &RunConfig::default(), ScriptedClock::new([100, 250]));

    let outcome = run_reported(program, recording.clone()).await.unwrap();
    let seen = recording.0.lock().unwrap().clone();

    assert!(
        seen.iter()
            .any(|s| matches!(s, Snapshot::Running { completed, .. } if *completed > 0 && *completed < 3)),
        "no intermediate snapshot observed: {:?}",
        seen
    );
    assert_eq!(seen.last(), Some(&outcome.snapshot));
    let Snapshot::Finished { duration, passed, failures } = &outcome.snapshot else {
        panic!("expected Finished, got {:?}", outcome.snapshot);
    };
    assert_eq!(*duration, Duration::from_millis(150));
    assert_eq!(*passed, 2);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path(" > "), "group > b");
}

#[tokio::test]
async fn explicit_seed_is_reported_back() {
    let config = RunConfig::new().with_seed(Seed(7));
    let program = Program::new(test("a", expect::pass), &config, ScriptedClock::new([1, 2]));
    let outcome = program.run().await.unwrap();
    assert_eq!(outcome.seed, Some(Seed(7)));
}

#[tokio::test]
async fn json_reporter_ends_with_finished_line() {
    let buf = SharedBuf::default();
    let program = Program::new(three_tests(), &RunConfig::default(), ScriptedClock::new([0, 9]));
    run_reported(program, JsonReporter::new(buf.clone())).await.unwrap();

    let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
    let last = text.lines().last().unwrap();
    let value: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(value["status"], "finished");
    assert_eq!(value["duration_ms"], 9);
    assert_eq!(value["passed"], 2);
    assert_eq!(value["failed"], 1);
    assert_eq!(value["failures"][0]["labels"], serde_json::json!(["b", "group"]));
}

#[tokio::test]
async fn fuzz_failure_carries_shrunk_input() {
    let suite = testloom::fuzz(0u32..1000, "below ten", |n| {
        expect::is_true(n < 10, "expected a number below ten")
    });
    let config = RunConfig::new().with_seed(Seed(3)).with_runs(200);
    let outcome = Program::new(suite, &config, ScriptedClock::new([0, 1]))
        .run()
        .await
        .unwrap();

    let failures = outcome.snapshot.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].failures[0].given.as_deref(), Some("10"));
}
