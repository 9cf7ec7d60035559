//! End-to-end lifecycle scenarios driven through `update` and `view`.

use std::time::Duration;

use testloom::app::FailedTest;
use testloom::{
    Cmd, Failure, LifecycleError, Model, Msg, RunConfig, Snapshot, Suite, Timestamp, describe, expect, test, update,
    view,
};

fn at(millis: u64) -> Timestamp {
    Timestamp::from_millis(millis)
}

fn started(suite: Suite, now: u64) -> Model {
    let (model, cmd) = Model::init(suite, &RunConfig::default());
    assert_eq!(cmd, Cmd::RequestStartTime);
    let (model, cmd) = update(Msg::Start(at(now)), model).unwrap();
    assert_eq!(cmd, Cmd::Dispatch);
    model
}

fn step(model: Model, msg: Msg) -> (Model, Cmd) {
    update(msg, model).unwrap()
}

fn both_suite() -> Suite {
    describe(
        "both",
        vec![test("one", expect::pass), test("two", || expect::fail("message"))],
    )
}

#[test]
fn empty_suite_runs_to_finished() {
    let model = started(testloom::batch(Vec::new()), 5);
    assert_eq!(
        view(&model),
        Snapshot::Running {
            completed: 0,
            remaining: 0,
            failures: Vec::new(),
        }
    );

    let (model, cmd) = step(model, Msg::Dispatch);
    assert_eq!(cmd, Cmd::RequestFinishTime);

    let (model, cmd) = step(model, Msg::Finish(at(10)));
    assert_eq!(cmd, Cmd::None);
    assert_eq!(
        view(&model),
        Snapshot::Finished {
            duration: Duration::from_millis(5),
            passed: 0,
            failures: Vec::new(),
        }
    );
}

#[test]
fn labeled_batch_reports_failure_with_label_path() {
    let model = started(both_suite(), 5);

    let (model, cmd) = step(model, Msg::Dispatch);
    assert_eq!(cmd, Cmd::Dispatch);
    assert_eq!(
        view(&model),
        Snapshot::Running {
            completed: 1,
            remaining: 1,
            failures: Vec::new(),
        }
    );

    let (model, _) = step(model, Msg::Dispatch);
    assert_eq!(
        view(&model),
        Snapshot::Running {
            completed: 2,
            remaining: 0,
            failures: vec![FailedTest {
                labels: vec!["two".to_string(), "both".to_string()],
                failures: vec![Failure {
                    given: None,
                    message: "message".to_string(),
                }],
            }],
        }
    );
}

#[test]
fn finished_counts_passed_tests() {
    let model = started(both_suite(), 100);
    let (model, _) = step(model, Msg::Dispatch);
    let (model, _) = step(model, Msg::Dispatch);
    let (model, cmd) = step(model, Msg::Dispatch);
    assert_eq!(cmd, Cmd::RequestFinishTime);
    let (model, _) = step(model, Msg::Finish(at(142)));

    let snapshot = view(&model);
    let Snapshot::Finished { duration, passed, failures } = &snapshot else {
        panic!("expected Finished, got {:?}", snapshot);
    };
    assert_eq!(*duration, Duration::from_millis(42));
    assert_eq!(*passed, 1);
    assert_eq!(failures.len(), 1);
}

#[test]
fn second_finish_keeps_duration() {
    let model = started(testloom::batch(Vec::new()), 5);
    let (model, _) = step(model, Msg::Dispatch);
    let (model, _) = step(model, Msg::Finish(at(10)));
    let before = view(&model);

    let (model, cmd) = step(model, Msg::Finish(at(50)));
    assert_eq!(cmd, Cmd::None);
    assert_eq!(view(&model), before);
}

#[test]
fn dispatch_after_finish_requests_finish_again_without_running_anything() {
    let model = started(test("only", expect::pass), 0);
    let (model, _) = step(model, Msg::Dispatch);
    let (model, _) = step(model, Msg::Dispatch);
    let (model, _) = step(model, Msg::Finish(at(3)));

    let (model, cmd) = step(model, Msg::Dispatch);
    assert_eq!(cmd, Cmd::RequestFinishTime);
    assert_eq!(
        view(&model),
        Snapshot::Finished {
            duration: Duration::from_millis(3),
            passed: 1,
            failures: Vec::new(),
        }
    );
}

#[test]
fn projecting_twice_is_identical() {
    let model = started(both_suite(), 5);
    let (model, _) = step(model, Msg::Dispatch);
    let (model, _) = step(model, Msg::Dispatch);
    assert_eq!(view(&model), view(&model));
}

#[test]
fn lifecycle_violations_are_errors() {
    let (model, _) = Model::init(both_suite(), &RunConfig::default());
    assert!(matches!(
        update(Msg::Dispatch, model),
        Err(LifecycleError::NotStarted { signal: "dispatch" })
    ));

    let model = started(both_suite(), 5);
    assert!(matches!(
        update(Msg::Start(at(6)), model),
        Err(LifecycleError::AlreadyStarted)
    ));
}

#[test]
fn tests_run_only_when_dispatched() {
    use std::cell::Cell;
    use std::rc::Rc;

    let runs = Rc::new(Cell::new(0));
    let counter = Rc::clone(&runs);
    let suite = test("counted", move || {
        counter.set(counter.get() + 1);
        expect::pass()
    });

    let model = started(suite, 0);
    assert_eq!(runs.get(), 0);
    let (_model, _) = step(model, Msg::Dispatch);
    assert_eq!(runs.get(), 1);
}

#[test]
fn deeply_nested_suite_starts_and_dispatches() {
    let mut suite = test("leaf", expect::pass);
    for _ in 0..20_000 {
        suite = describe("g", vec![suite]);
    }

    let model = started(suite, 0);
    assert_eq!(
        view(&model),
        Snapshot::Running {
            completed: 0,
            remaining: 1,
            failures: Vec::new(),
        }
    );

    let (model, cmd) = step(model, Msg::Dispatch);
    assert_eq!(cmd, Cmd::Dispatch);
    let Model::Started(ledger) = &model else {
        panic!("expected Started");
    };
    assert_eq!(ledger.completed()[0].labels.len(), 20_001);
    assert!(ledger.completed()[0].passed());
}
