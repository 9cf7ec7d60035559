#![no_main]

use libfuzzer_sys::fuzz_target;
use testloom::{
    Cmd, Model, Msg, RunConfig, Seed, Snapshot, Suite, Timestamp, batch, describe, expect, test, update, view,
};

fn close_group(stack: &mut Vec<(String, Vec<Suite>)>) {
    if let Some((label, children)) = stack.pop() {
        if let Some((_, parent)) = stack.last_mut() {
            parent.push(describe(label, children));
        }
    }
}

/// Build a suite tree from bytes: each byte either opens a group, closes one, or adds a leaf.
fn suite_from(data: &[u8]) -> Suite {
    let mut stack: Vec<(String, Vec<Suite>)> = vec![(String::new(), Vec::new())];
    for (i, byte) in data.iter().enumerate() {
        match byte % 4 {
            0 => stack.push((format!("g{}", i), Vec::new())),
            1 if stack.len() > 1 => close_group(&mut stack),
            2 => {
                if let Some((_, children)) = stack.last_mut() {
                    children.push(test(format!("t{}", i), expect::pass));
                }
            }
            _ => {
                if let Some((_, children)) = stack.last_mut() {
                    children.push(test(format!("t{}", i), || expect::fail("fuzzed failure")));
                }
            }
        }
    }
    while stack.len() > 1 {
        close_group(&mut stack);
    }
    batch(stack.pop().map(|(_, children)| children).unwrap_or_default())
}

fuzz_target!(|data: &[u8]| {
    let suite = suite_from(data);
    let expected = suite.count_tests();

    let thunks = testloom_core::flatten(testloom_core::resolve(suite_from(data), 1, Seed(0)));
    assert_eq!(thunks.len(), expected);

    let config = RunConfig::new().with_seed(Seed(0));
    let (mut model, _) = Model::init(suite, &config);
    let mut msg = Msg::Start(Timestamp::from_millis(0));
    let mut steps = 0;
    loop {
        let (next, cmd) = update(msg, model).unwrap();
        model = next;
        steps += 1;
        msg = match cmd {
            Cmd::Dispatch => Msg::Dispatch,
            Cmd::RequestFinishTime => Msg::Finish(Timestamp::from_millis(1)),
            Cmd::RequestStartTime | Cmd::None => break,
        };
    }
    // start, one dispatch per test, the final dispatch, finish
    assert_eq!(steps, expected + 3);

    match view(&model) {
        Snapshot::Finished { passed, failures, .. } => assert_eq!(passed + failures.len(), expected),
        other => panic!("run did not finish: {:?}", other),
    }
});
