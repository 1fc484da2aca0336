//! Integration tests for the synchronous combinators.
//!
//! Side-effect counters make short-circuiting observable: a child that is
//! skipped must never be invoked.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use nebula_rules::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

// ============================================================================
// TEST RULES
// ============================================================================

/// Succeeds with `value` or fails with `code`, counting invocations.
#[derive(Clone)]
struct Scripted {
    verdict: Result<i32, &'static str>,
    calls: Arc<AtomicUsize>,
}

impl Scripted {
    fn pass(value: i32) -> Self {
        Self {
            verdict: Ok(value),
            calls: Arc::default(),
        }
    }

    fn fail(code: &'static str) -> Self {
        Self {
            verdict: Err(code),
            calls: Arc::default(),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Rule for Scripted {
    type Context = ();
    type Output = i32;

    fn evaluate(&self, _ctx: &(), _cancel: &CancellationToken) -> Evaluation<i32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match self.verdict {
            Ok(value) => RuleResult::success(value),
            Err(code) => RuleError::validation(code, format!("{code} failed")).into(),
        })
    }
}

fn codes<T>(result: &RuleResult<T>) -> Vec<&str> {
    result.errors().iter().map(RuleError::code).collect()
}

// ============================================================================
// AND
// ============================================================================

#[test]
fn and_of_two_successes_yields_last_value() {
    let rule = and_all([Scripted::pass(1), Scripted::pass(2)]).unwrap();
    let result = evaluate(&rule, &()).unwrap();
    assert_eq!(result, RuleResult::success(2));
}

#[rstest]
#[case(0, "first")]
#[case(1, "second")]
#[case(2, "third")]
fn and_stops_at_first_failure(#[case] failing: usize, #[case] code: &'static str) {
    let children: Vec<_> = (0..4)
        .map(|i| {
            if i == failing {
                Scripted::fail(code)
            } else {
                Scripted::pass(i32::try_from(i).unwrap())
            }
        })
        .collect();
    let rule = and_all(children.clone()).unwrap();

    let result = evaluate(&rule, &()).unwrap();
    assert_eq!(codes(&result), [code]);

    let calls: Vec<_> = children.iter().map(Scripted::calls).collect();
    let expected: Vec<_> = (0..4).map(|i| usize::from(i <= failing)).collect();
    assert_eq!(calls, expected);
}

#[test]
fn and_without_value_yields_passed() {
    let rule = and_all([
        ensure(|n: &u8| *n > 0, RuleError::validation("positive", "Must be positive")).boxed(),
        ensure(|n: &u8| *n < 10, RuleError::validation("small", "Must be small")).boxed(),
    ])
    .unwrap();

    assert_eq!(evaluate(&rule, &5).unwrap(), RuleResult::passed());
}

// ============================================================================
// OR
// ============================================================================

#[test]
fn or_of_two_failures_concatenates_in_order() {
    let rule = or_any([Scripted::fail("E1"), Scripted::fail("E2")]).unwrap();
    let result = evaluate(&rule, &()).unwrap();
    assert!(result.is_failure());
    assert_eq!(codes(&result), ["E1", "E2"]);
}

#[test]
fn or_stops_at_first_success() {
    let children = [
        Scripted::fail("E1"),
        Scripted::pass(7),
        Scripted::pass(8),
    ];
    let rule = or_any(children.clone()).unwrap();

    assert_eq!(evaluate(&rule, &()).unwrap().value(), Ok(&7));
    let calls: Vec<_> = children.iter().map(Scripted::calls).collect();
    assert_eq!(calls, [1, 1, 0]);
}

#[test]
fn or_keeps_multi_error_children_intact() {
    let both = rule_fn(|_: &(), _cancel: &CancellationToken| {
        Ok(RuleResult::<i32>::try_failures([
            RuleError::validation("A", "first"),
            RuleError::validation("B", "second"),
        ])
        .unwrap())
    });
    let rule = both.or(Scripted::fail("A"));

    let result = evaluate(&rule, &()).unwrap();
    assert_eq!(codes(&result), ["A", "B", "A"]);
}

// ============================================================================
// CONDITIONAL
// ============================================================================

#[test]
fn conditional_success_branch_replaces_outcome() {
    let branch = Scripted::fail("dependent");
    let rule = Scripted::pass(1).on_success(branch.clone());

    let result = evaluate(&rule, &()).unwrap();
    assert_eq!(codes(&result), ["dependent"]);
    assert_eq!(branch.calls(), 1);
}

#[test]
fn conditional_failure_without_branch_is_unchanged() {
    let success_branch = Scripted::pass(2);
    let rule = Scripted::fail("primary").on_success(success_branch.clone());

    let result = evaluate(&rule, &()).unwrap();
    assert_eq!(result, RuleResult::failure(RuleError::validation("primary", "ignored")));
    assert_eq!(success_branch.calls(), 0);
}

#[test]
fn conditional_branches_see_the_same_context() {
    let seen = Arc::new(AtomicUsize::new(0));
    let record = {
        let seen = Arc::clone(&seen);
        rule_fn(move |n: &usize, _cancel: &CancellationToken| {
            seen.store(*n, Ordering::SeqCst);
            Ok(RuleResult::passed())
        })
    };
    let rule = ensure(|n: &usize| *n % 2 == 0, RuleError::validation("even", "Must be even"))
        .on_failure(record);

    assert!(evaluate(&rule, &41).unwrap().is_success());
    assert_eq!(seen.load(Ordering::SeqCst), 41);
}

// ============================================================================
// CANCELLATION
// ============================================================================

#[test]
fn cancelled_before_and_of_three_runs_nothing() {
    let children = [Scripted::pass(1), Scripted::pass(2), Scripted::pass(3)];
    let rule = and_all(children.clone()).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert_eq!(rule.evaluate(&(), &cancel), Err(Cancelled));
    assert!(children.iter().all(|child| child.calls() == 0));
}

#[test]
fn cancellation_propagates_through_nesting() {
    let cancel = CancellationToken::new();
    let trip = {
        let cancel = cancel.clone();
        rule_fn(move |_: &(), _inner: &CancellationToken| {
            cancel.cancel();
            Ok(RuleResult::success(0))
        })
    };
    let after = Scripted::pass(1);
    let rule = or_any([
        Scripted::fail("E1").boxed(),
        and_all([trip.boxed(), after.clone().boxed()]).unwrap().boxed(),
        Scripted::pass(2).boxed(),
    ])
    .unwrap();

    assert_eq!(rule.evaluate(&(), &cancel), Err(Cancelled));
    assert_eq!(after.calls(), 0);
}

// ============================================================================
// SHARING
// ============================================================================

#[test]
fn rules_are_shareable_across_threads() {
    let rule = Arc::new(
        and_all([
            ensure(|n: &u32| *n >= 10, RuleError::validation("min", "Too small")).boxed(),
            ensure(|n: &u32| *n <= 20, RuleError::validation("max", "Too large")).boxed(),
        ])
        .unwrap(),
    );

    let handles: Vec<_> = (0..8u32)
        .map(|i| {
            let rule = Arc::clone(&rule);
            std::thread::spawn(move || evaluate(&rule, &(i * 4)).unwrap().is_success())
        })
        .collect();
    let verdicts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(
        verdicts,
        [false, false, false, true, true, true, false, false]
    );
}
