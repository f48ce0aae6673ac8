//! End-to-end pipeline behaviour through the public facade.

use iquery::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

fn names() -> Vec<&'static str> {
    vec!["john", "jane", "foo", "bar"]
}

fn contains(needle: char) -> Predicate<&'static str> {
    Predicate::from_value(move |s: &&str| s.contains(needle))
}

#[test]
fn zero_operations_yield_input_unchanged() {
    let mut q = Pipeline::new(names());
    assert_eq!(q.fetch_all(), names());
    assert_eq!(
        q.fetch_keyed(),
        vec![(0, "john"), (1, "jane"), (2, "foo"), (3, "bar")]
    );
}

#[test]
fn filter_on_o_then_j() {
    let mut q = Pipeline::new(names());
    q.add_filter(contains('o'));
    assert_eq!(q.fetch_all(), vec!["john", "foo"]);

    q.add_filter(contains('j'));
    assert_eq!(q.fetch_all(), vec!["john"]);
}

#[test]
fn filter_registration_order_does_not_matter() {
    let mut a = Pipeline::new(names());
    a.add_filter(contains('o')).add_filter(contains('j'));
    let mut b = Pipeline::new(names());
    b.add_filter(contains('j')).add_filter(contains('o'));
    assert_eq!(a.fetch_all(), b.fetch_all());
}

#[test]
fn lexicographic_sort() {
    let mut q = Pipeline::new(names());
    q.add_sort_by(Comparator::natural());
    assert_eq!(q.fetch_all(), vec!["bar", "foo", "jane", "john"]);
    assert_eq!(
        q.fetch_keyed(),
        vec![(3, "bar"), (2, "foo"), (1, "jane"), (0, "john")]
    );
}

#[test]
fn sort_is_stable_for_equal_verdicts() {
    let mut q = Pipeline::new(vec!["bb", "a", "cc", "d", "ee"]);
    q.add_sort_by(Comparator::by_key(|s: &&str| s.len()));
    assert_eq!(q.fetch_all(), vec!["a", "d", "bb", "cc", "ee"]);
}

#[test]
fn tie_break_uses_later_comparators() {
    let mut q = Pipeline::new(names());
    q.add_sort_by(Comparator::by_key(|s: &&str| s.len()))
        .add_sort_by(Comparator::natural());
    assert_eq!(q.fetch_all(), vec!["bar", "foo", "jane", "john"]);

    q.clear_sort_by();
    q.add_sort_by(Comparator::by_key(|s: &&str| std::cmp::Reverse(s.len())))
        .add_sort_by(Comparator::natural());
    assert_eq!(q.fetch_all(), vec!["jane", "john", "bar", "foo"]);
}

#[test]
fn offset_past_most_of_the_input() {
    let mut q = Pipeline::new(names());
    q.set_offset(3).unwrap().set_limit(10).unwrap();
    assert_eq!(q.fetch_all(), vec!["bar"]);
}

#[test]
fn window_length_matches_formula() {
    let n = 4usize;
    for k in 0..6i64 {
        for m in -1..6i64 {
            let mut q = Pipeline::new(names());
            q.set_offset(k).unwrap().set_limit(m).unwrap();
            let remaining = n.saturating_sub(k as usize);
            let expected = if m == -1 {
                remaining
            } else {
                remaining.min(m as usize)
            };
            assert_eq!(q.fetch_all().len(), expected, "offset {k} limit {m}");
        }
    }
}

#[test]
fn invalid_window_arguments_are_rejected() {
    let mut q = Pipeline::new(names());
    assert!(matches!(q.set_offset(-1), Err(QueryError::InvalidArgument(_))));
    assert!(matches!(q.set_limit(-2), Err(QueryError::InvalidArgument(_))));
    assert_eq!(q.offset(), 0);
    assert_eq!(q.limit(), None);

    q.set_offset(0).unwrap().set_limit(-1).unwrap();
    assert_eq!(q.fetch_all(), names());
}

#[test]
fn uppercase_projection() {
    let mut q = Pipeline::<_, String>::from_source(names(), PipelineConfig::default());
    q.set_select(Some(Projector::from_value(|s: &str| s.to_uppercase())));
    assert_eq!(q.fetch_all(), vec!["JOHN", "JANE", "FOO", "BAR"]);

    q.clear_select();
    assert_eq!(q.fetch_all(), vec!["john", "jane", "foo", "bar"]);
}

#[test]
fn full_query_runs_stages_in_order() {
    let mut q = Pipeline::<_, String>::from_source(names(), PipelineConfig::default());
    q.add_filter(Predicate::from_value(|s: &&str| s.len() == 4))
        .add_sort_by(Comparator::natural())
        .set_limit(1)
        .unwrap()
        .set_select(Some(Projector::from_value(|s: &str| s.to_uppercase())));
    assert_eq!(q.fetch_all(), vec!["JANE"]);
}

#[test]
fn each_counts_callbacks_until_false() {
    let mut q = Pipeline::new(names());
    let mut seen = Vec::new();
    let visited = q.each(|value, key, cursor| {
        seen.push((*value, key, cursor.position()));
        *value != "foo"
    });
    assert_eq!(visited, 2);
    assert_eq!(seen, vec![("john", 0, 0), ("jane", 1, 1), ("foo", 2, 2)]);

    assert_eq!(q.each(|_, _, _| true), 4);
}

#[test]
fn fetch_one_uses_a_one_off_window() {
    let mut q = Pipeline::new(names());
    q.add_sort_by(Comparator::natural());
    q.set_offset(1).unwrap().set_limit(2).unwrap();

    assert_eq!(q.fetch_one(0).unwrap(), Some("bar"));
    assert_eq!(q.fetch_one(3).unwrap(), Some("john"));
    assert_eq!(q.fetch_one(4).unwrap(), None);
    assert!(q.fetch_one(-1).is_err());

    assert_eq!(q.offset(), 1);
    assert_eq!(q.limit(), Some(2));
    assert_eq!(q.fetch_all(), vec!["foo", "jane"]);
}

#[test]
fn clear_all_restores_identity() {
    let mut q = Pipeline::<_, String>::from_source(names(), PipelineConfig::default());
    q.add_filter(Predicate::from_value(|s: &&str| s.contains('o')))
        .add_sort_by(Comparator::natural())
        .set_offset(1)
        .unwrap()
        .set_select(Some(Projector::from_value(|s: &str| s.to_uppercase())));
    assert_eq!(q.fetch_all(), vec!["JOHN"]);

    q.clear_all();
    assert_eq!(q.fetch_all(), vec!["john", "jane", "foo", "bar"]);
    assert!(q.select().is_none());
    assert_eq!(q.offset(), 0);
}

#[test]
fn membership_is_by_identity() {
    let mut q = Pipeline::new(names());
    let o = contains('o');
    let lookalike = contains('o');
    q.add_filter(o.clone()).add_filter(o.clone());

    assert!(q.has_filter(&o));
    assert!(!q.has_filter(&lookalike));

    q.remove_filter(&lookalike);
    assert_eq!(q.filter().len(), 2);

    q.remove_filter(&o);
    assert!(q.has_filter(&o));
    q.remove_filter(&o);
    assert!(!q.has_filter(&o));
    assert_eq!(q.fetch_all(), names());

    let lex = Comparator::natural();
    q.add_sort_by(lex.clone());
    assert!(q.has_sort_by(&lex));
    q.remove_sort_by(&lex);
    assert!(!q.has_sort_by(&lex));
}

#[test]
fn persistent_state_survives_rebuilds() {
    let mut q = Pipeline::new(names());
    q.add_filter(contains('o')).add_sort_by(Comparator::natural());
    assert_eq!(q.fetch_all(), vec!["foo", "john"]);
    assert_eq!(q.fetch_all(), vec!["foo", "john"]);
}

#[test]
fn consuming_state_keeps_window_and_projector() {
    let config = PipelineConfig::default().with_state(StatePolicy::Consuming);
    let mut q = Pipeline::<_, String>::from_source(names(), config);
    q.add_filter(Predicate::from_value(|s: &&str| s.contains('o')))
        .add_sort_by(Comparator::natural())
        .set_limit(1)
        .unwrap()
        .set_select(Some(Projector::from_value(|s: &str| s.to_uppercase())));

    assert_eq!(q.fetch_all(), vec!["FOO"]);
    assert_eq!(q.fetch_all(), vec!["JOHN"]);
}

#[test]
fn policy_can_change_between_builds() {
    let mut q = Pipeline::new(names());
    q.add_filter(contains('o'));
    q.set_state_policy(StatePolicy::Consuming);
    assert_eq!(q.fetch_all(), vec!["john", "foo"]);
    assert!(q.filter().is_empty());
}

#[test]
fn unsorted_pipelines_pull_lazily() {
    let pulled = Rc::new(Cell::new(0));
    let counter = Rc::clone(&pulled);
    let source = Factory::new(move || {
        let counter = Rc::clone(&counter);
        (0..1_000).inspect(move |_| counter.set(counter.get() + 1))
    });

    let mut q = Pipeline::new(source);
    q.add_filter(Predicate::from_value(|n: &i32| n % 2 == 0));
    q.set_limit(3).unwrap();
    assert_eq!(q.fetch_all(), vec![0, 2, 4]);
    assert_eq!(pulled.get(), 5);
}

#[test]
fn sorted_pipelines_drain_upstream_once_pulled() {
    let pulled = Rc::new(Cell::new(0));
    let counter = Rc::clone(&pulled);
    let source = Factory::new(move || {
        let counter = Rc::clone(&counter);
        (0..100).rev().inspect(move |_| counter.set(counter.get() + 1))
    });

    let mut q = Pipeline::new(source);
    q.add_sort_by(Comparator::natural());
    let first = q.build().next();
    assert_eq!(first, Some((99, 0)));
    assert_eq!(pulled.get(), 100);
}

#[test]
fn single_pass_source_is_spent_after_one_build() {
    let mut q = Pipeline::new(SinglePass::new(names().into_iter()));
    assert_eq!(q.fetch_all(), names());
    assert!(q.fetch_all().is_empty());
    assert!(q.source().is_spent());
}

#[test]
fn keyed_source_keys_flow_through() {
    let mut q = Pipeline::new(Keyed::new(|| vec![(10, "x"), (20, "y"), (30, "z")]));
    q.set_offset(1).unwrap();
    assert_eq!(q.fetch_keyed(), vec![(20, "y"), (30, "z")]);
}

#[test]
fn pipelines_nest() {
    let mut inner = Pipeline::new(names());
    inner.add_filter(contains('o'));

    let mut outer = Pipeline::new(inner);
    outer.add_sort_by(Comparator::natural());
    assert_eq!(outer.fetch_all(), vec!["foo", "john"]);
    assert_eq!(outer.fetch_keyed(), vec![(2, "foo"), (0, "john")]);
}

#[test]
fn iterating_a_pipeline_builds_it() {
    let mut q = Pipeline::new(names());
    q.add_filter(contains('a'));
    let mut out = Vec::new();
    for (key, name) in &mut q {
        out.push((key, name));
    }
    assert_eq!(out, vec![(1, "jane"), (3, "bar")]);
}

#[test]
fn callables_see_positions_relative_to_their_stage() {
    let mut q = Pipeline::<_, String>::from_source(names(), PipelineConfig::default());
    q.add_filter(contains('o')).set_select(Some(Projector::new(
        |s: &str, key, cursor: &Cursor| format!("{}@{}#{}", s, key, cursor.position()),
    )));
    assert_eq!(q.fetch_all(), vec!["john@0#0", "foo@2#1"]);
}
