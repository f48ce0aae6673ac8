//! Pipeline: compose the four stages over a source and run terminal operations.
//!
//! Evaluation order is fixed: filter → sort → interval → project. Filtering
//! first keeps excluded elements out of the sort; sorting before windowing makes
//! offset/limit select a page of the *sorted* result; projecting last lets the
//! other stages see the original element shape.
//!
//! Laziness: the composed sequence pulls from the source on demand, except that
//! a registered comparator makes the first pull drain everything the filters
//! let through (see `iquery_operators::sort`).
//!
//! State: with `StatePolicy::Persistent` (the default) registrations survive
//! every build until cleared. With `StatePolicy::Consuming` each build spends
//! the filters and comparators it composed; the window and projector stay.

use iquery_core::config::{PipelineConfig, StatePolicy};
use iquery_core::cursor::Cursor;
use iquery_core::error::Result;
use iquery_core::interval::Interval;
use iquery_core::nested::Nested;
use iquery_core::sequence::{Key, Sequence, Source};

use iquery_operators::callable::{Comparator, Predicate, Projector};
use iquery_operators::plan::StagePlan;
use iquery_operators::traits::Stage;
use iquery_operators::{FilterStage, IntervalStage, ProjectStage, SortStage};

#[cfg(feature = "tracing")]
use crate::metrics;

/// A query over a borrowed source.
///
/// `U` is the element type the pipeline yields; it differs from the source's
/// element type only when a type-changing projector is used, and then the
/// source type must convert into `U` for the no-projector case.
pub struct Pipeline<S: Source, U = <S as Source>::Item> {
    source: S,
    config: PipelineConfig,
    filter: FilterStage<S::Item>,
    sort: SortStage<S::Item>,
    interval: IntervalStage,
    project: ProjectStage<S::Item, U>,
}

impl<S: Source> Pipeline<S> {
    /// Pipeline yielding the source's own element type, with default config.
    pub fn new(source: S) -> Self {
        Self::from_source(source, PipelineConfig::default())
    }

    pub fn with_config(source: S, config: PipelineConfig) -> Self {
        Self::from_source(source, config)
    }
}

impl<S: Source, U> Pipeline<S, U> {
    /// Pipeline with an explicit output type, e.g.
    /// `Pipeline::<_, String>::from_source(words, PipelineConfig::default())`.
    pub fn from_source(source: S, config: PipelineConfig) -> Self {
        Self {
            source,
            filter: FilterStage::new(),
            sort: SortStage::new(),
            interval: IntervalStage::with_window(config.interval),
            project: ProjectStage::new(),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn set_state_policy(&mut self, state: StatePolicy) -> &mut Self {
        self.config.state = state;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    // ----- stage access -----

    pub fn filter(&self) -> &FilterStage<S::Item> {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut FilterStage<S::Item> {
        &mut self.filter
    }

    pub fn sort(&self) -> &SortStage<S::Item> {
        &self.sort
    }

    pub fn sort_mut(&mut self) -> &mut SortStage<S::Item> {
        &mut self.sort
    }

    pub fn interval(&self) -> &IntervalStage {
        &self.interval
    }

    pub fn interval_mut(&mut self) -> &mut IntervalStage {
        &mut self.interval
    }

    pub fn project(&self) -> &ProjectStage<S::Item, U> {
        &self.project
    }

    pub fn project_mut(&mut self) -> &mut ProjectStage<S::Item, U> {
        &mut self.project
    }

    // ----- WHERE -----

    pub fn add_filter(&mut self, predicate: Predicate<S::Item>) -> &mut Self {
        self.filter.add(predicate);
        self
    }

    pub fn remove_filter(&mut self, predicate: &Predicate<S::Item>) -> &mut Self {
        self.filter.remove(predicate);
        self
    }

    pub fn has_filter(&self, predicate: &Predicate<S::Item>) -> bool {
        self.filter.has(predicate)
    }

    pub fn clear_filter(&mut self) -> &mut Self {
        self.filter.clear();
        self
    }

    // ----- ORDER BY -----

    pub fn add_sort_by(&mut self, comparator: Comparator<S::Item>) -> &mut Self {
        self.sort.add(comparator);
        self
    }

    pub fn remove_sort_by(&mut self, comparator: &Comparator<S::Item>) -> &mut Self {
        self.sort.remove(comparator);
        self
    }

    pub fn has_sort_by(&self, comparator: &Comparator<S::Item>) -> bool {
        self.sort.has(comparator)
    }

    pub fn clear_sort_by(&mut self) -> &mut Self {
        self.sort.clear();
        self
    }

    // ----- LIMIT / OFFSET -----

    /// Fails with `InvalidArgument` when `offset < 0`.
    pub fn set_offset(&mut self, offset: i64) -> Result<&mut Self> {
        self.interval.set_offset(offset)?;
        Ok(self)
    }

    /// `-1` means unbounded. Fails with `InvalidArgument` when `limit < -1`.
    pub fn set_limit(&mut self, limit: i64) -> Result<&mut Self> {
        self.interval.set_limit(limit)?;
        Ok(self)
    }

    pub fn offset(&self) -> usize {
        self.interval.offset()
    }

    pub fn limit(&self) -> Option<usize> {
        self.interval.limit()
    }

    // ----- SELECT -----

    /// Replace the projector; `None` clears it.
    pub fn set_select(&mut self, projector: Option<Projector<S::Item, U>>) -> &mut Self {
        self.project.set(projector);
        self
    }

    pub fn select(&self) -> Option<&Projector<S::Item, U>> {
        self.project.get()
    }

    pub fn clear_select(&mut self) -> &mut Self {
        self.project.clear();
        self
    }

    /// Empty every registry, reset the window to `{0, -1}` and drop the
    /// projector.
    pub fn clear_all(&mut self) -> &mut Self {
        self.filter.clear();
        self.sort.clear();
        self.interval.reset();
        self.project.clear();
        self
    }
}

impl<S, U> Pipeline<S, U>
where
    S: Source,
    S::Item: Nested,
{
    /// Register a predicate that also prunes nested children.
    pub fn add_recursive_filter(&mut self, predicate: Predicate<S::Item>) -> &mut Self {
        self.filter.add_recursive(predicate);
        self
    }

    pub fn remove_recursive_filter(&mut self, predicate: &Predicate<S::Item>) -> &mut Self {
        self.filter.remove_recursive(predicate);
        self
    }

    pub fn has_recursive_filter(&self, predicate: &Predicate<S::Item>) -> bool {
        self.filter.has_recursive(predicate)
    }
}

impl<S, U> Pipeline<S, U>
where
    S: Source,
    S::Item: Into<U>,
{
    /// Compose filter → sort → interval → project over a fresh source sequence.
    pub fn build(&mut self) -> Sequence<'_, U> {
        let window = self.interval.window();
        self.compose(window)
    }

    fn compose(&mut self, window: Interval) -> Sequence<'_, U> {
        #[cfg(feature = "tracing")]
        metrics::emit(
            "build",
            &[
                ("policy", format!("{:?}", self.config.state)),
                ("filters", self.filter.len().to_string()),
                ("comparators", self.sort.len().to_string()),
            ],
        );

        let input = self.source.sequence();
        let filtered = Stage::<S::Item>::apply(&self.filter, input);
        let sorted = Stage::<S::Item>::apply(&self.sort, filtered);
        let windowed = Stage::<S::Item>::apply(&IntervalStage::with_window(window), sorted);
        let projected = Stage::<S::Item>::apply(&self.project, windowed);

        if self.config.state == StatePolicy::Consuming {
            Stage::<S::Item>::clear(&mut self.filter);
            Stage::<S::Item>::clear(&mut self.sort);
        }
        projected
    }

    /// Build, then call `callback` for each element until the sequence ends or
    /// the callback returns `false`. Returns how many callbacks returned `true`.
    pub fn each<F>(&mut self, mut callback: F) -> usize
    where
        F: FnMut(&U, Key, &Cursor) -> bool,
    {
        let mut visited = 0;
        for (position, (key, value)) in self.build().enumerate() {
            let cursor = Cursor::new("each", position, 0);
            if !callback(&value, key, &cursor) {
                break;
            }
            visited += 1;
        }
        #[cfg(feature = "tracing")]
        metrics::emit("each", &[("visited", visited.to_string())]);
        visited
    }

    /// The element at `offset` in the composed order, or `None` when the
    /// result is shorter. The stored window is left untouched.
    pub fn fetch_one(&mut self, offset: i64) -> Result<Option<U>> {
        let offset = Interval::checked_offset(offset)?;
        let window = Interval::UNBOUNDED.with_offset(offset).with_limit(Some(1));
        Ok(self.compose(window).next().map(|(_, value)| value))
    }

    /// Collect the composed sequence; positions are re-based to `0..n`.
    pub fn fetch_all(&mut self) -> Vec<U> {
        let rows: Vec<U> = self.build().map(|(_, value)| value).collect();
        #[cfg(feature = "tracing")]
        metrics::emit("fetch_all", &[("rows", rows.len().to_string())]);
        rows
    }

    /// Collect the composed sequence together with each element's key.
    pub fn fetch_keyed(&mut self) -> Vec<(Key, U)> {
        self.build().collect()
    }

    /// What each stage would do if the pipeline were built now.
    pub fn explain(&self) -> Vec<StagePlan> {
        vec![
            Stage::<S::Item>::plan(&self.filter),
            Stage::<S::Item>::plan(&self.sort),
            Stage::<S::Item>::plan(&self.interval),
            Stage::<S::Item>::plan(&self.project),
        ]
    }
}

/// Iterating `&mut pipeline` builds it.
impl<'p, S, U> IntoIterator for &'p mut Pipeline<S, U>
where
    S: Source,
    S::Item: Into<U>,
{
    type Item = (Key, U);
    type IntoIter = Sequence<'p, U>;

    fn into_iter(self) -> Self::IntoIter {
        self.build()
    }
}

/// A pipeline is itself a source, so pipelines nest.
impl<S, U> Source for Pipeline<S, U>
where
    S: Source,
    S::Item: Into<U>,
{
    type Item = U;

    fn sequence(&mut self) -> Sequence<'_, U> {
        self.build()
    }
}
