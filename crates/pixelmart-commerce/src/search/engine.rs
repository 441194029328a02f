//! The filter engine: state machine, debounce and cached results together.

use crate::catalog::{Catalog, Product};
use crate::events::{EventBus, StoreEvent};
use crate::search::{
    count_matches, filter_products, DebounceTimer, FilterAction, FilterCriteria, FilterEdit,
    FilterEffect, FilterPhase, FilterState, PriceRange, ResultsBanner,
};
use std::time::{Duration, Instant};

/// Drives the listing for one catalog.
///
/// Callers feed user actions and clock ticks in; the engine keeps the
/// query string, publishes notifications and recomputes the visible
/// products once the debounce delay has passed.
#[derive(Debug)]
pub struct FilterEngine<'c> {
    catalog: &'c Catalog,
    state: FilterState,
    timer: DebounceTimer,
    results: Vec<&'c Product>,
    bus: EventBus,
}

impl<'c> FilterEngine<'c> {
    /// Mount on a query string. Results are computed immediately.
    pub fn mount(catalog: &'c Catalog, query: &str, bus: EventBus, debounce: Duration) -> Self {
        let state = FilterState::from_query(query, PriceRange::for_catalog(catalog));
        let results = filter_products(catalog, state.applied());
        tracing::debug!(query, results = results.len(), "filter engine mounted");
        Self {
            catalog,
            state,
            timer: DebounceTimer::new(debounce),
            results,
            bus,
        }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn pending(&self) -> &FilterCriteria {
        self.state.pending()
    }

    pub fn applied(&self) -> &FilterCriteria {
        self.state.applied()
    }

    pub fn phase(&self) -> FilterPhase {
        self.state.phase()
    }

    /// The current query string.
    pub fn location(&self) -> &str {
        self.state.location()
    }

    /// Whether the apply control should be enabled.
    pub fn can_apply(&self) -> bool {
        self.state.can_apply()
    }

    /// The visible products, as of the last recompute.
    pub fn results(&self) -> &[&'c Product] {
        &self.results
    }

    /// Number of products the applied criteria match, without sorting.
    pub fn count(&self) -> usize {
        count_matches(self.catalog, self.state.applied())
    }

    /// Number of products the pending criteria would match.
    pub fn preview_count(&self) -> usize {
        count_matches(self.catalog, self.state.pending())
    }

    pub fn banner(&self) -> Option<ResultsBanner> {
        ResultsBanner::for_criteria(self.catalog, self.state.applied())
    }

    /// When the next recompute is due, if one is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    pub fn edit(&mut self, edit: FilterEdit, now: Instant) {
        self.dispatch(FilterAction::Edit(edit), now);
    }

    pub fn apply(&mut self, now: Instant) {
        self.dispatch(FilterAction::Apply, now);
    }

    pub fn navigate(&mut self, query: &str, now: Instant) {
        self.dispatch(
            FilterAction::Navigate {
                query: query.to_string(),
            },
            now,
        );
    }

    pub fn clear_search(&mut self, now: Instant) {
        self.dispatch(FilterAction::ClearSearch, now);
    }

    pub fn reset(&mut self, now: Instant) {
        self.dispatch(FilterAction::Reset, now);
    }

    /// React to a notification from elsewhere in the app.
    pub fn handle_event(&mut self, event: &StoreEvent, now: Instant) {
        if let StoreEvent::ExternalFilterNavigation { query } = event {
            self.navigate(query, now);
        }
    }

    /// Run a pending recompute if its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.timer.fire_if_due(now) {
            return false;
        }
        self.recompute();
        true
    }

    /// Run a pending recompute now, regardless of the deadline.
    pub fn flush(&mut self) -> bool {
        if !self.timer.cancel() {
            return false;
        }
        self.recompute();
        true
    }

    /// Feed an action through the state machine and carry out its effects.
    pub fn dispatch(&mut self, action: FilterAction, now: Instant) {
        for effect in self.state.transition(action) {
            match effect {
                FilterEffect::PushQuery(query) => {
                    tracing::debug!(query = %query, "query string updated");
                }
                FilterEffect::Publish(event) => self.bus.emit(&event),
                FilterEffect::ScheduleRecompute => {
                    self.timer.schedule(now);
                }
            }
        }
    }

    fn recompute(&mut self) {
        self.results = filter_products(self.catalog, self.state.applied());
        self.state.transition(FilterAction::Recomputed);
        tracing::debug!(results = self.results.len(), "listing recomputed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::search::SortOption;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    const DELAY: Duration = Duration::from_millis(100);

    fn catalog() -> Catalog {
        Catalog::from_json(
            &json!([
                { "id": 1, "name": "iPhone 16", "category": "iPhone", "price": 979 },
                { "id": 2, "name": "MacBook Air", "category": "Mac", "price": 1249 },
                { "id": 3, "name": "iPhone 15", "category": "iPhone", "price": 879 },
                { "id": 4, "name": "iPad mini", "category": "iPad", "price": 599 }
            ])
            .to_string(),
        )
        .unwrap()
    }

    fn ids(engine: &FilterEngine<'_>) -> Vec<u64> {
        engine.results().iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn test_mount_computes_results() {
        let catalog = catalog();
        let engine = FilterEngine::mount(&catalog, "?cat=iPhone", EventBus::new(), DELAY);
        assert_eq!(ids(&engine), vec![1, 3]);
        assert_eq!(engine.phase(), FilterPhase::Applied);
        assert!(!engine.can_apply());
    }

    #[test]
    fn test_apply_recomputes_after_debounce() {
        let catalog = catalog();
        let bus = EventBus::new();
        let applied = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&applied);
        bus.subscribe(move |e| {
            if let StoreEvent::FiltersApplied { query } = e {
                sink.borrow_mut().push(query.clone());
            }
        });

        let t0 = Instant::now();
        let mut engine = FilterEngine::mount(&catalog, "", bus, DELAY);
        engine.edit(FilterEdit::Category(Some(Category::IPhone)), t0);
        engine.edit(FilterEdit::Sort(SortOption::PriceAsc), t0);
        assert!(engine.can_apply());
        assert_eq!(engine.preview_count(), 2);

        engine.apply(t0);
        assert_eq!(engine.location(), "cat=iPhone&sort=price-asc");
        assert_eq!(*applied.borrow(), vec!["cat=iPhone&sort=price-asc"]);
        assert_eq!(engine.phase(), FilterPhase::Applying);
        assert_eq!(ids(&engine), vec![1, 2, 3, 4]);

        assert!(!engine.tick(t0 + Duration::from_millis(50)));
        assert!(engine.tick(t0 + DELAY));
        assert_eq!(ids(&engine), vec![3, 1]);
        assert_eq!(engine.phase(), FilterPhase::Applied);
    }

    #[test]
    fn test_rapid_changes_coalesce() {
        let catalog = catalog();
        let t0 = Instant::now();
        let mut engine = FilterEngine::mount(&catalog, "", EventBus::new(), DELAY);

        engine.navigate("cat=Mac", t0);
        engine.navigate("cat=iPad", t0 + Duration::from_millis(60));
        assert!(!engine.tick(t0 + Duration::from_millis(120)));
        assert!(engine.tick(t0 + Duration::from_millis(160)));
        assert_eq!(ids(&engine), vec![4]);
        assert!(!engine.tick(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn test_external_navigation_event() {
        let catalog = catalog();
        let t0 = Instant::now();
        let mut engine = FilterEngine::mount(&catalog, "cat=Mac", EventBus::new(), DELAY);
        engine.edit(FilterEdit::Search("air".into()), t0);

        engine.handle_event(
            &StoreEvent::ExternalFilterNavigation {
                query: "cat=iPhone".into(),
            },
            t0,
        );
        assert!(engine.pending().search.is_empty());
        assert!(engine.flush());
        assert_eq!(ids(&engine), vec![1, 3]);
        assert!(!engine.flush());
    }

    #[test]
    fn test_clear_search_and_banner() {
        let catalog = catalog();
        let t0 = Instant::now();
        let mut engine = FilterEngine::mount(&catalog, "search=iphone&sort=name-asc", EventBus::new(), DELAY);
        assert_eq!(engine.count(), 2);
        assert_eq!(engine.banner().map(|b| b.count), Some(2));

        engine.clear_search(t0);
        assert_eq!(engine.location(), "sort=name-asc");
        assert_eq!(engine.banner(), None);
        engine.flush();
        assert_eq!(ids(&engine), vec![4, 3, 1, 2]);
    }
}
