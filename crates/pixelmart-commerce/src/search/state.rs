//! Pending/applied filter state machine.
//!
//! The panel edits a *pending* copy of the criteria; an explicit apply
//! copies it to the *applied* copy, which drives the results and the query
//! string. External navigation overwrites both.
//!
//! Phases:
//!
//! ```text
//!   Applied --edit--> Editing --apply--> Applying --recomputed--> Applied
//!      ^                                    |
//!      +------------ navigate / clear search +
//! ```
//!
//! `transition` is the only place state changes; it returns the effects the
//! caller must carry out.

use crate::events::StoreEvent;
use crate::search::query_string::{parse_query, to_query};
use crate::search::{FilterCriteria, FilterEdit, PriceRange};
use serde::Serialize;

/// Where the filter panel is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPhase {
    /// Pending differs from applied.
    Editing,
    /// Applied changed and the results are waiting to be recomputed.
    Applying,
    /// Results reflect the applied criteria and nothing is pending.
    Applied,
}

/// Input to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    /// Change one pending field.
    Edit(FilterEdit),
    /// Copy pending to applied.
    Apply,
    /// The location's query string changed outside the panel.
    Navigate { query: String },
    /// Drop the search text from both copies, keeping other filters.
    ClearSearch,
    /// Return pending to the defaults.
    Reset,
    /// The results were recomputed for the current applied criteria.
    Recomputed,
}

/// Work the caller must do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEffect {
    /// Replace the location's query string.
    PushQuery(String),
    /// Publish a notification.
    Publish(StoreEvent),
    /// Applied criteria changed: (re)start the recompute debounce.
    ScheduleRecompute,
}

/// Both criteria snapshots plus the current query string.
#[derive(Debug, Clone)]
pub struct FilterState {
    bounds: PriceRange,
    pending: FilterCriteria,
    applied: FilterCriteria,
    location: String,
    stale: bool,
}

impl FilterState {
    /// Initial state: both snapshots parsed from the query string.
    pub fn from_query(query: &str, bounds: PriceRange) -> Self {
        let applied = parse_query(query, bounds);
        Self {
            bounds,
            pending: applied.clone(),
            applied,
            location: strip_query(query).to_string(),
            stale: false,
        }
    }

    pub fn pending(&self) -> &FilterCriteria {
        &self.pending
    }

    pub fn applied(&self) -> &FilterCriteria {
        &self.applied
    }

    pub fn bounds(&self) -> PriceRange {
        self.bounds
    }

    /// The current query string, without a leading `?`.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Whether pending differs from applied in any field.
    pub fn can_apply(&self) -> bool {
        self.pending != self.applied
    }

    pub fn phase(&self) -> FilterPhase {
        if self.stale {
            FilterPhase::Applying
        } else if self.can_apply() {
            FilterPhase::Editing
        } else {
            FilterPhase::Applied
        }
    }

    /// Advance the machine.
    pub fn transition(&mut self, action: FilterAction) -> Vec<FilterEffect> {
        let mut effects = Vec::new();
        match action {
            FilterAction::Edit(edit) => self.pending.apply_edit(edit),

            FilterAction::Reset => self.pending = FilterCriteria::defaults(self.bounds),

            FilterAction::Apply => {
                let changed = self.pending != self.applied;
                self.applied = self.pending.clone();
                let query = to_query(&self.applied, self.bounds);
                if query != self.location {
                    self.location = query.clone();
                    effects.push(FilterEffect::PushQuery(query.clone()));
                }
                effects.push(FilterEffect::Publish(StoreEvent::FiltersApplied { query }));
                if changed {
                    self.mark_stale(&mut effects);
                }
            }

            FilterAction::Navigate { query } => {
                let parsed = parse_query(&query, self.bounds);
                self.location = strip_query(&query).to_string();
                self.pending = parsed.clone();
                if parsed != self.applied {
                    self.applied = parsed;
                    self.mark_stale(&mut effects);
                }
            }

            FilterAction::ClearSearch => {
                self.pending.search.clear();
                if !self.applied.search.is_empty() {
                    self.applied.search.clear();
                    let query = to_query(&self.applied, self.bounds);
                    if query != self.location {
                        self.location = query.clone();
                        effects.push(FilterEffect::PushQuery(query));
                    }
                    self.mark_stale(&mut effects);
                }
            }

            FilterAction::Recomputed => self.stale = false,
        }
        tracing::trace!(phase = ?self.phase(), effects = effects.len(), "filter transition");
        effects
    }

    fn mark_stale(&mut self, effects: &mut Vec<FilterEffect>) {
        self.stale = true;
        effects.push(FilterEffect::ScheduleRecompute);
    }
}

fn strip_query(query: &str) -> &str {
    query.strip_prefix('?').unwrap_or(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::money::{Currency, Money};
    use crate::search::SortOption;

    fn bounds() -> PriceRange {
        PriceRange::new(
            Money::from_units(19, Currency::EUR),
            Money::from_units(3999, Currency::EUR),
        )
    }

    #[test]
    fn test_mount_parses_both_snapshots() {
        let state = FilterState::from_query("?cat=Mac&sort=name-asc", bounds());
        assert_eq!(state.applied().category, Some(Category::Mac));
        assert_eq!(state.pending(), state.applied());
        assert_eq!(state.location(), "cat=Mac&sort=name-asc");
        assert_eq!(state.phase(), FilterPhase::Applied);
    }

    #[test]
    fn test_edit_only_touches_pending() {
        let mut state = FilterState::from_query("", bounds());
        let effects = state.transition(FilterAction::Edit(FilterEdit::Category(Some(Category::IPad))));
        assert!(effects.is_empty());
        assert_eq!(state.applied().category, None);
        assert_eq!(state.pending().category, Some(Category::IPad));
        assert!(state.can_apply());
        assert_eq!(state.phase(), FilterPhase::Editing);
    }

    #[test]
    fn test_apply_writes_query_and_notifies() {
        let mut state = FilterState::from_query("", bounds());
        state.transition(FilterAction::Edit(FilterEdit::Category(Some(Category::IPad))));
        state.transition(FilterAction::Edit(FilterEdit::Sort(SortOption::PriceAsc)));

        let effects = state.transition(FilterAction::Apply);
        assert_eq!(
            effects,
            vec![
                FilterEffect::PushQuery("cat=iPad&sort=price-asc".into()),
                FilterEffect::Publish(StoreEvent::FiltersApplied {
                    query: "cat=iPad&sort=price-asc".into()
                }),
                FilterEffect::ScheduleRecompute,
            ]
        );
        assert!(!state.can_apply());
        assert_eq!(state.phase(), FilterPhase::Applying);

        state.transition(FilterAction::Recomputed);
        assert_eq!(state.phase(), FilterPhase::Applied);
    }

    #[test]
    fn test_apply_without_changes_only_notifies() {
        let mut state = FilterState::from_query("cat=Mac", bounds());
        let effects = state.transition(FilterAction::Apply);
        assert_eq!(
            effects,
            vec![FilterEffect::Publish(StoreEvent::FiltersApplied {
                query: "cat=Mac".into()
            })]
        );
    }

    #[test]
    fn test_navigate_overrides_pending_edits() {
        let mut state = FilterState::from_query("", bounds());
        state.transition(FilterAction::Edit(FilterEdit::Year(Some(2022))));
        let effects = state.transition(FilterAction::Navigate {
            query: "?cat=AirPods".into(),
        });
        assert_eq!(effects, vec![FilterEffect::ScheduleRecompute]);
        assert_eq!(state.pending().year, None);
        assert_eq!(state.pending(), state.applied());
        assert_eq!(state.applied().category, Some(Category::AirPods));
        assert_eq!(state.location(), "cat=AirPods");
    }

    #[test]
    fn test_navigate_to_same_criteria_does_not_recompute() {
        let mut state = FilterState::from_query("cat=Mac", bounds());
        let effects = state.transition(FilterAction::Navigate { query: "cat=Mac".into() });
        assert!(effects.is_empty());
    }

    #[test]
    fn test_clear_search_keeps_other_filters() {
        let mut state = FilterState::from_query("cat=iPhone&search=pro", bounds());
        state.transition(FilterAction::Edit(FilterEdit::Color(Some("Black".into()))));
        let effects = state.transition(FilterAction::ClearSearch);
        assert_eq!(
            effects,
            vec![
                FilterEffect::PushQuery("cat=iPhone".into()),
                FilterEffect::ScheduleRecompute
            ]
        );
        assert_eq!(state.applied().category, Some(Category::IPhone));
        assert!(state.applied().search.is_empty());
        assert!(state.pending().search.is_empty());
        assert_eq!(state.pending().color.as_deref(), Some("Black"));
    }

    #[test]
    fn test_reset_needs_apply() {
        let mut state = FilterState::from_query("cat=Mac&year=2024", bounds());
        state.transition(FilterAction::Reset);
        assert_eq!(state.applied().category, Some(Category::Mac));
        assert_eq!(state.pending(), &FilterCriteria::defaults(bounds()));
        assert!(state.can_apply());

        let effects = state.transition(FilterAction::Apply);
        assert_eq!(effects[0], FilterEffect::PushQuery(String::new()));
    }
}
