//! Selection State
//! Dataset checkboxes, chart toggles and the page / region choice for one session.

use crate::catalog::{Catalog, DatasetEntry, DatasetKind, Region};
use crate::charts::ChartKind;
use std::collections::BTreeSet;

pub const PROMPT_MESSAGE: &str = "Please select a variable from the options above.";
pub const MULTIPLE_SELECTION_MESSAGE: &str = "Please select only one dataset at a time.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    About,
    #[default]
    Visualization,
}

/// What the chart area should show for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome<'a> {
    /// Nothing checked; informational.
    Prompt(&'static str),
    /// More than one dataset checked; nothing is rendered.
    Blocked(&'static str),
    Ready {
        entry: &'a DatasetEntry,
        available: Vec<ChartKind>,
    },
}

/// Per-session selector state.
#[derive(Debug, Clone, Default)]
pub struct SelectorState {
    region: Region,
    page: Page,
    /// Checked dataset labels, in the order they were checked.
    checked: Vec<String>,
    /// Enabled chart toggles, keyed by dataset label.
    toggles: BTreeSet<(String, ChartKind)>,
}

impl SelectorState {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            ..Self::default()
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Switch county; returns true when it changed, which clears the selection.
    pub fn set_region(&mut self, region: Region) -> bool {
        if region == self.region {
            return false;
        }
        self.region = region;
        self.checked.clear();
        self.toggles.clear();
        true
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn set_page(&mut self, page: Page) {
        self.page = page;
    }

    pub fn is_checked(&self, label: &str) -> bool {
        self.checked.iter().any(|l| l == label)
    }

    pub fn set_checked(&mut self, label: &str, checked: bool) {
        match (checked, self.is_checked(label)) {
            (true, false) => self.checked.push(label.to_string()),
            (false, true) => self.checked.retain(|l| l != label),
            _ => {}
        }
    }

    #[cfg(test)]
    pub fn checked_labels(&self) -> &[String] {
        &self.checked
    }

    pub fn is_toggled(&self, label: &str, kind: ChartKind) -> bool {
        self.toggles.contains(&(label.to_string(), kind))
    }

    pub fn set_toggled(&mut self, label: &str, kind: ChartKind, on: bool) {
        let key = (label.to_string(), kind);
        if on {
            self.toggles.insert(key);
        } else {
            self.toggles.remove(&key);
        }
    }

    /// Resolve the checked labels against the region's catalog.
    pub fn outcome<'a>(&self, catalog: &'a Catalog) -> SelectionOutcome<'a> {
        match self.checked.as_slice() {
            [] => SelectionOutcome::Prompt(PROMPT_MESSAGE),
            [label] => match catalog.resolve(label) {
                Ok(entry) => SelectionOutcome::Ready {
                    entry,
                    available: entry.applicable_charts(),
                },
                // A label from another catalog is treated as no selection.
                Err(_) => SelectionOutcome::Prompt(PROMPT_MESSAGE),
            },
            _ => SelectionOutcome::Blocked(MULTIPLE_SELECTION_MESSAGE),
        }
    }

    /// Enabled charts among `available`, in `available` order.
    ///
    /// A county summary has a single chart and shows it as soon as it is checked.
    pub fn toggled_charts(&self, entry: &DatasetEntry, available: &[ChartKind]) -> Vec<ChartKind> {
        if entry.kind == DatasetKind::Summary {
            return available.to_vec();
        }
        available
            .iter()
            .copied()
            .filter(|&kind| self.is_toggled(&entry.label, kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn catalog() -> Catalog {
        Catalog::for_region(Region::Kisii, Path::new("/none"), "consent.xlsx").unwrap()
    }

    #[test]
    fn nothing_checked_prompts() {
        let state = SelectorState::new(Region::Kisii);
        assert_eq!(state.outcome(&catalog()), SelectionOutcome::Prompt(PROMPT_MESSAGE));
    }

    #[test]
    fn two_checked_blocks() {
        let mut state = SelectorState::new(Region::Kisii);
        state.set_checked("Floor", true);
        state.set_checked("Roof", true);
        assert_eq!(
            state.outcome(&catalog()),
            SelectionOutcome::Blocked(MULTIPLE_SELECTION_MESSAGE)
        );

        state.set_checked("Roof", false);
        assert!(matches!(state.outcome(&catalog()), SelectionOutcome::Ready { .. }));
    }

    #[test]
    fn ready_offers_arity_valid_charts() {
        let catalog = catalog();
        let mut state = SelectorState::new(Region::Kisii);

        state.set_checked("Orphans", true);
        let SelectionOutcome::Ready { entry, available } = state.outcome(&catalog) else {
            panic!("expected a ready selection");
        };
        assert_eq!(entry.label, "Orphans");
        assert_eq!(
            available,
            vec![ChartKind::DistrictBarPercentage, ChartKind::LocationBarStacked]
        );

        state.set_checked("Orphans", false);
        state.set_checked("Declined Consent", true);
        let SelectionOutcome::Ready { available, .. } = state.outcome(&catalog) else {
            panic!("expected a ready selection");
        };
        assert_eq!(available.len(), 4);
        assert!(available.contains(&ChartKind::Pie));
    }

    #[test]
    fn toggles_follow_available_order() {
        let catalog = catalog();
        let floor = catalog.resolve("Floor").unwrap();
        let mut state = SelectorState::new(Region::Kisii);
        state.set_checked("Floor", true);
        state.set_toggled("Floor", ChartKind::ValuesBarPaired, true);
        state.set_toggled("Floor", ChartKind::DistrictBarPercentage, true);
        state.set_toggled("Roof", ChartKind::LocationBarStacked, true);

        let charts = state.toggled_charts(floor, &floor.applicable_charts());
        assert_eq!(
            charts,
            vec![ChartKind::DistrictBarPercentage, ChartKind::ValuesBarPaired]
        );
    }

    #[test]
    fn summary_needs_no_toggle() {
        let catalog = catalog();
        let summary = catalog.resolve("Kisii County Summary").unwrap();
        let state = SelectorState::new(Region::Kisii);
        assert_eq!(
            state.toggled_charts(summary, &summary.applicable_charts()),
            vec![ChartKind::SummaryBar]
        );
    }

    #[test]
    fn region_change_clears_selection() {
        let mut state = SelectorState::new(Region::Kisii);
        state.set_checked("Floor", true);
        state.set_toggled("Floor", ChartKind::DistrictBarPercentage, true);

        assert!(!state.set_region(Region::Kisii));
        assert_eq!(state.checked_labels(), ["Floor".to_string()]);

        assert!(state.set_region(Region::Lamu));
        assert!(state.checked_labels().is_empty());
        assert!(!state.is_toggled("Floor", ChartKind::DistrictBarPercentage));
        assert_eq!(state.region(), Region::Lamu);
    }

    #[test]
    fn checking_twice_keeps_one_entry() {
        let mut state = SelectorState::new(Region::Kisii);
        state.set_checked("Wall", true);
        state.set_checked("Wall", true);
        assert_eq!(state.checked_labels().len(), 1);
        assert!(state.is_checked("Wall"));
    }
}
