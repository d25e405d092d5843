//! Control Panel Widget
//! Left side panel with county, page, dataset and chart selection.

use crate::catalog::{Catalog, DatasetKind, Region};
use crate::selector::{Page, SelectionOutcome, SelectorState};
use egui::{Color32, ComboBox, RichText};

/// Left side control panel driving the selector state.
pub struct ControlPanel {
    pub progress: f32,
    pub status: String,
    pub cached_tables: usize,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            progress: 0.0,
            status: "Ready".to_string(),
            cached_tables: 0,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the control panel
    ///
    /// `catalog_for` looks up the catalog of a county, so the dataset list
    /// follows a region change made in the same frame.
    pub fn show<'c>(
        &mut self,
        ui: &mut egui::Ui,
        selector: &mut SelectorState,
        catalog_for: impl Fn(Region) -> Option<&'c Catalog>,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 TPQA Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(243, 110, 44)),
            );
            ui.label(
                RichText::new("Household Registration Quality Assurance")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== County Section =====
        ui.label(RichText::new("🗺 County").size(14.0).strong());
        ui.add_space(5.0);

        let mut region = selector.region();
        ComboBox::from_id_salt("county")
            .width(220.0)
            .selected_text(region.display_name())
            .show_ui(ui, |ui| {
                for r in Region::ALL {
                    ui.selectable_value(&mut region, r, r.display_name());
                }
            });
        if selector.set_region(region) {
            action = ControlPanelAction::RegionChanged;
        }
        if let Some(catalog) = catalog_for(selector.region()) {
            ui.label(
                RichText::new(format!("📂 {}", catalog.data_dir().display()))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Page Section =====
        ui.label(RichText::new("⚙️ Page").size(14.0).strong());
        ui.add_space(5.0);

        let mut page = selector.page();
        ui.horizontal(|ui| {
            ui.radio_value(&mut page, Page::About, "About");
            ui.radio_value(&mut page, Page::Visualization, "Visualization");
        });
        selector.set_page(page);

        if page == Page::Visualization {
            if let Some(catalog) = catalog_for(selector.region()) {
                ui.add_space(15.0);
                ui.separator();
                ui.add_space(10.0);
                Self::show_datasets(ui, selector, catalog);
                Self::show_chart_toggles(ui, selector, catalog);
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("🔄 Reload Data").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Reload;
            }
            ui.label(
                RichText::new(format!("{} tables cached", self.cached_tables))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") || self.status.contains("failed") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Dataset checkboxes in two columns.
    fn show_datasets(ui: &mut egui::Ui, selector: &mut SelectorState, catalog: &Catalog) {
        ui.label(RichText::new("📁 Select a variable").size(14.0).strong());
        ui.add_space(5.0);

        let labels = catalog.labels();
        let half = labels.len().div_ceil(2);
        ui.columns(2, |columns| {
            for (i, label) in labels.iter().enumerate() {
                let ui = &mut columns[i / half.max(1)];
                let mut checked = selector.is_checked(label);
                if ui.checkbox(&mut checked, *label).changed() {
                    selector.set_checked(label, checked);
                }
            }
        });
    }

    fn show_chart_toggles(ui: &mut egui::Ui, selector: &mut SelectorState, catalog: &Catalog) {
        let SelectionOutcome::Ready { entry, available } = selector.outcome(catalog) else {
            return;
        };
        // The summary chart is shown without a toggle.
        if entry.kind == DatasetKind::Summary {
            return;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);
        ui.label(RichText::new("📈 Charts").size(14.0).strong());
        ui.add_space(5.0);

        for kind in available {
            let mut on = selector.is_toggled(&entry.label, kind);
            if ui.checkbox(&mut on, kind.toggle_label(entry)).changed() {
                selector.set_toggled(&entry.label, kind, on);
            }
        }
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    RegionChanged,
    Reload,
}
