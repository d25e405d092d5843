//! TPQA Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::catalog::{Catalog, Region};
use crate::charts::{render_pass, ChartKind, ChartOutcome, ChartPlotter, ChartRenderer};
use crate::config::AppConfig;
use crate::data::DataLoader;
use crate::export::Exporter;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, ViewerAction};
use crate::selector::{Page, SelectionOutcome, SelectorState};
use egui::{RichText, SidePanel};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

/// Render pass result from background thread, tagged with the pass generation
enum RenderResult {
    Progress(u64, f32, String),
    Complete {
        generation: u64,
        outcomes: Vec<ChartOutcome>,
    },
    Error(u64, String),
}

/// Selection a render pass was started for.
#[derive(Debug, Clone, PartialEq)]
struct PassKey {
    region: Region,
    label: String,
    charts: Vec<ChartKind>,
}

/// Main application window.
pub struct DashboardApp {
    config: AppConfig,
    loader: Arc<DataLoader>,
    renderer: Arc<ChartRenderer<ChartPlotter>>,
    catalogs: HashMap<Region, Arc<Catalog>>,
    selector: SelectorState,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async rendering
    render_rx: Option<Receiver<RenderResult>>,
    is_rendering: bool,
    generation: u64,
    current: Option<PassKey>,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        catalogs: HashMap<Region, Arc<Catalog>>,
        plotter: ChartPlotter,
    ) -> Self {
        Self {
            selector: SelectorState::new(config.default_region),
            config,
            loader: Arc::new(DataLoader::new()),
            renderer: Arc::new(ChartRenderer::new(plotter)),
            catalogs,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            render_rx: None,
            is_rendering: false,
            generation: 0,
            current: None,
        }
    }

    /// Bring the chart area in line with the current selection.
    fn sync_selection(&mut self) {
        let Some(catalog) = self.catalogs.get(&self.selector.region()).cloned() else {
            return;
        };

        match self.selector.outcome(&catalog) {
            SelectionOutcome::Prompt(message) => {
                self.cancel_pass();
                self.chart_viewer.set_info(message);
            }
            SelectionOutcome::Blocked(message) => {
                self.cancel_pass();
                self.chart_viewer.set_error(message);
            }
            SelectionOutcome::Ready { entry, available } => {
                let charts = self.selector.toggled_charts(entry, &available);
                if charts.is_empty() {
                    self.cancel_pass();
                    self.chart_viewer.clear();
                    return;
                }

                let key = PassKey {
                    region: catalog.region(),
                    label: entry.label.clone(),
                    charts,
                };
                if self.current.as_ref() != Some(&key) {
                    self.start_render(Arc::clone(&catalog), key);
                }
            }
        }
    }

    /// Drop the in-flight pass; its results will be ignored.
    fn cancel_pass(&mut self) {
        if self.current.take().is_some() {
            self.generation += 1;
            self.render_rx = None;
            self.is_rendering = false;
            self.control_panel.set_progress(0.0, "Ready");
        }
    }

    /// Start a render pass in background thread
    fn start_render(&mut self, catalog: Arc<Catalog>, key: PassKey) {
        self.generation += 1;
        let generation = self.generation;

        if let Ok(entry) = catalog.resolve(&key.label) {
            self.chart_viewer
                .set_pending(key.charts.iter().map(|k| (*k, k.title(entry))).collect());
        }

        let (tx, rx) = channel();
        self.render_rx = Some(rx);
        self.is_rendering = true;
        self.current = Some(key.clone());
        self.control_panel.set_progress(5.0, "Loading tables...");

        let loader = Arc::clone(&self.loader);
        let renderer = Arc::clone(&self.renderer);
        thread::spawn(move || {
            Self::run_render(tx, generation, catalog, loader, renderer, key);
        });
    }

    /// Run a render pass (called from background thread)
    fn run_render(
        tx: Sender<RenderResult>,
        generation: u64,
        catalog: Arc<Catalog>,
        loader: Arc<DataLoader>,
        renderer: Arc<ChartRenderer<ChartPlotter>>,
        key: PassKey,
    ) {
        let entry = match catalog.resolve(&key.label) {
            Ok(entry) => entry,
            Err(e) => {
                let _ = tx.send(RenderResult::Error(generation, e.to_string()));
                return;
            }
        };

        let _ = tx.send(RenderResult::Progress(
            generation,
            30.0,
            format!("Rendering {} charts...", key.charts.len()),
        ));

        let outcomes = render_pass(&catalog, &loader, entry, &key.charts, &renderer);
        let _ = tx.send(RenderResult::Complete {
            generation,
            outcomes,
        });
    }

    /// Check for render results
    fn check_render_results(&mut self) {
        // Take the receiver temporarily to avoid borrow issues
        let rx = self.render_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    RenderResult::Progress(generation, progress, status) => {
                        if generation == self.generation {
                            self.control_panel.set_progress(progress, &status);
                        }
                    }
                    RenderResult::Complete {
                        generation,
                        outcomes,
                    } => {
                        if generation != self.generation {
                            continue;
                        }
                        let total = outcomes.len();
                        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
                        self.chart_viewer.set_outcomes(outcomes);
                        let status = if failed == 0 {
                            format!("Complete! {} charts ready", total)
                        } else {
                            format!("Complete: {} of {} charts failed", failed, total)
                        };
                        self.control_panel.set_progress(100.0, &status);
                        self.is_rendering = false;
                        should_keep_receiver = false;
                    }
                    RenderResult::Error(generation, message) => {
                        if generation != self.generation {
                            continue;
                        }
                        self.chart_viewer.set_error(&message);
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", message));
                        self.is_rendering = false;
                        should_keep_receiver = false;
                    }
                }
            }

            // Put receiver back if still needed
            if should_keep_receiver {
                self.render_rx = Some(rx);
            }
        }
        self.control_panel.cached_tables = self.loader.cached_paths().len();
    }

    /// Encode a chart and save it where the user chooses.
    fn handle_download(&mut self, index: usize) {
        let Some(artifact) = self.chart_viewer.artifact(index) else {
            return;
        };

        let download = match Exporter::to_downloadable(artifact) {
            Ok(download) => download,
            Err(e) => {
                error!("{}", e);
                self.control_panel.set_progress(0.0, &format!("Error: {}", e));
                return;
            }
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(&download.file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        match Exporter::save(&download, &path) {
            Ok(()) => {
                self.control_panel
                    .set_progress(100.0, &format!("Complete! Saved {}", download.file_name));
                self.chart_viewer.mark_saved(index, path);
            }
            Err(e) => {
                error!("{}", e);
                self.control_panel.set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    fn handle_reload(&mut self) {
        info!("clearing {} cached tables", self.loader.cached_paths().len());
        self.loader.clear();
        // Force the next sync to render again.
        self.current = None;
        self.generation += 1;
        self.render_rx = None;
        self.is_rendering = false;
    }

    fn show_about(&self, ui: &mut egui::Ui) {
        ui.add_space(10.0);
        ui.label(RichText::new("About This Project").size(26.0).strong());
        ui.add_space(10.0);
        ui.label(RichText::new(&self.config.about_text).size(15.0));
        ui.add_space(15.0);
        ui.label(
            RichText::new(format!(
                "{} COUNTY TPQA ANALYSIS REPORT",
                self.selector.region().display_name().to_uppercase()
            ))
            .size(16.0)
            .strong(),
        );
        ui.add_space(8.0);
        ui.label("• Visualize the data with interactive plots.");
        ui.label("• Analyze descriptive statistics.");
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_render_results();

        // Request repaint while rendering
        if self.is_rendering {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(320.0)
            .max_width(420.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let catalogs = &self.catalogs;
                    let action = self.control_panel.show(ui, &mut self.selector, |region| {
                        catalogs.get(&region).map(|c| c.as_ref())
                    });

                    match action {
                        ControlPanelAction::RegionChanged => {
                            info!("county changed to {}", self.selector.region());
                        }
                        ControlPanelAction::Reload => self.handle_reload(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        if self.selector.page() == Page::Visualization {
            self.sync_selection();
        }

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.selector.page() == Page::About {
                self.show_about(ui);
                return;
            }

            match self.chart_viewer.show(ctx, ui) {
                ViewerAction::Download(index) => self.handle_download(index),
                ViewerAction::Open(path) => {
                    if let Err(e) = open::that(&path) {
                        error!("failed to open {}: {}", path.display(), e);
                        self.control_panel
                            .set_progress(0.0, &format!("Error: could not open {}", path.display()));
                    }
                }
                ViewerAction::None => {}
            }
        });
    }
}
