//! Chart Viewer Widget
//! Right side scrollable panel showing one card per toggled chart.

use crate::charts::{ChartArtifact, ChartKind, ChartOutcome};
use egui::{Color32, RichText, ScrollArea, TextureHandle, TextureOptions};
use std::path::PathBuf;

const CHART_SPACING: f32 = 15.0;
const CARD_MAX_WIDTH: f32 = 1100.0;

enum CardState {
    Pending,
    Ready {
        artifact: ChartArtifact,
        texture: Option<TextureHandle>,
        saved_to: Option<PathBuf>,
    },
    Failed(String),
}

struct ChartCard {
    kind: ChartKind,
    title: String,
    state: CardState,
}

/// Message shown instead of charts.
enum Notice {
    Info(String),
    Error(String),
}

/// Actions triggered from a chart card
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerAction {
    None,
    Download(usize),
    Open(PathBuf),
}

#[derive(Default)]
pub struct ChartViewer {
    cards: Vec<ChartCard>,
    notice: Option<Notice>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.notice = None;
    }

    pub fn set_info(&mut self, message: &str) {
        self.cards.clear();
        self.notice = Some(Notice::Info(message.to_string()));
    }

    pub fn set_error(&mut self, message: &str) {
        self.cards.clear();
        self.notice = Some(Notice::Error(message.to_string()));
    }

    /// Placeholder cards while a render pass runs.
    pub fn set_pending(&mut self, charts: Vec<(ChartKind, String)>) {
        self.notice = None;
        self.cards = charts
            .into_iter()
            .map(|(kind, title)| ChartCard {
                kind,
                title,
                state: CardState::Pending,
            })
            .collect();
    }

    pub fn set_outcomes(&mut self, outcomes: Vec<ChartOutcome>) {
        self.notice = None;
        self.cards = outcomes
            .into_iter()
            .map(|outcome| ChartCard {
                kind: outcome.kind,
                title: outcome.title,
                state: match outcome.result {
                    Ok(artifact) => CardState::Ready {
                        artifact,
                        texture: None,
                        saved_to: None,
                    },
                    Err(e) => CardState::Failed(e.to_string()),
                },
            })
            .collect();
    }

    pub fn artifact(&self, index: usize) -> Option<&ChartArtifact> {
        match self.cards.get(index).map(|c| &c.state) {
            Some(CardState::Ready { artifact, .. }) => Some(artifact),
            _ => None,
        }
    }

    pub fn mark_saved(&mut self, index: usize, path: PathBuf) {
        if let Some(CardState::Ready { saved_to, .. }) = self.cards.get_mut(index).map(|c| &mut c.state) {
            *saved_to = Some(path);
        }
    }

    /// Draw the chart viewer
    pub fn show(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) -> ViewerAction {
        let mut action = ViewerAction::None;

        match &self.notice {
            Some(Notice::Info(message)) => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new(message).size(18.0));
                });
                return action;
            }
            Some(Notice::Error(message)) => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(format!("⚠ {}", message))
                            .size(18.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                });
                return action;
            }
            None => {}
        }

        if self.cards.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("Tick a chart type to display it").size(18.0));
            });
            return action;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let card_width = ui.available_width().min(CARD_MAX_WIDTH) - 30.0;
                for (index, card) in self.cards.iter_mut().enumerate() {
                    if let Some(a) = Self::draw_card(ctx, ui, index, card, card_width) {
                        action = a;
                    }
                    ui.add_space(CHART_SPACING);
                }
            });

        action
    }

    fn draw_card(
        ctx: &egui::Context,
        ui: &mut egui::Ui,
        index: usize,
        card: &mut ChartCard,
        card_width: f32,
    ) -> Option<ViewerAction> {
        let mut action = None;
        let border_color = match card.state {
            CardState::Failed(_) => Color32::from_rgb(220, 53, 69),
            _ => Color32::from_rgb(1, 137, 92),
        };

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, border_color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(card_width);
                ui.label(
                    RichText::new(&card.title)
                        .size(18.0)
                        .strong()
                        .color(border_color),
                );
                ui.add_space(8.0);

                match &mut card.state {
                    CardState::Pending => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(format!("Rendering {}...", card.kind));
                        });
                    }
                    CardState::Failed(message) => {
                        ui.label(
                            RichText::new(message.as_str())
                                .size(14.0)
                                .color(Color32::from_rgb(220, 53, 69)),
                        );
                    }
                    CardState::Ready {
                        artifact,
                        texture,
                        saved_to,
                    } => {
                        let texture = texture.get_or_insert_with(|| {
                            let size = [artifact.width() as usize, artifact.height() as usize];
                            let image = egui::ColorImage::from_rgb(size, artifact.image.as_raw());
                            ctx.load_texture(&artifact.file_name, image, TextureOptions::LINEAR)
                        });
                        ui.add(
                            egui::Image::new(&*texture)
                                .max_width(card_width)
                                .maintain_aspect_ratio(true),
                        );

                        ui.add_space(8.0);
                        ui.horizontal(|ui| {
                            if ui.button("💾 Download Chart").clicked() {
                                action = Some(ViewerAction::Download(index));
                            }
                            if let Some(path) = saved_to {
                                if ui.button("📂 Open").clicked() {
                                    action = Some(ViewerAction::Open(path.clone()));
                                }
                                ui.label(
                                    RichText::new(format!("Saved to {}", path.display()))
                                        .size(11.0)
                                        .color(Color32::GRAY),
                                );
                            }
                        });
                    }
                }
            });

        action
    }
}
