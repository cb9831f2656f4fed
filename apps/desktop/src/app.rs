use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use egui::{Color32, RichText, Stroke};
use predict_client::AnalysisResult;
use tracing::{info, warn};

use crate::analyze::{spawn_analyze, AnalyzeEvent};
use crate::controller::{SelectedFile, UploadController};
use crate::{file_info, result_panel, texture};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Outcome of the last completed analysis. Replaced wholesale by the next.
struct Analysis {
    result: AnalysisResult,
    /// Preview bytes waiting to be decoded into a texture; taken on the
    /// first render so a failed decode is not retried every frame.
    preview: Option<Vec<u8>>,
    /// Per-analysis tag, kept in the texture name so a same-named preview
    /// from an earlier run is never shown for a newer one.
    sequence: u64,
}

pub struct App {
    controller: UploadController,
    base_url: String,
    analysis: Option<Analysis>,
    /// Generation of the most recent analyze request; events tagged with
    /// an older generation are superseded and dropped.
    request_seq: u64,
    preview_texture: Option<egui::TextureHandle>,
    modal_open: bool,
    error_message: Option<String>,
    events_tx: Sender<AnalyzeEvent>,
    events_rx: Receiver<AnalyzeEvent>,
}

impl App {
    pub fn new() -> Self {
        let (events_tx, events_rx) = unbounded();
        let base_url =
            std::env::var("PREDICT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self {
            controller: UploadController::new(),
            base_url,
            analysis: None,
            request_seq: 0,
            preview_texture: None,
            modal_open: false,
            error_message: None,
            events_tx,
            events_rx,
        }
    }

    fn select_path(&mut self, path: &std::path::Path) {
        let file = SelectedFile::from_path(path);
        info!("selected {} ({} B, {})", file.name, file.size_bytes, file.media_type);
        self.controller.select_file(file);
        self.analysis = None;
        self.preview_texture = None;
        self.modal_open = false;
    }

    fn handle_file_drops(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // Only the first dropped file counts; extras are silently ignored.
        if let Some(path) = dropped.into_iter().filter_map(|f| f.path).next() {
            self.select_path(&path);
        }
    }

    fn start_analyze(&mut self) {
        if !self.controller.begin_analyze() {
            return;
        }
        let Some(file) = self.controller.selected().cloned() else {
            return;
        };
        self.analysis = None;
        self.preview_texture = None;
        self.request_seq += 1;
        spawn_analyze(
            self.events_tx.clone(),
            self.request_seq,
            self.base_url.clone(),
            file,
        );
    }

    fn poll_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            if event.request() != self.request_seq {
                continue;
            }
            match event {
                AnalyzeEvent::Finished {
                    request,
                    result,
                    preview,
                } => {
                    self.analysis = Some(Analysis {
                        result,
                        preview,
                        sequence: request,
                    });
                    self.preview_texture = None;
                    self.controller.finish_analyze();
                }
                AnalyzeEvent::Failed { message, .. } => {
                    self.controller.fail_analyze();
                    self.error_message = Some(message);
                }
            }
        }
    }

    fn ensure_preview_texture(&mut self, ctx: &egui::Context) {
        if self.preview_texture.is_some() {
            return;
        }
        let Some(analysis) = &mut self.analysis else {
            return;
        };
        let Some(bytes) = analysis.preview.take() else {
            return;
        };
        let name = format!("analysis_preview_{}", analysis.sequence);
        match texture::texture_from_bytes(ctx, &name, &bytes) {
            Ok(tex) => self.preview_texture = Some(tex),
            Err(err) => warn!("preview decode failed: {err}"),
        }
    }

    fn show_drop_zone(&mut self, ui: &mut egui::Ui) {
        let drag_active = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let stroke = if drag_active {
            Stroke::new(2.0, ui.visuals().selection.bg_fill)
        } else {
            Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
        };

        let response = egui::Frame::none()
            .stroke(stroke)
            .rounding(12.0)
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.set_min_height(150.0);
                ui.vertical_centered(|ui| {
                    if let Some(file) = self.controller.selected() {
                        ui.label(RichText::new(file_info::file_icon(&file.media_type)).size(40.0));
                        ui.label(RichText::new(&file.name).strong());
                        ui.label(file_info::format_size(file.size_bytes));
                    } else {
                        ui.label(RichText::new("📤").size(40.0));
                        ui.label("Glissez-déposez une image ou une vidéo");
                        ui.label(RichText::new("ou cliquez pour parcourir").weak());
                    }
                });
            })
            .response;

        let response = response
            .interact(egui::Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand);
        if response.clicked() {
            if let Some(path) = rfd::FileDialog::new().pick_file() {
                self.select_path(&path);
            }
        }
    }

    fn show_error_dialog(&mut self, ctx: &egui::Context) {
        let Some(message) = self.error_message.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Erreur")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Erreur lors de l’analyse.");
                ui.label(RichText::new(message).weak());
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.error_message = None;
            self.controller.dismiss_error();
        }
    }

    fn show_modal(&mut self, ctx: &egui::Context) {
        if !self.modal_open {
            return;
        }
        let Some(tex) = self.preview_texture.clone() else {
            self.modal_open = false;
            return;
        };

        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("preview_modal"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                // Backdrop claims the whole screen; a click outside the
                // image closes the viewer.
                let backdrop = ui.allocate_rect(screen, egui::Sense::click());
                ui.painter()
                    .rect_filled(screen, 0.0, Color32::from_black_alpha(200));

                let tex_size = tex.size_vec2();
                let avail = screen.size() * 0.9;
                let scale = (avail.x / tex_size.x).min(avail.y / tex_size.y).min(1.0);
                let size = tex_size * scale;
                let image_rect = egui::Rect::from_center_size(screen.center(), size);
                let image_response = ui.put(
                    image_rect,
                    egui::Image::new(&tex)
                        .fit_to_exact_size(size)
                        .sense(egui::Sense::click()),
                );

                let close_rect = egui::Rect::from_min_size(
                    egui::pos2(screen.right() - 44.0, screen.top() + 8.0),
                    egui::vec2(32.0, 32.0),
                );
                let close_response =
                    ui.put(close_rect, egui::Button::new(RichText::new("✕").size(18.0)));

                if close_response.clicked() || (backdrop.clicked() && !image_response.clicked()) {
                    self.modal_open = false;
                }
            });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();
        self.handle_file_drops(ctx);
        if self.controller.result_visible() {
            self.ensure_preview_texture(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                ui.heading("Détecteur de deepfakes");
            });
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("Serveur :");
                ui.text_edit_singleline(&mut self.base_url);
            });
            ui.add_space(12.0);

            self.show_drop_zone(ui);
            ui.add_space(12.0);

            if self.controller.analyze_visible() {
                ui.vertical_centered(|ui| {
                    if ui.button(RichText::new("Analyser").strong()).clicked() {
                        self.start_analyze();
                    }
                });
            }
            if self.controller.loading_visible() {
                ui.vertical_centered(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label("Analyse en cours…");
                });
            }

            if self.controller.result_visible() {
                if let Some(analysis) = &self.analysis {
                    ui.add_space(8.0);
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        if result_panel::show(ui, &analysis.result, self.preview_texture.as_ref())
                        {
                            self.modal_open = true;
                        }
                    });
                }
            }
        });

        self.show_error_dialog(ctx);
        self.show_modal(ctx);

        // A worker may finish while no input arrives; keep polling while a
        // request is outstanding.
        if self.controller.loading_visible() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
