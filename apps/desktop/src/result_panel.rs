//! Rendering of the analysis verdict: panel variant, per-face lines, and
//! the clickable preview image.

use egui::{Color32, RichText, Stroke};
use predict_client::{AnalysisResult, FaceVerdict};

/// Visual variant of the result panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    NoFace,
    Deepfake,
    Authentic,
}

impl Verdict {
    pub fn title(self) -> &'static str {
        match self {
            Verdict::NoFace => "Aucun visage détecté",
            Verdict::Deepfake => "Deepfake détecté",
            Verdict::Authentic => "Contenu authentique",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Verdict::NoFace => "⚠",
            Verdict::Deepfake => "❌",
            Verdict::Authentic => "✔",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            Verdict::NoFace => Color32::from_rgb(0xd9, 0x9a, 0x1f),
            Verdict::Deepfake => Color32::from_rgb(0xcc, 0x33, 0x33),
            Verdict::Authentic => Color32::from_rgb(0x2e, 0x8b, 0x3a),
        }
    }
}

/// One face is enough to flag the whole upload.
pub fn classify(result: &AnalysisResult) -> Verdict {
    match result {
        AnalysisResult::NoFace { .. } => Verdict::NoFace,
        AnalysisResult::Faces { .. } if result.has_deepfake() => Verdict::Deepfake,
        AnalysisResult::Faces { .. } => Verdict::Authentic,
    }
}

/// Display line for one face, 1-indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLine {
    pub index: usize,
    pub label: &'static str,
    pub flagged: bool,
    /// Confidence as a percentage with one decimal, e.g. `93.0`.
    pub confidence_pct: String,
}

pub fn face_lines(faces: &[FaceVerdict]) -> Vec<FaceLine> {
    faces
        .iter()
        .enumerate()
        .map(|(i, face)| FaceLine {
            index: i + 1,
            label: if face.is_deepfake { "Deepfake" } else { "Réel" },
            flagged: face.is_deepfake,
            confidence_pct: format!("{:.1}", f64::from(face.confidence) * 100.0),
        })
        .collect()
}

/// Draw the result panel. Returns true when the preview image was clicked,
/// so the caller can open the modal viewer.
pub fn show(
    ui: &mut egui::Ui,
    result: &AnalysisResult,
    preview: Option<&egui::TextureHandle>,
) -> bool {
    let verdict = classify(result);
    let mut preview_clicked = false;

    egui::Frame::none()
        .stroke(Stroke::new(1.0, verdict.color()))
        .rounding(10.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(format!("{} {}", verdict.icon(), verdict.title()))
                        .color(verdict.color())
                        .heading(),
                );
            });
            ui.add_space(8.0);

            match result {
                AnalysisResult::NoFace { .. } => {
                    ui.label("Aucun visage n'a été détecté dans cette image.");
                }
                AnalysisResult::Faces { faces, .. } => {
                    ui.label("Analyse visage par visage :");
                    ui.add_space(4.0);
                    for line in face_lines(faces) {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(format!("👤 Visage {} :", line.index));
                            let color = if line.flagged {
                                Color32::RED
                            } else {
                                Color32::from_rgb(0x2e, 0x8b, 0x3a)
                            };
                            ui.label(RichText::new(line.label).color(color));
                            ui.label(format!("– Confiance : {}%", line.confidence_pct));
                        });
                    }
                }
            }

            if let Some(tex) = preview {
                ui.add_space(12.0);
                let max_width = ui.available_width();
                let response = ui
                    .add(
                        egui::Image::new(tex)
                            .max_width(max_width)
                            .rounding(10.0)
                            .sense(egui::Sense::click()),
                    )
                    .on_hover_cursor(egui::CursorIcon::PointingHand);
                if response.clicked() {
                    preview_clicked = true;
                }
            }
        });

    preview_clicked
}
