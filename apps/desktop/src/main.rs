use tracing_subscriber::EnvFilter;

mod analyze;
mod app;
mod controller;
mod file_info;
mod result_panel;
mod texture;

use app::App;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([560.0, 760.0])
            .with_min_inner_size([420.0, 520.0]),
        ..eframe::NativeOptions::default()
    };
    let _ = eframe::run_native(
        "Détecteur de deepfakes",
        options,
        Box::new(move |_cc| Ok(Box::new(App::new()))),
    );
}
