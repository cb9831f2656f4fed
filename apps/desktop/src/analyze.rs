//! Background analysis worker: one thread per analyze action, reporting
//! back to the UI over a channel.

use crossbeam_channel::Sender;
use predict_client::{AnalysisResult, PredictClient};
use tracing::{error, warn};

use crate::controller::SelectedFile;

pub enum AnalyzeEvent {
    Finished {
        /// Generation tag of the request this outcome belongs to. The UI
        /// drops events from superseded requests.
        request: u64,
        result: AnalysisResult,
        /// Raw bytes of the rendered preview, when the fetch succeeded.
        preview: Option<Vec<u8>>,
    },
    Failed { request: u64, message: String },
}

impl AnalyzeEvent {
    pub fn request(&self) -> u64 {
        match self {
            AnalyzeEvent::Finished { request, .. } => *request,
            AnalyzeEvent::Failed { request, .. } => *request,
        }
    }
}

/// Upload the selected file and fetch the preview of the verdict image.
/// Every outcome is delivered as exactly one event; a dropped receiver
/// means the app is shutting down and the send result is ignored.
pub fn spawn_analyze(tx: Sender<AnalyzeEvent>, request: u64, base_url: String, file: SelectedFile) {
    std::thread::spawn(move || {
        let event = run_analyze(request, &base_url, &file);
        let _ = tx.send(event);
    });
}

fn run_analyze(request: u64, base_url: &str, file: &SelectedFile) -> AnalyzeEvent {
    let bytes = match std::fs::read(&file.path) {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("erreur de prédiction: cannot read {}: {err}", file.path.display());
            return AnalyzeEvent::Failed {
                request,
                message: format!("Lecture du fichier impossible : {err}"),
            };
        }
    };

    let client = PredictClient::new(base_url);
    let result = match client.predict(&file.name, &file.media_type, bytes) {
        Ok(result) => result,
        Err(err) => {
            error!("erreur de prédiction: {err}");
            return AnalyzeEvent::Failed {
                request,
                message: err.to_string(),
            };
        }
    };

    // The verdict is already in hand; a missing preview only degrades the
    // rendering, it does not fail the analysis.
    let preview = match client.fetch_preview(result.image_path()) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            warn!("preview fetch failed for {}: {err}", result.image_path());
            None
        }
    };

    AnalyzeEvent::Finished {
        request,
        result,
        preview,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn unreadable_file_yields_exactly_one_failure_event() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let file = SelectedFile {
            path: PathBuf::from("/nonexistent/definitely-missing.png"),
            name: "definitely-missing.png".to_string(),
            size_bytes: 0,
            media_type: "image/png".to_string(),
        };
        spawn_analyze(tx, 7, "http://127.0.0.1:1".to_string(), file);

        let event = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("worker should report");
        assert!(matches!(event, AnalyzeEvent::Failed { .. }));
        assert_eq!(event.request(), 7);
        assert!(rx.try_recv().is_err());
    }
}
