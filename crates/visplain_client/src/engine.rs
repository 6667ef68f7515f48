use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use visplain_core::{ImageId, RequestId, SummaryRequest, UploadRequest};
use visplain_logging::{visplain_debug, visplain_info, visplain_warn};

use crate::client::{BackendClient, FetchedImage};
use crate::filename::deterministic_filename;
use crate::persist::AtomicFileWriter;
use crate::ticker::ProgressTicker;
use crate::EngineEvent;

/// The engine thread exited and no further events will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request engine stopped unexpectedly")]
pub struct EngineStopped;

/// Subdirectory of the output directory that holds downloaded images.
const IMAGE_SUBDIR: &str = "images";

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub progress_interval: Duration,
    /// Root directory for downloaded images.
    pub output_dir: PathBuf,
}

enum EngineCommand {
    SubmitGraph {
        request_id: RequestId,
        request: UploadRequest,
    },
    SubmitSummary {
        request_id: RequestId,
        request: SummaryRequest,
    },
    StartProgress {
        request_id: RequestId,
    },
    StopProgress {
        request_id: RequestId,
    },
    LoadImage {
        image_id: ImageId,
        url: String,
    },
}

/// Runs backend calls and progress timers on a dedicated tokio runtime.
///
/// Results come back as [`EngineEvent`]s. Dropping the handle shuts the
/// runtime down together with every timer it still owns.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    /// Fails only when the tokio runtime cannot be created.
    pub fn new(client: Arc<dyn BackendClient>, settings: EngineSettings) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            let images = Arc::new(AtomicFileWriter::new(settings.output_dir.join(IMAGE_SUBDIR)));
            let mut tickers: HashMap<RequestId, ProgressTicker> = HashMap::new();

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartProgress { request_id } => {
                        let tx = event_tx.clone();
                        let ticker = ProgressTicker::spawn(
                            runtime.handle(),
                            settings.progress_interval,
                            move || tx.send(EngineEvent::ProgressTick { request_id }).is_ok(),
                        );
                        tickers.insert(request_id, ticker);
                    }
                    EngineCommand::StopProgress { request_id } => {
                        if tickers.remove(&request_id).is_some() {
                            visplain_debug!("Progress timer for request {} released", request_id);
                        }
                    }
                    command => {
                        let client = client.clone();
                        let images = images.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            handle_command(client.as_ref(), &images, command, event_tx).await;
                        });
                    }
                }
            }
            visplain_debug!("Engine command channel closed; {} timers dropped", tickers.len());
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit_graph(&self, request_id: RequestId, request: UploadRequest) {
        self.send(EngineCommand::SubmitGraph {
            request_id,
            request,
        });
    }

    pub fn submit_summary(&self, request_id: RequestId, request: SummaryRequest) {
        self.send(EngineCommand::SubmitSummary {
            request_id,
            request,
        });
    }

    pub fn start_progress(&self, request_id: RequestId) {
        self.send(EngineCommand::StartProgress { request_id });
    }

    pub fn stop_progress(&self, request_id: RequestId) {
        self.send(EngineCommand::StopProgress { request_id });
    }

    pub fn load_image(&self, image_id: ImageId, url: impl Into<String>) {
        self.send(EngineCommand::LoadImage {
            image_id,
            url: url.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means nothing
    /// arrived in time; an error means the engine thread is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            visplain_warn!("Engine is not running; command dropped");
        }
    }
}

async fn handle_command(
    client: &dyn BackendClient,
    images: &AtomicFileWriter,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::SubmitGraph {
            request_id,
            request,
        } => EngineEvent::GraphCompleted {
            request_id,
            result: client.request_graph(&request).await,
        },
        EngineCommand::SubmitSummary {
            request_id,
            request,
        } => EngineEvent::SummaryCompleted {
            request_id,
            result: client.request_summary(&request).await,
        },
        EngineCommand::LoadImage { image_id, url } => {
            match client.fetch_image(&url).await {
                Ok(image) => match store_image(images, &url, &image) {
                    Ok(stored_as) => {
                        visplain_info!("Image {} stored as {}", url, stored_as);
                        EngineEvent::ImageStored {
                            image_id,
                            stored_as,
                        }
                    }
                    Err(reason) => EngineEvent::ImageFailed { image_id, reason },
                },
                Err(err) => {
                    visplain_warn!("Image {} failed to load: {}", url, err);
                    EngineEvent::ImageFailed {
                        image_id,
                        reason: err.to_string(),
                    }
                }
            }
        }
        EngineCommand::StartProgress { .. } | EngineCommand::StopProgress { .. } => return,
    };
    let _ = event_tx.send(event);
}

fn store_image(
    images: &AtomicFileWriter,
    url: &str,
    image: &FetchedImage,
) -> Result<String, String> {
    let path_segment = url
        .split(['?', '#'])
        .next()
        .and_then(|path| path.rsplit('/').next())
        .unwrap_or_default();
    let (stem, url_extension) = match path_segment.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (path_segment, None),
    };
    let extension = image
        .content_type
        .as_deref()
        .and_then(extension_for_content_type)
        .or(url_extension)
        .unwrap_or("img");

    let filename = deterministic_filename(stem, url, extension);
    images
        .write(&filename, &image.bytes)
        .map_err(|err| err.to_string())?;
    Ok(format!("{IMAGE_SUBDIR}/{filename}"))
}

fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next()?.trim();
    match mime.to_ascii_lowercase().as_str() {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::{extension_for_content_type, EngineHandle, EngineStopped};

    #[test]
    fn closed_event_channel_is_reported() {
        let (cmd_tx, _cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let engine = EngineHandle { cmd_tx, event_rx };
        assert!(matches!(
            engine.recv_timeout(Duration::from_millis(1)),
            Ok(None)
        ));

        drop(event_tx);
        assert_eq!(
            engine.recv_timeout(Duration::from_secs(5)).map(|event| event.is_some()),
            Err(EngineStopped)
        );
    }

    #[test]
    fn maps_common_image_types() {
        assert_eq!(extension_for_content_type("image/png"), Some("png"));
        assert_eq!(extension_for_content_type("IMAGE/JPEG; q=1"), Some("jpg"));
        assert_eq!(extension_for_content_type("text/html"), None);
    }
}
