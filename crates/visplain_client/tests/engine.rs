use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use visplain_client::{
    BackendClient, ClientError, EngineEvent, EngineHandle, EngineSettings, FetchedImage,
};
use visplain_core::{
    GraphResult, RepoRef, SummaryRequest, SummaryResult, UploadRequest,
};

/// Backend double that answers after a fixed delay and records what it saw.
struct FakeBackend {
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl BackendClient for FakeBackend {
    async fn request_graph(&self, request: &UploadRequest) -> Result<GraphResult, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("graph:{}", request.upload_option()));
        tokio::time::sleep(self.delay).await;
        Ok(GraphResult {
            visualization_path: "/static/generated_graph.png".into(),
            description: None,
        })
    }

    async fn request_summary(
        &self,
        request: &SummaryRequest,
    ) -> Result<SummaryResult, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("summary:{}", request.repo.name()));
        tokio::time::sleep(self.delay).await;
        Ok(SummaryResult::default())
    }

    async fn fetch_image(&self, url: &str) -> Result<FetchedImage, ClientError> {
        self.calls.lock().unwrap().push(format!("image:{url}"));
        if url.ends_with("missing.png") {
            return Err(ClientError {
                kind: visplain_client::FailureKind::HttpStatus(404),
                message: "404 Not Found".into(),
            });
        }
        Ok(FetchedImage {
            bytes: vec![137, 80, 78, 71],
            content_type: Some("image/png".into()),
        })
    }
}

fn engine(backend: Arc<FakeBackend>, output: &TempDir) -> EngineHandle {
    EngineHandle::new(
        backend,
        EngineSettings {
            progress_interval: Duration::from_millis(10),
            output_dir: output.path().to_path_buf(),
        },
    )
    .unwrap()
}

fn collect_until<F>(engine: &EngineHandle, deadline: Duration, mut done: F) -> Vec<EngineEvent>
where
    F: FnMut(&EngineEvent) -> bool,
{
    let start = Instant::now();
    let mut events = Vec::new();
    while start.elapsed() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(10)).unwrap() {
            let finished = done(&event);
            events.push(event);
            if finished {
                break;
            }
        }
    }
    events
}

#[test]
fn graph_request_ticks_until_answered() {
    let output = TempDir::new().unwrap();
    let backend = FakeBackend::new(Duration::from_millis(80));
    let engine = engine(backend.clone(), &output);

    engine.start_progress(1);
    engine.submit_graph(1, UploadRequest::Repo(RepoRef::new("octo", "repo").unwrap()));

    let events = collect_until(&engine, Duration::from_secs(5), |event| {
        matches!(event, EngineEvent::GraphCompleted { .. })
    });
    let ticks = events
        .iter()
        .filter(|event| matches!(event, EngineEvent::ProgressTick { request_id: 1 }))
        .count();
    assert!(ticks >= 2, "expected ticks while waiting, got {ticks}");
    assert!(matches!(
        events.last(),
        Some(EngineEvent::GraphCompleted {
            request_id: 1,
            result: Ok(_)
        })
    ));
    assert_eq!(*backend.calls.lock().unwrap(), vec!["graph:repo".to_string()]);
}

#[test]
fn stopped_timer_sends_no_more_ticks() {
    let output = TempDir::new().unwrap();
    let engine = engine(FakeBackend::new(Duration::ZERO), &output);

    engine.start_progress(4);
    let first = collect_until(&engine, Duration::from_secs(5), |event| {
        matches!(event, EngineEvent::ProgressTick { request_id: 4 })
    });
    assert!(!first.is_empty());

    engine.stop_progress(4);
    // Drain anything that was already in the channel.
    std::thread::sleep(Duration::from_millis(50));
    while engine.try_recv().is_some() {}

    std::thread::sleep(Duration::from_millis(80));
    assert!(engine.try_recv().is_none());
}

#[test]
fn images_are_stored_or_reported_failed() {
    let output = TempDir::new().unwrap();
    let engine = engine(FakeBackend::new(Duration::ZERO), &output);

    engine.load_image(1, "http://backend.test/static/p.png");
    engine.load_image(2, "http://backend.test/static/missing.png");

    let mut stored = None;
    let mut failed = false;
    let _ = collect_until(&engine, Duration::from_secs(5), |event| {
        match event {
            EngineEvent::ImageStored {
                image_id: 1,
                stored_as,
            } => stored = Some(stored_as.clone()),
            EngineEvent::ImageFailed { image_id: 2, .. } => failed = true,
            _ => {}
        }
        stored.is_some() && failed
    });

    let stored = stored.expect("image 1 stored");
    assert!(stored.starts_with("images/p--"));
    assert!(stored.ends_with(".png"));
    let bytes = std::fs::read(output.path().join(&stored)).unwrap();
    assert_eq!(bytes, vec![137, 80, 78, 71]);
    assert!(failed);
}
