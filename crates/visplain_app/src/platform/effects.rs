use std::sync::Arc;
use std::time::Duration;

use visplain_client::{BackendClient, EngineEvent, EngineHandle, EngineSettings, EngineStopped};
use visplain_core::{Effect, Msg};
use visplain_logging::{visplain_info, visplain_warn};

/// Hands effects from `update` to the engine and turns engine events back
/// into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(client: Arc<dyn BackendClient>, settings: EngineSettings) -> std::io::Result<Self> {
        Ok(Self {
            engine: EngineHandle::new(client, settings)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartProgress { request_id } => self.engine.start_progress(request_id),
                Effect::StopProgress { request_id } => self.engine.stop_progress(request_id),
                Effect::RequestGraph {
                    request_id,
                    request,
                } => {
                    visplain_info!(
                        "RequestGraph request_id={} uploadOption={}",
                        request_id,
                        request.upload_option()
                    );
                    self.engine.submit_graph(request_id, request);
                }
                Effect::RequestSummary {
                    request_id,
                    request,
                } => {
                    visplain_info!(
                        "RequestSummary request_id={} repo={}/{}",
                        request_id,
                        request.repo.owner(),
                        request.repo.name()
                    );
                    self.engine.submit_summary(request_id, request);
                }
                Effect::LoadImage { image_id, url } => self.engine.load_image(image_id, url),
            }
        }
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineStopped> {
        Ok(self.engine.recv_timeout(timeout)?.map(map_event))
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ProgressTick { request_id } => Msg::ProgressTick { request_id },
        EngineEvent::GraphCompleted { request_id, result } => Msg::GraphCompleted {
            request_id,
            result: result.map_err(|err| {
                visplain_warn!("Graph request {} failed: {}", request_id, err);
                err.to_failure()
            }),
        },
        EngineEvent::SummaryCompleted { request_id, result } => Msg::SummaryCompleted {
            request_id,
            result: result.map_err(|err| {
                visplain_warn!("Summary request {} failed: {}", request_id, err);
                err.to_failure()
            }),
        },
        EngineEvent::ImageStored {
            image_id,
            stored_as,
        } => Msg::ImageLoaded {
            image_id,
            stored_as,
        },
        EngineEvent::ImageFailed { image_id, reason } => {
            visplain_warn!("Image {} hidden: {}", image_id, reason);
            Msg::ImageFailed { image_id }
        }
    }
}

#[cfg(test)]
mod tests {
    use visplain_client::{ClientError, EngineEvent, FailureKind};
    use visplain_core::{Msg, RequestFailure, SummaryResult};

    use super::map_event;

    #[test]
    fn client_errors_become_request_failures() {
        let msg = map_event(EngineEvent::SummaryCompleted {
            request_id: 7,
            result: Err(ClientError {
                kind: FailureKind::HttpStatus(500),
                message: "500 Internal Server Error".into(),
            }),
        });
        assert_eq!(
            msg,
            Msg::SummaryCompleted {
                request_id: 7,
                result: Err(RequestFailure::new(
                    "http status 500: 500 Internal Server Error"
                )),
            }
        );
    }

    #[test]
    fn successes_and_images_pass_through() {
        assert_eq!(
            map_event(EngineEvent::SummaryCompleted {
                request_id: 1,
                result: Ok(SummaryResult::default()),
            }),
            Msg::SummaryCompleted {
                request_id: 1,
                result: Ok(SummaryResult::default()),
            }
        );
        assert_eq!(
            map_event(EngineEvent::ImageFailed {
                image_id: 3,
                reason: "404".into(),
            }),
            Msg::ImageFailed { image_id: 3 }
        );
        assert_eq!(
            map_event(EngineEvent::ProgressTick { request_id: 2 }),
            Msg::ProgressTick { request_id: 2 }
        );
    }
}
