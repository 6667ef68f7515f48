//! Visplain client: backend HTTP facade, effect engine and report output.
mod client;
mod config;
mod decode;
mod engine;
mod filename;
mod persist;
mod report;
mod ticker;
mod types;

pub use client::{summary_body, upload_form, BackendClient, FetchedImage, ReqwestBackendClient};
pub use config::{ClientConfig, ConfigError, SUMMARY_PATH, UPLOAD_PATH};
pub use decode::{decode_graph_response, decode_summary_response, DecodeError};
pub use engine::{EngineHandle, EngineSettings, EngineStopped};
pub use filename::deterministic_filename;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use report::{markdown_to_html, render_page, ReportWriter};
pub use ticker::ProgressTicker;
pub use types::{ClientError, EngineEvent, FailureKind};
