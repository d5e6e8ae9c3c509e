#![allow(dead_code)]

use apnea_backend::config::{AppConfig, PipelineConfig, StorageConfig};
use apnea_backend::tools::{StageCommand, ToolCommand, ToolError, ToolInvoker, ToolOutput};
use apnea_backend::{build_router, AppState, JobStatus};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::Semaphore;
use tower::ServiceExt;

pub const REPAIR: &str = "repair-tool";
pub const CONVERT: &str = "convert-tool";
pub const ANALYZE: &str = "analyze-tool";

/// Tool double keyed by program name
pub struct StubTools {
    failing: HashSet<&'static str>,
    analysis_output: String,
    /// When set, the repair stage waits for a permit
    gate: Option<Arc<Semaphore>>,
    calls: Mutex<Vec<ToolCommand>>,
}

impl StubTools {
    pub fn succeeding(analysis_output: &str) -> Self {
        Self {
            failing: HashSet::new(),
            analysis_output: analysis_output.to_string(),
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(mut self, program: &'static str) -> Self {
        self.failing.insert(program);
        self
    }

    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ToolInvoker for StubTools {
    async fn invoke(&self, command: &ToolCommand) -> Result<ToolOutput, ToolError> {
        self.calls.lock().push(command.clone());

        if command.program == REPAIR {
            if let Some(gate) = &self.gate {
                gate.acquire().await.expect("gate closed").forget();
            }
        }

        if self.failing.contains(command.program.as_str()) {
            return Err(ToolError::Failed {
                program: command.program.clone(),
                exit_code: Some(1),
                output: format!("{} failed", command.program),
            });
        }

        let combined = if command.program == ANALYZE {
            self.analysis_output.clone()
        } else {
            String::new()
        };
        Ok(ToolOutput { combined })
    }
}

/// A running app over a temporary upload directory
pub struct TestApp {
    _tmp: TempDir,
    pub upload_dir: PathBuf,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new(tools: Arc<dyn ToolInvoker>) -> Self {
        Self::with_config(tools, |_| {})
    }

    pub fn with_config(tools: Arc<dyn ToolInvoker>, adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let upload_dir = tmp.path().join("uploads");

        let mut config = AppConfig {
            storage: StorageConfig {
                upload_dir: upload_dir.clone(),
                ..StorageConfig::default()
            },
            pipeline: PipelineConfig {
                repair: StageCommand::new(REPAIR, ["{input}", "{output}"]),
                conversion: StageCommand::new(CONVERT, ["{input}", "{output}", "{channel}"]),
                analysis: StageCommand::new(ANALYZE, ["{input}"]),
                max_concurrent_jobs: Some(2),
                ..PipelineConfig::default()
            },
            ..AppConfig::default()
        };
        adjust(&mut config);

        let state = AppState::with_invoker(config, tools);
        let router = build_router(state.clone());

        Self {
            _tmp: tmp,
            upload_dir,
            state,
            router,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        json_response(self.send(request).await).await
    }

    pub async fn upload(&self, parts: &[Part<'_>]) -> (StatusCode, Value) {
        let request = multipart_request("/upload", parts);
        json_response(self.send(request).await).await
    }

    /// Wait for the job to settle via the registry's completion signal
    pub async fn settle(&self, filename: &str) -> JobStatus {
        tokio::time::timeout(
            Duration::from_secs(10),
            self.state.registry().wait_for_terminal(filename),
        )
        .await
        .expect("job did not reach a terminal state")
        .expect("job not registered")
    }
}

pub enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

pub fn file<'a>(filename: &'a str, data: &'a [u8]) -> Part<'a> {
    Part::File {
        name: "file",
        filename,
        data,
    }
}

pub fn text<'a>(name: &'a str, value: &'a str) -> Part<'a> {
    Part::Text { name, value }
}

const BOUNDARY: &str = "----apnea-test-boundary-7d1f";

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::File {
                name,
                filename,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
                body.extend_from_slice(data);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn json_response(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}
