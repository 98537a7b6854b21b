//! Fakes and log capture shared by unit tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

use crate::clock::FixedClock;
use crate::config::ImageryConfig;
use crate::error::PipelineError;
use crate::module::imagery::{ImageArtifact, ImageryLocator, ImageryRequest, ImagerySource};
use crate::module::message::PostMessage;
use crate::module::pipeline::Orchestrator;
use crate::module::publisher::{PostSink, PublishReceipt};
use crate::module::telemetry::{TelemetrySnapshot, TelemetrySource, Visibility};

/// In-memory log sink for a thread-local subscriber
#[derive(Clone, Default)]
pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl CaptureWriter {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines_at(&self, level: &str) -> usize {
        self.contents().lines().filter(|l| l.contains(level)).count()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route this thread's events into a buffer until the guard drops
pub fn capture_logs() -> (CaptureWriter, tracing::subscriber::DefaultGuard) {
    let writer = CaptureWriter::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (writer, guard)
}

#[derive(Default)]
pub struct Calls {
    pub telemetry: AtomicUsize,
    pub imagery: AtomicUsize,
    pub publish: AtomicUsize,
    pub requested_url: Mutex<Option<String>>,
    pub published_message: Mutex<Option<String>>,
    pub published_path: Mutex<Option<PathBuf>>,
}

impl Calls {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub struct FakeTelemetry {
    pub calls: Arc<Calls>,
    pub fail: bool,
}

#[async_trait]
impl TelemetrySource for FakeTelemetry {
    async fn fetch(&self) -> Result<TelemetrySnapshot, PipelineError> {
        self.calls.telemetry.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(PipelineError::TelemetryFetch("HTTP error 503".to_string()));
        }
        Ok(TelemetrySnapshot {
            latitude: 45.123,
            longitude: -122.456,
            altitude: 408.7,
            velocity: 27600.3,
            visibility: Visibility::Daylight,
        })
    }
}

pub struct FakeImagery {
    pub calls: Arc<Calls>,
    pub staging_path: PathBuf,
    pub fail: bool,
}

#[async_trait]
impl ImagerySource for FakeImagery {
    async fn fetch(&self, request: &ImageryRequest) -> Result<ImageArtifact, PipelineError> {
        self.calls.imagery.fetch_add(1, Ordering::SeqCst);
        *self.calls.requested_url.lock().unwrap() = Some(request.url().to_string());
        if self.fail {
            return Err(PipelineError::ImageryFetch("operation timed out".to_string()));
        }
        ImageArtifact::stage(&self.staging_path, vec![0xFF, 0xD8, 0xFF, 0xE0])
            .await
            .map_err(PipelineError::imagery)
    }
}

pub struct FakePublisher {
    pub calls: Arc<Calls>,
    pub fail: bool,
}

#[async_trait]
impl PostSink for FakePublisher {
    async fn publish(&self, image: &ImageArtifact, message: &PostMessage) -> Result<PublishReceipt, PipelineError> {
        self.calls.publish.fetch_add(1, Ordering::SeqCst);
        assert!(image.path().exists());
        *self.calls.published_message.lock().unwrap() = Some(message.as_str().to_string());
        *self.calls.published_path.lock().unwrap() = Some(image.path().to_path_buf());
        if self.fail {
            return Err(PipelineError::Publish("HTTP error 400 Bad Request".to_string()));
        }
        Ok(PublishReceipt {
            id: "178".to_string(),
            post_id: Some("42_178".to_string()),
        })
    }
}

/// Which fake stage should fail
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
    pub telemetry: bool,
    pub imagery: bool,
    pub publish: bool,
}

/// Orchestrator wired to fakes and a clock pinned at `now`
pub fn fake_orchestrator(
    calls: &Arc<Calls>,
    staging_path: PathBuf,
    now: DateTime<Utc>,
    failures: Failures,
) -> Orchestrator {
    Orchestrator::new(
        Box::new(FakeTelemetry { calls: calls.clone(), fail: failures.telemetry }),
        ImageryLocator::new(&ImageryConfig::default()),
        Box::new(FakeImagery {
            calls: calls.clone(),
            staging_path,
            fail: failures.imagery,
        }),
        Box::new(FakePublisher { calls: calls.clone(), fail: failures.publish }),
        Arc::new(FixedClock(now)),
    )
}
