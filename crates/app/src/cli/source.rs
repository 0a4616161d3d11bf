//! Where a scanned code comes from.

use std::path::{Path, PathBuf};

use clap::Args;
use prodtrack::visual;
#[cfg(feature = "camera")]
use prodtrack::scan::ScanLimits;

/// Group id shared by every way of supplying a code.
pub(crate) const SOURCE_GROUP: &str = "source";

#[derive(Debug, Args)]
#[cfg_attr(not(feature = "camera"), allow(dead_code))]
pub(crate) struct SourceArgs {
    /// Image file (PNG or JPEG) containing a visual code
    #[arg(long, value_name = "PATH", group = SOURCE_GROUP)]
    image: Option<PathBuf>,

    /// Scan live frames from a capture device
    #[arg(long, group = SOURCE_GROUP)]
    camera: bool,

    /// Capture device index
    #[arg(long, default_value_t = 0, requires = "camera")]
    device: i32,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS", requires = "camera")]
    timeout_secs: Option<u64>,

    /// Give up after this many frames
    #[arg(long, value_name = "N", requires = "camera")]
    max_frames: Option<usize>,
}

/// What reading a source produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Captured {
    /// Decoded payload text.
    Payload(String),

    /// No code was read; the text says why.
    NoCode(String),
}

impl SourceArgs {
    /// Read one visual code from the image or the capture device.
    pub(crate) async fn capture(&self) -> Result<Captured, String> {
        if let Some(path) = &self.image {
            return read_image(path);
        }

        if self.camera {
            #[cfg(feature = "camera")]
            return self.read_camera().await;

            #[cfg(not(feature = "camera"))]
            return Err(
                "camera support is not built in; rebuild with `--features camera`".to_string(),
            );
        }

        Err("no code source given".to_string())
    }

    #[cfg(feature = "camera")]
    async fn read_camera(&self) -> Result<Captured, String> {
        use std::time::Duration;

        use prodtrack::scan::{self, ScanOutcome};
        use prodtrack_app::{camera::CameraSource, shutdown};
        use tracing::{error, info};

        let limits = ScanLimits {
            timeout: self.timeout_secs.map(Duration::from_secs),
            max_frames: self.max_frames,
            ..ScanLimits::default()
        };

        let cancel = limits.cancel.clone();
        let listener = tokio::spawn(async move {
            if let Err(error) = shutdown::listen(cancel).await {
                error!("failed to listen for shutdown signal: {error}");
            }
        });

        let device = self.device;
        let outcome = tokio::task::spawn_blocking(move || {
            let mut source = CameraSource::open(device).map_err(|error| error.to_string())?;

            scan::scan(&mut source, &limits).map_err(|error| error.to_string())
        })
        .await;

        listener.abort();

        let outcome = outcome.map_err(|error| format!("camera scan failed: {error}"))??;

        info!(%outcome, "camera scan finished");

        Ok(match outcome {
            ScanOutcome::Decoded { payload, .. } => Captured::Payload(payload),
            ScanOutcome::EndOfStream { .. } => {
                Captured::NoCode("No QR code found in the camera feed.".to_string())
            }
            other => Captured::NoCode(format!("No QR code found in the camera feed ({other}).")),
        })
    }
}

fn read_image(path: &Path) -> Result<Captured, String> {
    let image = visual::load_image(path)
        .map_err(|error| format!("failed to load {}: {error}", path.display()))?;

    Ok(visual::decode(&image).map_or_else(
        || Captured::NoCode("No QR code found in the uploaded image.".to_string()),
        Captured::Payload,
    ))
}
