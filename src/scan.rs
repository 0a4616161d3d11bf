//! Live scanning
//!
//! A scan pulls frames from a [`FrameSource`] and stops at the first frame
//! containing a readable visual code, or when the source reports end of
//! stream. Nothing bounds a scan by default; callers that need a bound set
//! [`ScanLimits::timeout`] or [`ScanLimits::max_frames`]. The cancellation
//! flag is checked before every frame.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use image::GrayImage;
use thiserror::Error;
use tracing::debug;

use crate::visual;

/// A device or stream yielding raster frames on demand.
pub trait FrameSource {
    /// Capture failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Capture the next frame. `Ok(None)` signals end of stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the device fails to produce a frame.
    fn next_frame(&mut self) -> Result<Option<GrayImage>, Self::Error>;
}

/// Shared cancellation flag, cheap to clone into a signal handler.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// New, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the scan stops before its next frame.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Bounds on a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanLimits {
    /// Give up once this much time has passed.
    pub timeout: Option<Duration>,

    /// Give up after this many frames.
    pub max_frames: Option<usize>,

    /// Cooperative cancellation.
    pub cancel: CancelToken,
}

/// How a scan ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A code was decoded.
    Decoded {
        /// Decoded payload text
        payload: String,

        /// Frames captured, including the decoding one
        frames: usize,
    },

    /// The source ran dry.
    EndOfStream {
        /// Frames captured
        frames: usize,
    },

    /// [`ScanLimits::timeout`] elapsed.
    TimedOut {
        /// Frames captured
        frames: usize,
    },

    /// [`ScanLimits::max_frames`] was reached.
    FrameLimit {
        /// Frames captured
        frames: usize,
    },

    /// The [`CancelToken`] fired.
    Cancelled {
        /// Frames captured
        frames: usize,
    },
}

impl ScanOutcome {
    /// Decoded payload, if any.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Decoded { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Consume the outcome, keeping only the payload.
    pub fn into_payload(self) -> Option<String> {
        match self {
            Self::Decoded { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decoded { frames, .. } => write!(f, "code decoded after {frames} frame(s)"),
            Self::EndOfStream { frames } => write!(f, "stream ended after {frames} frame(s)"),
            Self::TimedOut { frames } => write!(f, "timed out after {frames} frame(s)"),
            Self::FrameLimit { frames } => write!(f, "no code within {frames} frame(s)"),
            Self::Cancelled { frames } => write!(f, "cancelled after {frames} frame(s)"),
        }
    }
}

/// Scan failure.
#[derive(Debug, Error)]
pub enum ScanError<E: std::error::Error + 'static> {
    /// The frame source failed.
    #[error("failed to capture a frame: {0}")]
    Capture(#[source] E),
}

/// Poll `source` until a code is decoded or a limit is hit.
///
/// # Errors
///
/// Returns [`ScanError::Capture`] if the source fails.
pub fn scan<S: FrameSource>(
    source: &mut S,
    limits: &ScanLimits,
) -> Result<ScanOutcome, ScanError<S::Error>> {
    let started = Instant::now();
    let mut frames = 0_usize;

    loop {
        if limits.cancel.is_cancelled() {
            return Ok(ScanOutcome::Cancelled { frames });
        }

        if limits.timeout.is_some_and(|timeout| started.elapsed() >= timeout) {
            return Ok(ScanOutcome::TimedOut { frames });
        }

        if limits.max_frames.is_some_and(|max| frames >= max) {
            return Ok(ScanOutcome::FrameLimit { frames });
        }

        let Some(frame) = source.next_frame().map_err(ScanError::Capture)? else {
            return Ok(ScanOutcome::EndOfStream { frames });
        };

        frames += 1;

        if let Some(payload) = visual::decode(&frame) {
            debug!(frames, "visual code decoded");
            return Ok(ScanOutcome::Decoded { payload, frames });
        }
    }
}
