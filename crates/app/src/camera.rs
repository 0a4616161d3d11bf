//! Capture devices as frame sources.

use image::{GrayImage, RgbImage, imageops};
use opencv::{
    core::{Mat, MatTraitConst, MatTraitConstManual, Vec3b},
    videoio::{self, VideoCapture, VideoCaptureTrait, VideoCaptureTraitConst},
};
use prodtrack::scan::FrameSource;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("failed to init video capture: {0}")]
    Init(#[source] opencv::Error),

    #[error("failed to open capture device {0}")]
    NotOpened(i32),

    #[error("failed to capture a frame: {0}")]
    Capture(#[source] opencv::Error),

    #[error("failed to get sufficient frame data")]
    FrameData,
}

/// An OpenCV capture device, read frame by frame.
pub struct CameraSource {
    capture: VideoCapture,
    frame: Mat,
}

impl CameraSource {
    /// Open capture device `index`, letting OpenCV pick the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the device does not exist or cannot be opened.
    pub fn open(index: i32) -> Result<Self, CameraError> {
        let capture = VideoCapture::new(index, videoio::CAP_ANY).map_err(CameraError::Init)?;

        if !capture.is_opened().unwrap_or_default() {
            return Err(CameraError::NotOpened(index));
        }

        debug!(device = index, "capture device opened");

        Ok(Self {
            capture,
            frame: Mat::default(),
        })
    }
}

impl FrameSource for CameraSource {
    type Error = CameraError;

    fn next_frame(&mut self) -> Result<Option<GrayImage>, Self::Error> {
        match self.capture.read(&mut self.frame) {
            Ok(true) => {}
            // disconnected
            Ok(false) => return Ok(None),
            Err(error) => return Err(CameraError::Capture(error)),
        }

        let width = u32::try_from(self.frame.cols()).map_err(|_| CameraError::FrameData)?;
        let height = u32::try_from(self.frame.rows()).map_err(|_| CameraError::FrameData)?;
        let pixels = self
            .frame
            .data_typed::<Vec3b>()
            .map_err(CameraError::Capture)?;

        bgr_to_luma(width, height, pixels).map(Some)
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        if let Err(error) = self.capture.release() {
            debug!("failed to release capture device: {error}");
        }
    }
}

fn bgr_to_luma(width: u32, height: u32, pixels: &[Vec3b]) -> Result<GrayImage, CameraError> {
    let buffer = pixels
        .iter()
        .flat_map(|pixel| {
            let [b, g, r] = pixel.0;
            [r, g, b]
        })
        .collect();

    let rgb = RgbImage::from_raw(width, height, buffer).ok_or(CameraError::FrameData)?;

    Ok(imageops::grayscale(&rgb))
}

#[cfg(test)]
mod tests {
    use opencv::core::VecN;

    use super::*;

    #[test]
    fn bgr_channels_are_swapped_before_greyscale() -> testresult::TestResult {
        // pure red in BGR order is dark in luma, pure white stays white
        let pixels = [VecN([0, 0, 255]), VecN([255, 255, 255])];

        let image = bgr_to_luma(2, 1, &pixels)?;

        assert!(image.get_pixel(0, 0).0[0] < 128);
        assert_eq!(image.get_pixel(1, 0).0[0], 255);

        Ok(())
    }

    #[test]
    fn short_buffer_is_rejected() {
        let pixels = [VecN([0, 0, 0])];

        assert!(matches!(
            bgr_to_luma(2, 2, &pixels),
            Err(CameraError::FrameData)
        ));
    }
}
