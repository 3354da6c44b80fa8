use base64::Engine;
use thiserror::Error;
use tracing::info;

use crate::media::VideoFrame;
use crate::recorder::Blob;

pub const SNAPSHOT_MEDIA_TYPE: &str = "image/png";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no video frame available")]
    NoFrame,
    #[error("frame has zero size ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },
    #[error("frame buffer is {actual} bytes, expected {expected}")]
    BufferMismatch { expected: usize, actual: usize },
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] png::EncodingError),
}

/// A single still image taken from the live preview
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub blob: Blob,
    pub width: u32,
    pub height: u32,
}

impl Snapshot {
    /// Inline preview URL for the encoded image
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.blob.media_type,
            base64::engine::general_purpose::STANDARD.encode(&self.blob.bytes)
        )
    }
}

/// Offscreen RGBA raster the frame is drawn into before encoding
struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    fn draw_frame(&mut self, frame: &VideoFrame) {
        let row = self.width as usize * 4;
        let src_row = frame.width as usize * 4;
        let rows = self.height.min(frame.height) as usize;
        let cols = row.min(src_row);

        for y in 0..rows {
            self.pixels[y * row..y * row + cols]
                .copy_from_slice(&frame.rgba[y * src_row..y * src_row + cols]);
        }
    }

    fn to_png(&self) -> Result<Vec<u8>, SnapshotError> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
            writer.finish()?;
        }
        Ok(out)
    }
}

/// Draw `frame` into a canvas of its rendered size and encode it as PNG
pub fn take_snapshot(frame: &VideoFrame) -> Result<Snapshot, SnapshotError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(SnapshotError::EmptyFrame {
            width: frame.width,
            height: frame.height,
        });
    }

    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.rgba.len() != expected {
        return Err(SnapshotError::BufferMismatch {
            expected,
            actual: frame.rgba.len(),
        });
    }

    let mut canvas = Canvas::new(frame.width, frame.height);
    canvas.draw_frame(frame);
    let png = canvas.to_png()?;

    info!(
        "Snapshot captured: {}x{} ({} bytes)",
        canvas.width,
        canvas.height,
        png.len()
    );

    Ok(Snapshot {
        blob: Blob::new(png, SNAPSHOT_MEDIA_TYPE),
        width: canvas.width,
        height: canvas.height,
    })
}
