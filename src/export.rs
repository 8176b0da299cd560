use crate::color::{rgb_from_lut, ColorLut, ColorScheme, LUT_SIZE};
use crate::error::{ExportError, GrowthError};
use crate::snapshot::{Snapshot, SnapshotSink};
use image::{Rgb, RgbImage};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

const BACKGROUND: [u8; 3] = [0, 0, 0];

/// Where and how to write the snapshot stream to disk
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Animated GIF with one frame per snapshot
    pub gif: Option<PathBuf>,
    /// Still image of the final snapshot
    pub png: Option<PathBuf>,
    /// Pixels per grid cell
    pub scale: u32,
    pub color_scheme: ColorScheme,
    /// Distance mapped to the end of the gradient
    pub color_radius: f32,
    pub frame_delay_ms: u64,
}

impl ExportOptions {
    pub fn is_enabled(&self) -> bool {
        self.gif.is_some() || self.png.is_some()
    }
}

/// Writes each snapshot as a GIF frame as soon as it arrives, so nothing
/// accumulates in memory. The final snapshot also goes to the PNG path and
/// closes the GIF.
pub struct ExportSink {
    gif: Option<gif::Encoder<BufWriter<File>>>,
    gif_path: Option<PathBuf>,
    png_path: Option<PathBuf>,
    scale: u32,
    lut: ColorLut,
    color_radius: f32,
    /// GIF delay in hundredths of a second
    delay: u16,
    frames_written: usize,
}

impl ExportSink {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            gif: None,
            gif_path: options.gif,
            png_path: options.png,
            scale: options.scale.max(1),
            lut: options.color_scheme.build_lut(),
            color_radius: options.color_radius,
            delay: (options.frame_delay_ms / 10).min(u16::MAX as u64) as u16,
            frames_written: 0,
        }
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    fn side(&self, snapshot: &Snapshot) -> usize {
        snapshot.size() * self.scale as usize
    }

    /// Color of the output pixel at `(px, py)`, y axis pointing up
    fn pixel(&self, snapshot: &Snapshot, px: usize, py: usize) -> Option<[u8; 3]> {
        let scale = self.scale as usize;
        let x = px / scale;
        let y = snapshot.size() - 1 - py / scale;
        snapshot
            .is_occupied(x, y)
            .then(|| rgb_from_lut(&self.lut, snapshot.radial_shade(x, y, self.color_radius)))
    }

    /// Background at index 0, the gradient in the remaining 255 entries
    fn palette(&self) -> Vec<u8> {
        let mut palette = Vec::with_capacity(LUT_SIZE * 3);
        palette.extend_from_slice(&BACKGROUND);
        for i in 1..LUT_SIZE {
            let t = (i - 1) as f32 / (LUT_SIZE - 2) as f32;
            palette.extend_from_slice(&rgb_from_lut(&self.lut, t));
        }
        palette
    }

    fn write_gif_frame(&mut self, snapshot: &Snapshot) -> Result<(), ExportError> {
        let Some(path) = self.gif_path.clone() else {
            return Ok(());
        };
        let side = self.side(snapshot);
        if side > u16::MAX as usize {
            return Err(ExportError::FrameTooLarge {
                size: snapshot.size(),
                scale: self.scale,
            });
        }

        if self.gif.is_none() {
            let writer = BufWriter::new(File::create(&path)?);
            let mut encoder = gif::Encoder::new(writer, side as u16, side as u16, &self.palette())?;
            encoder.set_repeat(gif::Repeat::Infinite)?;
            self.gif = Some(encoder);
        }

        let scale = self.scale as usize;
        let mut buffer = vec![0u8; side * side];
        for (i, px) in buffer.iter_mut().enumerate() {
            let (x, y) = (i % side / scale, snapshot.size() - 1 - i / side / scale);
            if snapshot.is_occupied(x, y) {
                let t = snapshot.radial_shade(x, y, self.color_radius);
                *px = 1 + (t * (LUT_SIZE - 2) as f32).round() as u8;
            }
        }

        let frame = gif::Frame {
            width: side as u16,
            height: side as u16,
            delay: self.delay,
            buffer: Cow::Owned(buffer),
            ..gif::Frame::default()
        };
        if let Some(encoder) = self.gif.as_mut() {
            encoder.write_frame(&frame)?;
        }
        self.frames_written += 1;
        Ok(())
    }

    fn finish_gif(&mut self) -> Result<(), ExportError> {
        if let Some(encoder) = self.gif.take() {
            let mut writer = encoder.into_inner()?;
            writer.flush()?;
            if let Some(path) = &self.gif_path {
                info!(path = %path.display(), frames = self.frames_written(), "wrote gif");
            }
        }
        Ok(())
    }

    fn write_png(&self, snapshot: &Snapshot) -> Result<(), ExportError> {
        let Some(path) = &self.png_path else {
            return Ok(());
        };
        let side = self.side(snapshot) as u32;
        let image = RgbImage::from_fn(side, side, |px, py| {
            Rgb(self
                .pixel(snapshot, px as usize, py as usize)
                .unwrap_or(BACKGROUND))
        });
        image.save(path)?;
        info!(path = %path.display(), cells = snapshot.occupied_count(), "wrote png");
        Ok(())
    }

    fn export(&mut self, snapshot: &Snapshot) -> Result<(), ExportError> {
        self.write_gif_frame(snapshot)?;
        if snapshot.is_final {
            self.finish_gif()?;
            self.write_png(snapshot)?;
        }
        Ok(())
    }
}

impl SnapshotSink for ExportSink {
    fn emit(&mut self, snapshot: Snapshot) -> Result<(), GrowthError> {
        self.export(&snapshot).map_err(GrowthError::from)
    }
}
