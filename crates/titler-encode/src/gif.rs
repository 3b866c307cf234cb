use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use image::codecs::gif::{GifDecoder, Repeat};
use image::AnimationDecoder;
use titler_core::{Duration, Frame, FrameBuffer, TitlerError, TitlerResult};

/// Decode every frame of an animated GIF, composited to full-size RGBA,
/// along with each frame's display delay.
pub fn decode_gif(path: &Path) -> TitlerResult<Vec<Frame>> {
    let file = File::open(path)?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(|e| {
        TitlerError::Decode(format!("failed to read GIF '{}': {}", path.display(), e))
    })?;

    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| TitlerError::Decode(format!("failed to decode GIF frames: {}", e)))?;
    if frames.is_empty() {
        return Err(TitlerError::Decode(format!(
            "GIF '{}' contains no frames",
            path.display()
        )));
    }

    let mut out = Vec::with_capacity(frames.len());
    for (i, frame) in frames.into_iter().enumerate() {
        let (numer, denom) = frame.delay().numer_denom_ms();
        let delay = Duration::from_millis((numer / denom.max(1)) as u64);
        let rgba = frame.into_buffer();
        let (width, height) = rgba.dimensions();
        let buffer = FrameBuffer::from_raw(width, height, rgba.into_raw())
            .ok_or_else(|| TitlerError::Decode(format!("invalid pixel data in frame {}", i)))?;
        out.push(Frame::new(buffer, delay));
    }

    tracing::info!(
        "Decoded {} frames from {} ({}x{})",
        out.len(),
        path.display(),
        out[0].width(),
        out[0].height(),
    );

    Ok(out)
}

/// Native GIF encoder using the `image` crate. Each frame keeps its own
/// delay; colors are re-quantized per frame.
pub struct GifEncoder;

impl GifEncoder {
    /// Encode a frame sequence to an animated GIF.
    ///
    /// # Arguments
    /// * `frames` - Ordered frames, all the size of the first
    /// * `output_path` - Path for the output .gif file
    /// * `loop_count` - Number of loops (0 = infinite, None = infinite)
    pub fn encode(
        frames: &[Frame],
        output_path: &Path,
        loop_count: Option<u16>,
    ) -> TitlerResult<()> {
        let first = frames
            .first()
            .ok_or_else(|| TitlerError::Encode("no frames to encode for GIF".into()))?;
        let (width, height) = (first.width(), first.height());

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(output_path)
            .map_err(|e| TitlerError::Encode(format!("failed to create GIF file: {}", e)))?;
        let writer = BufWriter::new(file);

        let mut encoder = image::codecs::gif::GifEncoder::new_with_speed(writer, 10);

        let repeat = match loop_count {
            None | Some(0) => Repeat::Infinite,
            Some(n) => Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| TitlerError::Encode(format!("failed to set GIF repeat: {}", e)))?;

        for (i, frame) in frames.iter().enumerate() {
            if frame.width() != width || frame.height() != height {
                return Err(TitlerError::Encode(format!(
                    "frame {} has dimensions {}x{}, expected {}x{}",
                    i,
                    frame.width(),
                    frame.height(),
                    width,
                    height
                )));
            }

            let gif_frame = image::Frame::from_parts(
                image::RgbaImage::from_raw(width, height, frame.buffer.data.clone()).ok_or_else(
                    || TitlerError::Encode(format!("invalid frame data at frame {}", i)),
                )?,
                0,
                0,
                image::Delay::from_numer_denom_ms(frame.delay.as_millis() as u32, 1),
            );

            encoder.encode_frame(gif_frame).map_err(|e| {
                TitlerError::Encode(format!("failed to encode GIF frame {}: {}", i, e))
            })?;
        }

        tracing::info!(
            "Encoded {} frames to GIF at {} ({}x{})",
            frames.len(),
            output_path.display(),
            width,
            height,
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_frames(count: usize, delay_cs: u64) -> Vec<Frame> {
        (0..count)
            .map(|i| {
                Frame::new(
                    FrameBuffer::solid(4, 4, [255, (i * 50) as u8, 0, 255]),
                    Duration::from_centis(delay_cs),
                )
            })
            .collect()
    }

    #[test]
    fn test_gif_encode_empty_frames() {
        let result = GifEncoder::encode(&[], Path::new("/tmp/giftitler_empty.gif"), None);
        assert!(matches!(result, Err(TitlerError::Encode(_))));
    }

    #[test]
    fn test_gif_encode_mismatched_sizes() {
        let mut frames = solid_frames(2, 10);
        frames[1] = Frame::new(FrameBuffer::solid(8, 8, [0; 4]), Duration::from_centis(10));
        let out = std::env::temp_dir().join("giftitler_test_mismatch.gif");
        assert!(GifEncoder::encode(&frames, &out, None).is_err());
        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn test_gif_encode_then_decode_keeps_delays() {
        let mut frames = solid_frames(3, 10);
        frames[2].delay = Duration::from_centis(25);
        let out = std::env::temp_dir().join("giftitler_test_delays.gif");

        GifEncoder::encode(&frames, &out, None).unwrap();
        let decoded = decode_gif(&out).unwrap();

        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].width(), 4);
        assert_eq!(decoded[0].height(), 4);
        assert_eq!(decoded[0].delay, Duration::from_millis(100));
        assert_eq!(decoded[2].delay, Duration::from_millis(250));
        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn test_decode_missing_file() {
        let result = decode_gif(Path::new("/nonexistent/in.gif"));
        assert!(matches!(result, Err(TitlerError::Io(_))));
    }

    #[test]
    fn test_decode_not_a_gif() {
        let path = std::env::temp_dir().join("giftitler_test_garbage.gif");
        std::fs::write(&path, b"this is not a gif").unwrap();
        let result = decode_gif(&path);
        assert!(matches!(result, Err(TitlerError::Decode(_))));
        let _ = std::fs::remove_file(&path);
    }
}
