use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("expected frame dimensions of at least 1x1 but got: {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },
    #[error(
        "expected at least {expected} bytes for a {width}x{height} {format:?} frame but got: {actual}"
    )]
    BufferTooShort {
        width: u32,
        height: u32,
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },
    #[error("window [{x_min}, {x_max})x[{y_min}, {y_max}) does not fit a {width}x{height} frame")]
    WindowOutOfBounds {
        x_min: u32,
        x_max: u32,
        y_min: u32,
        y_max: u32,
        width: u32,
        height: u32,
    },
    #[error("window resolved to {resolved} columns but the retained profile holds {retained}")]
    ProfileLengthChanged { resolved: usize, retained: usize },
}

/// Layout of the raw pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PixelFormat {
    /// One byte per pixel.
    Gray,
    /// Three packed channel bytes per pixel.
    Rgb,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Gray => 1,
            PixelFormat::Rgb => 3,
        }
    }
}

/// A borrowed view of one raw camera frame.
///
/// The buffer is row-major and contiguous. The view is read-only and only
/// lives for the duration of the per-frame call; the caller keeps ownership
/// of the bytes.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    bytes: &'a [u8],
    format: PixelFormat,
    width: u32,
    height: u32,
}

impl<'a> Frame<'a> {
    /// Creates a frame view over `bytes`.
    ///
    /// Returns an `InputError` if either dimension is zero or if `bytes` is
    /// shorter than `width * height * bytes_per_pixel`.
    pub fn new(
        bytes: &'a [u8],
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<Self, InputError> {
        if width == 0 || height == 0 {
            return Err(InputError::EmptyFrame { width, height });
        }

        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if bytes.len() < expected {
            return Err(InputError::BufferTooShort {
                width,
                height,
                format,
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            bytes,
            format,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw brightness of the pixel at (`x`, `y`): the byte value for `Gray`,
    /// the channel sum for `Rgb`.
    ///
    /// Callers must keep (`x`, `y`) within the frame dimensions; resolved
    /// window bounds guarantee this.
    pub(crate) fn brightness_at(&self, x: u32, y: u32) -> f64 {
        let pos = (y as usize * self.width as usize + x as usize) * self.format.bytes_per_pixel();
        match self.format {
            PixelFormat::Gray => self.bytes[pos] as f64,
            PixelFormat::Rgb => {
                self.bytes[pos] as f64 + self.bytes[pos + 1] as f64 + self.bytes[pos + 2] as f64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 4)]
    #[case(4, 0)]
    #[case(0, 0)]
    fn empty_dimensions(#[case] width: u32, #[case] height: u32) {
        let bytes = [0u8; 16];
        assert!(matches!(
            Frame::new(&bytes, PixelFormat::Gray, width, height),
            Err(InputError::EmptyFrame { .. })
        ));
    }

    #[rstest]
    #[case(PixelFormat::Gray, 15)]
    #[case(PixelFormat::Rgb, 47)]
    fn short_buffer(#[case] format: PixelFormat, #[case] len: usize) {
        let bytes = vec![0u8; len];
        assert!(matches!(
            Frame::new(&bytes, format, 4, 4),
            Err(InputError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn gray_brightness_is_byte_value() {
        let bytes: Vec<u8> = (0..16).collect();
        let frame = Frame::new(&bytes, PixelFormat::Gray, 4, 4).unwrap();
        assert_eq!(frame.brightness_at(2, 1), 6.0);
    }

    #[test]
    fn rgb_brightness_is_channel_sum() {
        let mut bytes = vec![0u8; 4 * 4 * 3];
        let pos = (1 * 4 + 2) * 3;
        bytes[pos..pos + 3].copy_from_slice(&[10, 20, 30]);
        let frame = Frame::new(&bytes, PixelFormat::Rgb, 4, 4).unwrap();
        assert_eq!(frame.brightness_at(2, 1), 60.0);
    }
}
