use crate::frame::{Frame, InputError};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("expected x_min < x_max but got: {x_min} >= {x_max}")]
    EmptyColumns { x_min: u32, x_max: u32 },
    #[error("expected y_min < y_max but got: {y_min} >= {y_max}")]
    EmptyRows { y_min: u32, y_max: u32 },
}

/// A rectangular sub-region of the source image used for one profile
/// extraction.
///
/// An unset maximum means "use the full image extent" and is resolved
/// against the dimensions of each incoming frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Window {
    x_min: u32,
    x_max: Option<u32>,
    y_min: u32,
    y_max: Option<u32>,
}

impl Window {
    /// Creates a window from pixel bounds, minima inclusive and maxima
    /// exclusive.
    ///
    /// Returns a `ConfigurationError` when an explicit maximum does not
    /// exceed its minimum.
    pub fn new(
        x_min: u32,
        x_max: Option<u32>,
        y_min: u32,
        y_max: Option<u32>,
    ) -> Result<Self, ConfigurationError> {
        if let Some(x_max) = x_max
            && x_max <= x_min
        {
            return Err(ConfigurationError::EmptyColumns { x_min, x_max });
        }

        if let Some(y_max) = y_max
            && y_max <= y_min
        {
            return Err(ConfigurationError::EmptyRows { y_min, y_max });
        }

        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// A window covering the whole image, whatever its dimensions.
    pub fn full() -> Self {
        Self {
            x_min: 0,
            x_max: None,
            y_min: 0,
            y_max: None,
        }
    }

    /// Number of profile buckets, known up front only when the column
    /// bounds are explicit.
    pub(crate) fn fixed_width(&self) -> Option<usize> {
        self.x_max.map(|x_max| (x_max - self.x_min) as usize)
    }

    /// Resolves unset maxima against `frame` and checks that the window
    /// fits inside it.
    pub(crate) fn resolve(&self, frame: &Frame<'_>) -> Result<Bounds, InputError> {
        let x_max = self.x_max.unwrap_or(frame.width());
        let y_max = self.y_max.unwrap_or(frame.height());

        if self.x_min >= x_max || self.y_min >= y_max || x_max > frame.width() || y_max > frame.height()
        {
            return Err(InputError::WindowOutOfBounds {
                x_min: self.x_min,
                x_max,
                y_min: self.y_min,
                y_max,
                width: frame.width(),
                height: frame.height(),
            });
        }

        Ok(Bounds {
            x_min: self.x_min,
            x_max,
            y_min: self.y_min,
            y_max,
        })
    }
}

/// Window bounds resolved against a concrete frame, guaranteed in range.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Bounds {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

impl Bounds {
    pub fn width(&self) -> usize {
        (self.x_max - self.x_min) as usize
    }

    pub fn height(&self) -> usize {
        (self.y_max - self.y_min) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PixelFormat;
    use rstest::rstest;

    #[rstest]
    #[case(5, Some(5))]
    #[case(5, Some(2))]
    fn degenerate_columns(#[case] x_min: u32, #[case] x_max: Option<u32>) {
        assert!(matches!(
            Window::new(x_min, x_max, 0, Some(10)),
            Err(ConfigurationError::EmptyColumns { .. })
        ));
    }

    #[test]
    fn degenerate_rows() {
        assert!(matches!(
            Window::new(0, Some(10), 3, Some(3)),
            Err(ConfigurationError::EmptyRows { .. })
        ));
    }

    #[test]
    fn full_window_tracks_frame_dimensions() {
        let bytes = vec![0u8; 8 * 6];
        let frame = Frame::new(&bytes, PixelFormat::Gray, 8, 6).unwrap();

        let bounds = Window::full().resolve(&frame).unwrap();
        assert_eq!(bounds.width(), 8);
        assert_eq!(bounds.height(), 6);
    }

    #[rstest]
    #[case(0, Some(9), 0, Some(8))]
    #[case(0, Some(8), 0, Some(9))]
    #[case(8, None, 0, None)]
    fn window_outside_frame(
        #[case] x_min: u32,
        #[case] x_max: Option<u32>,
        #[case] y_min: u32,
        #[case] y_max: Option<u32>,
    ) {
        let bytes = vec![0u8; 8 * 8];
        let frame = Frame::new(&bytes, PixelFormat::Gray, 8, 8).unwrap();

        let window = Window::new(x_min, x_max, y_min, y_max).unwrap();
        assert!(matches!(
            window.resolve(&frame),
            Err(InputError::WindowOutOfBounds { .. })
        ));
    }

    #[test]
    fn fixed_width_only_for_explicit_bounds() {
        assert_eq!(Window::new(2, Some(12), 0, None).unwrap().fixed_width(), Some(10));
        assert_eq!(Window::new(2, None, 0, None).unwrap().fixed_width(), None);
    }
}
