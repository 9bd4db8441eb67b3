//! Intensity profile extraction and brute-force profile matching.

use crate::frame::{Frame, InputError};
use crate::window::Bounds;

/// Maximum offset magnitude considered while matching two profiles.
pub const SEARCH_RADIUS: usize = 40;

/// Result of aligning a current profile against a previous one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Alignment {
    /// Signed pixel offset that best aligns the two profiles. Positive when
    /// the image content moved right since the previous frame.
    pub offset: isize,
    /// Mean absolute difference between the profiles at the best offset.
    pub residual: f64,
}

/// Fills `profile` with one normalized brightness bucket per window column.
///
/// Bucket `i` averages the strip at column `x_min + i` over the full window
/// height and scales it into [0, 1]. Pure: identical inputs always produce
/// identical buckets.
fn extract(frame: &Frame<'_>, bounds: &Bounds, profile: &mut [f64]) {
    debug_assert_eq!(profile.len(), bounds.width());

    let area = bounds.height() as f64;
    let scale = 255.0 * frame.format().bytes_per_pixel() as f64 * area;

    for (i, bucket) in profile.iter_mut().enumerate() {
        let x = bounds.x_min + i as u32;
        let mut sum = 0.0;
        for y in bounds.y_min..bounds.y_max {
            sum += frame.brightness_at(x, y);
        }
        *bucket = sum / scale;
    }
}

/// Finds the signed offset with the smallest mean absolute difference
/// between `current` and `previous`. Both profiles must have the same
/// length.
///
/// Offsets are searched in two passes over `0..min(SEARCH_RADIUS, len)`,
/// first shifting `previous` (candidate `-offset`), then `current`
/// (candidate `+offset`), so every evaluated offset keeps an overlap of at
/// least one bucket. Ties keep the first candidate, which makes a perfect
/// zero-offset match win over any equally scored larger offset.
pub fn align(current: &[f64], previous: &[f64]) -> Alignment {
    debug_assert_eq!(current.len(), previous.len());

    let len = current.len();
    let radius = SEARCH_RADIUS.min(len);

    let mut best = Alignment {
        offset: 0,
        residual: f64::INFINITY,
    };

    for offset in 0..radius {
        let residual = mean_abs_diff(&current[..len - offset], &previous[offset..]);
        if residual < best.residual {
            best = Alignment {
                offset: -(offset as isize),
                residual,
            };
        }
    }

    for offset in 0..radius {
        let residual = mean_abs_diff(&current[offset..], &previous[..len - offset]);
        if residual < best.residual {
            best = Alignment {
                offset: offset as isize,
                residual,
            };
        }
    }

    best
}

fn mean_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    let sum: f64 = a.iter().zip(b).map(|(a, b)| (a - b).abs()).sum();
    sum / a.len() as f64
}

/// The retained (current, previous) profile pair for one window.
///
/// The previous profile is the estimator's only memory of the last frame;
/// the current profile is overwritten on every refresh.
#[derive(Clone, Debug, Default)]
pub(crate) struct ProfilePair {
    current: Vec<f64>,
    previous: Vec<f64>,
}

impl ProfilePair {
    /// Allocates both profiles to `len` buckets, all zero.
    pub fn with_len(len: usize) -> Self {
        Self {
            current: vec![0.0; len],
            previous: vec![0.0; len],
        }
    }

    /// Refreshes the current profile from `frame` restricted to `bounds`.
    ///
    /// Unallocated buffers take their length from the first resolution;
    /// afterwards the length is fixed and a disagreeing window width is an
    /// `InputError`. The previous profile is left untouched.
    pub fn refresh(&mut self, frame: &Frame<'_>, bounds: &Bounds) -> Result<(), InputError> {
        if self.current.is_empty() {
            self.current = vec![0.0; bounds.width()];
            self.previous = vec![0.0; bounds.width()];
        }

        if self.current.len() != bounds.width() {
            return Err(InputError::ProfileLengthChanged {
                resolved: bounds.width(),
                retained: self.current.len(),
            });
        }

        extract(frame, bounds, &mut self.current);
        Ok(())
    }

    /// Matches the current profile against the previous one, then advances
    /// the previous profile to the current values.
    ///
    /// The advance happens unconditionally; there is no minimum-confidence
    /// gate on the match.
    pub fn align_and_advance(&mut self) -> Alignment {
        let alignment = align(&self.current, &self.previous);
        self.previous.copy_from_slice(&self.current);
        alignment
    }

    /// Advances the previous profile without matching. Used to seed the
    /// baseline on the first frame.
    pub fn advance(&mut self) {
        self.previous.copy_from_slice(&self.current);
    }

    #[cfg(test)]
    pub fn previous(&self) -> &[f64] {
        &self.previous
    }

    #[cfg(test)]
    pub fn current(&self) -> &[f64] {
        &self.current
    }
}
