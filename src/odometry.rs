//! The per-frame visual odometry estimator.

use uom::ConstZero;
use uom::si::{
    angle::radian,
    angular_velocity::radian_per_second,
    f64::{Angle, AngularVelocity, Frequency, Velocity},
    frequency::hertz,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    frame::{Frame, InputError},
    profile::{Alignment, ProfilePair},
    window::Window,
};

/// Construction-time parameters, immutable for the estimator's lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// Window whose match residual drives the translation estimate.
    pub translation_window: Window,
    /// Window whose match offset drives the rotation estimate.
    pub rotation_window: Window,
    /// Horizontal field of view of the camera.
    pub field_of_view: Angle,
    /// Frame rate of the camera.
    pub frame_rate: Frequency,
    /// Speed corresponding to a unit match residual.
    pub translation_scale: Velocity,
    /// Upper clamp on the translation estimate.
    pub translation_max: Velocity,
}

/// One frame's motion estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Odometry {
    /// Translational speed, clamped to `Settings::translation_max`.
    pub translation: Velocity,
    /// Rotational rate, positive when the image content moved right.
    pub rotation: AngularVelocity,
}

impl Odometry {
    fn zero() -> Self {
        Self {
            translation: Velocity::ZERO,
            rotation: AngularVelocity::ZERO,
        }
    }
}

/// Estimates translational speed and rotational rate, one frame at a time.
///
/// The estimator retains the previous frame's intensity profiles for two
/// independent windows, one tuned for translation and one for rotation, and
/// matches each window's fresh profile against its retained one. Create one
/// instance per physical camera and feed it from a single frame-processing
/// loop; the `&mut self` call serializes access.
pub struct VisualOdometry {
    settings: Settings,
    translation: ProfilePair,
    rotation: ProfilePair,
    first: bool,
}

impl VisualOdometry {
    /// Creates an estimator from `settings`.
    ///
    /// Profiles for windows with explicit column bounds are allocated here;
    /// a window deferring to the image extent allocates on the first frame.
    pub fn new(settings: Settings) -> Self {
        let translation = match settings.translation_window.fixed_width() {
            Some(len) => ProfilePair::with_len(len),
            None => ProfilePair::default(),
        };
        let rotation = match settings.rotation_window.fixed_width() {
            Some(len) => ProfilePair::with_len(len),
            None => ProfilePair::default(),
        };

        Self {
            settings,
            translation,
            rotation,
            first: true,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Processes one frame and estimates the motion since the previous one.
    ///
    /// The first successful call only seeds the retained profiles and
    /// reports zero motion. Afterwards each window is matched independently
    /// against its own previous profile; the matcher produces both an offset
    /// and a residual per window, and the half that does not correspond to
    /// the window's purpose is discarded.
    ///
    /// A failed call leaves the retained previous profiles untouched, so the
    /// next frame still matches against the last good one.
    pub fn on_frame(&mut self, frame: &Frame<'_>) -> Result<Odometry, InputError> {
        let translation_bounds = self.settings.translation_window.resolve(frame)?;
        let rotation_bounds = self.settings.rotation_window.resolve(frame)?;

        self.translation.refresh(frame, &translation_bounds)?;
        self.rotation.refresh(frame, &rotation_bounds)?;

        if self.first {
            self.translation.advance();
            self.rotation.advance();
            self.first = false;
            return Ok(Odometry::zero());
        }

        let translation = self.translation.align_and_advance();
        let rotation = self.rotation.align_and_advance();

        Ok(Odometry {
            translation: self.translation_speed(&translation),
            rotation: self.rotation_rate(&rotation, frame.width()),
        })
    }

    fn translation_speed(&self, alignment: &Alignment) -> Velocity {
        let speed = self.settings.translation_scale * alignment.residual;
        if speed > self.settings.translation_max {
            self.settings.translation_max
        } else {
            speed
        }
    }

    fn rotation_rate(&self, alignment: &Alignment, image_width: u32) -> AngularVelocity {
        // The offset subtends offset / image_width of the field of view,
        // traversed in one frame interval.
        let angle = alignment.offset as f64 * self.settings.field_of_view.get::<radian>()
            / image_width as f64;
        AngularVelocity::new::<radian_per_second>(angle * self.settings.frame_rate.get::<hertz>())
    }
}
