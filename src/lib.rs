//! Visual Odometry from Intensity Profiles
//!
//! Estimates a robot's translational speed and rotational rate from a
//! sequence of camera frames, without feature extraction or geometric
//! calibration. Each frame is reduced to 1D brightness profiles over two
//! configurable windows, and each profile is matched against the previous
//! frame's by exhaustive integer-offset search: the best offset maps to a
//! rotation rate and the match residual to a translation speed.

pub mod frame;
pub mod odometry;
pub mod profile;
pub mod window;

pub mod prelude {
    pub use crate::frame::{Frame, InputError, PixelFormat};
    pub use crate::odometry::{Odometry, Settings, VisualOdometry};
    pub use crate::profile::{Alignment, SEARCH_RADIUS};
    pub use crate::window::{ConfigurationError, Window};
}
