//! Buffer-to-image projection along a Hilbert curve and Lanczos-3 reduction
//! to the 16-byte voxel.

pub mod lanczos;
pub mod pgm;
pub mod project;

pub use lanczos::{downsample_4x4, Voxel};
pub use pgm::write_pgm;
pub use project::{project, GrayImage, ProjectError};
