//! Projection of a byte buffer onto a square grayscale image.

use curve::{required_order, HilbertCurve};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("buffer too large: requires a curve of at least order {required}, loaded curve is order {available}")]
    CurveTooSmall { required: u32, available: u32 },
}

/// Square grayscale image of side `stride = 2^order`. Pixels the projection
/// never touches keep the zero background.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GrayImage {
    pub pixels: Vec<u8>,
    pub stride: usize,
    pub order: u32,
}

/// Project `buffer` along the curve into the smallest square that holds it:
/// byte `i` lands on the curve's rotated point for index `i`. The curve
/// invariants guarantee the first `len` points of a sufficiently large curve
/// stay inside the `2^order` square, so every write is in bounds.
pub fn project(curve: &HilbertCurve, buffer: &[u8]) -> Result<GrayImage, ProjectError> {
    let order = required_order(buffer.len());
    if order > curve.order() {
        return Err(ProjectError::CurveTooSmall {
            required: order,
            available: curve.order(),
        });
    }

    let stride = 1usize << order;
    let mut pixels = vec![0u8; stride * stride];
    for (i, &b) in buffer.iter().enumerate() {
        let (px, py) = curve.point_rotated(i);
        pixels[py as usize * stride + px as usize] = b;
    }

    Ok(GrayImage { pixels, stride, order })
}
