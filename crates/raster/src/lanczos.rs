//! Separable Lanczos-3 reduction of a projected image to a 4x4 voxel.

use crate::GrayImage;

/// Output side length; the voxel is always `OUT * OUT` = 16 bytes.
const OUT: usize = 4;
/// Kernel support radius in output-pixel units.
const RADIUS: f64 = 3.0;

/// The 16-byte 4x4 grayscale core of a fingerprint.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Voxel(pub [u8; 16]);

impl Voxel {
    /// 32 lowercase hex characters.
    pub fn hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Lanczos-3 kernel: `sinc(x) * sinc(x/3)` for `|x| < 3`, else 0.
fn lanczos3(x: f64) -> f64 {
    if x == 0.0 {
        return 1.0;
    }
    if x.abs() >= RADIUS {
        return 0.0;
    }
    let px = std::f64::consts::PI * x;
    (px.sin() / px) * ((px / RADIUS).sin() / (px / RADIUS))
}

/// Tap list for one output position along one axis: source sample indices
/// and kernel weights. Rows and columns share the same geometry, so a single
/// table serves both passes.
fn axis_taps(stride: usize) -> Vec<Vec<(usize, f64)>> {
    let scale = stride as f64 / OUT as f64;
    let support = RADIUS * scale;
    (0..OUT)
        .map(|u| {
            // Pixel centers sit at half-integer offsets.
            let center = (u as f64 + 0.5) * scale - 0.5;
            let lo = (center - support).ceil().max(0.0) as usize;
            let hi = (center + support).floor().min((stride - 1) as f64) as usize;
            let mut taps = Vec::with_capacity(hi.saturating_sub(lo) + 1);
            for s in lo..=hi {
                // Weights are evaluated in output-pixel units.
                let w = lanczos3((s as f64 - center) / scale);
                if w != 0.0 {
                    taps.push((s, w));
                }
            }
            taps
        })
        .collect()
}

/// Reduce a square image to exactly 4x4 grayscale. Samples outside the image
/// are omitted (no edge replication); each output is normalized by the sum of
/// the weights actually used. Intermediates stay in f64 across both passes;
/// the final values are rounded half-away-from-zero and clamped to `[0, 255]`.
/// For `stride = 4` the reduction degenerates to the identity.
pub fn downsample_4x4(image: &GrayImage) -> Voxel {
    let stride = image.stride;
    let taps = axis_taps(stride);

    // Horizontal pass: stride rows by OUT columns.
    let mut mid = vec![0.0f64; stride * OUT];
    for row in 0..stride {
        let src = &image.pixels[row * stride..(row + 1) * stride];
        for (u, col_taps) in taps.iter().enumerate() {
            mid[row * OUT + u] = convolve(col_taps, |s| src[s] as f64);
        }
    }

    // Vertical pass down to OUT rows.
    let mut out = [0u8; 16];
    for (v, row_taps) in taps.iter().enumerate() {
        for u in 0..OUT {
            let value = convolve(row_taps, |s| mid[s * OUT + u]);
            out[v * OUT + u] = value.round().clamp(0.0, 255.0) as u8;
        }
    }
    Voxel(out)
}

fn convolve(taps: &[(usize, f64)], sample: impl Fn(usize) -> f64) -> f64 {
    let mut sum = 0.0;
    let mut norm = 0.0;
    for &(s, w) in taps {
        sum += w * sample(s);
        norm += w;
    }
    if norm == 0.0 {
        0.0
    } else {
        sum / norm
    }
}
