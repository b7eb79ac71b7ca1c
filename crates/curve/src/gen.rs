//! Parallel Hilbert curve construction.

use rayon::prelude::*;

use crate::HilbertCurve;

/// Points per parallel work unit: large enough to amortize dispatch, small
/// enough to keep every worker busy near the tail.
const CHUNK_POINTS: usize = 1 << 16;

/// Lattice coordinates for one curve index, via the reflect/transpose
/// construction: walk the index two bits at a time from the least
/// significant quadrant upward, orienting each level before offsetting into
/// its quadrant. Runs in O(order).
fn index_to_point(order: u32, index: u64) -> (u32, u32) {
    let mut x: u64 = 0;
    let mut y: u64 = 0;
    let mut t = index;
    let mut side: u64 = 1;
    while side < (1u64 << order) {
        let rx = (t >> 1) & 1;
        let ry = (t ^ rx) & 1;
        if ry == 0 {
            if rx == 1 {
                x = side - 1 - x;
                y = side - 1 - y;
            }
            std::mem::swap(&mut x, &mut y);
        }
        x += side * rx;
        y += side * ry;
        t >>= 2;
        side <<= 1;
    }
    (x as u32, y as u32)
}

/// Build the coordinate arrays for a curve of `order`. The index range is
/// split into contiguous chunks and each chunk writes a disjoint slice of the
/// output arrays, so the join is the only synchronization point.
pub fn generate(order: u32) -> HilbertCurve {
    let n = 1usize << (2 * order);
    let mut x = vec![0u32; n];
    let mut y = vec![0u32; n];
    x.par_chunks_mut(CHUNK_POINTS)
        .zip(y.par_chunks_mut(CHUNK_POINTS))
        .enumerate()
        .for_each(|(chunk, (xs, ys))| {
            let base = (chunk * CHUNK_POINTS) as u64;
            for (j, (px, py)) in xs.iter_mut().zip(ys.iter_mut()).enumerate() {
                let (cx, cy) = index_to_point(order, base + j as u64);
                *px = cx;
                *py = cy;
            }
        });
    HilbertCurve { order, x, y }
}
