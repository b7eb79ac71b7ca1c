use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use raster::{downsample_4x4, project};

/// Deterministic buffer of nonzero bytes.
fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251 + 1) as u8).collect()
}

#[test]
fn projection_places_every_byte() {
    let c = curve::generate(6);
    for len in [64usize, 100, 1000, 4096] {
        let buffer = patterned(len);
        let image = project(&c, &buffer).expect("projection");
        assert_eq!(image.order, curve::required_order(len));
        assert_eq!(image.pixels.len(), image.stride * image.stride);
        let nonzero = image.pixels.iter().filter(|&&p| p != 0).count();
        assert_eq!(nonzero, len, "len {len}: wrong pixel count");
    }
}

#[test]
fn projection_assigns_zero_bytes_too() {
    // A buffer containing zeros still writes one pixel per byte; the zero
    // pixels are just indistinguishable from the background.
    let c = curve::generate(4);
    let mut buffer = patterned(200);
    for b in buffer.iter_mut().step_by(4) {
        *b = 0;
    }
    let zeros = buffer.iter().filter(|&&b| b == 0).count();
    let image = project(&c, &buffer).expect("projection");
    let nonzero = image.pixels.iter().filter(|&&p| p != 0).count();
    assert_eq!(nonzero, 200 - zeros);
}

#[test]
fn projection_is_deterministic() {
    let c = curve::generate(5);
    let mut rng = StdRng::seed_from_u64(7);
    let buffer: Vec<u8> = (0..900).map(|_| rng.gen()).collect();

    let first = project(&c, &buffer).expect("projection");
    let second = project(&c, &buffer).expect("projection");
    assert_eq!(first, second);
    assert_eq!(downsample_4x4(&first), downsample_4x4(&second));
}

#[test]
fn single_byte_change_moves_the_voxel() {
    let c = curve::generate(5);
    let buffer = patterned(1024);
    let before = downsample_4x4(&project(&c, &buffer).expect("projection"));

    // Flip the byte that lands next to the first output center so the change
    // carries full kernel weight through both passes.
    let target = (0..1024)
        .find(|&i| c.point_rotated(i) == (3, 3))
        .expect("curve covers the lattice");
    let mut changed = buffer;
    changed[target] = if changed[target] > 0x7f { 0 } else { 0xff };
    let after = downsample_4x4(&project(&c, &changed).expect("projection"));
    assert_ne!(before, after);
}

#[test]
fn stride_four_reduction_is_identity() {
    // At stride 4 every non-center tap sits on an integer offset where the
    // kernel vanishes, so the reduction returns the source pixels.
    let c = curve::generate(2);
    let buffer: Vec<u8> = (0..16u32).map(|i| (i * 16 + 7) as u8).collect();
    let image = project(&c, &buffer).expect("projection");
    assert_eq!(image.stride, 4);

    let voxel = downsample_4x4(&image);
    for (i, (&got, &want)) in voxel.0.iter().zip(image.pixels.iter()).enumerate() {
        assert!(got.abs_diff(want) <= 1, "pixel {i}: {got} vs {want}");
    }
}

#[test]
fn uniform_image_stays_uniform() {
    for order in [3u32, 4, 5] {
        let c = curve::generate(order);
        let len = 1usize << (2 * order);
        let image = project(&c, &vec![0x41u8; len]).expect("projection");
        let voxel = downsample_4x4(&image);
        for (i, &v) in voxel.0.iter().enumerate() {
            assert!(v.abs_diff(0x41) <= 1, "order {order}, cell {i}: {v:#04x}");
        }
    }
}

#[test]
fn buffer_larger_than_curve_fails() {
    let c = curve::generate(3);
    let buffer = patterned(4usize.pow(3) + 1);
    let err = project(&c, &buffer).expect_err("projection must fail");
    let msg = err.to_string();
    assert!(msg.contains("order 4"), "{msg}");
    assert!(msg.contains("order 3"), "{msg}");
}

#[test]
fn pgm_dump_has_header_and_pixels() {
    let c = curve::generate(3);
    let image = project(&c, &patterned(64)).expect("projection");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("debug.pgm");
    raster::write_pgm(&path, &image).expect("write pgm");

    let bytes = std::fs::read(&path).expect("read back");
    assert!(bytes.starts_with(b"P5\n8 8\n255\n"));
    assert_eq!(bytes.len(), b"P5\n8 8\n255\n".len() + 64);
}
