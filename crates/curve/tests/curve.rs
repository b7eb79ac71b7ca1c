use std::collections::HashSet;

use curve::{required_order, HilbertCurve};

#[test]
fn covers_lattice_without_duplicates() {
    for order in 2..=6u32 {
        let c = curve::generate(order);
        let side = 1u32 << order;
        let n = (side as usize) * (side as usize);
        assert_eq!(c.points(), n);
        let mut seen = HashSet::with_capacity(n);
        for i in 0..n {
            let (x, y) = c.point(i);
            assert!(x < side && y < side, "order {order}: point {i} out of range");
            assert!(seen.insert((x, y)), "order {order}: ({x},{y}) repeats");
        }
    }
}

#[test]
fn consecutive_points_are_adjacent() {
    for order in 2..=8u32 {
        let c = curve::generate(order);
        for i in 1..c.points() {
            let (x0, y0) = c.point(i - 1);
            let (x1, y1) = c.point(i);
            let step = x0.abs_diff(x1) + y0.abs_diff(y1);
            assert_eq!(step, 1, "order {order}: jump between indices {} and {i}", i - 1);
        }
    }
}

#[test]
fn required_order_is_minimal() {
    assert_eq!(required_order(0), 0);
    assert_eq!(required_order(1), 0);
    for len in 2..=100_000usize {
        let k = required_order(len);
        assert!(4usize.pow(k) >= len, "4^{k} < {len}");
        assert!(4usize.pow(k - 1) < len, "order {k} not minimal for {len}");
    }
    assert_eq!(required_order(10_000_000), 12);
}

#[test]
fn map_point_rotates_the_lattice() {
    let c = curve::generate(3);
    for i in 0..c.points() {
        let (x, y) = c.point(i);
        let (mx, my) = c.map_point(i, 3).expect("order within curve");
        assert_eq!((mx, my), (y, x), "index {i} not rotated");
    }
    assert!(c.map_point(0, 4).is_err());
}

#[test]
fn save_load_round_trip_plain_and_gzip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let c = curve::generate(4);

    let plain = dir.path().join("curve.dat");
    c.save(&plain, false).expect("save plain");
    assert_eq!(HilbertCurve::load(&plain).expect("load plain"), c);

    let gz = dir.path().join("curve.dat.gz");
    c.save(&gz, true).expect("save gzip");
    assert_eq!(HilbertCurve::load(&gz).expect("load gzip"), c);
}

#[test]
fn gzip_detected_by_magic_without_suffix() {
    let dir = tempfile::tempdir().expect("tempdir");
    let gz = dir.path().join("curve.dat.gz");
    curve::generate(3).save(&gz, true).expect("save gzip");

    let renamed = dir.path().join("curve.bin");
    std::fs::rename(&gz, &renamed).expect("rename");
    let loaded = HilbertCurve::load(&renamed).expect("load sniffed gzip");
    assert_eq!(loaded.order(), 3);
}

#[test]
fn truncated_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("curve.dat");
    curve::generate(3).save(&path, false).expect("save");

    let bytes = std::fs::read(&path).expect("read back");
    std::fs::write(&path, &bytes[..bytes.len() / 2]).expect("truncate");
    let err = HilbertCurve::load(&path).expect_err("truncated load must fail");
    let chain = format!("{err:#}");
    assert!(chain.contains("short read"), "unexpected error: {chain}");
}

#[test]
fn implausible_order_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bogus.dat");
    std::fs::write(&path, 40u32.to_le_bytes()).expect("write bogus header");
    assert!(HilbertCurve::load(&path).is_err());
}

#[test]
fn order_five_gzip_round_trip_preserves_all_points() {
    let dir = tempfile::tempdir().expect("tempdir");
    let c = curve::generate(5);
    let path = dir.path().join("order5.dat.gz");
    c.save(&path, true).expect("save");

    let loaded = HilbertCurve::load(&path).expect("load");
    assert_eq!(loaded.points(), 1024);
    for i in 0..loaded.points() {
        assert_eq!(loaded.point(i), c.point(i), "point {i} differs");
    }
}
