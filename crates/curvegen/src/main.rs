//! Offline tool: generate a Hilbert curve and persist it, or validate an
//! existing curve file by reloading it.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use curve::HilbertCurve;

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
enum Mode {
    Generate,
    Load,
    Both,
}

#[derive(Parser, Debug)]
#[command(name = "curvegen", about = "hilbert curve generation and persistence")]
struct Args {
    /// Order of the Hilbert curve.
    #[arg(long, default_value_t = 3)]
    order: u32,

    /// Output/input file name.
    #[arg(long, default_value = "hilbert_curve.dat")]
    file: PathBuf,

    /// Gzip-compress the curve file (appends .gz when missing).
    #[arg(long)]
    compress: bool,

    /// Print timing and size information.
    #[arg(short = 'v', long)]
    verbose: bool,

    #[arg(long, value_enum, default_value = "both")]
    mode: Mode,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if args.order > 31 {
        bail!("order {} cannot be indexed with 64-bit offsets", args.order);
    }
    if args.order > 16 {
        warn!(order = args.order, "orders above 16 are slow and memory intensive");
    }

    let mut path = args.file.clone();
    if args.compress && !has_gz_suffix(&path) {
        path = append_gz(&path);
    }

    let started = Instant::now();
    let mut order = args.order;

    if matches!(args.mode, Mode::Generate | Mode::Both) {
        let gen_started = Instant::now();
        let curve = curve::generate(args.order);
        if args.verbose {
            println!("generation time: {:?}", gen_started.elapsed());
        }

        let save_started = Instant::now();
        curve.save(&path, args.compress)?;
        if args.verbose {
            println!("save time: {:?}", save_started.elapsed());
            let meta = std::fs::metadata(&path)
                .with_context(|| format!("stat {}", path.display()))?;
            println!("file size: {}", format_size(meta.len()));
            if args.compress {
                let raw = curve.points() as u64 * 8;
                println!("compression ratio: {:.2}%", meta.len() as f64 / raw as f64 * 100.0);
            }
        }
        order = curve.order();
    }

    if matches!(args.mode, Mode::Load | Mode::Both) {
        let load_started = Instant::now();
        let loaded = HilbertCurve::load(&path)?;
        if args.verbose {
            println!("load time: {:?}", load_started.elapsed());
        }
        order = loaded.order();
    }

    if args.verbose {
        println!("total time: {:?}", started.elapsed());
    }
    println!("processed hilbert curve of order {order}");
    Ok(())
}

fn has_gz_suffix(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("gz"))
}

fn append_gz(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".gz");
    PathBuf::from(name)
}

fn format_size(size: u64) -> String {
    const UNIT: u64 = 1024;
    if size < UNIT {
        return format!("{size} B");
    }
    let mut div = UNIT;
    let mut exp = 0usize;
    let mut n = size / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    format!("{:.1} {}B", size as f64 / div as f64, b"KMGTPE"[exp] as char)
}
