//! Debug dump of a projected image as binary PGM.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::GrayImage;

pub fn write_pgm(path: &Path, image: &GrayImage) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write!(w, "P5\n{} {}\n255\n", image.stride, image.stride).context("writing PGM header")?;
    w.write_all(&image.pixels).context("writing PGM pixels")?;
    w.flush().context("flushing PGM file")?;
    Ok(())
}
