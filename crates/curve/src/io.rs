//! Curve persistence.
//!
//! Layout, all little-endian: `u32` order, then `4^order` x coordinates,
//! then the y coordinates. No magic number, checksum, or trailer; a short
//! file surfaces as a read error. The stream is optionally gzip-wrapped;
//! readers detect gzip by a case-insensitive `.gz` suffix or by sniffing the
//! `1f 8b` magic, so a renamed compressed file still loads.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::HilbertCurve;

/// Buffered I/O window, both directions.
const IO_BUF: usize = 1024 * 1024;
/// Points moved per batch while streaming the coordinate arrays. An I/O
/// concern only; the format has no chunk boundary.
const BATCH_POINTS: usize = 1024 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

impl HilbertCurve {
    pub fn save(&self, path: &Path, compress: bool) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("opening {} for writing", path.display()))?;
        if compress {
            let mut w = GzEncoder::new(
                BufWriter::with_capacity(IO_BUF, file),
                Compression::default(),
            );
            self.write_to(&mut w)?;
            w.finish()
                .context("finishing gzip stream")?
                .flush()
                .context("flushing curve file")?;
        } else {
            let mut w = BufWriter::with_capacity(IO_BUF, file);
            self.write_to(&mut w)?;
            w.flush().context("flushing curve file")?;
        }
        Ok(())
    }

    fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(&self.order.to_le_bytes()).context("writing order")?;
        write_coords(w, &self.x).context("writing x coordinates")?;
        write_coords(w, &self.y).context("writing y coordinates")?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<HilbertCurve> {
        let mut file = File::open(path)
            .with_context(|| format!("opening {} for reading", path.display()))?;
        let gzipped = is_gzipped(path, &mut file)?;
        let curve = if gzipped {
            Self::read_from(&mut GzDecoder::new(BufReader::with_capacity(IO_BUF, file)))
        } else {
            Self::read_from(&mut BufReader::with_capacity(IO_BUF, file))
        };
        curve.with_context(|| format!("loading curve from {}", path.display()))
    }

    fn read_from<R: Read>(r: &mut R) -> Result<HilbertCurve> {
        let mut head = [0u8; 4];
        r.read_exact(&mut head).context("reading order")?;
        let order = u32::from_le_bytes(head);
        if order > 31 {
            bail!("implausible curve order {order}");
        }
        let n = 1usize << (2 * order);
        let x = read_coords(r, n).context("reading x coordinates")?;
        let y = read_coords(r, n).context("reading y coordinates")?;
        Ok(HilbertCurve { order, x, y })
    }
}

fn is_gzipped(path: &Path, file: &mut File) -> Result<bool> {
    if path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("gz"))
    {
        return Ok(true);
    }
    let mut head = [0u8; 2];
    let sniffed = match file.read_exact(&mut head) {
        Ok(()) => head == GZIP_MAGIC,
        Err(_) => false,
    };
    file.seek(SeekFrom::Start(0)).context("rewinding curve file")?;
    Ok(sniffed)
}

fn write_coords<W: Write>(w: &mut W, coords: &[u32]) -> Result<()> {
    let mut buf = Vec::with_capacity(BATCH_POINTS.min(coords.len()) * 4);
    for chunk in coords.chunks(BATCH_POINTS) {
        buf.clear();
        for &v in chunk {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        w.write_all(&buf)?;
    }
    Ok(())
}

fn read_coords<R: Read>(r: &mut R, n: usize) -> Result<Vec<u32>> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; BATCH_POINTS.min(n) * 4];
    let mut remaining = n;
    while remaining > 0 {
        let take = remaining.min(BATCH_POINTS);
        let bytes = &mut buf[..take * 4];
        r.read_exact(bytes).context("short read")?;
        out.reserve(take);
        for word in bytes.chunks_exact(4) {
            out.push(u32::from_le_bytes([word[0], word[1], word[2], word[3]]));
        }
        remaining -= take;
    }
    Ok(out)
}
