//! Content-type classification seam.

use std::sync::Mutex;

/// A content-type oracle. Infallible by contract: backends that can fail log
/// the error and return an empty label. Implementations must be safe to call
/// concurrently; wrap single-shot backends in [`SerialClassifier`].
pub trait Classifier: Send + Sync {
    fn classify(&self, buffer: &[u8]) -> String;
}

/// A backend that must not be entered concurrently (libmagic-style handles).
pub trait SingleShotClassifier: Send {
    fn classify(&mut self, buffer: &[u8]) -> String;
}

/// Serializes access to a single-shot backend. The lock covers only the
/// classify call; everything else in the request path stays lock-free.
pub struct SerialClassifier<C> {
    inner: Mutex<C>,
}

impl<C> SerialClassifier<C> {
    pub fn new(inner: C) -> Self {
        Self { inner: Mutex::new(inner) }
    }
}

impl<C: SingleShotClassifier> Classifier for SerialClassifier<C> {
    fn classify(&self, buffer: &[u8]) -> String {
        match self.inner.lock() {
            Ok(mut guard) => guard.classify(buffer),
            // A panicked classify call leaves no state worth protecting.
            Err(poisoned) => poisoned.into_inner().classify(buffer),
        }
    }
}

/// Pure rule-table classifier over leading magic bytes. Lock-free and
/// deliberately coarse; deployments wanting full libmagic fidelity plug
/// their own backend into the trait.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleClassifier;

impl Classifier for RuleClassifier {
    fn classify(&self, buffer: &[u8]) -> String {
        sniff(buffer).to_string()
    }
}

fn sniff(b: &[u8]) -> &'static str {
    const RULES: &[(&[u8], &str)] = &[
        (b"\x7fELF", "ELF executable"),
        (b"MZ", "PE executable (DOS stub)"),
        (b"\x89PNG\r\n\x1a\n", "PNG image data"),
        (b"\xff\xd8\xff", "JPEG image data"),
        (b"GIF87a", "GIF image data"),
        (b"GIF89a", "GIF image data"),
        (b"%PDF-", "PDF document"),
        (b"\x1f\x8b", "gzip compressed data"),
        (b"PK\x03\x04", "Zip archive data"),
        (b"BZh", "bzip2 compressed data"),
        (b"\xfd7zXZ\x00", "XZ compressed data"),
        (b"\x28\xb5\x2f\xfd", "Zstandard compressed data"),
        (b"RIFF", "RIFF data"),
        (b"\xcf\xfa\xed\xfe", "Mach-O 64-bit executable"),
        (b"\xfe\xed\xfa\xcf", "Mach-O 64-bit executable"),
    ];
    for (prefix, label) in RULES {
        if b.starts_with(prefix) {
            return label;
        }
    }
    // ustar magic sits at offset 257.
    if b.len() > 262 && &b[257..262] == b"ustar" {
        return "POSIX tar archive";
    }

    let head = &b[..b.len().min(512)];
    if head.contains(&0) {
        return "data";
    }
    if head
        .iter()
        .all(|&c| matches!(c, b'\t' | b'\n' | b'\r' | 0x20..=0x7e))
    {
        return "ASCII text";
    }
    match std::str::from_utf8(head) {
        Ok(_) => "UTF-8 Unicode text",
        // A multi-byte sequence cut off by the 512-byte window is still text.
        Err(e) if e.error_len().is_none() && e.valid_up_to() + 3 >= head.len() => {
            "UTF-8 Unicode text"
        }
        Err(_) => "data",
    }
}
