//! Similarity digest plug-ins.
//!
//! Each digest is an optional pure function from the buffer to a display
//! string, gated by a strict minimum length. The assembler walks the
//! configured list in a fixed order; nothing else in the core depends on
//! which digests exist.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;

/// Strict lower bound for ssdeep: computed only for buffers longer than this.
pub const SSDEEP_MIN_LEN: usize = 4096;
/// Strict lower bound for TLSH.
pub const TLSH_MIN_LEN: usize = 256;

/// Which response field a digest populates.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DigestKind {
    Ssdeep,
    Sdhash,
    Tlsh,
}

/// What to do with a failed digest computation. Failures never abort the
/// response either way.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DigestErrorPolicy {
    /// Store the error message in the response field. Matches the historical
    /// ssdeep behavior, kept for fingerprint-record compatibility.
    StoreMessage,
    /// Leave the field unset.
    Omit,
}

pub type DigestFn = Arc<dyn Fn(&[u8]) -> Result<String> + Send + Sync>;

#[derive(Clone)]
pub struct SimilarityDigest {
    pub kind: DigestKind,
    /// Computed only when the buffer is strictly longer than this.
    pub min_len: usize,
    pub on_error: DigestErrorPolicy,
    pub compute: DigestFn,
}

impl fmt::Debug for SimilarityDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityDigest")
            .field("kind", &self.kind)
            .field("min_len", &self.min_len)
            .field("on_error", &self.on_error)
            .finish_non_exhaustive()
    }
}

/// Built-in ssdeep-compatible digest.
pub fn ssdeep_digest() -> SimilarityDigest {
    SimilarityDigest {
        kind: DigestKind::Ssdeep,
        min_len: SSDEEP_MIN_LEN,
        on_error: DigestErrorPolicy::StoreMessage,
        compute: Arc::new(|buffer| Ok(fuzzyhash::FuzzyHash::new(buffer).to_string())),
    }
}
