//! The request-handling core: one immutable `Service` value per process.

use std::sync::Arc;

use sha1::{Digest, Sha1};
use tracing::warn;

use curve::HilbertCurve;
use raster::{downsample_4x4, project};

use crate::classify::Classifier;
use crate::digest::{DigestErrorPolicy, DigestKind, SimilarityDigest};
use crate::error::FingerprintError;
use crate::ident::{dna_id, generic_id};
use crate::types::{
    BufferRequest, BufferResponse, ServiceCapabilities, MAGIC_DNA, MAGIC_FILEMAGIC, MIN_BUFFER_LEN,
};

/// Feature toggles for the optional similarity digests.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct DigestToggles {
    pub ssdeep: bool,
    pub sdhash: bool,
    pub tlsh: bool,
}

impl DigestToggles {
    fn enabled(&self, kind: DigestKind) -> bool {
        match kind {
            DigestKind::Ssdeep => self.ssdeep,
            DigestKind::Sdhash => self.sdhash,
            DigestKind::Tlsh => self.tlsh,
        }
    }
}

/// Process-wide immutable state: the loaded curve, the classifier, and the
/// digest configuration. Every request is a pure function of its buffer and
/// this value, so requests need no synchronization.
pub struct Service {
    curve: Arc<HilbertCurve>,
    classifier: Arc<dyn Classifier>,
    dna: bool,
    toggles: DigestToggles,
    digests: Vec<SimilarityDigest>,
}

impl Service {
    pub fn new(
        curve: Arc<HilbertCurve>,
        classifier: Arc<dyn Classifier>,
        dna: bool,
        toggles: DigestToggles,
    ) -> Self {
        Self { curve, classifier, dna, toggles, digests: Vec::new() }
    }

    /// Register a similarity digest. Digests run in the fixed ssdeep, sdhash,
    /// tlsh order regardless of registration order.
    pub fn with_digest(mut self, digest: SimilarityDigest) -> Self {
        self.digests.push(digest);
        self.digests.sort_by_key(|d| walk_rank(d.kind));
        self
    }

    pub fn curve(&self) -> &Arc<HilbertCurve> {
        &self.curve
    }

    pub fn dna(&self) -> bool {
        self.dna
    }

    pub fn capabilities(&self) -> ServiceCapabilities {
        ServiceCapabilities {
            acceleration: "none".to_string(),
            max_order: self.curve.order(),
            magic: if self.dna { MAGIC_DNA } else { MAGIC_FILEMAGIC }.to_string(),
            ssdeep: self.toggles.ssdeep,
        }
    }

    pub fn cluster_buffer(&self, req: &BufferRequest) -> Result<BufferResponse, FingerprintError> {
        let buffer = &req.buffer;
        if buffer.len() < MIN_BUFFER_LEN {
            return Err(FingerprintError::BufferTooSmall {
                len: buffer.len(),
                min: MIN_BUFFER_LEN,
            });
        }

        let image = project(&self.curve, buffer)?;
        let voxel = downsample_4x4(&image);

        let mut response = BufferResponse {
            h_order: image.order,
            label: req.label.clone(),
            ..Default::default()
        };
        if self.dna {
            response.magic = MAGIC_DNA.to_string();
            response.id = dna_id(image.order, &voxel);
        } else {
            response.magic = self.classifier.classify(buffer);
            response.id = generic_id(image.order, &response.magic, &voxel);
            response.sha1 = Some(hex::encode(Sha1::digest(buffer)));
        }

        for digest in &self.digests {
            if !self.toggles.enabled(digest.kind) || buffer.len() <= digest.min_len {
                continue;
            }
            let value = match (digest.compute)(buffer) {
                Ok(v) => Some(v),
                Err(err) => {
                    warn!(kind = ?digest.kind, %err, "similarity digest failed");
                    match digest.on_error {
                        DigestErrorPolicy::StoreMessage => Some(err.to_string()),
                        DigestErrorPolicy::Omit => None,
                    }
                }
            };
            if value.is_some() {
                match digest.kind {
                    DigestKind::Ssdeep => response.ssdeep = value,
                    DigestKind::Sdhash => response.sdhash = value,
                    DigestKind::Tlsh => response.tlsh = value,
                }
            }
        }

        Ok(response)
    }
}

fn walk_rank(kind: DigestKind) -> u8 {
    match kind {
        DigestKind::Ssdeep => 0,
        DigestKind::Sdhash => 1,
        DigestKind::Tlsh => 2,
    }
}
