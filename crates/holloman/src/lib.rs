//! Fingerprint assembly: identifier rendering, content-type classification,
//! similarity digests, and the request-handling service core.

pub mod classify;
pub mod digest;
pub mod error;
pub mod ident;
pub mod service;
pub mod types;

pub use classify::{Classifier, RuleClassifier, SerialClassifier, SingleShotClassifier};
pub use digest::{
    ssdeep_digest, DigestErrorPolicy, DigestKind, SimilarityDigest, SSDEEP_MIN_LEN, TLSH_MIN_LEN,
};
pub use error::FingerprintError;
pub use ident::{dna_id, generic_id, magic_hash, order_letter, pad_magic, ORDER_ALPHABET};
pub use service::{DigestToggles, Service};
pub use types::{
    BufferRequest, BufferResponse, ServiceCapabilities, MAGIC_DNA, MAGIC_FILEMAGIC, MIN_BUFFER_LEN,
};
