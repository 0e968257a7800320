use sha2::{Digest, Sha256};
use silo_types::ChecksumType;

use crate::salt::salt_in_place;
use crate::tz::TzHasher;

/// Streaming payload digest over one of the supported algorithms.
///
/// The engine can be reset and reused, so the range-hash path keeps a
/// single instance for every range of a request.
#[derive(Clone, Debug)]
pub enum ChecksumEngine {
    Sha256(Sha256),
    TillichZemor(TzHasher),
}

const SALT_BLOCK: usize = 1024;

impl ChecksumEngine {
    pub fn new(kind: ChecksumType) -> Self {
        match kind {
            ChecksumType::Sha256 => Self::Sha256(Sha256::new()),
            ChecksumType::TillichZemor => Self::TillichZemor(TzHasher::new()),
        }
    }

    pub fn kind(&self) -> ChecksumType {
        match self {
            Self::Sha256(_) => ChecksumType::Sha256,
            Self::TillichZemor(_) => ChecksumType::TillichZemor,
        }
    }

    pub fn digest_size(&self) -> usize {
        self.kind().digest_len()
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(data),
            Self::TillichZemor(h) => h.update(data),
        }
    }

    /// Feed `data` XOR-ed with a repeating `salt`. The salt restarts at the
    /// first byte of `data`.
    pub fn update_salted(&mut self, data: &[u8], salt: &[u8]) {
        if salt.is_empty() {
            self.update(data);
            return;
        }
        let mut block = [0u8; SALT_BLOCK];
        for (n, chunk) in data.chunks(SALT_BLOCK).enumerate() {
            let buf = &mut block[..chunk.len()];
            buf.copy_from_slice(chunk);
            salt_in_place(buf, salt, n * SALT_BLOCK);
            self.update(buf);
        }
    }

    /// Extract the digest and return the engine to its empty state.
    pub fn finalize_reset(&mut self) -> Vec<u8> {
        match self {
            Self::Sha256(h) => h.finalize_reset().to_vec(),
            Self::TillichZemor(h) => {
                let sum = h.digest().to_vec();
                h.reset();
                sum
            }
        }
    }

    pub fn reset(&mut self) {
        match self {
            Self::Sha256(h) => Digest::reset(h),
            Self::TillichZemor(h) => h.reset(),
        }
    }
}

/// One-shot digest of `data` with the given algorithm.
pub fn digest(kind: ChecksumType, data: &[u8]) -> Vec<u8> {
    let mut engine = ChecksumEngine::new(kind);
    engine.update(data);
    engine.finalize_reset()
}
