//! Content identity for media files.
//!
//! A file's identity is a hex digest of its bytes and nothing else, so copies
//! of the same file collapse to one catalog entry and any edit produces a new
//! one.

mod hasher;

pub use hasher::IdentityHasher;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Digest used to derive identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdentityAlgorithm {
    /// MD5, 32 hex chars. Matches identities in existing catalogs.
    #[default]
    Md5,
    /// SHA-256, 64 hex chars.
    Sha256,
}

impl IdentityAlgorithm {
    /// Length of the hex digest produced by this algorithm.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha256 => 64,
        }
    }
}

/// Errors computing an identity.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The source could not be opened or read to completion.
    #[error("Failed to read {path} for hashing")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
