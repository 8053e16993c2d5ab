//! Streaming digest over a file's full contents.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::{IdentityAlgorithm, IdentityError};

const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Computes content identities.
///
/// [`IdentityHasher::hash_file`] always opens its own handle. Tag parsers read
/// an arbitrary prefix of the file, so sharing their cursor would hash only the
/// remainder and give an identity that depends on the parser.
#[derive(Debug, Clone)]
pub struct IdentityHasher {
    algorithm: IdentityAlgorithm,
    buffer_size: usize,
}

impl Default for IdentityHasher {
    fn default() -> Self {
        Self::new(IdentityAlgorithm::default())
    }
}

impl IdentityHasher {
    pub fn new(algorithm: IdentityAlgorithm) -> Self {
        Self {
            algorithm,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Override the read buffer size (mainly for tests).
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn algorithm(&self) -> IdentityAlgorithm {
        self.algorithm
    }

    /// Hash the complete contents of the file at `path`.
    pub fn hash_file(&self, path: &Path) -> Result<String, IdentityError> {
        let file = File::open(path).map_err(|e| io_error(path, e))?;
        let reader = BufReader::with_capacity(self.buffer_size, file);
        self.hash_reader(reader).map_err(|e| io_error(path, e))
    }

    /// Hash everything `reader` yields until EOF.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<String> {
        let mut buffer = vec![0u8; self.buffer_size];

        match self.algorithm {
            IdentityAlgorithm::Md5 => {
                let mut context = md5::Context::new();
                loop {
                    let bytes_read = read_chunk(&mut reader, &mut buffer)?;
                    if bytes_read == 0 {
                        break;
                    }
                    context.consume(&buffer[..bytes_read]);
                }
                Ok(format!("{:x}", context.compute()))
            }
            IdentityAlgorithm::Sha256 => {
                let mut hasher = Sha256::new();
                loop {
                    let bytes_read = read_chunk(&mut reader, &mut buffer)?;
                    if bytes_read == 0 {
                        break;
                    }
                    hasher.update(&buffer[..bytes_read]);
                }
                Ok(format!("{:x}", hasher.finalize()))
            }
        }
    }
}

fn read_chunk<R: Read>(reader: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buffer) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

fn io_error(path: &Path, source: io::Error) -> IdentityError {
    IdentityError::Io {
        path: PathBuf::from(path),
        source,
    }
}
