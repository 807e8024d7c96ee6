//! Source file hashing.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

const BUFFER_SIZE: usize = 65536;

/// Computes the hex SHA-256 digest of a file.
pub fn compute_file_sha256(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Digest of the source file, or `None` when it can no longer be read.
///
/// Lineage is recorded after ingestion, so a source that has since moved
/// is not an error.
pub fn source_hash(path: &Path) -> Option<String> {
    match compute_file_sha256(path) {
        Ok(hash) => Some(hash),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Source file not hashable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_known_digest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        assert_eq!(
            compute_file_sha256(file.path()).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_missing_file_has_no_hash() {
        assert_eq!(source_hash(Path::new("/nonexistent/source.csv")), None);
    }
}
