//! Content hashing for download verification.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

const BUFFER_SIZE: usize = 1 << 13;

/// SHA-256 of a file as lowercase hex.
///
/// Returns an empty string if the file can't be opened or read, so the
/// result never matches a published checksum.
pub fn sha256_file(path: &Path) -> String {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            debug!("Can't open {:?} for hashing: {}", path, e);
            return String::new();
        }
    };

    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUFFER_SIZE];
    loop {
        match file.read(&mut buf) {
            Ok(0) => break,
            Ok(read) => hasher.update(&buf[..read]),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("Can't read {:?} for hashing: {}", path, e);
                return String::new();
            }
        }
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EMPTY_HASH: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const CONTENT_HASH: &str = "ed7002b439e9ac845f22357d822bac1444730fbdb6016d3ec9432297b9ec9f73";

    #[test]
    fn test_sha256_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(sha256_file(file.path()), EMPTY_HASH);

        file.write_all(b"content").unwrap();
        file.flush().unwrap();
        assert_eq!(sha256_file(file.path()), CONTENT_HASH);
        // Same input, same digest.
        assert_eq!(sha256_file(file.path()), CONTENT_HASH);

        let path = file.path().to_path_buf();
        drop(file);
        assert_eq!(sha256_file(&path), "");
    }

    #[test]
    fn test_larger_than_buffer() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let data = vec![b'a'; BUFFER_SIZE * 3 + 17];
        file.write_all(&data).unwrap();
        file.flush().unwrap();

        assert_eq!(sha256_file(file.path()), hex::encode(Sha256::digest(&data)));
    }
}
