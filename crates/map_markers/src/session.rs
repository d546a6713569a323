use std::{error::Error, fmt};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use model::session::{InvalidSessionHash, SessionHash};
use rand::{rngs::OsRng, RngCore as _};

/// Random bytes behind every session hash.
pub const SESSION_HASH_BYTES: usize = 32;

#[derive(Debug)]
pub enum SessionHashError {
    Rng(rand::Error),
    Malformed(InvalidSessionHash),
}

impl fmt::Display for SessionHashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rng(why) => write!(f, "failed to generate session hash: {}", why),
            Self::Malformed(why) => write!(f, "failed to generate session hash: {}", why),
        }
    }
}

impl Error for SessionHashError {}

/// Mints a new session hash from the operating system's random source.
pub fn generate_session_hash() -> Result<SessionHash, SessionHashError> {
    let mut bytes = [0u8; SESSION_HASH_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(SessionHashError::Rng)?;
    SessionHash::parse(URL_SAFE_NO_PAD.encode(bytes)).map_err(SessionHashError::Malformed)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use model::session::is_valid_session_hash;

    use super::*;

    #[test]
    fn generated_hashes_pass_validation() {
        for _ in 0..64 {
            let hash = generate_session_hash().unwrap();
            assert_eq!(hash.as_str().len(), 43);
            assert!(is_valid_session_hash(hash.as_str()));
        }
    }

    #[test]
    fn generated_hashes_differ() {
        let hashes = (0..64)
            .map(|_| generate_session_hash().unwrap().into_inner())
            .collect::<HashSet<_>>();
        assert_eq!(hashes.len(), 64);
    }
}
