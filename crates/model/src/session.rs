use std::{borrow::Cow, error::Error, fmt, sync::LazyLock};

use regex::Regex;
use schemars::{
    gen::SchemaGenerator,
    schema::{InstanceType, Schema, SchemaObject, StringValidation},
    JsonSchema,
};
use serde::{Deserialize, Serialize};

/// Shortest session hash accepted. Freshly minted hashes are 43 characters.
pub const MIN_SESSION_HASH_LENGTH: usize = 32;

static BASE64URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\-_]+$").expect("valid regex"));

/// Returns whether `hash` looks like a session hash: base64url characters only
/// and at least [`MIN_SESSION_HASH_LENGTH`] long.
pub fn is_valid_session_hash(hash: &str) -> bool {
    hash.len() >= MIN_SESSION_HASH_LENGTH && BASE64URL.is_match(hash)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSessionHash(pub String);

impl fmt::Display for InvalidSessionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid session hash (expected at least {} base64url characters)",
            MIN_SESSION_HASH_LENGTH
        )
    }
}

impl Error for InvalidSessionHash {}

/// The opaque token partitioning markers and map positions. Whoever knows it
/// can read and modify everything stored under it.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionHash(String);

impl SessionHash {
    pub fn parse<S: Into<String>>(hash: S) -> Result<Self, InvalidSessionHash> {
        let hash = hash.into();
        if is_valid_session_hash(&hash) {
            Ok(Self(hash))
        } else {
            Err(InvalidSessionHash(hash))
        }
    }

    /// Wraps a hash read back from storage. Rows are only ever selected by a
    /// validated hash, so no second check is done here.
    pub fn from_storage(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// Session hashes are credentials, keep them out of debug logs.
impl fmt::Debug for SessionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "SessionHash({}…)", prefix)
    }
}

impl fmt::Display for SessionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionHash {
    type Error = InvalidSessionHash;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl Serialize for SessionHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SessionHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(raw).map_err(serde::de::Error::custom)
    }
}

impl JsonSchema for SessionHash {
    fn schema_name() -> String {
        "SessionHash".to_owned()
    }

    fn schema_id() -> Cow<'static, str> {
        Cow::Borrowed(concat!(module_path!(), "::SessionHash"))
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            string: Some(Box::new(StringValidation {
                min_length: Some(MIN_SESSION_HASH_LENGTH as u32),
                pattern: Some(BASE64URL.as_str().to_owned()),
                ..Default::default()
            })),
            ..Default::default()
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "Zq3v-_x8Yb2Qm9TnLk4Wp7Rs1Dh6Fg0JcVe5Ua2Xo";

    #[test]
    fn accepts_base64url_tokens() {
        assert!(is_valid_session_hash(VALID));
        assert!(is_valid_session_hash(&"a".repeat(32)));
        assert!(SessionHash::parse(VALID).is_ok());
    }

    #[test]
    fn rejects_short_tokens() {
        assert!(!is_valid_session_hash(&"a".repeat(31)));
        assert!(!is_valid_session_hash(""));
    }

    #[test]
    fn rejects_foreign_characters() {
        let padded = format!("{}=", &VALID[..40]);
        assert!(!is_valid_session_hash(&padded));
        let with_slash = VALID.replace('_', "/");
        assert!(!is_valid_session_hash(&with_slash));
        let with_space = VALID.replace('-', " ");
        assert!(!is_valid_session_hash(&with_space));
    }

    #[test]
    fn deserialization_validates() {
        let ok: SessionHash = serde_json::from_str(&format!("\"{}\"", VALID)).unwrap();
        assert_eq!(ok.as_str(), VALID);
        assert!(serde_json::from_str::<SessionHash>("\"short\"").is_err());
    }

    #[test]
    fn debug_does_not_leak_hash() {
        let hash = SessionHash::parse(VALID).unwrap();
        let debug = format!("{:?}", hash);
        assert!(!debug.contains(VALID));
        assert!(debug.starts_with("SessionHash(Zq3v-_"));
    }
}
