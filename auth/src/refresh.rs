use rand::distr::Alphanumeric;
use rand::rng;
use rand::Rng;
use sha2::Digest;
use sha2::Sha256;

/// Length of a refresh secret in alphanumeric characters (~380 bits).
pub const SECRET_LENGTH: usize = 64;

/// A freshly generated refresh secret and its digest.
///
/// `secret` goes to the client exactly once; only `digest` is ever stored.
pub struct RefreshSecret {
    pub secret: String,
    pub digest: String,
}

impl std::fmt::Debug for RefreshSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshSecret")
            .field("secret", &"<redacted>")
            .field("digest", &self.digest)
            .finish()
    }
}

impl RefreshSecret {
    /// Generate a new random secret from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let secret: String = rng()
            .sample_iter(&Alphanumeric)
            .take(SECRET_LENGTH)
            .map(char::from)
            .collect();
        let digest = digest(&secret);

        Self { secret, digest }
    }
}

/// SHA-256 a refresh secret for storage and lookup (lower-case hex).
pub fn digest(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}
