use jsonwebtoken::Algorithm;

/// Signing settings for scorer access tokens.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    /// Pinned on verification; tokens signed with anything else are rejected.
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
        }
    }

    /// Fresh random secret so tokens from one test never verify in another.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"default_secret_for_tests_only".to_vec())
    }
}
