use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Numeric user id, carried as a string.
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

/// Verified identity of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// ============================================================================
// Token Issuing & Verification
// ============================================================================

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>, expiration: u64) -> Self {
        Self { secret: secret.into(), expiration }
    }

    pub fn issue_token(&self, user_id: i64, role: Role) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: (Utc::now() + Duration::seconds(self.expiration as i64)).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
    }

    /// Decodes an HS256 token. `None` for bad signatures, expired tokens
    /// and subjects that are not user ids.
    pub fn verify(&self, token: &str) -> Option<Identity> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .ok()?;
        let user_id = data.claims.sub.parse().ok()?;
        Some(Identity { user_id, role: data.claims.role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_token_verifies() {
        let auth = AuthConfig::new("secret", 60);
        let token = auth.issue_token(7, Role::Admin).unwrap();
        assert_eq!(auth.verify(&token), Some(Identity { user_id: 7, role: Role::Admin }));
    }

    #[test]
    fn test_foreign_secret_is_rejected() {
        let token = AuthConfig::new("one", 60).issue_token(7, Role::User).unwrap();
        assert_eq!(AuthConfig::new("two", 60).verify(&token), None);
    }

    #[test]
    fn test_non_numeric_subject_is_rejected() {
        let auth = AuthConfig::new("secret", 60);
        let claims = Claims { sub: "guest-1".into(), role: Role::User, exp: (Utc::now().timestamp() + 60) as usize };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"secret")).unwrap();
        assert_eq!(auth.verify(&token), None);
    }
}
