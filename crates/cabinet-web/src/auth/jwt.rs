use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    /// Token id, so individual tokens can be revoked on logout.
    pub jti: String,
}

pub fn create_token(jwt_secret: &str, ttl_hours: u64, username: &str) -> anyhow::Result<(String, u64)> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let expires_at = now + ttl_hours * 3600;

    let claims = Claims {
        sub: username.to_string(),
        exp: expires_at as usize,
        jti: uuid::Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )?;

    Ok((token, expires_at))
}

pub fn verify_token(jwt_secret: &str, token: &str) -> anyhow::Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_verify_round_trips() {
        let (token, expires_at) = create_token("test-secret", 1, "u1").unwrap();
        let claims = verify_token("test-secret", &token).unwrap();

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.exp as u64, expires_at);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (token, _) = create_token("secret-a", 1, "u1").unwrap();
        assert!(verify_token("secret-b", &token).is_err());
    }

    #[test]
    fn each_token_gets_a_fresh_jti() {
        let (a, _) = create_token("test-secret", 1, "u1").unwrap();
        let (b, _) = create_token("test-secret", 1, "u1").unwrap();
        let jti_a = verify_token("test-secret", &a).unwrap().jti;
        let jti_b = verify_token("test-secret", &b).unwrap().jti;
        assert_ne!(jti_a, jti_b);
    }
}
