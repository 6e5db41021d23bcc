pub mod access;
pub mod claims;
pub mod extractors;
pub mod gate;
pub mod middleware;

pub use claims::{AuthUser, Claims};

use chrono::{Duration, Utc};
use db::models::Role;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use util::config;

/// Why a presented token was rejected.
///
/// The distinction matters to callers: an expired token was once genuine,
/// a tampered or malformed one never was. Both end the request with 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
}

/// Generates a JWT and its expiry timestamp for the given account.
///
/// One signing policy covers every token the server issues: the secret and
/// lifetime come from `JWT_SECRET` / `JWT_DURATION_MINUTES`.
pub fn generate_jwt(account_id: &str, role: Role) -> (String, String) {
    let expiry = Utc::now() + Duration::minutes(config::jwt_duration_minutes());

    let claims = Claims {
        sub: account_id.to_string(),
        role,
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )
    .expect("Token encoding failed");

    (token, expiry.to_rfc3339())
}

/// Checks signature integrity and expiry, returning the embedded claims.
pub fn decode_token(token: &str) -> Result<Claims, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config::jwt_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use util::config::AppConfig;

    fn init_test_config() {
        AppConfig::set_jwt_secret("token-service-test-secret");
        AppConfig::set_jwt_duration_minutes(60);
    }

    #[test]
    #[serial]
    fn issued_tokens_decode_to_their_claims() {
        init_test_config();

        let (token, expiry) = generate_jwt("account-1", Role::Teacher);
        let claims = decode_token(&token).unwrap();

        assert_eq!(claims.sub, "account-1");
        assert_eq!(claims.role, Role::Teacher);

        let expiry = chrono::DateTime::parse_from_rfc3339(&expiry).unwrap();
        assert!(expiry > Utc::now());
    }

    #[test]
    #[serial]
    fn expired_tokens_are_reported_as_expired() {
        init_test_config();

        // Encode directly with an expiry far enough in the past to clear the
        // decoder's clock-skew leeway.
        let claims = Claims {
            sub: "account-1".into(),
            role: Role::User,
            exp: (Utc::now() - Duration::minutes(10)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
        )
        .unwrap();

        assert_eq!(decode_token(&token), Err(TokenError::Expired));
    }

    #[test]
    #[serial]
    fn foreign_signatures_are_invalid() {
        init_test_config();

        let (token, _) = generate_jwt("account-1", Role::User);
        AppConfig::set_jwt_secret("a-different-secret");

        assert_eq!(decode_token(&token), Err(TokenError::Invalid));
    }

    #[test]
    #[serial]
    fn garbage_tokens_are_invalid() {
        init_test_config();

        for token in ["", "not-a-jwt", "a.b", "a.b.c"] {
            assert_eq!(decode_token(token), Err(TokenError::Invalid));
        }
    }
}
