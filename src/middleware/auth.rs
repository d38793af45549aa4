use crate::models::auth::{AuthenticatedUser, Claims};
use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Resolves the caller of a request. Returns `None` for anonymous callers and
/// for sessions that lack a user id or email.
pub trait SessionVerifier: Send + Sync {
    fn verify(&self, headers: &HeaderMap) -> Option<AuthenticatedUser>;
}

/// Verifies HS256 session tokens issued by the identity provider.
#[derive(Clone)]
pub struct JwtSessionVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    cookie_name: String,
}

impl JwtSessionVerifier {
    pub fn new(secret: &str, cookie_name: impl Into<String>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            cookie_name: cookie_name.into(),
        }
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

impl SessionVerifier for JwtSessionVerifier {
    fn verify(&self, headers: &HeaderMap) -> Option<AuthenticatedUser> {
        // Bearer token first, session cookie second
        let token = bearer_token(headers).or_else(|| cookie_value(headers, &self.cookie_name))?;

        match self.verify_token(token) {
            Ok(claims) => {
                let user = AuthenticatedUser::from_claims(claims);
                if user.is_none() {
                    tracing::warn!("Session token is missing a user id or email");
                }
                user
            }
            Err(e) => {
                tracing::warn!("JWT verification failed: {}", e);
                None
            }
        }
    }
}

/// Mints a session token. Production tokens come from the identity provider;
/// this is used by the `issue_session_token` tool and tests.
pub fn issue_session_token(
    secret: &str,
    user_id: &str,
    email: &str,
    name: Option<String>,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        name,
        exp: (now + ttl).timestamp().max(0) as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
