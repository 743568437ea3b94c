use crate::domain::Role;
use crate::errors::custom::AuthError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: i32,
    pub role: Role,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// A signed token and the moment it stops being accepted, in epoch millis.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &SecretString, expiration_minutes: i64) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::minutes(expiration_minutes),
        }
    }

    pub fn create_jwt(
        &self,
        user_id: i32,
        role: Role,
        email: &str,
        name: &str,
    ) -> Result<IssuedToken, AuthError> {
        let issued_at = Utc::now();
        let expires = issued_at + self.ttl;
        let claims = Claims {
            sub: user_id,
            role,
            email: email.to_string(),
            name: name.to_string(),
            iat: issued_at.timestamp(),
            exp: expires.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| AuthError::JwtAuthenticationError(err.to_string()))?;
        Ok(IssuedToken {
            token,
            expires_at: expires.timestamp_millis(),
        })
    }

    pub fn verify_jwt(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let token_data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|err| AuthError::JwtAuthenticationError(err.to_string()))?;
        Ok(token_data.claims)
    }
}
