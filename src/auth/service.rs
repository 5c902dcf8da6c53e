//! Authentication Service
//!
//! Core authentication logic: Argon2id password hashing, JWT generation and
//! validation, signup and login flows over the user store.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::models::{AuthResponse, LoginRequest, SignupRequest, TokenClaims, User, UserResponse};
use crate::store::UserStore;

/// Authentication service
pub struct AuthService {
    store: UserStore,
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(store: UserStore, config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        Self {
            store,
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>, ApiError> {
        let params = Params::new(
            self.config.argon2_memory_cost,
            self.config.argon2_time_cost,
            self.config.argon2_parallelism,
            None,
        )
        .map_err(|_| ApiError::Internal)?;

        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }

    // ============================================
    // Password Hashing
    // ============================================

    /// Hash a password using Argon2id with a per-call random salt
    pub fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        Ok(hash)
    }

    /// Verify a password against a stored hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| ApiError::Internal)?;

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    // ============================================
    // JWT Tokens
    // ============================================

    /// Issue a signed token embedding the user's identity claims
    pub fn generate_token(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.config.token_expiration);

        let claims = TokenClaims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify a token's signature and expiry, returning its claims
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, ApiError> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &Validation::default())?;
        Ok(token_data.claims)
    }

    // ============================================
    // Signup / Login
    // ============================================

    /// Create a new account with a hashed credential
    pub async fn signup(&self, req: SignupRequest) -> Result<User, ApiError> {
        if self.store.find_by_email(&req.email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }

        let hash = self.hash_password(&req.password)?;

        // a concurrent signup between the check and the insert still surfaces
        // as a unique violation, which maps to the same Conflict
        let user = self.store.create(&req.name, &req.email, Some(&hash)).await?;

        Ok(user)
    }

    /// Verify credentials and issue a token.
    ///
    /// Unknown email, an account without a credential, and a wrong password
    /// are indistinguishable to the caller.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, ApiError> {
        let user = self
            .store
            .find_by_email(&req.email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(ApiError::InvalidCredentials)?;

        if !self.verify_password(&req.password, hash)? {
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.generate_token(&user)?;

        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }
}
