use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use tracing::{debug, info, instrument};

use super::domain::{Claims, JwtResponse, LoginInput};
use super::errors::AuthError;
use super::password::verify_password;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl: chrono::Duration,
}

impl AuthConfig {
    /// Hours beyond what `chrono::Duration` can hold saturate; such a TTL
    /// then fails at token issue instead of panicking here.
    pub fn new(jwt_secret: impl Into<String>, ttl_hours: i64) -> Self {
        let token_ttl = chrono::Duration::try_hours(ttl_hours).unwrap_or(chrono::Duration::MAX);
        Self { jwt_secret: Some(jwt_secret.into()), token_ttl }
    }
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self::new(cfg.jwt_secret.clone(), cfg.token_ttl_hours)
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Check credentials and issue a signed token.
    ///
    /// Unknown email and wrong password fail identically.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, domain::LoginInput};
    /// use service::member_service::{MemberDto, MemberService};
    /// use service::repo::memory::InMemoryStore;
    /// use std::sync::Arc;
    /// let store = Arc::new(InMemoryStore::with_roles(&["Admin"]));
    /// let org_id = store.insert_organization("Acme", "ops@acme.io");
    /// let role_id = store.role_id("Admin").unwrap();
    /// let members = MemberService::new(store.clone());
    /// let dto = MemberDto::new("Ada", "ada@acme.io", "secret1", org_id, role_id);
    /// tokio_test::block_on(members.create_member(dto)).unwrap();
    ///
    /// let svc = AuthService::new(store, AuthConfig::new("secret", 12));
    /// let res = tokio_test::block_on(svc.authenticate(LoginInput { email: "ada@acme.io".into(), password: "secret1".into() })).unwrap();
    /// assert_eq!(res.role, "Admin");
    /// assert!(!res.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn authenticate(&self, input: LoginInput) -> Result<JwtResponse, AuthError> {
        let account = match self.repo.find_account_by_email(&input.email).await? {
            Some(a) => a,
            None => {
                debug!("no member with this email");
                return Err(AuthError::Unauthorized);
            }
        };

        if !verify_password(&input.password, &account.password_hash)? {
            debug!(member_id = account.member_id, "password mismatch");
            return Err(AuthError::Unauthorized);
        }

        let secret = self.cfg.jwt_secret.as_deref().ok_or_else(|| AuthError::TokenError("jwt secret not configured".into()))?;
        let now = chrono::Utc::now();
        let expires = now
            .checked_add_signed(self.cfg.token_ttl)
            .ok_or_else(|| AuthError::TokenError("token ttl out of range".into()))?;
        let claims = Claims {
            sub: account.email.clone(),
            mid: account.member_id,
            oid: account.org_id,
            role: account.role.clone(),
            iat: now.timestamp() as usize,
            exp: expires.timestamp() as usize,
        };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;

        info!(member_id = account.member_id, org_id = account.org_id, role = %account.role, "member_authenticated");
        Ok(JwtResponse {
            token,
            member_id: account.member_id,
            name: account.name,
            org_id: account.org_id,
            role: account.role,
        })
    }

    /// Decode and validate a token issued by [`AuthService::authenticate`].
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let secret = self.cfg.jwt_secret.as_deref().ok_or_else(|| AuthError::TokenError("jwt secret not configured".into()))?;
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}
