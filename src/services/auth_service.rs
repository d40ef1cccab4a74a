//! Account registration, login and token refresh.

use std::sync::Arc;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::models::{Account, NewAccount};
use crate::repositories::AccountRepository;
use crate::utils::jwt::{TokenPair, generate_token_pair, validate_refresh_token};
use crate::utils::password::{hash_password, verify_password};

/// An authenticated account together with freshly issued tokens.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub account: Account,
    pub tokens: TokenPair,
}

#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    jwt: JwtConfig,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountRepository>, jwt: JwtConfig) -> Self {
        Self { accounts, jwt }
    }

    /// Creates an account and signs it in.
    ///
    /// # Errors
    ///
    /// `AppError::Duplicate` when the email is already registered.
    pub async fn register(
        &self,
        username: String,
        email: String,
        password: &str,
    ) -> AppResult<AuthSession> {
        let account = self
            .accounts
            .create(NewAccount {
                username,
                email,
                password: hash_password(password)?,
            })
            .await?;

        self.session(account)
    }

    /// Verifies credentials. Unknown emails and wrong passwords produce the
    /// same error.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(password, &account.password)? {
            tracing::warn!(account_id = account.id, "Login rejected: wrong password");
            return Err(invalid_credentials());
        }

        tracing::info!(account_id = account.id, "Account logged in");
        self.session(account)
    }

    /// Exchanges a refresh token for a new pair, provided the account still
    /// exists.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthSession> {
        let claims = validate_refresh_token(refresh_token, &self.jwt.secret)?;
        let account = self
            .accounts
            .find_by_id(claims.account_id()?)
            .await?
            .ok_or_else(|| AppError::Unauthorized {
                message: "Account no longer exists".to_string(),
            })?;

        self.session(account)
    }

    fn session(&self, account: Account) -> AppResult<AuthSession> {
        let tokens = generate_token_pair(account.id, &account.email, &account.username, &self.jwt)?;
        Ok(AuthSession { account, tokens })
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized {
        message: "Invalid email or password".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryAccountRepository;
    use crate::utils::jwt::validate_access_token;

    const SECRET: &str = "unit-test-secret-unit-test-secret-0000";

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(MemoryAccountRepository::new()),
            JwtConfig {
                secret: SECRET.to_string(),
                access_token_expiration: 1,
                refresh_token_expiration: 24,
            },
        )
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service();
        let registered = auth
            .register("owner".into(), "owner@example.com".into(), "secret1")
            .await
            .unwrap();
        assert_ne!(registered.account.password, "secret1");

        let session = auth.login("owner@example.com", "secret1").await.unwrap();
        assert_eq!(session.account.id, registered.account.id);

        let claims = validate_access_token(&session.tokens.access_token, SECRET).unwrap();
        assert_eq!(claims.account_id().unwrap(), registered.account.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let auth = service();
        auth.register("owner".into(), "owner@example.com".into(), "secret1")
            .await
            .unwrap();

        let wrong_password = auth.login("owner@example.com", "nope").await.unwrap_err();
        let unknown_email = auth.login("ghost@example.com", "secret1").await.unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let auth = service();
        let session = auth
            .register("owner".into(), "owner@example.com".into(), "secret1")
            .await
            .unwrap();

        assert!(auth.refresh(&session.tokens.refresh_token).await.is_ok());
        assert!(matches!(
            auth.refresh(&session.tokens.access_token).await,
            Err(AppError::Unauthorized { .. })
        ));
    }
}
