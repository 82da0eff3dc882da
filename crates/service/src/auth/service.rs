use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{
    Account, AccountRole, AccountStatus, LoginInput, LoginOutcome, NewAccount, RegisterInput,
};
use super::errors::AuthError;
use super::password;
use super::repository::AccountRepository;
use super::token::TokenService;

/// Registration and login workflows, independent of the web framework.
pub struct AuthService<R: AccountRepository> {
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

fn normalize_email(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn normalize_phone(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl<R: AccountRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    /// Register a new account with a hashed password.
    ///
    /// The boundary has already checked request shape, including "at least
    /// one contact method present"; this workflow normalizes contacts, runs
    /// optimistic duplicate checks and persists. The store's partial unique
    /// indexes remain the authoritative duplicate check: a conflict raised at
    /// insert time (a lost race) comes back as the same `Conflict` error.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenService};
    /// use service::auth::repository::mock::MockAccountRepository;
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAccountRepository::default());
    /// let tokens = Arc::new(TokenService::new("dGVzdC1zaWduaW5nLXNlY3JldC1mb3ItZG9jcy0zMmIh", 3_600_000).unwrap());
    /// let svc = AuthService::new(repo, tokens);
    /// let input = RegisterInput {
    ///     email: Some("John@X.com".into()),
    ///     phone: None,
    ///     password: "Password123".into(),
    ///     first_name: "John".into(),
    ///     last_name: "Doe".into(),
    /// };
    /// let account = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(account.email.as_deref(), Some("john@x.com"));
    /// ```
    #[instrument(skip(self, input), fields(has_email = input.email.is_some(), has_phone = input.phone.is_some()))]
    pub async fn register(&self, input: RegisterInput) -> Result<Account, AuthError> {
        let email = normalize_email(input.email.as_deref());
        let phone = normalize_phone(input.phone.as_deref());

        if let Some(email) = &email {
            if self.repo.exists_by_email(email).await? {
                debug!("email already registered");
                return Err(AuthError::Conflict { field: "email", value: email.clone() });
            }
        }
        if let Some(phone) = &phone {
            if self.repo.exists_by_phone(phone).await? {
                debug!("phone already registered");
                return Err(AuthError::Conflict { field: "phone", value: phone.clone() });
            }
        }

        // Argon2 is deliberately slow; keep it off the async workers.
        let plaintext = input.password;
        let password_hash = tokio::task::spawn_blocking(move || password::hash(&plaintext))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))??;

        let draft = NewAccount {
            email,
            phone,
            password_hash,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            role: AccountRole::Customer,
            status: AccountStatus::Active,
        };
        let account = self.repo.create(draft).await?;
        info!(account_id = %account.id, "account_registered");
        Ok(account)
    }

    /// Authenticate by email-or-phone identifier and issue a bearer token.
    ///
    /// Unknown identifier and wrong password fail identically: same error
    /// kind, same message.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenService};
    /// use service::auth::repository::mock::MockAccountRepository;
    /// use service::auth::domain::{LoginInput, RegisterInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAccountRepository::default());
    /// let tokens = Arc::new(TokenService::new("dGVzdC1zaWduaW5nLXNlY3JldC1mb3ItZG9jcy0zMmIh", 3_600_000).unwrap());
    /// let svc = AuthService::new(repo, tokens);
    /// let _ = tokio_test::block_on(svc.register(RegisterInput {
    ///     email: Some("u@e.com".into()), phone: None,
    ///     password: "Passw0rd".into(), first_name: "N".into(), last_name: "M".into(),
    /// }));
    /// let out = tokio_test::block_on(svc.login(LoginInput {
    ///     identifier: "u@e.com".into(), password: "Passw0rd".into(),
    /// })).unwrap();
    /// assert_eq!(out.token_type, "Bearer");
    /// assert!(!out.access_token.is_empty());
    /// ```
    #[instrument(skip(self, input))]
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutcome, AuthError> {
        let account = self
            .resolve_identifier(input.identifier.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let plaintext = input.password;
        let stored_hash = account.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || password::verify(&plaintext, &stored_hash))
            .await
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(&account)?;
        info!(account_id = %account.id, "login_succeeded");
        Ok(LoginOutcome {
            token_type: "Bearer".to_string(),
            access_token,
            expires_in: self.tokens.expiry_in_seconds(),
            account: account.public(),
        })
    }

    /// Fetch an account by id, for the resource the register `Location`
    /// header points at.
    pub async fn get_account(&self, id: Uuid) -> Result<Account, AuthError> {
        self.repo.find_by_id(id).await?.ok_or(AuthError::NotFound)
    }

    /// An identifier containing `@` is an email (compared lower-cased);
    /// anything else is a phone number with whitespace and hyphens stripped.
    /// Exactly one lookup path runs.
    async fn resolve_identifier(&self, identifier: &str) -> Result<Option<Account>, AuthError> {
        if identifier.contains('@') {
            self.repo.find_by_email(&identifier.to_lowercase()).await
        } else {
            let normalized: String = identifier
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '-')
                .collect();
            self.repo.find_by_phone(&normalized).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAccountRepository;

    const SECRET_B64: &str = "dGVzdC1zaWduaW5nLXNlY3JldC1mb3ItZG9jcy0zMmIh";

    fn svc() -> AuthService<MockAccountRepository> {
        let repo = Arc::new(MockAccountRepository::default());
        let tokens = Arc::new(TokenService::new(SECRET_B64, 3_600_000).unwrap());
        AuthService::new(repo, tokens)
    }

    fn register_input(email: Option<&str>, phone: Option<&str>) -> RegisterInput {
        RegisterInput {
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
            password: "Password123".into(),
            first_name: " John ".into(),
            last_name: "Doe".into(),
        }
    }

    #[tokio::test]
    async fn email_is_trimmed_and_lowercased() {
        let svc = svc();
        let account = svc
            .register(register_input(Some("  JOHN@X.com "), None))
            .await
            .unwrap();
        assert_eq!(account.email.as_deref(), Some("john@x.com"));
        assert_eq!(account.phone, None);
        assert_eq!(account.first_name, "John");
        assert_eq!(account.role, AccountRole::Customer);
        assert_eq!(account.status, AccountStatus::Active);
        assert_ne!(account.password_hash, "Password123");
    }

    #[tokio::test]
    async fn phone_only_registration_succeeds() {
        let svc = svc();
        let account = svc
            .register(register_input(None, Some(" +14155552671 ")))
            .await
            .unwrap();
        assert_eq!(account.email, None);
        assert_eq!(account.phone.as_deref(), Some("+14155552671"));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_regardless_of_case() {
        let svc = svc();
        svc.register(register_input(Some("a@b.com"), None)).await.unwrap();
        let err = svc
            .register(register_input(Some(" A@B.com "), None))
            .await
            .unwrap_err();
        match err {
            AuthError::Conflict { field, value } => {
                assert_eq!(field, "email");
                assert_eq!(value, "a@b.com");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn duplicate_phone_conflicts() {
        let svc = svc();
        svc.register(register_input(None, Some("+14155552671"))).await.unwrap();
        let err = svc
            .register(register_input(None, Some("+14155552671")))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict { field: "phone", .. }));
    }

    #[tokio::test]
    async fn two_accounts_without_email_are_allowed() {
        let svc = svc();
        svc.register(register_input(None, Some("+14155552671"))).await.unwrap();
        svc.register(register_input(None, Some("+14165552672"))).await.unwrap();
    }

    #[tokio::test]
    async fn login_by_email_succeeds_and_reports_expiry() {
        let svc = svc();
        svc.register(register_input(Some("john@x.com"), None)).await.unwrap();
        let out = svc
            .login(LoginInput { identifier: " John@X.com ".into(), password: "Password123".into() })
            .await
            .unwrap();
        assert_eq!(out.token_type, "Bearer");
        assert!(!out.access_token.is_empty());
        assert_eq!(out.expires_in, 3_600);
        assert_eq!(out.account.email.as_deref(), Some("john@x.com"));
    }

    #[tokio::test]
    async fn login_by_phone_strips_spaces_and_hyphens() {
        let svc = svc();
        svc.register(register_input(None, Some("+14155552671"))).await.unwrap();
        let out = svc
            .login(LoginInput {
                identifier: "+1 415-555-2671".into(),
                password: "Password123".into(),
            })
            .await
            .unwrap();
        assert_eq!(out.account.phone.as_deref(), Some("+14155552671"));
    }

    // Wrong password and unknown identifier must be indistinguishable.
    #[tokio::test]
    async fn credential_failures_are_uniform() {
        let svc = svc();
        svc.register(register_input(Some("john@x.com"), None)).await.unwrap();

        let wrong_password = svc
            .login(LoginInput { identifier: "john@x.com".into(), password: "nope1234".into() })
            .await
            .unwrap_err();
        let unknown_identifier = svc
            .login(LoginInput { identifier: "ghost@x.com".into(), password: "Password123".into() })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_identifier, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_identifier.to_string());
        assert_eq!(wrong_password.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn login_outcome_never_exposes_hash() {
        let svc = svc();
        svc.register(register_input(Some("john@x.com"), None)).await.unwrap();
        let out = svc
            .login(LoginInput { identifier: "john@x.com".into(), password: "Password123".into() })
            .await
            .unwrap();
        let json = serde_json::to_string(&out).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("Password123"));
    }

    #[tokio::test]
    async fn get_account_unknown_id_is_not_found() {
        let svc = svc();
        let err = svc.get_account(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    #[tokio::test]
    async fn issued_token_validates_and_carries_subject() {
        let svc = svc();
        let account = svc.register(register_input(Some("john@x.com"), None)).await.unwrap();
        let out = svc
            .login(LoginInput { identifier: "john@x.com".into(), password: "Password123".into() })
            .await
            .unwrap();
        let tokens = TokenService::new(SECRET_B64, 3_600_000).unwrap();
        assert!(tokens.validate(&out.access_token));
        assert_eq!(tokens.parse_subject(&out.access_token).unwrap(), account.id);
    }
}
