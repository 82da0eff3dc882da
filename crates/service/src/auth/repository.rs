use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{Account, NewAccount};
use super::errors::AuthError;

/// Identity store contract.
///
/// Lookups take already-normalized values. `create` must fail with
/// `AuthError::Conflict` when a present email or phone collides with an
/// existing account; implementations back this with a uniqueness constraint
/// scoped to non-null values, which is the authoritative check — the
/// workflow's `exists_by_*` pre-checks are only an optimization.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, AuthError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, AuthError>;
    async fn exists_by_phone(&self, phone: &str) -> Result<bool, AuthError>;

    async fn create(&self, draft: NewAccount) -> Result<Account, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples. Mirrors the
/// partial-uniqueness contract: absent contacts never collide.
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAccountRepository {
        accounts: Mutex<Vec<Account>>,
    }

    #[async_trait]
    impl AccountRepository for MockAccountRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.iter().find(|a| a.email.as_deref() == Some(email)).cloned())
        }

        async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, AuthError> {
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.iter().find(|a| a.phone.as_deref() == Some(phone)).cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError> {
            let accounts = self.accounts.lock().unwrap();
            Ok(accounts.iter().find(|a| a.id == id).cloned())
        }

        async fn exists_by_email(&self, email: &str) -> Result<bool, AuthError> {
            Ok(self.find_by_email(email).await?.is_some())
        }

        async fn exists_by_phone(&self, phone: &str) -> Result<bool, AuthError> {
            Ok(self.find_by_phone(phone).await?.is_some())
        }

        async fn create(&self, draft: NewAccount) -> Result<Account, AuthError> {
            let mut accounts = self.accounts.lock().unwrap();
            if let Some(email) = &draft.email {
                if accounts.iter().any(|a| a.email.as_deref() == Some(email.as_str())) {
                    return Err(AuthError::Conflict { field: "email", value: email.clone() });
                }
            }
            if let Some(phone) = &draft.phone {
                if accounts.iter().any(|a| a.phone.as_deref() == Some(phone.as_str())) {
                    return Err(AuthError::Conflict { field: "phone", value: phone.clone() });
                }
            }
            let now = Utc::now();
            let account = Account {
                id: Uuid::new_v4(),
                email: draft.email,
                phone: draft.phone,
                password_hash: draft.password_hash,
                first_name: draft.first_name,
                last_name: draft.last_name,
                role: draft.role,
                status: draft.status,
                created_at: now,
                updated_at: now,
            };
            accounts.push(account.clone());
            Ok(account)
        }
    }
}
