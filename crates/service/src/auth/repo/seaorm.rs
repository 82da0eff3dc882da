use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr,
};
use uuid::Uuid;

use crate::auth::domain::{Account, NewAccount};
use crate::auth::errors::AuthError;
use crate::auth::repository::AccountRepository;

pub struct SeaOrmAccountRepository {
    pub db: DatabaseConnection,
}

fn to_domain(m: models::account::Model) -> Result<Account, AuthError> {
    Ok(Account {
        id: m.id,
        email: m.email,
        phone: m.phone,
        password_hash: m.password_hash,
        first_name: m.first_name,
        last_name: m.last_name,
        role: m.role.parse().map_err(AuthError::Repository)?,
        status: m.status.parse().map_err(AuthError::Repository)?,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    })
}

/// A unique-index violation at write time means we lost a registration race;
/// surface it as the same `Conflict` the pre-check would have produced. The
/// index names (`uniq_account_email`, `uniq_account_phone`) identify which
/// field collided.
fn map_insert_err(e: DbErr, draft: &NewAccount) -> AuthError {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
        if msg.contains("email") {
            return AuthError::Conflict {
                field: "email",
                value: draft.email.clone().unwrap_or_default(),
            };
        }
        if msg.contains("phone") {
            return AuthError::Conflict {
                field: "phone",
                value: draft.phone.clone().unwrap_or_default(),
            };
        }
    }
    AuthError::Repository(e.to_string())
}

#[async_trait::async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let res = models::account::Entity::find()
            .filter(models::account::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        res.map(to_domain).transpose()
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Account>, AuthError> {
        let res = models::account::Entity::find()
            .filter(models::account::Column::Phone.eq(phone))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        res.map(to_domain).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AuthError> {
        let res = models::account::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        res.map(to_domain).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AuthError> {
        let count = models::account::Entity::find()
            .filter(models::account::Column::Email.eq(email))
            .count(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(count > 0)
    }

    async fn exists_by_phone(&self, phone: &str) -> Result<bool, AuthError> {
        let count = models::account::Entity::find()
            .filter(models::account::Column::Phone.eq(phone))
            .count(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(count > 0)
    }

    async fn create(&self, draft: NewAccount) -> Result<Account, AuthError> {
        let now = Utc::now();
        let am = models::account::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(draft.email.clone()),
            phone: Set(draft.phone.clone()),
            password_hash: Set(draft.password_hash.clone()),
            first_name: Set(draft.first_name.clone()),
            last_name: Set(draft.last_name.clone()),
            role: Set(draft.role.as_str().to_string()),
            status: Set(draft.status.as_str().to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        match am.insert(&self.db).await {
            Ok(m) => to_domain(m),
            Err(e) => Err(map_insert_err(e, &draft)),
        }
    }
}
