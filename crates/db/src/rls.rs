//! Row-Level Security (RLS) context management.
//!
//! Policies compare `auth.uid()` with each row's owner. `auth.uid()` reads
//! the `request.jwt.claim*` settings, so every caller-scoped unit of work
//! runs in a transaction that switches to the `authenticated` role and
//! publishes the caller's claims with transaction-local `set_config`.
//!
//! # Usage
//!
//! ```ignore
//! use assessoria_db::rls::RlsConnection;
//!
//! let rls = RlsConnection::for_user(&db, &claims).await?;
//! let goals = GoalRepository::new(rls.transaction()).list(None).await?;
//! rls.commit().await?;
//! ```

use assessoria_shared::Claims;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, Statement,
    TransactionTrait,
};

/// Role end-user requests run as.
pub const AUTHENTICATED_ROLE: &str = "authenticated";
/// Role background jobs run as. It bypasses RLS.
pub const SERVICE_ROLE: &str = "service_role";

const SET_CLAIMS_SQL: &str = "SELECT set_config('request.jwt.claims', $1, true), \
     set_config('request.jwt.claim.sub', $2, true)";

/// A transaction carrying the RLS context of one caller.
///
/// Settings are applied with `SET LOCAL` / `set_config(.., true)` and vanish
/// when the transaction ends, so a pooled connection never leaks identity.
pub struct RlsConnection {
    txn: DatabaseTransaction,
}

impl RlsConnection {
    /// Begins a transaction scoped to the user in `claims`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the context
    /// cannot be set.
    pub async fn for_user(db: &DatabaseConnection, claims: &Claims) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        set_user_context(&txn, claims).await?;
        Ok(Self { txn })
    }

    /// Begins a transaction with the service role.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or the role
    /// cannot be assumed.
    pub async fn service(db: &DatabaseConnection) -> Result<Self, DbErr> {
        let txn = db.begin().await?;
        txn.execute_unprepared(&set_role_sql(SERVICE_ROLE)).await?;
        Ok(Self { txn })
    }

    /// Returns a reference to the underlying transaction for executing queries.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction, persisting all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back the transaction, discarding all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

/// Extension trait for `DatabaseConnection` to easily create RLS-enabled connections.
#[async_trait::async_trait]
pub trait RlsExt {
    /// Creates a caller-scoped connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the RLS connection cannot be created.
    async fn with_rls(&self, claims: &Claims) -> Result<RlsConnection, DbErr>;
}

#[async_trait::async_trait]
impl RlsExt for DatabaseConnection {
    async fn with_rls(&self, claims: &Claims) -> Result<RlsConnection, DbErr> {
        RlsConnection::for_user(self, claims).await
    }
}

/// Applies the caller context to an existing transaction.
///
/// # Errors
///
/// Returns an error if the role switch or the settings fail.
pub async fn set_user_context(txn: &DatabaseTransaction, claims: &Claims) -> Result<(), DbErr> {
    txn.execute_unprepared(&set_role_sql(AUTHENTICATED_ROLE))
        .await?;
    txn.execute(claims_statement(claims)?).await?;
    Ok(())
}

fn set_role_sql(role: &str) -> String {
    format!("SET LOCAL ROLE {role}")
}

fn claims_statement(claims: &Claims) -> Result<Statement, DbErr> {
    let json = serde_json::to_string(claims).map_err(|e| DbErr::Custom(e.to_string()))?;
    Ok(Statement::from_sql_and_values(
        DbBackend::Postgres,
        SET_CLAIMS_SQL,
        [json.into(), claims.sub.to_string().into()],
    ))
}
