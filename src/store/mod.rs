//! Persistence of users.
//!
//! Every operation runs exactly one SQL statement on a pooled connection.
//! There are no explicit transactions, each call commits on its own.

mod postgres;

#[cfg(test)]
pub(crate) mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{User, UserBody};

pub use postgres::PgUserStore;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no user matched the given id")]
    NotFound,

    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("database query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Configuration(_)
            | sqlx::Error::WorkerCrashed => StoreError::Connection(err),
            sqlx::Error::Database(ref db_err)
                if db_err.code().is_some_and(|code| is_connection_sqlstate(&code)) =>
            {
                StoreError::Connection(err)
            }
            _ => StoreError::Query(err),
        }
    }
}

/// SQLSTATE classes raised while establishing a session: connection
/// exception (08), invalid authorization (28), invalid catalog name (3D).
fn is_connection_sqlstate(code: &str) -> bool {
    matches!(code.get(..2), Some("08" | "28" | "3D"))
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts `user` and returns the row as stored.
    async fn create_user(&self, user: &User) -> Result<User>;

    /// Replaces both names of the user with `id`.
    async fn update_user(&self, id: &str, body: &UserBody) -> Result<User>;

    /// Removes the user with `id`. Succeeds when nothing matched.
    async fn delete_user(&self, id: &str) -> Result<()>;

    async fn get_user(&self, id: &str) -> Result<User>;

    /// Returns up to `limit` users after skipping `offset`, in storage order.
    async fn get_all_users(&self, limit: i64, offset: i64) -> Result<Vec<User>>;
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct ServerRefusal(&'static str);

    impl fmt::Display for ServerRefusal {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "server refused with SQLSTATE {}", self.0)
        }
    }

    impl std::error::Error for ServerRefusal {}

    impl DatabaseError for ServerRefusal {
        fn message(&self) -> &str {
            "server refused"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    fn database_error(code: &'static str) -> StoreError {
        StoreError::from(sqlx::Error::Database(Box::new(ServerRefusal(code))))
    }

    #[test]
    fn session_sqlstates_are_connection_failures() {
        // bad password, unknown database, connection refused
        for code in ["28P01", "3D000", "08006"] {
            assert!(matches!(database_error(code), StoreError::Connection(_)), "{code}");
        }
        // unique violation, undefined column
        for code in ["23505", "42703"] {
            assert!(matches!(database_error(code), StoreError::Query(_)), "{code}");
        }
    }

    #[test]
    fn sqlstate_classes_match_on_prefix() {
        assert!(is_connection_sqlstate("08001"));
        assert!(is_connection_sqlstate("28000"));
        assert!(is_connection_sqlstate("3D000"));
        assert!(!is_connection_sqlstate("3F000"));
        assert!(!is_connection_sqlstate("0"));
    }

    #[test]
    fn sqlx_errors_are_classified() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::NotFound
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Connection(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::Io(std::io::Error::from(
                std::io::ErrorKind::ConnectionRefused
            ))),
            StoreError::Connection(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::ColumnNotFound("name".into())),
            StoreError::Query(_)
        ));
    }
}
