//! In-process stores used by the handler tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{Result, StoreError, UserStore};
use crate::models::{User, UserBody};

/// Keeps users in insertion order, mirroring an unordered heap scan.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: &User) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::Query(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint: {}",
                user.id
            ))));
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn update_user(&self, id: &str, body: &UserBody) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound)?;
        user.first_name = body.first_name.clone();
        user.last_name = body.last_name.clone();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_all_users(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// Fails every call as if the pool could not hand out a connection.
pub struct UnreachableStore;

#[async_trait]
impl UserStore for UnreachableStore {
    async fn create_user(&self, _user: &User) -> Result<User> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn update_user(&self, _id: &str, _body: &UserBody) -> Result<User> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn delete_user(&self, _id: &str) -> Result<()> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn get_user(&self, _id: &str) -> Result<User> {
        Err(sqlx::Error::PoolTimedOut.into())
    }

    async fn get_all_users(&self, _limit: i64, _offset: i64) -> Result<Vec<User>> {
        Err(sqlx::Error::PoolTimedOut.into())
    }
}

/// Fails every call with a query error.
pub struct BrokenQueryStore;

#[async_trait]
impl UserStore for BrokenQueryStore {
    async fn create_user(&self, _user: &User) -> Result<User> {
        Err(broken())
    }

    async fn update_user(&self, _id: &str, _body: &UserBody) -> Result<User> {
        Err(broken())
    }

    async fn delete_user(&self, _id: &str) -> Result<()> {
        Err(broken())
    }

    async fn get_user(&self, _id: &str) -> Result<User> {
        Err(broken())
    }

    async fn get_all_users(&self, _limit: i64, _offset: i64) -> Result<Vec<User>> {
        Err(broken())
    }
}

/// Answers every call only after sleeping for the given duration.
pub struct SlowStore(pub Duration);

impl SlowStore {
    async fn stall(&self) -> StoreError {
        tokio::time::sleep(self.0).await;
        sqlx::Error::PoolTimedOut.into()
    }
}

#[async_trait]
impl UserStore for SlowStore {
    async fn create_user(&self, _user: &User) -> Result<User> {
        Err(self.stall().await)
    }

    async fn update_user(&self, _id: &str, _body: &UserBody) -> Result<User> {
        Err(self.stall().await)
    }

    async fn delete_user(&self, _id: &str) -> Result<()> {
        Err(self.stall().await)
    }

    async fn get_user(&self, _id: &str) -> Result<User> {
        Err(self.stall().await)
    }

    async fn get_all_users(&self, _limit: i64, _offset: i64) -> Result<Vec<User>> {
        Err(self.stall().await)
    }
}

fn broken() -> StoreError {
    sqlx::Error::ColumnNotFound("name".into()).into()
}
