use serde::{Deserialize, Serialize};

/// A stored user. The `first_name` field lives in the `name` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[sqlx(rename = "name")]
    pub first_name: String,
    pub last_name: String,
}

/// Body accepted by create and update. Missing names default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserBody {
    pub first_name: String,
    pub last_name: String,
}

impl UserBody {
    pub fn into_user(self, id: String) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    #[serde(default)]
    pub id: String,
}

/// 1-based page number with a page size.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Row offset of the first user on this page.
    pub fn offset(&self) -> Result<i64, String> {
        if self.page < 1 {
            return Err(format!("page must be at least 1, got {}", self.page));
        }
        if self.limit < 1 {
            return Err(format!("limit must be at least 1, got {}", self.limit));
        }

        self.limit
            .checked_mul(self.page - 1)
            .ok_or_else(|| format!("page {} with limit {} is out of range", self.page, self.limit))
    }
}
