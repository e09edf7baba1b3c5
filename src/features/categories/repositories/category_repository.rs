use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;

const LIST_CATEGORIES_SQL: &str = "SELECT id, name FROM categories ORDER BY id";

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Every category, ordered by id
    async fn list_all(&self) -> Result<Vec<Category>>;
}

pub struct MySqlCategoryRepository {
    pool: MySqlPool,
}

impl MySqlCategoryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for MySqlCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(LIST_CATEGORIES_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_ordered_by_id() {
        assert!(LIST_CATEGORIES_SQL.ends_with("ORDER BY id"));
    }
}
