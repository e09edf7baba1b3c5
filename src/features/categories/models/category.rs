use sqlx::FromRow;

/// Issue category as stored in `categories`
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}
