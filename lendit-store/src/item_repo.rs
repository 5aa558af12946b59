use async_trait::async_trait;
use sqlx::PgPool;

use lendit_core::model::{Item, ItemId};
use lendit_core::repository::{ItemDirectory, RepoError};

pub struct PgItemDirectory {
    pool: PgPool,
}

impl PgItemDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    description: String,
    available: bool,
    owner_id: i64,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            name: row.name,
            description: row.description,
            available: row.available,
            owner_id: row.owner_id,
        }
    }
}

#[async_trait]
impl ItemDirectory for PgItemDirectory {
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepoError> {
        let row = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, description, available, owner_id FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }
}
