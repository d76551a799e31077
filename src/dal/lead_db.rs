use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::LeadRecord;

/// Where collected leads end up. The store assigns identity; records are never read back.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn insert_lead(&self, lead: &LeadRecord) -> Result<Uuid, sqlx::Error>;
}

#[async_trait]
impl LeadStore for PgPool {
    async fn insert_lead(&self, lead: &LeadRecord) -> Result<Uuid, sqlx::Error> {
        insert_lead(self, lead).await
    }
}

pub async fn insert_lead(pool: &PgPool, lead: &LeadRecord) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        insert into lead
            (id, nome, telefone, email, site, nicho, cidade, user_id)
        values
            ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(id)
    .bind(&lead.name)
    .bind(&lead.phone)
    .bind(&lead.email)
    .bind(&lead.website)
    .bind(&lead.niche)
    .bind(&lead.city)
    .bind(&lead.user_id)
    .execute(pool)
    .await?;

    Ok(id)
}
