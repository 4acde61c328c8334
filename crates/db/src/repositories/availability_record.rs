use crate::models::DbAvailabilityRecord;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_availability_record(
    pool: &Pool<Postgres>,
    record: &DbAvailabilityRecord,
) -> Result<DbAvailabilityRecord> {
    let created = sqlx::query_as::<_, DbAvailabilityRecord>(
        r#"
        INSERT INTO availability_records
            (id, owner_id, start_minute, end_minute, duration_minutes, position, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, owner_id, start_minute, end_minute, duration_minutes, position, created_at
        "#,
    )
    .bind(record.id)
    .bind(&record.owner_id)
    .bind(record.start_minute)
    .bind(record.end_minute)
    .bind(record.duration_minutes)
    .bind(record.position)
    .bind(record.created_at)
    .fetch_one(pool)
    .await?;

    Ok(created)
}

pub async fn get_availability_records_by_owner(
    pool: &Pool<Postgres>,
    owner_id: &str,
) -> Result<Vec<DbAvailabilityRecord>> {
    let records = sqlx::query_as::<_, DbAvailabilityRecord>(
        r#"
        SELECT id, owner_id, start_minute, end_minute, duration_minutes, position, created_at
        FROM availability_records
        WHERE owner_id = $1
        ORDER BY position ASC, start_minute ASC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

pub async fn delete_availability_record(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM availability_records
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
