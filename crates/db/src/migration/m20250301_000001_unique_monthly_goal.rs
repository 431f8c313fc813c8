//! At most one goal per advisor and month.
//!
//! Duplicate rows are collapsed onto the highest `id` (the last write)
//! before the constraint is added.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DEDUPE_SQL).await?;
        db.execute_unprepared(CONSTRAINT_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "ALTER TABLE metas_mensais DROP CONSTRAINT IF EXISTS uq_metas_user_mes;",
        )
        .await?;
        Ok(())
    }
}

const DEDUPE_SQL: &str = r"
DELETE FROM metas_mensais m
USING (
    SELECT user_id, mes, MAX(id) AS keep_id
    FROM metas_mensais
    GROUP BY user_id, mes
    HAVING COUNT(*) > 1
) d
WHERE m.user_id = d.user_id
  AND m.mes = d.mes
  AND m.id <> d.keep_id;
";

const CONSTRAINT_SQL: &str = r"
ALTER TABLE metas_mensais
    ADD CONSTRAINT uq_metas_user_mes UNIQUE (user_id, mes);
";
