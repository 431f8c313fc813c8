//! Row-level security: every row belongs to `auth.uid()`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Tables owned through a `user_id` column.
const OWNED_TABLES: [&str; 5] = [
    "clientes",
    "cross_sell",
    "metas_mensais",
    "bonus_missoes",
    "receita_itens",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for table in OWNED_TABLES {
            db.execute_unprepared(&owner_policies_sql(table, "user_id"))
                .await?;
        }
        db.execute_unprepared(&owner_policies_sql("profiles", "id"))
            .await?;
        db.execute_unprepared(GRANTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for table in OWNED_TABLES.iter().chain(std::iter::once(&"profiles")) {
            db.execute_unprepared(&drop_policies_sql(table)).await?;
        }

        Ok(())
    }
}

fn owner_policies_sql(table: &str, owner_column: &str) -> String {
    format!(
        r"
ALTER TABLE {table} ENABLE ROW LEVEL SECURITY;
ALTER TABLE {table} FORCE ROW LEVEL SECURITY;

CREATE POLICY {table}_select_own ON {table}
    FOR SELECT TO authenticated
    USING (auth.uid() = {owner_column});

CREATE POLICY {table}_insert_own ON {table}
    FOR INSERT TO authenticated
    WITH CHECK (auth.uid() = {owner_column});

CREATE POLICY {table}_update_own ON {table}
    FOR UPDATE TO authenticated
    USING (auth.uid() = {owner_column})
    WITH CHECK (auth.uid() = {owner_column});

CREATE POLICY {table}_delete_own ON {table}
    FOR DELETE TO authenticated
    USING (auth.uid() = {owner_column});
"
    )
}

fn drop_policies_sql(table: &str) -> String {
    format!(
        r"
DROP POLICY IF EXISTS {table}_select_own ON {table};
DROP POLICY IF EXISTS {table}_insert_own ON {table};
DROP POLICY IF EXISTS {table}_update_own ON {table};
DROP POLICY IF EXISTS {table}_delete_own ON {table};
ALTER TABLE {table} NO FORCE ROW LEVEL SECURITY;
ALTER TABLE {table} DISABLE ROW LEVEL SECURITY;
"
    )
}

const GRANTS_SQL: &str = r"
GRANT USAGE ON SCHEMA public TO authenticated, service_role;

GRANT SELECT, INSERT, UPDATE, DELETE
    ON clientes, cross_sell, metas_mensais, bonus_missoes, receita_itens
    TO authenticated, service_role;
GRANT SELECT, UPDATE ON profiles TO authenticated;
GRANT SELECT, INSERT, UPDATE, DELETE ON profiles TO service_role;

GRANT USAGE, SELECT ON ALL SEQUENCES IN SCHEMA public TO authenticated, service_role;
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policies_compare_owner_column() {
        let sql = owner_policies_sql("profiles", "id");
        assert!(sql.contains("USING (auth.uid() = id)"));
        assert!(sql.contains("FORCE ROW LEVEL SECURITY"));
        assert_eq!(sql.matches("CREATE POLICY").count(), 4);
    }
}
