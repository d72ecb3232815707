use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the platform's schema
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS klamai;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("SET search_path TO klamai, public;")
            .await?;

        // Grant the platform's DB user access to everything in the schema
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    GRANT ALL PRIVILEGES ON DATABASE klamai TO klamai;
                    GRANT ALL ON SCHEMA klamai TO klamai;

                    ALTER DEFAULT PRIVILEGES IN SCHEMA klamai GRANT ALL ON TABLES TO klamai;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA klamai GRANT ALL ON SEQUENCES TO klamai;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA klamai GRANT ALL ON FUNCTIONS TO klamai;
                END $$;
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Revoke default privileges first
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    ALTER DEFAULT PRIVILEGES IN SCHEMA klamai REVOKE ALL ON FUNCTIONS FROM klamai;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA klamai REVOKE ALL ON SEQUENCES FROM klamai;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA klamai REVOKE ALL ON TABLES FROM klamai;
                    REVOKE ALL ON SCHEMA klamai FROM klamai;
                    REVOKE ALL PRIVILEGES ON DATABASE klamai FROM klamai;
                END $$;
            "#,
            )
            .await?;

        // Drop the schema (CASCADE will remove all objects in it)
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS klamai CASCADE;")
            .await?;

        Ok(())
    }
}
