use chrono::Utc;
use password_auth::generate_hash;
use sea_orm::{DbBackend, Statement, Value};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let now = Utc::now();

        let password_hash = generate_hash("dLxNxnjn&b!2sqkwFbb4s8jX");

        // NOTE: raw SQL instead of the ORM so this migration keeps working if
        // entity types gain fields in later migrations.
        let sql = r#"
            INSERT INTO klamai.profiles (
                email, nombre, apellido, password, role, tipo_abogado,
                creditos_disponibles, nombre_bufete, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, 'abogado', 'super_admin', 0, $5, $6, $7)
        "#;
        db.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            vec![
                Value::String(Some(Box::new("admin@klamai.com".to_owned()))),
                Value::String(Some(Box::new("Admin".to_owned()))),
                Value::String(Some(Box::new("KlamAI".to_owned()))),
                Value::String(Some(Box::new(password_hash))),
                Value::String(Some(Box::new("KlamAI".to_owned()))),
                Value::ChronoDateTimeUtc(Some(Box::new(now))),
                Value::ChronoDateTimeUtc(Some(Box::new(now))),
            ],
        ))
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DELETE FROM klamai.profiles WHERE email = 'admin@klamai.com'")
            .await?;

        Ok(())
    }
}
