use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The upsert in the assignment path is keyed on (caso_id, abogado_id).
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_asignaciones_caso_abogado
                 ON klamai.asignaciones_casos (caso_id, abogado_id)",
            )
            .await?;

        // At most one active assignment per caso, enforced against racing
        // writers at the data layer.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_asignaciones_caso_activa
                 ON klamai.asignaciones_casos (caso_id)
                 WHERE estado = 'activa'",
            )
            .await?;

        // Webhook replays must collide before any processing happens.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_stripe_webhook_events_event_id
                 ON klamai.stripe_webhook_events (stripe_event_id)",
            )
            .await?;

        // The webhook handler looks casos up by stored session id.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_casos_checkout_session_id
                 ON klamai.casos (checkout_session_id)",
            )
            .await?;

        // Marketplace and per-client listings filter on these.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_casos_estado ON klamai.casos (estado)",
            )
            .await?;
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_casos_cliente_id ON klamai.casos (cliente_id)",
            )
            .await?;

        // The outbox worker polls for pending rows oldest-first.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX IF NOT EXISTS idx_email_outbox_estado_created_at
                 ON klamai.email_outbox (estado, created_at)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for index in [
            "idx_email_outbox_estado_created_at",
            "idx_casos_cliente_id",
            "idx_casos_estado",
            "idx_casos_checkout_session_id",
            "idx_stripe_webhook_events_event_id",
            "idx_asignaciones_caso_activa",
            "idx_asignaciones_caso_abogado",
        ] {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP INDEX IF EXISTS klamai.{index}"))
                .await?;
        }

        Ok(())
    }
}
