use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Payment state enum
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE klamai.payment_status AS ENUM (
                    'procesando',
                    'exitoso',
                    'fallido'
                )",
            )
            .await?;

        // Application review enum
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE klamai.solicitud_status AS ENUM (
                    'pendiente',
                    'aprobada',
                    'rechazada'
                )",
            )
            .await?;

        // Outbox delivery enum
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE klamai.outbox_status AS ENUM (
                    'pendiente',
                    'enviado',
                    'fallido'
                )",
            )
            .await?;

        // pagos table
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE TABLE IF NOT EXISTS klamai.pagos (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                caso_id UUID NOT NULL
                    REFERENCES klamai.casos(id),
                usuario_id UUID
                    REFERENCES klamai.profiles(id) ON DELETE SET NULL,
                monto_centavos BIGINT NOT NULL,
                moneda VARCHAR(8) NOT NULL,
                stripe_session_id VARCHAR(255) NOT NULL,
                stripe_payment_intent_id VARCHAR(255),
                estado klamai.payment_status NOT NULL DEFAULT 'procesando',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
            )
            .await?;

        // Webhook dedup ledger
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE TABLE IF NOT EXISTS klamai.stripe_webhook_events (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                stripe_event_id VARCHAR(255) NOT NULL,
                event_type VARCHAR(255) NOT NULL,
                processed_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
            )
            .await?;

        // Lawyer sign-up applications
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE TABLE IF NOT EXISTS klamai.solicitudes_abogado (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                nombre VARCHAR(255) NOT NULL,
                apellido VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                colegio_profesional VARCHAR(255),
                numero_colegiado VARCHAR(64),
                estado klamai.solicitud_status NOT NULL DEFAULT 'pendiente',
                motivo_rechazo TEXT,
                revisado_por UUID
                    REFERENCES klamai.profiles(id) ON DELETE SET NULL,
                fecha_revision TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
            )
            .await?;

        // Security audit trail
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE TABLE IF NOT EXISTS klamai.auditoria_seguridad (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                usuario_id UUID
                    REFERENCES klamai.profiles(id) ON DELETE SET NULL,
                accion VARCHAR(128) NOT NULL,
                tabla_afectada VARCHAR(128),
                registro_id UUID,
                detalle TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
            )
            .await?;

        // Durable email outbox
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE TABLE IF NOT EXISTS klamai.email_outbox (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                destinatario VARCHAR(255) NOT NULL,
                asunto VARCHAR(255) NOT NULL,
                plantilla VARCHAR(64) NOT NULL,
                datos TEXT NOT NULL,
                estado klamai.outbox_status NOT NULL DEFAULT 'pendiente',
                intentos INTEGER NOT NULL DEFAULT 0,
                ultimo_error TEXT,
                enviado_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            "email_outbox",
            "auditoria_seguridad",
            "solicitudes_abogado",
            "stripe_webhook_events",
            "pagos",
        ] {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP TABLE IF EXISTS klamai.{table}"))
                .await?;
        }

        for enum_type in ["outbox_status", "solicitud_status", "payment_status"] {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP TYPE IF EXISTS klamai.{enum_type}"))
                .await?;
        }

        Ok(())
    }
}
