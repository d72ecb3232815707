use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Role enums
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE klamai.role AS ENUM (
                    'cliente',
                    'abogado'
                )",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE klamai.lawyer_type AS ENUM (
                    'regular',
                    'super_admin'
                )",
            )
            .await?;

        // Caso lifecycle enum
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE klamai.case_status AS ENUM (
                    'borrador',
                    'esperando_pago',
                    'disponible',
                    'asignado',
                    'agotado',
                    'cerrado'
                )",
            )
            .await?;

        // Assignment state enum
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TYPE klamai.assignment_status AS ENUM (
                    'activa',
                    'completada'
                )",
            )
            .await?;

        // profiles table
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE TABLE IF NOT EXISTS klamai.profiles (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                email VARCHAR(255) NOT NULL UNIQUE,
                nombre VARCHAR(255) NOT NULL,
                apellido VARCHAR(255) NOT NULL,
                password VARCHAR(255) NOT NULL,
                role klamai.role NOT NULL DEFAULT 'cliente',
                tipo_abogado klamai.lawyer_type,
                creditos_disponibles INTEGER NOT NULL DEFAULT 0,
                nombre_bufete VARCHAR(255),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
            )
            .await?;

        // especialidades lookup table
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE TABLE IF NOT EXISTS klamai.especialidades (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                nombre VARCHAR(255) NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
            )
            .await?;

        // casos table
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE TABLE IF NOT EXISTS klamai.casos (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                cliente_id UUID
                    REFERENCES klamai.profiles(id) ON DELETE SET NULL,
                nombre_borrador VARCHAR(255),
                email_borrador VARCHAR(255),
                telefono_borrador VARCHAR(64),
                especialidad_id UUID
                    REFERENCES klamai.especialidades(id) ON DELETE SET NULL,
                motivo_consulta TEXT NOT NULL,
                estado klamai.case_status NOT NULL DEFAULT 'borrador',
                checkout_session_id VARCHAR(255),
                fecha_cierre TIMESTAMPTZ,
                cerrado_por UUID
                    REFERENCES klamai.profiles(id) ON DELETE SET NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
            )
            .await?;

        // asignaciones_casos table
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE TABLE IF NOT EXISTS klamai.asignaciones_casos (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                caso_id UUID NOT NULL
                    REFERENCES klamai.casos(id) ON DELETE CASCADE,
                abogado_id UUID NOT NULL
                    REFERENCES klamai.profiles(id),
                asignado_por UUID
                    REFERENCES klamai.profiles(id) ON DELETE SET NULL,
                notas_asignacion TEXT,
                estado klamai.assignment_status NOT NULL DEFAULT 'activa',
                fecha_asignacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
            )
            .await?;

        // Parallel document tables: one for client uploads, one for lawyer
        // uploads.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE TABLE IF NOT EXISTS klamai.documentos_cliente (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                caso_id UUID NOT NULL
                    REFERENCES klamai.casos(id) ON DELETE CASCADE,
                cliente_id UUID NOT NULL
                    REFERENCES klamai.profiles(id),
                tipo_documento VARCHAR(64) NOT NULL,
                nombre_archivo VARCHAR(255) NOT NULL,
                ruta_archivo TEXT NOT NULL,
                tamano_archivo BIGINT NOT NULL,
                descripcion TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE TABLE IF NOT EXISTS klamai.documentos_abogado (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                caso_id UUID NOT NULL
                    REFERENCES klamai.casos(id) ON DELETE CASCADE,
                abogado_id UUID NOT NULL
                    REFERENCES klamai.profiles(id),
                tipo_documento VARCHAR(64) NOT NULL,
                nombre_archivo VARCHAR(255) NOT NULL,
                ruta_archivo TEXT NOT NULL,
                tamano_archivo BIGINT NOT NULL,
                descripcion TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
            )
            .await?;

        // notificaciones table
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            CREATE TABLE IF NOT EXISTS klamai.notificaciones (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                usuario_id UUID NOT NULL
                    REFERENCES klamai.profiles(id) ON DELETE CASCADE,
                mensaje TEXT NOT NULL,
                url_destino TEXT,
                leida BOOLEAN NOT NULL DEFAULT FALSE,
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
            "notificaciones",
            "documentos_abogado",
            "documentos_cliente",
            "asignaciones_casos",
            "casos",
            "especialidades",
            "profiles",
        ] {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP TABLE IF EXISTS klamai.{table}"))
                .await?;
        }

        for enum_type in ["assignment_status", "case_status", "lawyer_type", "role"] {
            manager
                .get_connection()
                .execute_unprepared(&format!("DROP TYPE IF EXISTS klamai.{enum_type}"))
                .await?;
        }

        Ok(())
    }
}
