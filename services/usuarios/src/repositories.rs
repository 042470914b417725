//! Repositories for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;

use crate::models::{ESTADO_ACTIVO, ESTADO_INACTIVO, NewUsuario, UpdateUsuarioRequest, Usuario};

#[cfg(test)]
pub mod memory;

/// Store of `usuarios` rows
///
/// Every method issues exactly one statement. Callers that check a
/// precondition and then write do so with two calls and no transaction.
#[async_trait]
pub trait UsuarioRepository: Send + Sync {
    /// Insert a new row with the caller's `estado`, returning its id
    async fn create(&self, usuario: &NewUsuario) -> DatabaseResult<i32>;

    /// All rows with `estado = 'A'`
    async fn list_active(&self) -> DatabaseResult<Vec<Usuario>>;

    /// Mean age in whole years over active rows, `None` when there are none
    async fn average_age(&self) -> DatabaseResult<Option<f64>>;

    /// Row by primary key, whatever its `estado`
    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<Usuario>>;

    /// Row by primary key, only if active
    async fn find_active_by_id(&self, id: i32) -> DatabaseResult<Option<Usuario>>;

    /// Overwrite the six editable fields and force `estado = 'A'`
    async fn update(&self, id: i32, changes: &UpdateUsuarioRequest) -> DatabaseResult<()>;

    /// Set `estado = 'N'`
    async fn deactivate(&self, id: i32) -> DatabaseResult<()>;

    /// Check store connectivity
    async fn ping(&self) -> DatabaseResult<bool>;
}

const COLUMNS: &str = "id, nombres, apellido_paterno, apellido_materno, fecha_nacimiento, \
                       direccion, celular, estado";

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUsuarioRepository {
    pool: PgPool,
}

impl PgUsuarioRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsuarioRepository for PgUsuarioRepository {
    async fn create(&self, usuario: &NewUsuario) -> DatabaseResult<i32> {
        sqlx::query_scalar(
            r#"
            INSERT INTO usuarios (nombres, apellido_paterno, apellido_materno, fecha_nacimiento, direccion, celular, estado)
            VALUES ($1, $2, $3, $4::date, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&usuario.nombres)
        .bind(&usuario.apellido_paterno)
        .bind(&usuario.apellido_materno)
        .bind(&usuario.fecha_nacimiento)
        .bind(&usuario.direccion)
        .bind(&usuario.celular)
        .bind(&usuario.estado)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    async fn list_active(&self) -> DatabaseResult<Vec<Usuario>> {
        let query = format!("SELECT {} FROM usuarios WHERE estado = $1", COLUMNS);

        sqlx::query_as::<_, Usuario>(&query)
            .bind(ESTADO_ACTIVO)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn average_age(&self) -> DatabaseResult<Option<f64>> {
        sqlx::query_scalar::<_, Option<f64>>(
            r#"
            SELECT AVG(EXTRACT(YEAR FROM AGE(fecha_nacimiento)))::float8 AS promedio_edad
            FROM usuarios
            WHERE estado = $1
            "#,
        )
        .bind(ESTADO_ACTIVO)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<Usuario>> {
        let query = format!("SELECT {} FROM usuarios WHERE id = $1", COLUMNS);

        sqlx::query_as::<_, Usuario>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn find_active_by_id(&self, id: i32) -> DatabaseResult<Option<Usuario>> {
        let query = format!(
            "SELECT {} FROM usuarios WHERE id = $1 AND estado = $2",
            COLUMNS
        );

        sqlx::query_as::<_, Usuario>(&query)
            .bind(id)
            .bind(ESTADO_ACTIVO)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn update(&self, id: i32, changes: &UpdateUsuarioRequest) -> DatabaseResult<()> {
        // Matches on id only; the caller already checked estado.
        sqlx::query(
            r#"
            UPDATE usuarios
            SET nombres = $1, apellido_paterno = $2, apellido_materno = $3,
                fecha_nacimiento = $4::date, direccion = $5, celular = $6, estado = $7
            WHERE id = $8
            "#,
        )
        .bind(&changes.nombres)
        .bind(&changes.apellido_paterno)
        .bind(&changes.apellido_materno)
        .bind(&changes.fecha_nacimiento)
        .bind(&changes.direccion)
        .bind(&changes.celular)
        .bind(ESTADO_ACTIVO)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(())
    }

    async fn deactivate(&self, id: i32) -> DatabaseResult<()> {
        sqlx::query("UPDATE usuarios SET estado = $1 WHERE id = $2")
            .bind(ESTADO_INACTIVO)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(())
    }

    async fn ping(&self) -> DatabaseResult<bool> {
        common::database::health_check(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::database::{DatabaseConfig, init_pool};

    fn ana() -> NewUsuario {
        NewUsuario {
            nombres: "Ana".to_string(),
            apellido_paterno: "Lopez".to_string(),
            apellido_materno: "Diaz".to_string(),
            fecha_nacimiento: "1990-05-01".to_string(),
            direccion: "Calle 1".to_string(),
            celular: "555-0100".to_string(),
            estado: "A".to_string(),
        }
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_soft_delete_lifecycle() -> anyhow::Result<()> {
        let pool = init_pool(&DatabaseConfig::from_env()?).await?;
        let repo = PgUsuarioRepository::new(pool);

        let mut nuevo = ana();
        nuevo.celular = format!("test-{}", chrono::Utc::now().timestamp_micros());
        let id = repo.create(&nuevo).await?;

        let creado = repo
            .list_active()
            .await?
            .into_iter()
            .find(|u| u.celular.as_deref() == Some(nuevo.celular.as_str()))
            .expect("created row should be listed");
        assert_eq!(creado.id, id);
        assert!(creado.is_active());
        assert!(repo.average_age().await?.is_some());

        repo.deactivate(creado.id).await?;

        assert!(repo.find_active_by_id(creado.id).await?.is_none());
        assert!(
            !repo
                .list_active()
                .await?
                .iter()
                .any(|u| u.id == creado.id)
        );
        let inactivo = repo.find_by_id(creado.id).await?.expect("still addressable");
        assert_eq!(inactivo.estado, "N");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL instance"]
    async fn test_malformed_date_is_a_store_error() -> anyhow::Result<()> {
        let pool = init_pool(&DatabaseConfig::from_env()?).await?;
        let repo = PgUsuarioRepository::new(pool);

        let mut nuevo = ana();
        nuevo.fecha_nacimiento = "not-a-date".to_string();
        let err = repo.create(&nuevo).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Query(_)));

        Ok(())
    }
}
