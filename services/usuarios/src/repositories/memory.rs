//! In-memory user repository used by the route tests

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use common::error::{DatabaseError, DatabaseResult};

use super::UsuarioRepository;
use crate::models::{ESTADO_ACTIVO, ESTADO_INACTIVO, NewUsuario, UpdateUsuarioRequest, Usuario};

/// Mirrors the SQL semantics of `PgUsuarioRepository` over a map
#[derive(Default)]
pub struct MemoryUsuarioRepository {
    rows: Mutex<BTreeMap<i32, Usuario>>,
    next_id: Mutex<i32>,
    unavailable: AtomicBool,
}

impl MemoryUsuarioRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail as if the store were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Insert a row directly, bypassing the API
    pub fn seed(&self, usuario: Usuario) {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id = (*next_id).max(usuario.id);
        self.rows.lock().unwrap().insert(usuario.id, usuario);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_available(&self) -> DatabaseResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DatabaseError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn parse_date(raw: &str) -> DatabaseResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        DatabaseError::Query(sqlx::Error::Protocol(format!(
            "invalid input syntax for type date: \"{}\"",
            raw
        )))
    })
}

#[async_trait]
impl UsuarioRepository for MemoryUsuarioRepository {
    async fn create(&self, usuario: &NewUsuario) -> DatabaseResult<i32> {
        self.check_available()?;
        let fecha_nacimiento = parse_date(&usuario.fecha_nacimiento)?;

        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let row = Usuario {
            id: *next_id,
            nombres: Some(usuario.nombres.clone()),
            apellido_paterno: Some(usuario.apellido_paterno.clone()),
            apellido_materno: Some(usuario.apellido_materno.clone()),
            fecha_nacimiento: Some(fecha_nacimiento),
            direccion: Some(usuario.direccion.clone()),
            celular: Some(usuario.celular.clone()),
            estado: usuario.estado.clone(),
        };
        let id = row.id;
        self.rows.lock().unwrap().insert(id, row);
        Ok(id)
    }

    async fn list_active(&self) -> DatabaseResult<Vec<Usuario>> {
        self.check_available()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.is_active())
            .cloned()
            .collect())
    }

    async fn average_age(&self) -> DatabaseResult<Option<f64>> {
        self.check_available()?;
        let today = Utc::now().date_naive();
        let ages: Vec<f64> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.is_active())
            .filter_map(|u| u.fecha_nacimiento)
            .filter_map(|birth| today.years_since(birth))
            .map(f64::from)
            .collect();

        if ages.is_empty() {
            return Ok(None);
        }
        Ok(Some(ages.iter().sum::<f64>() / ages.len() as f64))
    }

    async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<Usuario>> {
        self.check_available()?;
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_active_by_id(&self, id: i32) -> DatabaseResult<Option<Usuario>> {
        self.check_available()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|u| u.is_active())
            .cloned())
    }

    async fn update(&self, id: i32, changes: &UpdateUsuarioRequest) -> DatabaseResult<()> {
        self.check_available()?;
        let fecha_nacimiento = changes
            .fecha_nacimiento
            .as_deref()
            .map(parse_date)
            .transpose()?;

        if let Some(row) = self.rows.lock().unwrap().get_mut(&id) {
            row.nombres = changes.nombres.clone();
            row.apellido_paterno = changes.apellido_paterno.clone();
            row.apellido_materno = changes.apellido_materno.clone();
            row.fecha_nacimiento = fecha_nacimiento;
            row.direccion = changes.direccion.clone();
            row.celular = changes.celular.clone();
            row.estado = ESTADO_ACTIVO.to_string();
        }
        Ok(())
    }

    async fn deactivate(&self, id: i32) -> DatabaseResult<()> {
        self.check_available()?;
        if let Some(row) = self.rows.lock().unwrap().get_mut(&id) {
            row.estado = ESTADO_INACTIVO.to_string();
        }
        Ok(())
    }

    async fn ping(&self) -> DatabaseResult<bool> {
        self.check_available()?;
        Ok(true)
    }
}
