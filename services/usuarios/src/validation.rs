//! Input validation utilities
//!
//! Only presence is checked. Types and formats are left to the store.

use crate::models::{CreateUsuarioRequest, NewUsuario};

/// Message returned when a required field is absent
pub const MISSING_FIELDS: &str = "Faltan campos obligatorios";

fn required(value: Option<String>) -> Result<String, String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(MISSING_FIELDS.to_string()),
    }
}

/// Validate a creation request, requiring all seven fields to be present and non-empty
pub fn validate_create(request: CreateUsuarioRequest) -> Result<NewUsuario, String> {
    Ok(NewUsuario {
        nombres: required(request.nombres)?,
        apellido_paterno: required(request.apellido_paterno)?,
        apellido_materno: required(request.apellido_materno)?,
        fecha_nacimiento: required(request.fecha_nacimiento)?,
        direccion: required(request.direccion)?,
        celular: required(request.celular)?,
        estado: required(request.estado)?,
    })
}
