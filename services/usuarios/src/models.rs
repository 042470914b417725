//! API models for request and response payloads

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// Status flag of an active record
pub const ESTADO_ACTIVO: &str = "A";
/// Status flag of a soft-deleted record
pub const ESTADO_INACTIVO: &str = "N";

/// A row of the `usuarios` table
///
/// Text columns are optional because an update writes missing fields through
/// as NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Usuario {
    pub id: i32,
    pub nombres: Option<String>,
    pub apellido_paterno: Option<String>,
    pub apellido_materno: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub direccion: Option<String>,
    pub celular: Option<String>,
    pub estado: String,
}

#[cfg(test)]
impl Usuario {
    pub fn is_active(&self) -> bool {
        self.estado == ESTADO_ACTIVO
    }
}

/// Text form of a JSON value as the store receives it
///
/// Strings pass through unquoted, null is absent, anything else is sent as
/// its JSON text and left for the store to accept or reject.
fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn any_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_of(Value::deserialize(deserializer)?))
}

/// Like `any_as_text`, but falsy values (`""`, `0`, `false`, null) count as absent
fn truthy_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let falsy = match &value {
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    };
    if falsy { Ok(None) } else { Ok(text_of(value)) }
}

/// Request body for user creation
///
/// Every field is optional and accepts any JSON value so that a missing one
/// is answered with the presence-check 400 and a mistyped one reaches the
/// store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateUsuarioRequest {
    #[serde(deserialize_with = "truthy_as_text")]
    pub nombres: Option<String>,
    #[serde(deserialize_with = "truthy_as_text")]
    pub apellido_paterno: Option<String>,
    #[serde(deserialize_with = "truthy_as_text")]
    pub apellido_materno: Option<String>,
    #[serde(deserialize_with = "truthy_as_text")]
    pub fecha_nacimiento: Option<String>,
    #[serde(deserialize_with = "truthy_as_text")]
    pub direccion: Option<String>,
    #[serde(deserialize_with = "truthy_as_text")]
    pub celular: Option<String>,
    #[serde(deserialize_with = "truthy_as_text")]
    pub estado: Option<String>,
}

/// A creation request whose required fields have all been checked present
#[derive(Debug, Clone, PartialEq)]
pub struct NewUsuario {
    pub nombres: String,
    pub apellido_paterno: String,
    pub apellido_materno: String,
    /// Sent to the store as text; the store decides whether it is a date
    pub fecha_nacimiento: String,
    pub direccion: String,
    pub celular: String,
    pub estado: String,
}

/// Request body for user update
///
/// Fields are not checked for presence; absent ones are written as NULL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUsuarioRequest {
    #[serde(deserialize_with = "any_as_text")]
    pub nombres: Option<String>,
    #[serde(deserialize_with = "any_as_text")]
    pub apellido_paterno: Option<String>,
    #[serde(deserialize_with = "any_as_text")]
    pub apellido_materno: Option<String>,
    #[serde(deserialize_with = "any_as_text")]
    pub fecha_nacimiento: Option<String>,
    #[serde(deserialize_with = "any_as_text")]
    pub direccion: Option<String>,
    #[serde(deserialize_with = "any_as_text")]
    pub celular: Option<String>,
}

/// Response for the average age endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PromedioEdadResponse {
    #[serde(rename = "promedioEdad")]
    pub promedio_edad: Option<f64>,
}

/// Confirmation message returned by mutating routes
#[derive(Debug, Clone, Serialize)]
pub struct MensajeResponse {
    pub mensaje: String,
}

impl MensajeResponse {
    pub fn new(mensaje: impl Into<String>) -> Self {
        Self {
            mensaje: mensaje.into(),
        }
    }
}
