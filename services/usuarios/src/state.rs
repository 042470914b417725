//! Application state shared across handlers

use std::sync::Arc;

use crate::{config::ServiceInfo, repositories::UsuarioRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub usuario_repository: Arc<dyn UsuarioRepository>,
    pub service_info: Arc<ServiceInfo>,
}

impl AppState {
    pub fn new(usuario_repository: Arc<dyn UsuarioRepository>, service_info: ServiceInfo) -> Self {
        Self {
            usuario_repository,
            service_info: Arc::new(service_info),
        }
    }
}
