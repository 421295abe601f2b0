use thiserror::Error;

use crate::retry::AttemptError;

/// Terminal outcome of a `generate` call that produced no artifact.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Missing API key or invalid settings. Raised before any network attempt.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("unknown style `{0}`")]
    UnknownStyle(String),
    /// Another generation is still in flight; this trigger was ignored.
    #[error("a generation is already in progress")]
    Busy,
    /// The service answered in a way that is not worth retrying.
    #[error("upstream error{}: {message}", status_suffix(.status))]
    Upstream {
        status: Option<u16>,
        message: String,
    },
    #[error("gave up after {attempts} attempt(s): {last}")]
    ExhaustedRetries {
        attempts: u32,
        #[source]
        last: AttemptError,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

impl GenerateError {
    /// Short stable name of the error kind, for logs and exit reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerateError::Configuration(_) => "configuration",
            GenerateError::UnknownStyle(_) => "unknown_style",
            GenerateError::Busy => "busy",
            GenerateError::Upstream { .. } => "upstream",
            GenerateError::ExhaustedRetries { .. } => "exhausted_retries",
        }
    }

    /// Message for the person using the app (es-CO).
    pub fn user_message(&self) -> String {
        match self {
            GenerateError::Configuration(detail) => {
                format!("Falta configuración para generar el fondo: {}.", detail)
            }
            GenerateError::UnknownStyle(id) => format!("El estilo \"{}\" no existe.", id),
            GenerateError::Busy => "Ya estamos creando un tema. Espera un momento.".to_string(),
            GenerateError::Upstream { .. } => {
                "El servicio de imágenes rechazó la solicitud. Intenta con otro estilo.".to_string()
            }
            GenerateError::ExhaustedRetries { .. } => {
                "No pudimos generar la imagen. Intenta de nuevo en unos segundos.".to_string()
            }
        }
    }
}
