use thiserror::Error;

/// Startup error categories mapped to process exit codes.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] cambio_core::ValidationError),

    #[error("invalid listen address '{value}'")]
    ListenAddress { value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::ListenAddress { .. } => 2,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_exit_with_two() {
        let error = ServerError::from(cambio_core::ValidationError::EmptySeriesRequest);
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn io_errors_exit_with_ten() {
        let error = ServerError::from(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "port taken",
        ));
        assert_eq!(error.exit_code(), 10);
    }
}
