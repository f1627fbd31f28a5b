use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tickroute_core::ValidationError),

    #[error(transparent)]
    Config(#[from] tickroute_core::ConfigError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickroute_core::ValidationError;

    #[test]
    fn validation_failures_exit_with_two() {
        let error = CliError::from(ValidationError::EmptyTicker);
        assert_eq!(error.exit_code(), 2);
    }
}
