use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Storage read error: {0}")]
    StorageReadError(String),

    #[error("Storage write error: {0}")]
    StorageWriteError(String),

    #[error("Upstream fetch error: {0}")]
    UpstreamFetchError(String),

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("CSV system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Internal processing error: {0}")]
    InternalError(String),
}

impl From<EngineError> for tonic::Status {
    fn from(err: EngineError) -> Self {
        tracing::error!("Mapping EngineError to tonic::Status: {:?}", err);
        match err {
            EngineError::ConfigError(msg) => tonic::Status::failed_precondition(format!("Configuration error: {}", msg)),
            EngineError::ValidationError(msg) => tonic::Status::invalid_argument(msg),
            EngineError::StorageReadError(msg) => tonic::Status::internal(format!("Storage read error: {}", msg)),
            EngineError::StorageWriteError(msg) => tonic::Status::internal(format!("Storage write error: {}", msg)),
            EngineError::UpstreamFetchError(msg) => tonic::Status::unavailable(format!("Upstream fetch error: {}", msg)),
            EngineError::MalformedResponse(msg) => tonic::Status::unavailable(format!("Malformed upstream response: {}", msg)),
            EngineError::CsvSystemError { source } => tonic::Status::internal(format!("CSV system error: {}", source)),
            EngineError::IoError { source } => tonic::Status::internal(format!("I/O error: {}", source)),
            EngineError::InternalError(msg) => tonic::Status::internal(format!("Processing error: {}", msg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_maps_to_invalid_argument() {
        let status: tonic::Status = EngineError::ValidationError("from_date is after to_date".into()).into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert_eq!(status.message(), "from_date is after to_date");
    }

    #[test]
    fn test_io_error_maps_to_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let status: tonic::Status = EngineError::from(io).into();
        assert_eq!(status.code(), tonic::Code::Internal);
        assert!(status.message().contains("I/O error"));
    }

    #[test]
    fn test_upstream_error_maps_to_unavailable() {
        let status: tonic::Status = EngineError::UpstreamFetchError("HTTP 503".into()).into();
        assert_eq!(status.code(), tonic::Code::Unavailable);
    }
}
