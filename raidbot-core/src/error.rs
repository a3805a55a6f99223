// Error types for the HTTP layer

use crate::HttpStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        self.http_status().code()
    }

    pub fn http_status(&self) -> HttpStatus {
        match self {
            Error::RouteNotFound(_) | Error::NotFound(_) => HttpStatus::NotFound,
            Error::MethodNotAllowed(_) => HttpStatus::MethodNotAllowed,
            Error::BadRequest(_) => HttpStatus::BadRequest,
            Error::Serialization(_) | Error::Internal(_) | Error::Io(_) => {
                HttpStatus::InternalServerError
            }
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    pub fn is_server_error(&self) -> bool {
        self.http_status().is_server_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::RouteNotFound("GET /x".into()).status_code(), 404);
        assert_eq!(Error::BadRequest("form".into()).status_code(), 400);
        assert_eq!(Error::Internal("boom".into()).status_code(), 500);
        assert!(Error::MethodNotAllowed("DELETE /".into()).is_client_error());
        assert!(Error::Serialization("bootstrap".into()).is_server_error());
    }
}
