//! Conversions from external infrastructure errors into domain errors.

use linker_domain::LinkerError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub LinkerError);

impl From<InfraError> for LinkerError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<LinkerError> for InfraError {
    fn from(value: LinkerError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and
/// within this module.
trait IntoLinkerError {
    fn into_linker(self) -> LinkerError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → LinkerError */
/* -------------------------------------------------------------------------- */

impl IntoLinkerError for SqlError {
    fn into_linker(self) -> LinkerError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        LinkerError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        LinkerError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 1555 | 2067) => {
                        LinkerError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        LinkerError::Database("foreign key constraint violation".into())
                    }
                    _ => LinkerError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => LinkerError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                LinkerError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                LinkerError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => LinkerError::Database("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidParameterName(parameter_name) => {
                LinkerError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => {
                LinkerError::Database(format!("invalid database path: {}", path.to_string_lossy()))
            }
            RE::InvalidQuery => LinkerError::Database("invalid SQL query".into()),
            other => LinkerError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_linker())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → LinkerError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(LinkerError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → LinkerError */
/* -------------------------------------------------------------------------- */

impl IntoLinkerError for HttpError {
    fn into_linker(self) -> LinkerError {
        if self.is_timeout() {
            return LinkerError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return LinkerError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => LinkerError::Unauthorized(message),
                404 => LinkerError::NotFound(message),
                400..=499 => LinkerError::InvalidInput(message),
                _ => LinkerError::Network(message),
            };
        }

        LinkerError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_linker())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use rusqlite::ffi::{Error as FfiError, ErrorCode};
    use rusqlite::Error as SqlError;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: LinkerError = InfraError::from(err).into();
        match mapped {
            LinkerError::Database(msg) => {
                assert!(msg.contains("busy") || msg.contains("locked"));
            }
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[test]
    fn sqlite_primary_key_conflict_maps_to_unique_violation() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::ConstraintViolation, extended_code: 1555 },
            Some("UNIQUE constraint failed".into()),
        );

        let mapped: LinkerError = InfraError::from(err).into();
        match mapped {
            LinkerError::Database(msg) => assert!(msg.contains("unique")),
            other => panic!("expected database error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_status_401_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: LinkerError = InfraError::from(error).into();
        match mapped {
            LinkerError::Unauthorized(msg) => assert!(msg.contains("401")),
            other => panic!("expected unauthorized error, got {:?}", other),
        }
    }
}
