use std::fmt;

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    NotFound(String),
    AlreadyPaid(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::AlreadyPaid(msg) => write!(f, "Already paid: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let err = AppError::NotFound("parcel 65a1 does not exist".to_string());
        assert_eq!(err.to_string(), "Not found: parcel 65a1 does not exist");

        let err = AppError::AlreadyPaid("65a1".to_string());
        assert!(err.to_string().starts_with("Already paid:"));
    }
}
