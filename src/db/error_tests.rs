//! Unit tests for database error types

#[cfg(test)]
mod tests {
    use crate::db::error::DbError;
    use crate::search::BackendError;
    use std::error::Error;

    #[test]
    fn test_not_found_error() {
        let error = DbError::NotFound("collection 4".to_string());
        assert_eq!(error.to_string(), "Resource not found: collection 4");
    }

    #[test]
    fn test_invalid_tag_error() {
        let error = DbError::InvalidTag("new york".to_string());
        let display = error.to_string();
        assert!(display.contains("Invalid tag 'new york'"));
    }

    #[test]
    fn test_corrupt_key_error() {
        let error = DbError::CorruptKey(3);
        assert_eq!(error.to_string(), "Corrupt key of 3 byte(s)");
    }

    #[test]
    fn test_error_debug() {
        let error = DbError::InvalidInput("test error".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidInput"));
        assert!(debug.contains("test error"));
    }

    #[test]
    fn test_error_source() {
        let error = DbError::NotFound("item 1".to_string());
        assert!(error.source().is_none());
    }

    #[test]
    fn test_into_backend_error() {
        let backend: BackendError = DbError::NotFound("item 9".to_string()).into();
        assert!(matches!(backend, BackendError::Source(_)));
        assert_eq!(backend.to_string(), "Resource not found: item 9");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DbError>();
    }

    #[test]
    fn test_error_pattern_matching() {
        let errors = vec![
            DbError::NotFound("item 1".to_string()),
            DbError::InvalidTag("a b".to_string()),
        ];

        for error in errors {
            match error {
                DbError::NotFound(what) => assert_eq!(what, "item 1"),
                DbError::InvalidTag(tag) => assert_eq!(tag, "a b"),
                _ => panic!("Unexpected error variant"),
            }
        }
    }
}
