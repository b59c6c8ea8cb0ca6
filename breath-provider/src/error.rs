/// Errors produced by a text generator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("generator has no more scripted responses")]
    Exhausted,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            GenerationError::Backend("503 upstream".into()).to_string(),
            "backend error: 503 upstream"
        );
        assert_eq!(
            GenerationError::Exhausted.to_string(),
            "generator has no more scripted responses"
        );
        assert_eq!(GenerationError::Other("boom".into()).to_string(), "boom");
    }
}
