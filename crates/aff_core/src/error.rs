use thiserror::Error;

/// Structural failures that abort a rule compile or a dictionary pass.
///
/// Everything else the compiler or the expander notices is a
/// [`Diagnostic`](crate::Diagnostic) and never unwinds.
#[derive(Error, Debug)]
pub enum AffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{flag}: affix block declared at line {line} expects {declared} entries, file ends after {found}")]
    TruncatedAffixBlock {
        flag: String,
        declared: usize,
        found: usize,
        line: usize,
    },

    #[error("dictionary is empty: expected a word count on the first line")]
    MissingWordCount,

    #[error("line {line}: word count header is not a number: '{value}'")]
    BadWordCount { line: usize, value: String },
}

impl AffError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            AffError::Io(_) => true,
            AffError::TruncatedAffixBlock { .. } => false,
            AffError::MissingWordCount => false,
            AffError::BadWordCount { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, AffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_block_message_names_the_flag() {
        let err = AffError::TruncatedAffixBlock {
            flag: "A".to_string(),
            declared: 3,
            found: 1,
            line: 7,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("A:"));
        assert!(msg.contains("line 7"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_io_errors_are_recoverable() {
        let err: AffError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.is_recoverable());
    }
}
