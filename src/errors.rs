use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    MalformedAddress(String),
    MalformedRange(String),
    InvalidParameter(String),
    IndexUnavailable(String),
    IndexResponse(String),
    Serialization(String),
    Config(String),
    FileOperation(String),
}

impl LookupError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LookupError::MalformedAddress(_) => "E001",
            LookupError::MalformedRange(_) => "E002",
            LookupError::InvalidParameter(_) => "E003",
            LookupError::IndexUnavailable(_) => "E004",
            LookupError::IndexResponse(_) => "E005",
            LookupError::Serialization(_) => "E006",
            LookupError::Config(_) => "E007",
            LookupError::FileOperation(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LookupError::MalformedAddress(_) => "Malformed Address",
            LookupError::MalformedRange(_) => "Malformed Range",
            LookupError::InvalidParameter(_) => "Invalid Parameter",
            LookupError::IndexUnavailable(_) => "Index Unavailable",
            LookupError::IndexResponse(_) => "Index Response Error",
            LookupError::Serialization(_) => "Serialization Error",
            LookupError::Config(_) => "Configuration Error",
            LookupError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LookupError::MalformedAddress(msg) => msg,
            LookupError::MalformedRange(msg) => msg,
            LookupError::InvalidParameter(msg) => msg,
            LookupError::IndexUnavailable(msg) => msg,
            LookupError::IndexResponse(msg) => msg,
            LookupError::Serialization(msg) => msg,
            LookupError::Config(msg) => msg,
            LookupError::FileOperation(msg) => msg,
        }
    }

    /// Whether the failure comes from the index store rather than from user input.
    ///
    /// Only these are worth an operator's attention; input errors degrade to
    /// an empty result silently.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            LookupError::IndexUnavailable(_) | LookupError::IndexResponse(_)
        )
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LookupError {}

// 便捷的构造函数
impl LookupError {
    pub fn malformed_address<T: Into<String>>(msg: T) -> Self {
        LookupError::MalformedAddress(msg.into())
    }

    pub fn malformed_range<T: Into<String>>(msg: T) -> Self {
        LookupError::MalformedRange(msg.into())
    }

    pub fn invalid_parameter<T: Into<String>>(msg: T) -> Self {
        LookupError::InvalidParameter(msg.into())
    }

    pub fn index_unavailable<T: Into<String>>(msg: T) -> Self {
        LookupError::IndexUnavailable(msg.into())
    }

    pub fn index_response<T: Into<String>>(msg: T) -> Self {
        LookupError::IndexResponse(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LookupError::Serialization(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LookupError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LookupError::FileOperation(msg.into())
    }
}

impl From<std::io::Error> for LookupError {
    fn from(err: std::io::Error) -> Self {
        LookupError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Serialization(err.to_string())
    }
}

impl From<ureq::Error> for LookupError {
    fn from(err: ureq::Error) -> Self {
        LookupError::IndexUnavailable(err.to_string())
    }
}

impl From<config::ConfigError> for LookupError {
    fn from(err: config::ConfigError) -> Self {
        LookupError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let errors = [
            LookupError::malformed_address("x"),
            LookupError::malformed_range("x"),
            LookupError::invalid_parameter("x"),
            LookupError::index_unavailable("x"),
            LookupError::index_response("x"),
            LookupError::serialization("x"),
            LookupError::config("x"),
            LookupError::file_operation("x"),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_display_uses_simple_format() {
        let err = LookupError::malformed_range("1.2.3.4");
        assert_eq!(err.to_string(), "Malformed Range: 1.2.3.4");
    }

    #[test]
    fn test_store_failure_classification() {
        assert!(LookupError::index_unavailable("down").is_store_failure());
        assert!(LookupError::index_response("500").is_store_failure());
        assert!(!LookupError::invalid_parameter("region_id").is_store_failure());
        assert!(!LookupError::malformed_address("abc").is_store_failure());
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LookupError = io.into();
        assert_eq!(err.code(), "E008");
        assert!(err.message().contains("missing"));
    }
}
