use std::fmt;

#[derive(Debug, Clone)]
pub enum LinktallyError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    CacheConnection(String),
    Serialization(String),
    DateParse(String),
    Config(String),
    InvalidStartDate(String),
    InvalidEndDate(String),
    LinkNotRegistered(String),
}

impl LinktallyError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinktallyError::DatabaseConfig(_) => "E001",
            LinktallyError::DatabaseConnection(_) => "E002",
            LinktallyError::DatabaseOperation(_) => "E003",
            LinktallyError::CacheConnection(_) => "E004",
            LinktallyError::Serialization(_) => "E005",
            LinktallyError::DateParse(_) => "E006",
            LinktallyError::Config(_) => "E007",
            LinktallyError::InvalidStartDate(_) => "E008",
            LinktallyError::InvalidEndDate(_) => "E009",
            LinktallyError::LinkNotRegistered(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinktallyError::DatabaseConfig(_) => "Database Configuration Error",
            LinktallyError::DatabaseConnection(_) => "Database Connection Error",
            LinktallyError::DatabaseOperation(_) => "Database Operation Error",
            LinktallyError::CacheConnection(_) => "Cache Connection Error",
            LinktallyError::Serialization(_) => "Serialization Error",
            LinktallyError::DateParse(_) => "Date Parse Error",
            LinktallyError::Config(_) => "Configuration Error",
            LinktallyError::InvalidStartDate(_) => "Invalid Start Date",
            LinktallyError::InvalidEndDate(_) => "Invalid End Date",
            LinktallyError::LinkNotRegistered(_) => "Link Not Registered",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinktallyError::DatabaseConfig(msg) => msg,
            LinktallyError::DatabaseConnection(msg) => msg,
            LinktallyError::DatabaseOperation(msg) => msg,
            LinktallyError::CacheConnection(msg) => msg,
            LinktallyError::Serialization(msg) => msg,
            LinktallyError::DateParse(msg) => msg,
            LinktallyError::Config(msg) => msg,
            LinktallyError::InvalidStartDate(msg) => msg,
            LinktallyError::InvalidEndDate(msg) => msg,
            LinktallyError::LinkNotRegistered(msg) => msg,
        }
    }

    /// 用户可修正的错误（校验/业务类，HTTP 层映射到 400）；
    /// 其余为基础设施错误，当前请求直接终止
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            LinktallyError::InvalidStartDate(_)
                | LinktallyError::InvalidEndDate(_)
                | LinktallyError::LinkNotRegistered(_)
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinktallyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinktallyError {}

// 便捷的构造函数
impl LinktallyError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinktallyError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinktallyError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinktallyError::DatabaseOperation(msg.into())
    }

    pub fn cache_connection<T: Into<String>>(msg: T) -> Self {
        LinktallyError::CacheConnection(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinktallyError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        LinktallyError::DateParse(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinktallyError::Config(msg.into())
    }

    pub fn invalid_start_date<T: Into<String>>(msg: T) -> Self {
        LinktallyError::InvalidStartDate(msg.into())
    }

    pub fn invalid_end_date<T: Into<String>>(msg: T) -> Self {
        LinktallyError::InvalidEndDate(msg.into())
    }

    pub fn link_not_registered<T: Into<String>>(msg: T) -> Self {
        LinktallyError::LinkNotRegistered(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LinktallyError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinktallyError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinktallyError {
    fn from(err: serde_json::Error) -> Self {
        LinktallyError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for LinktallyError {
    fn from(err: redis::RedisError) -> Self {
        LinktallyError::CacheConnection(err.to_string())
    }
}

impl From<chrono::ParseError> for LinktallyError {
    fn from(err: chrono::ParseError) -> Self {
        LinktallyError::DateParse(err.to_string())
    }
}

impl From<config::ConfigError> for LinktallyError {
    fn from(err: config::ConfigError) -> Self {
        LinktallyError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinktallyError>;
