/// 服务器可调项，全部来自环境变量
///
/// | 变量 | 缺省 | 作用 |
/// |------|------|------|
/// | HTTP_PORT | 3000 | 监听端口 |
/// | DB_PATH | data/restora.db | 嵌入式数据库路径 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | 日志输出 JSON 格式 |
/// | LOG_DIR | (未设置) | 日志目录，设置后按天滚动写文件 |
/// | EMAIL_ENABLED | true | 是否启用邮件通道 |
///
/// ```ignore
/// HTTP_PORT=8080 DB_PATH=/data/restora.db cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 监听端口
    pub http_port: u16,
    /// 嵌入式数据库 (RocksDB) 路径
    pub db_path: String,
    /// development | staging | production
    pub environment: String,
    /// 日志级别: trace | debug | info | warn | error
    pub log_level: String,
    /// 日志是否输出 JSON 格式
    pub log_json: bool,
    /// 日志目录，未设置时只输出到终端
    pub log_dir: Option<String>,
    /// 邮件通道开关，关闭后密码重置邮件按上游失败处理
    pub email_enabled: bool,
}

impl Config {
    /// 读环境变量，缺省值兜底
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            db_path: std::env::var("DB_PATH").unwrap_or_else(|_| "data/restora.db".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok(),
            email_enabled: std::env::var("EMAIL_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    /// 覆盖数据库路径与端口，测试用
    pub fn with_overrides(db_path: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.db_path = db_path.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
