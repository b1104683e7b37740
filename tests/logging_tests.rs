//! 日志初始化冒烟测试
//!
//! init_logging 设置全局 subscriber，只能在独立的测试进程里跑一次。

use tempfile::TempDir;

use linktally::config::LoggingConfig;
use linktally::logging::init_logging;

#[test]
fn test_init_logging_writes_to_file() {
    let td = TempDir::new().unwrap();
    let log_path = td.path().join("linktally-test.log");

    let config = LoggingConfig {
        level: "info".to_string(),
        file: Some(log_path.display().to_string()),
        format: "full".to_string(),
        enable_rotation: false,
        max_backups: 3,
    };

    let guard = init_logging(&config);
    tracing::info!("logging smoke test entry");

    // guard 落盘后文件应当存在且非空
    drop(guard);

    let metadata = std::fs::metadata(&log_path).unwrap();
    assert!(metadata.len() > 0);
}
