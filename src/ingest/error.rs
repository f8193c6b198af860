use thiserror::Error;

/// 表格接入错误类型
#[derive(Error, Debug)]
pub enum IngestError {
    // ===== 文件相关 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv）")]
    UnsupportedFormat(String),

    #[error("CSV 解析失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    // ===== 结构相关 =====
    #[error("必需列缺失: {0}")]
    ColumnMissing(String),
}

pub type IngestResult<T> = Result<T, IngestError>;

/// 台账表错误类型 (读侧失败由降级策略吸收, 只剩写侧)
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("台账写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("台账文件操作失败: {0}")]
    Io(#[from] std::io::Error),
}
