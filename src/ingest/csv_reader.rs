use crate::ingest::error::{IngestError, IngestResult};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始表: 表头 + 按表头取值的行
///
/// 列缺省策略 (service::normalizer) 依赖表头集合判断列是否整列缺失,
/// 所以表头与行分开保存。
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

impl RawTable {
    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }
}

/// 读取货运 CSV 导出为原始表
pub fn read_shipment_table(file_path: &Path) -> IngestResult<RawTable> {
    if !file_path.exists() {
        return Err(IngestError::FileNotFound(file_path.display().to_string()));
    }

    let ext = file_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    if ext != "csv" {
        return Err(IngestError::UnsupportedFormat(ext.to_string()));
    }

    let file = File::open(file_path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row_map = HashMap::new();

        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                row_map.insert(header.clone(), value.trim().to_string());
            }
        }

        // 跳过完全空白的行
        if row_map.values().all(|v| v.is_empty()) {
            continue;
        }

        rows.push(row_map);
    }

    Ok(RawTable { headers, rows })
}
