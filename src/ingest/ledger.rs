use crate::ingest::error::LedgerError;
use crate::models::LedgerEntry;
use csv::{ReaderBuilder, Writer};
use std::fs::File;
use std::path::{Path, PathBuf};

const LEDGER_HEADERS: [&str; 5] = [
    "CUSTOMER",
    "INVOICE URL",
    "INVOICE NO",
    "CONTACT NO",
    "INVOICE TOTAL",
];

/// 台账落地能力: 追加一条生成记录
///
/// 合并已有台账是接收方的职责, 核心不读台账状态。
pub trait LedgerSink: Send + Sync {
    fn append(&self, entry: &LedgerEntry) -> Result<(), LedgerError>;
}

/// CSV 通知表实现: 读-并-重写追加
///
/// 降级策略: 已有表读取失败时以本次条目为全部内容继续
/// (接受丢失旧条目, 不让生成失败)。
pub struct CsvLedgerSink {
    path: PathBuf,
}

impl CsvLedgerSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(path: &Path) -> Result<Vec<LedgerEntry>, LedgerError> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let mut entries = Vec::new();
        for result in reader.records() {
            let record = result?;
            entries.push(LedgerEntry {
                customer: record.get(0).unwrap_or_default().to_string(),
                invoice_url: record.get(1).unwrap_or_default().to_string(),
                invoice_no: record.get(2).unwrap_or_default().to_string(),
                contact_no: record.get(3).unwrap_or_default().to_string(),
                invoice_total: record.get(4).unwrap_or_default().to_string(),
            });
        }
        Ok(entries)
    }

    fn write_entries(&self, entries: &[LedgerEntry]) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.path)?;
        let mut writer = Writer::from_writer(file);

        writer.write_record(LEDGER_HEADERS)?;
        for entry in entries {
            writer.write_record(&[
                entry.customer.clone(),
                entry.invoice_url.clone(),
                entry.invoice_no.clone(),
                entry.contact_no.clone(),
                entry.invoice_total.clone(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl LedgerSink for CsvLedgerSink {
    fn append(&self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        let mut entries = if self.path.exists() {
            match Self::read_entries(&self.path) {
                Ok(existing) => existing,
                Err(e) => {
                    tracing::warn!(
                        "台账 {} 读取失败, 按本次条目重建: {}",
                        self.path.display(),
                        e
                    );
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        entries.push(entry.clone());
        self.write_entries(&entries)
    }
}
