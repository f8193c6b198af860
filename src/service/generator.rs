use crate::ingest::LedgerSink;
use crate::models::{
    fmt2, BillingRecord, ConsolidatedGroup, FailedInvoice, GenerateReport, GeneratedInvoice,
    ShipmentRow,
};
use crate::service::error::GenerateError;
use crate::service::render::DocumentRenderer;
use crate::service::{consolidator, normalizer};
use bigdecimal::{BigDecimal, Zero};
use chrono::Local;

/// 发票生成服务: 编号、组装、驱动渲染器与台账
pub struct InvoiceGenerator {
    renderer: Box<dyn DocumentRenderer>,
    ledger: Box<dyn LedgerSink>,
}

impl InvoiceGenerator {
    pub fn new(renderer: Box<dyn DocumentRenderer>, ledger: Box<dyn LedgerSink>) -> Self {
        Self { renderer, ledger }
    }

    /// 批量生成入口
    ///
    /// 组级错误隔离: 单组渲染/台账失败记入报告后继续后续组,
    /// 失败组的发票号保持占用, 批内不回收不复用。
    pub fn generate(
        &self,
        rows: &[ShipmentRow],
        last_invoice_number: u64,
    ) -> Result<GenerateReport, GenerateError> {
        let normalized = normalizer::normalize_rows(rows);
        let groups = consolidator::consolidate(&normalized)?;

        // 发行日期整批取一次, 保证批内一致
        let issue_date = Local::now().format("%Y-%m-%d").to_string();
        let start = last_invoice_number + 1;
        let records = assemble_records(groups, start, &issue_date);
        let total_groups = records.len();

        tracing::info!("开始生成: {} 个客户组, 起始发票号 {}", total_groups, start);

        let mut generated = Vec::new();
        let mut failed = Vec::new();
        let mut total_amount = BigDecimal::zero();

        for record in &records {
            match self.emit(record) {
                Ok(document_path) => {
                    tracing::info!(
                        "发票 {} (客户 {}) 已生成: {}",
                        record.invoice_number,
                        record.group.mark,
                        document_path
                    );
                    total_amount += &record.group.total_charges;
                    generated.push(GeneratedInvoice {
                        invoice_number: record.invoice_number,
                        customer: record.group.mark.clone(),
                        contact_number: record.group.contact_number.clone(),
                        total_charges: fmt2(&record.group.total_charges),
                        document_path,
                    });
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    failed.push(FailedInvoice {
                        invoice_number: record.invoice_number,
                        customer: record.group.mark.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "生成完成: 组 {}, 成功 {}, 失败 {}",
            total_groups,
            generated.len(),
            failed.len()
        );

        Ok(GenerateReport {
            issue_date,
            total_groups,
            generated,
            failed,
            total_amount,
        })
    }

    /// 单组落地: 先渲染文档, 再追加台账
    fn emit(&self, record: &BillingRecord) -> Result<String, GenerateError> {
        let path = self
            .renderer
            .render(&record.document_name, &record.template_fields())
            .map_err(|source| GenerateError::Render {
                customer: record.group.mark.clone(),
                invoice_number: record.invoice_number,
                source,
            })?;

        let location = path.display().to_string();
        self.ledger
            .append(&record.ledger_entry(&location))
            .map_err(|source| GenerateError::Ledger {
                customer: record.group.mark.clone(),
                invoice_number: record.invoice_number,
                source,
            })?;

        Ok(location)
    }
}

/// 组装账单记录: 组序分配连续发票号, 同批共享发行日期
///
/// 纯函数: 相同分组 + 相同起始号 + 相同日期 → 逐字节相同的记录。
pub fn assemble_records(
    groups: Vec<ConsolidatedGroup>,
    start: u64,
    issue_date: &str,
) -> Vec<BillingRecord> {
    groups
        .into_iter()
        .enumerate()
        .map(|(idx, group)| {
            let invoice_number = start + idx as u64;
            let document_name = format!(
                "Invoice_{}_{}_{}_{}",
                invoice_number,
                sanitize_filename(&group.mark),
                sanitize_filename(&group.contact_number),
                sanitize_filename(&fmt2(&group.total_charges)),
            );
            BillingRecord {
                invoice_number,
                issue_date: issue_date.to_string(),
                document_name,
                group,
            }
        })
        .collect()
}

/// 路径非法字符 \ / : * ? " < > | 替换为下划线
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}
