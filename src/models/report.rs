use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 单张发票的生成结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedInvoice {
    pub invoice_number: u64,
    pub customer: String,
    pub contact_number: String,
    pub total_charges: String,
    pub document_path: String,
}

/// 失败组: 保留客户标识与已占用的发票号便于排查
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedInvoice {
    pub invoice_number: u64,
    pub customer: String,
    pub error: String,
}

/// 批次生成统计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReport {
    pub issue_date: String,
    pub total_groups: usize,
    pub generated: Vec<GeneratedInvoice>,
    pub failed: Vec<FailedInvoice>,
    pub total_amount: BigDecimal, // 成功组的合计金额
}
