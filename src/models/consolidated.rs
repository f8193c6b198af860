use bigdecimal::BigDecimal;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 按 %.2f 口径格式化 (仅展示层做舍入, 累加保持全精度)
pub fn fmt2(value: &BigDecimal) -> String {
    value.round(2).to_string()
}

/// 缺失值展示为空串
pub fn fmt2_opt(value: &Option<BigDecimal>) -> String {
    value.as_ref().map(fmt2).unwrap_or_default()
}

/// 组级计费拆解 (不单独落盘, 直接并入组)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    pub calculated: BigDecimal, // 保底价或 Σ(体积×费率)
    pub total: BigDecimal,      // calculated + 附加费
}

/// 合并记录: 每个客户标识一条
///
/// 多行字段已折叠为换行分隔的展示串, 行序 = 输入行序;
/// 合计字段保留全精度, 供计费与台账使用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedGroup {
    pub mark: String,
    pub receipt_no: String,
    pub qty: String,
    pub description: String,
    pub cbm: String,
    pub weight_kg: String,
    pub parking_charges: String,
    pub per_charges: String, // 首行费率展示值, 缺失为空串
    pub contact_number: String,
    pub total_qty: BigDecimal,
    pub total_cbm: BigDecimal,
    pub total_charges: BigDecimal,
}

/// 最终账单记录: 每个客户组一条, 组装后不可变
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingRecord {
    pub invoice_number: u64,
    pub issue_date: String, // YYYY-MM-DD, 同批次共享
    pub document_name: String,
    pub group: ConsolidatedGroup,
}

impl BillingRecord {
    /// 渲染用字段表: 全部非 TOTAL* 字段 + DATE + INVOICE NUMBER
    ///
    /// 合计字段走台账而非模板正文, 故键名以 TOTAL 开头的一律不进模板。
    pub fn template_fields(&self) -> IndexMap<String, String> {
        let g = &self.group;
        let mut fields = IndexMap::new();
        fields.insert("RECEIPT NO.".to_string(), g.receipt_no.clone());
        fields.insert("QTY".to_string(), g.qty.clone());
        fields.insert("DESCRIPTION".to_string(), g.description.clone());
        fields.insert("CBM".to_string(), g.cbm.clone());
        fields.insert("WEIGHT(KG)".to_string(), g.weight_kg.clone());
        fields.insert("PARKING CHARGES".to_string(), g.parking_charges.clone());
        fields.insert("PER CHARGES".to_string(), g.per_charges.clone());
        fields.insert("MARK".to_string(), g.mark.clone());
        fields.insert("CONTACT NUMBER".to_string(), g.contact_number.clone());
        fields.insert("DATE".to_string(), self.issue_date.clone());
        fields.insert(
            "INVOICE NUMBER".to_string(),
            self.invoice_number.to_string(),
        );
        fields
    }

    /// 台账行 (document_location = 渲染产物落盘位置)
    pub fn ledger_entry(&self, document_location: &str) -> LedgerEntry {
        LedgerEntry {
            customer: self.group.mark.clone(),
            invoice_url: document_location.to_string(),
            invoice_no: self.invoice_number.to_string(),
            contact_no: self.group.contact_number.clone(),
            invoice_total: fmt2(&self.group.total_charges),
        }
    }
}

/// 台账行: 追加写, 追加序 = 生成序, 不去重
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub customer: String,
    pub invoice_url: String,
    pub invoice_no: String,
    pub contact_no: String,
    pub invoice_total: String,
}
