use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// 货运原始行 (舱单/账单导出的一行)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipmentRow {
    pub mark: String,      // 客户标识 (分组键)
    pub receipt_no: Option<String>,
    pub description: Option<String>,
    pub qty: Option<BigDecimal>,
    pub meas_cbm: Option<BigDecimal>,   // 实测体积
    pub weight_kg: Option<BigDecimal>,
    pub weight_rate: Option<BigDecimal>,    // 重量折算体积系数
    pub per_charges: Option<BigDecimal>,    // 单位体积费率
    pub parking_charges: Option<BigDecimal>, // 按组固定附加费
    pub cargo_number: Option<String>,
    pub tracking_number: Option<String>,
    pub terms: Option<String>,
    pub contact_number: Option<String>,
}

/// 规整行 = 原始行 + 派生体积字段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub row: ShipmentRow,
    pub derived_volume: BigDecimal, // weight_kg / weight_rate (系数无效时为 0)
    pub billing_volume: BigDecimal, // max(meas_cbm, derived_volume)
}

impl NormalizedRow {
    /// 行费率, 缺失按 0 参与计算
    pub fn rate_or_zero(&self) -> BigDecimal {
        self.row
            .per_charges
            .clone()
            .unwrap_or_else(BigDecimal::zero)
    }
}
