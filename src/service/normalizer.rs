use crate::ingest::{IngestError, IngestResult, RawTable};
use crate::models::{NormalizedRow, ShipmentRow};
use bigdecimal::{BigDecimal, Zero};
use std::collections::HashMap;

/// 分组键列, 整列缺失属于致命配置错误 (区别于可缺省列)
pub const MARK_COLUMN: &str = "MARK";

/// 可缺省的标识类列, 缺失补空串
const DEFAULT_TEXT_COLUMNS: [&str; 3] = ["CARGO NUMBER", "TRACKING NUMBER", "TERMS"];

/// 可缺省的数值列, 缺失补 0
const DEFAULT_NUMERIC_COLUMNS: [&str; 3] = ["PARKING CHARGES", "Weight Rate", "PER CHARGES"];

/// 列缺省: 源表整列缺失时补策略默认值
///
/// 纯函数式整表操作, 对缺失数值不报错 (按 0 处理是后续契约)。
pub fn apply_column_defaults(table: &mut RawTable) {
    for col in DEFAULT_TEXT_COLUMNS {
        fill_missing_column(table, col, "");
    }
    for col in DEFAULT_NUMERIC_COLUMNS {
        fill_missing_column(table, col, "0");
    }
}

fn fill_missing_column(table: &mut RawTable, column: &str, default: &str) {
    if table.has_column(column) {
        return;
    }
    table.headers.push(column.to_string());
    for row in &mut table.rows {
        row.insert(column.to_string(), default.to_string());
    }
}

/// 原始表 → 类型化货运行
///
/// MARK 列整列缺失时直接失败; 数值格式非法按缺失处理并告警。
pub fn map_rows(table: &RawTable) -> IngestResult<Vec<ShipmentRow>> {
    if !table.has_column(MARK_COLUMN) {
        return Err(IngestError::ColumnMissing(MARK_COLUMN.to_string()));
    }

    let rows = table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| ShipmentRow {
            mark: get_string(row, MARK_COLUMN).unwrap_or_default(),
            receipt_no: get_string(row, "RECEIPT NO."),
            description: get_string(row, "DESCRIPTION"),
            qty: parse_decimal(row, "QTY", idx),
            meas_cbm: parse_decimal(row, "MEAS.(CBM)", idx),
            weight_kg: parse_decimal(row, "WEIGHT(KG)", idx),
            weight_rate: parse_decimal(row, "Weight Rate", idx),
            per_charges: parse_decimal(row, "PER CHARGES", idx),
            parking_charges: parse_decimal(row, "PARKING CHARGES", idx),
            cargo_number: get_string(row, "CARGO NUMBER"),
            tracking_number: get_string(row, "TRACKING NUMBER"),
            terms: get_string(row, "TERMS"),
            contact_number: get_string(row, "CONTACT NUMBER"),
        })
        .collect();

    Ok(rows)
}

fn get_string(row: &HashMap<String, String>, key: &str) -> Option<String> {
    row.get(key).and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_decimal(row: &HashMap<String, String>, key: &str, row_idx: usize) -> Option<BigDecimal> {
    let value = get_string(row, key)?;
    match value.parse::<BigDecimal>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("行 {} 列 {} 数值非法, 按缺失处理: {}", row_idx + 1, key, value);
            None
        }
    }
}

/// 派生体积: 重量折算体积 + 计费体积
pub fn normalize_rows(rows: &[ShipmentRow]) -> Vec<NormalizedRow> {
    rows.iter().cloned().map(normalize_row).collect()
}

pub fn normalize_row(row: ShipmentRow) -> NormalizedRow {
    let derived_volume = derived_volume(&row);
    let measured = row.meas_cbm.clone().unwrap_or_else(BigDecimal::zero);
    let billing_volume = if derived_volume > measured {
        derived_volume.clone()
    } else {
        measured
    };

    NormalizedRow {
        row,
        derived_volume,
        billing_volume,
    }
}

/// weight_kg / weight_rate, 系数缺失或为 0 时取 0
fn derived_volume(row: &ShipmentRow) -> BigDecimal {
    match &row.weight_rate {
        Some(rate) if !rate.is_zero() => {
            let weight = row.weight_kg.clone().unwrap_or_else(BigDecimal::zero);
            weight / rate
        }
        _ => BigDecimal::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn row_with_volumes(
        meas: Option<&str>,
        weight: Option<&str>,
        rate: Option<&str>,
    ) -> ShipmentRow {
        ShipmentRow {
            mark: "A".to_string(),
            meas_cbm: meas.map(dec),
            weight_kg: weight.map(dec),
            weight_rate: rate.map(dec),
            ..Default::default()
        }
    }

    #[test]
    fn billing_volume_takes_larger_of_measured_and_derived() {
        // 派生体积 100/500 = 0.2 > 实测 0.1
        let n = normalize_row(row_with_volumes(Some("0.1"), Some("100"), Some("500")));
        assert_eq!(n.derived_volume, dec("0.2"));
        assert_eq!(n.billing_volume, dec("0.2"));

        // 实测更大
        let n = normalize_row(row_with_volumes(Some("1.5"), Some("100"), Some("500")));
        assert_eq!(n.billing_volume, dec("1.5"));
    }

    #[test]
    fn zero_or_missing_weight_rate_means_no_derived_volume() {
        let n = normalize_row(row_with_volumes(Some("0.3"), Some("100"), Some("0")));
        assert!(n.derived_volume.is_zero());
        assert_eq!(n.billing_volume, dec("0.3"));

        let n = normalize_row(row_with_volumes(Some("0.3"), Some("100"), None));
        assert!(n.derived_volume.is_zero());
    }

    #[test]
    fn missing_measured_volume_counts_as_zero() {
        let n = normalize_row(row_with_volumes(None, Some("50"), Some("500")));
        assert_eq!(n.billing_volume, dec("0.1"));

        let n = normalize_row(row_with_volumes(None, None, None));
        assert!(n.billing_volume.is_zero());
    }

    #[test]
    fn column_defaults_fill_only_missing_columns() {
        let mut table = RawTable {
            headers: vec!["MARK".to_string(), "PER CHARGES".to_string()],
            rows: vec![HashMap::from([
                ("MARK".to_string(), "A".to_string()),
                ("PER CHARGES".to_string(), "5".to_string()),
            ])],
        };

        apply_column_defaults(&mut table);

        assert!(table.has_column("CARGO NUMBER"));
        assert!(table.has_column("Weight Rate"));
        assert_eq!(table.rows[0]["CARGO NUMBER"], "");
        assert_eq!(table.rows[0]["PARKING CHARGES"], "0");
        // 已有列不被覆盖
        assert_eq!(table.rows[0]["PER CHARGES"], "5");
    }

    #[test]
    fn map_rows_requires_mark_column() {
        let table = RawTable {
            headers: vec!["QTY".to_string()],
            rows: vec![HashMap::from([("QTY".to_string(), "1".to_string())])],
        };
        let err = map_rows(&table).unwrap_err();
        assert!(matches!(err, IngestError::ColumnMissing(c) if c == "MARK"));
    }

    #[test]
    fn map_rows_is_lenient_about_bad_numbers() {
        let mut table = RawTable {
            headers: vec!["MARK".to_string(), "QTY".to_string(), "MEAS.(CBM)".to_string()],
            rows: vec![HashMap::from([
                ("MARK".to_string(), "A".to_string()),
                ("QTY".to_string(), "abc".to_string()),
                ("MEAS.(CBM)".to_string(), "0.02".to_string()),
            ])],
        };
        apply_column_defaults(&mut table);

        let rows = map_rows(&table).unwrap();
        assert_eq!(rows[0].mark, "A");
        assert_eq!(rows[0].qty, None);
        assert_eq!(rows[0].meas_cbm, Some(dec("0.02")));
        // 缺省列已补 0
        assert_eq!(rows[0].parking_charges, Some(BigDecimal::from(0)));
    }
}
