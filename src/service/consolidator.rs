use crate::models::{fmt2, fmt2_opt, ConsolidatedGroup, NormalizedRow};
use crate::service::charge;
use crate::service::error::GenerateError;
use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;

/// 按客户标识合并规整行
///
/// 分组顺序 = 客户标识首次出现的行序 (IndexMap 保序), 这一顺序就是
/// 后续发票号的分配顺序, 是对外契约而非实现细节。
/// 空标识的行跳过并告警; 全部被跳过视为配置错误。
pub fn consolidate(rows: &[NormalizedRow]) -> Result<Vec<ConsolidatedGroup>, GenerateError> {
    let mut groups: IndexMap<String, Vec<NormalizedRow>> = IndexMap::new();
    let mut skipped = 0usize;

    for row in rows {
        let mark = row.row.mark.trim();
        if mark.is_empty() {
            skipped += 1;
            continue;
        }
        groups
            .entry(mark.to_string())
            .or_default()
            .push(row.clone());
    }

    if skipped > 0 {
        tracing::warn!("{} 行缺少客户标识, 不参与合并", skipped);
    }
    if groups.is_empty() && !rows.is_empty() {
        return Err(GenerateError::NoCustomerMarks);
    }

    Ok(groups
        .into_iter()
        .map(|(mark, members)| consolidate_group(mark, &members))
        .collect())
}

fn consolidate_group(mark: String, members: &[NormalizedRow]) -> ConsolidatedGroup {
    let total_qty = members.iter().fold(BigDecimal::zero(), |acc, r| {
        acc + r.row.qty.clone().unwrap_or_else(BigDecimal::zero)
    });
    let total_cbm = members.iter().fold(BigDecimal::zero(), |acc, r| {
        acc + r.billing_volume.clone()
    });

    let surcharge = first_surcharge(&mark, members);
    let breakdown = charge::group_charge(members, &surcharge);

    let first = &members[0];

    ConsolidatedGroup {
        receipt_no: join_lines(members, |r| r.row.receipt_no.clone().unwrap_or_default()),
        qty: join_lines(members, |r| fmt2_opt(&r.row.qty)),
        description: join_lines(members, |r| r.row.description.clone().unwrap_or_default()),
        cbm: join_lines(members, |r| fmt2(&r.billing_volume)),
        weight_kg: join_lines(members, |r| fmt2_opt(&r.row.weight_kg)),
        parking_charges: fmt2(&surcharge),
        per_charges: fmt2_opt(&first.row.per_charges),
        contact_number: first.row.contact_number.clone().unwrap_or_default(),
        mark,
        total_qty,
        total_cbm,
        total_charges: breakdown.total,
    }
}

/// 组内附加费取首个非缺失值 (假定每客户一致); 不一致时告警而非猜测
fn first_surcharge(mark: &str, members: &[NormalizedRow]) -> BigDecimal {
    let mut found: Option<BigDecimal> = None;
    for row in members {
        let Some(value) = &row.row.parking_charges else {
            continue;
        };
        match &found {
            None => found = Some(value.clone()),
            Some(first) if first != value => {
                tracing::warn!(
                    "客户 {} 组内 PARKING CHARGES 不一致: {} 与 {}, 按首值计",
                    mark,
                    first,
                    value
                );
            }
            Some(_) => {}
        }
    }
    found.unwrap_or_else(BigDecimal::zero)
}

/// 多行合并字段: 行序拼接, 换行分隔; 全空折叠为空串
fn join_lines<F>(members: &[NormalizedRow], line: F) -> String
where
    F: Fn(&NormalizedRow) -> String,
{
    let values: Vec<String> = members.iter().map(line).collect();
    if values.iter().all(|v| v.is_empty()) {
        String::new()
    } else {
        values.join("\n")
    }
}
