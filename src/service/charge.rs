use crate::models::{ChargeBreakdown, NormalizedRow};
use bigdecimal::{BigDecimal, Zero};

/// 小票保底阈值: 组合计计费体积低于 0.05 CBM 走保底价
///
/// 用 5/100 构造, 保证与十进制输入的比较精确。
fn minimum_volume() -> BigDecimal {
    BigDecimal::from(5) / BigDecimal::from(100)
}

/// 保底价 10.00
fn minimum_charge() -> BigDecimal {
    BigDecimal::from(10)
}

/// 组级计费: 保底价或 Σ(计费体积 × 行费率), 再加组附加费
///
/// 全程全精度累加, 两位小数只在展示层出现。
pub fn group_charge(rows: &[NormalizedRow], surcharge: &BigDecimal) -> ChargeBreakdown {
    let total_volume: BigDecimal = rows
        .iter()
        .map(|r| r.billing_volume.clone())
        .fold(BigDecimal::zero(), |acc, v| acc + v);

    let calculated = if total_volume < minimum_volume() {
        minimum_charge()
    } else {
        rows.iter().fold(BigDecimal::zero(), |acc, r| {
            acc + &r.billing_volume * r.rate_or_zero()
        })
    };

    let total = &calculated + surcharge;
    ChargeBreakdown { calculated, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShipmentRow;
    use crate::service::normalizer::normalize_row;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn row(cbm: &str, rate: &str) -> NormalizedRow {
        normalize_row(ShipmentRow {
            mark: "X".to_string(),
            meas_cbm: Some(dec(cbm)),
            per_charges: Some(dec(rate)),
            ..Default::default()
        })
    }

    #[test]
    fn below_threshold_uses_minimum_charge_regardless_of_rate() {
        // spec 例: 组 A, CBM 0.02, 费率 5, 附加费 2 → 10.00 + 2.00
        let rows = vec![row("0.02", "5")];
        let charge = group_charge(&rows, &dec("2"));
        assert_eq!(charge.calculated, BigDecimal::from(10));
        assert_eq!(charge.total, BigDecimal::from(12));

        // 费率再高也不影响保底价
        let rows = vec![row("0.01", "9999")];
        let charge = group_charge(&rows, &BigDecimal::zero());
        assert_eq!(charge.calculated, BigDecimal::from(10));
    }

    #[test]
    fn at_or_above_threshold_sums_volume_times_rate() {
        // spec 例: 组 B, 两行 1.0 和 2.0, 费率 5 → 15.00
        let rows = vec![row("1.0", "5"), row("2.0", "5")];
        let charge = group_charge(&rows, &BigDecimal::zero());
        assert_eq!(charge.calculated, BigDecimal::from(15));
        assert_eq!(charge.total, BigDecimal::from(15));

        // 行费率可不同, 按行相乘后求和
        let rows = vec![row("0.03", "5"), row("0.04", "10")];
        let charge = group_charge(&rows, &BigDecimal::zero());
        assert_eq!(charge.calculated, dec("0.55"));
    }

    #[test]
    fn threshold_boundary_is_exact() {
        // 恰好 0.05 不走保底价
        let rows = vec![row("0.05", "100")];
        let charge = group_charge(&rows, &BigDecimal::zero());
        assert_eq!(charge.calculated, dec("5.00"));
    }

    #[test]
    fn missing_rate_counts_as_zero() {
        let rows = vec![normalize_row(ShipmentRow {
            mark: "X".to_string(),
            meas_cbm: Some(dec("1.0")),
            per_charges: None,
            ..Default::default()
        })];
        let charge = group_charge(&rows, &dec("3"));
        assert!(charge.calculated.is_zero());
        assert_eq!(charge.total, BigDecimal::from(3));
    }
}
