//! 報表行排序規則

use perfumery_core::ingredient::pyramid_rank;
use perfumery_core::BatchReportRow;
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// 報表排序器
pub struct ReportOrdering;

impl ReportOrdering {
    /// 穩定排序：香調位置（後調在前）→ 用量大到小 → 名稱（忽略大小寫）
    ///
    /// 先以精確用量做全序排序，再把同一香調中與區段首行相差不超過
    /// `epsilon` 的連續行視為同量，依名稱重排。
    /// 同一區段內任兩行的差距都不超過 `epsilon`，區段之間仍保持用量遞減。
    pub fn sort(rows: &mut [BatchReportRow], epsilon: Decimal) {
        rows.sort_by(Self::compare);

        let mut start = 0;
        while start < rows.len() {
            let rank = pyramid_rank(rows[start].pyramid);
            let anchor = rows[start].final_quantity;

            let mut end = start + 1;
            while end < rows.len()
                && pyramid_rank(rows[end].pyramid) == rank
                && almost_equal(anchor, rows[end].final_quantity, epsilon)
            {
                end += 1;
            }

            if end - start > 1 {
                rows[start..end].sort_by_cached_key(|row| row.ingredient_name.to_lowercase());
            }
            start = end;
        }
    }

    /// 兩行的精確先後順序（不含容差）
    pub fn compare(a: &BatchReportRow, b: &BatchReportRow) -> Ordering {
        pyramid_rank(a.pyramid)
            .cmp(&pyramid_rank(b.pyramid))
            // 大的在前
            .then_with(|| b.final_quantity.cmp(&a.final_quantity))
            .then_with(|| {
                a.ingredient_name
                    .to_lowercase()
                    .cmp(&b.ingredient_name.to_lowercase())
            })
    }

    /// 排序後依序編號（從 1 開始）
    pub fn assign_ranks(rows: &mut [BatchReportRow]) {
        for (idx, row) in rows.iter_mut().enumerate() {
            row.rank = idx + 1;
        }
    }
}

/// 兩數量差距是否在容差以內
pub fn almost_equal(a: Decimal, b: Decimal, epsilon: Decimal) -> bool {
    (a - b).abs() <= epsilon
}
