//! 批次生產報表模型

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::formula::FormulaId;
use crate::ingredient::{IngredientId, PyramidPosition};
use crate::unit::MassUnit;

/// 報表中的單一原料行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReportRow {
    /// 排序後的序號（從 1 開始）
    pub rank: usize,

    /// 原料ID
    pub ingredient_id: IngredientId,

    /// 原料名稱
    pub ingredient_name: String,

    /// CAS 登錄號
    pub cas_number: Option<String>,

    /// 香調位置
    pub pyramid: Option<PyramidPosition>,

    /// 香調標籤
    pub pyramid_label: String,

    /// 未縮放用量
    pub base_quantity: Decimal,

    /// 縮放後用量
    pub final_quantity: Decimal,

    /// 單位
    pub unit: MassUnit,
}

impl BatchReportRow {
    /// 格式化後的縮放用量
    pub fn formatted_quantity(&self) -> String {
        format_quantity(self.final_quantity, self.unit)
    }
}

/// 被略過的組成行類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// 計算後用量不為正
    NonPositiveAmount,
    /// 子配方總量不為正
    NonPositiveSubFormulaTotal,
}

/// 報表警告（記錄被容忍而略過的組成行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchWarning {
    pub formula_id: FormulaId,
    pub kind: WarningKind,
    pub message: String,
}

impl BatchWarning {
    pub fn new(formula_id: FormulaId, kind: WarningKind, message: String) -> Self {
        Self {
            formula_id,
            kind,
            message,
        }
    }
}

/// 批次生產報表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// 配方ID
    pub formula_id: FormulaId,

    /// 配方名稱
    pub formula_name: String,

    /// 配方版本
    pub formula_version: u32,

    /// 目標數量
    pub target_quantity: Decimal,

    /// 目標單位
    pub target_unit: MassUnit,

    /// 基準批量（配方直接組成的總量）
    pub base_batch_quantity: Decimal,

    /// 基準批量單位
    pub base_batch_unit: MassUnit,

    /// 縮放倍率
    pub scale_factor: Decimal,

    /// 批號
    pub lot_number: String,

    /// 產生時間
    pub run_date: DateTime<Utc>,

    /// 排序後的原料行
    pub rows: Vec<BatchReportRow>,

    /// 警告
    pub warnings: Vec<BatchWarning>,
}

impl BatchReport {
    /// 所有原料縮放後用量的總和
    pub fn total_final_quantity(&self) -> Decimal {
        self.rows.iter().map(|row| row.final_quantity).sum()
    }

    /// 按名稱查找原料行（忽略大小寫）
    pub fn row_by_name(&self, name: &str) -> Option<&BatchReportRow> {
        let needle = name.to_lowercase();
        self.rows
            .iter()
            .find(|row| row.ingredient_name.to_lowercase() == needle)
    }

    /// 格式化後的產生日期
    pub fn formatted_run_date(&self) -> String {
        format_run_date(&self.run_date)
    }

    /// 是否有警告
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// 格式化數量：毫克不保留小數，其他單位保留兩位小數
pub fn format_quantity(value: Decimal, unit: MassUnit) -> String {
    let places = if unit == MassUnit::Milligram { 0 } else { 2 };
    let rounded = value.round_dp_with_strategy(places as u32, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*} {}", places, rounded, unit)
}

/// 格式化日期，例如 `02 Jan 2025`
pub fn format_run_date(value: &DateTime<Utc>) -> String {
    value.format("%d %b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(name: &str, final_quantity: i64) -> BatchReportRow {
        BatchReportRow {
            rank: 1,
            ingredient_id: IngredientId(1),
            ingredient_name: name.to_string(),
            cas_number: None,
            pyramid: Some(PyramidPosition::Base),
            pyramid_label: "Base".to_string(),
            base_quantity: Decimal::from(final_quantity),
            final_quantity: Decimal::from(final_quantity),
            unit: MassUnit::Gram,
        }
    }

    fn report(rows: Vec<BatchReportRow>) -> BatchReport {
        BatchReport {
            formula_id: FormulaId(1),
            formula_name: "Auric Essence".to_string(),
            formula_version: 2,
            target_quantity: Decimal::from(30),
            target_unit: MassUnit::Gram,
            base_batch_quantity: Decimal::from(15),
            base_batch_unit: MassUnit::Gram,
            scale_factor: Decimal::from(2),
            lot_number: "PERF-20250102-002".to_string(),
            run_date: Utc.with_ymd_and_hms(2025, 1, 2, 15, 4, 5).unwrap(),
            rows,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(Decimal::new(26, 0), MassUnit::Gram), "26.00 g");
        assert_eq!(format_quantity(Decimal::new(12345, 3), MassUnit::Gram), "12.35 g");
        assert_eq!(format_quantity(Decimal::new(2504, 1), MassUnit::Milligram), "250 mg");
    }

    #[test]
    fn test_report_helpers() {
        let report = report(vec![row("Amber Core", 26), row("Citrus Lift", 4)]);

        assert_eq!(report.total_final_quantity(), Decimal::from(30));
        assert_eq!(report.row_by_name("citrus lift").unwrap().final_quantity, Decimal::from(4));
        assert!(report.row_by_name("Vetiver").is_none());
        assert_eq!(report.formatted_run_date(), "02 Jan 2025");
        assert!(!report.has_warnings());
    }
}
