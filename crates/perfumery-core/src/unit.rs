//! 質量單位與換算

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 質量單位（換算基準為公克）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MassUnit {
    /// 毫克
    #[serde(rename = "mg")]
    Milligram,
    /// 公克
    #[serde(rename = "g")]
    Gram,
    /// 公斤
    #[serde(rename = "kg")]
    Kilogram,
    /// 毫升（假設密度約 1 g/mL）
    #[serde(rename = "ml")]
    Millilitre,
}

impl MassUnit {
    /// 解析單位字串（忽略大小寫與前後空白）
    ///
    /// 無法識別或空白的單位一律視為公克。
    pub fn parse(unit: &str) -> Self {
        match unit.trim().to_lowercase().as_str() {
            "mg" => MassUnit::Milligram,
            "kg" => MassUnit::Kilogram,
            "ml" => MassUnit::Millilitre,
            _ => MassUnit::Gram,
        }
    }

    /// 單位符號
    pub fn symbol(&self) -> &'static str {
        match self {
            MassUnit::Milligram => "mg",
            MassUnit::Gram => "g",
            MassUnit::Kilogram => "kg",
            MassUnit::Millilitre => "ml",
        }
    }

    /// 換算為公克，溢位時返回 `None`
    pub fn checked_to_grams(&self, amount: Decimal) -> Option<Decimal> {
        match self {
            MassUnit::Milligram => amount.checked_div(Decimal::ONE_THOUSAND),
            MassUnit::Kilogram => amount.checked_mul(Decimal::ONE_THOUSAND),
            // 毫升以密度 1 g/mL 近似，未考慮個別原料密度
            MassUnit::Millilitre => Some(amount),
            MassUnit::Gram => Some(amount),
        }
    }

    /// 換算為公克，溢位時取 `Decimal` 的上下限
    pub fn to_grams(&self, amount: Decimal) -> Decimal {
        match self {
            MassUnit::Kilogram => amount.saturating_mul(Decimal::ONE_THOUSAND),
            _ => self.checked_to_grams(amount).unwrap_or(amount),
        }
    }
}

impl Default for MassUnit {
    fn default() -> Self {
        MassUnit::Gram
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// 將數量與單位換算為公克（不會失敗，溢位時飽和）
pub fn normalize(amount: Decimal, unit: &str) -> Decimal {
    MassUnit::parse(unit).to_grams(amount)
}

/// 將數量與單位換算為公克，溢位時返回 `None`
pub fn try_normalize(amount: Decimal, unit: &str) -> Option<Decimal> {
    MassUnit::parse(unit).checked_to_grams(amount)
}
