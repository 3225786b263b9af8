//! 批次報表配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::FormulaError;

/// 批次報表參數配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// 批號前綴
    pub lot_prefix: String,

    /// 批號中版本號的補零寬度
    pub lot_version_width: usize,

    /// 排序時數量視為相等的容差
    pub quantity_epsilon: Decimal,
}

impl BatchConfig {
    /// 預設批號前綴
    pub const DEFAULT_LOT_PREFIX: &'static str = "PERF";

    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            lot_prefix: Self::DEFAULT_LOT_PREFIX.to_string(),
            lot_version_width: 3,
            quantity_epsilon: Decimal::new(1, 6),
        }
    }

    /// 由 JSON 載入配置，未提供的欄位使用預設值
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| FormulaError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置批號前綴
    pub fn with_lot_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.lot_prefix = prefix.into();
        self
    }

    /// 建構器模式：設置版本補零寬度
    pub fn with_lot_version_width(mut self, width: usize) -> Self {
        self.lot_version_width = width;
        self
    }

    /// 建構器模式：設置數量容差
    pub fn with_quantity_epsilon(mut self, epsilon: Decimal) -> Self {
        self.quantity_epsilon = epsilon;
        self
    }

    /// 檢查配置是否有效
    pub fn validate(&self) -> crate::Result<()> {
        if self.lot_prefix.trim().is_empty() {
            return Err(FormulaError::InvalidConfig("批號前綴不可為空".to_string()));
        }
        if self.quantity_epsilon < Decimal::ZERO {
            return Err(FormulaError::InvalidConfig(format!(
                "數量容差不可為負: {}",
                self.quantity_epsilon
            )));
        }
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new()
    }
}
