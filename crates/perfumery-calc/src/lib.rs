//! # Perfumery Calculation Engine
//!
//! 配方展開與批次縮放引擎

pub mod calculator;
pub mod flatten;
pub mod lot;
pub mod ordering;
pub mod totals;
pub mod traversal;

// Re-export 主要類型
pub use calculator::BatchCalculator;
pub use lot::LotNumberGenerator;
pub use ordering::ReportOrdering;
pub use traversal::{AccumulatedTotal, Traversal, TraversalStats};

use perfumery_core::FormulaId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 批次報表請求
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// 目標配方
    pub formula_id: FormulaId,

    /// 目標數量（公克）
    pub target_quantity: Decimal,
}

impl BatchRequest {
    pub fn new(formula_id: FormulaId, target_quantity: Decimal) -> Self {
        Self {
            formula_id,
            target_quantity,
        }
    }
}
