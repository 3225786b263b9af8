//! # Perfumery Core
//!
//! 香料配方核心資料模型與類型定義

pub mod clock;
pub mod config;
pub mod formula;
pub mod ingredient;
pub mod report;
pub mod snapshot;
pub mod unit;

// Re-export 主要類型
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::BatchConfig;
pub use formula::{ComponentRef, CompositionRecord, CompositionRow, Formula, FormulaId};
pub use ingredient::{Ingredient, IngredientId, PyramidPosition};
pub use report::{BatchReport, BatchReportRow, BatchWarning, WarningKind};
pub use snapshot::{FormulaSnapshot, IngredientResolver, NoResolver, SnapshotDocument};
pub use unit::{normalize, try_normalize, MassUnit};

/// 配方解析錯誤類型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormulaError {
    #[error("找不到配方: {0}")]
    FormulaNotFound(FormulaId),

    #[error("無效的數量: {0}")]
    InvalidQuantity(String),

    #[error("配方沒有任何組成: {0}")]
    EmptyComposition(FormulaId),

    #[error("配方存在循環引用: {0}")]
    CircularReference(FormulaId),

    #[error("找不到香料原料: {0}")]
    IngredientLookupFailed(IngredientId),

    #[error("無效的組成行: {0}")]
    InvalidCompositionRow(String),

    #[error("無效的快照資料: {0}")]
    InvalidSnapshot(String),

    #[error("無效的配置: {0}")]
    InvalidConfig(String),
}

impl FormulaError {
    /// 給終端使用者的提示訊息
    pub fn user_message(&self) -> &'static str {
        match self {
            FormulaError::FormulaNotFound(_) => "所選配方已不存在。",
            FormulaError::InvalidQuantity(_) => "無法以此目標數量計算該配方。",
            FormulaError::EmptyComposition(_) => "所選配方沒有可列入報表的原料。",
            FormulaError::CircularReference(_) => "此配方存在循環引用，無法展開。",
            FormulaError::IngredientLookupFailed(_) => "配方引用的原料已不存在。",
            FormulaError::InvalidCompositionRow(_) => "配方包含無效的組成行。",
            FormulaError::InvalidSnapshot(_) => "配方資料無法載入。",
            FormulaError::InvalidConfig(_) => "批次報表配置無效。",
        }
    }
}

pub type Result<T> = std::result::Result<T, FormulaError>;
