//! 配方圖遍歷狀態
//!
//! 每次報表計算建立一個 [`Traversal`]，由它擁有總量快取、展開中配方集合
//! 與原料累加表；計算結束後整個丟棄，不跨呼叫共用。

use perfumery_core::{
    BatchWarning, FormulaError, FormulaId, FormulaSnapshot, Ingredient, IngredientId,
    IngredientResolver,
};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// 單一原料的累計用量（公克，未縮放）
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatedTotal {
    pub ingredient: Ingredient,
    pub base_amount: Decimal,
}

/// 遍歷統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// 處理過的組成行數
    pub rows_visited: usize,
    /// 總量快取命中次數
    pub total_cache_hits: usize,
    /// 透過外部解析器查詢的原料數
    pub resolver_lookups: usize,
}

/// 配方圖遍歷
pub struct Traversal<'a> {
    pub(crate) snapshot: &'a FormulaSnapshot,
    pub(crate) resolver: &'a dyn IngredientResolver,

    /// 配方總量快取
    pub(crate) totals: HashMap<FormulaId, Decimal>,

    /// 目前路徑上展開中的配方（總量計算與展開共用）
    expanding: HashSet<FormulaId>,

    /// 原料在累加表中的位置
    index: HashMap<IngredientId, usize>,

    /// 按首次出現順序保存的累加結果
    pub(crate) accumulated: Vec<AccumulatedTotal>,

    pub(crate) warnings: Vec<BatchWarning>,
    pub(crate) stats: TraversalStats,
}

impl<'a> Traversal<'a> {
    /// 創建新的遍歷
    pub fn new(snapshot: &'a FormulaSnapshot, resolver: &'a dyn IngredientResolver) -> Self {
        Self {
            snapshot,
            resolver,
            totals: HashMap::new(),
            expanding: HashSet::new(),
            index: HashMap::new(),
            accumulated: Vec::new(),
            warnings: Vec::new(),
            stats: TraversalStats::default(),
        }
    }

    /// 標記配方為展開中；若已在展開中即為循環引用
    pub(crate) fn enter(&mut self, formula_id: FormulaId) -> perfumery_core::Result<()> {
        if !self.expanding.insert(formula_id) {
            tracing::debug!("偵測到循環引用: 配方 {}", formula_id);
            return Err(FormulaError::CircularReference(formula_id));
        }
        Ok(())
    }

    /// 清除展開中標記
    pub(crate) fn leave(&mut self, formula_id: FormulaId) {
        self.expanding.remove(&formula_id);
    }

    /// 是否正在展開該配方
    pub fn is_expanding(&self, formula_id: FormulaId) -> bool {
        self.expanding.contains(&formula_id)
    }

    /// 將用量累加至原料，首次出現時記錄原料資料
    pub(crate) fn add_amount(
        &mut self,
        ingredient: Ingredient,
        amount: Decimal,
    ) -> perfumery_core::Result<()> {
        match self.index.get(&ingredient.id) {
            Some(&position) => {
                let total = &mut self.accumulated[position].base_amount;
                *total = total.checked_add(amount).ok_or_else(|| {
                    FormulaError::InvalidQuantity(format!("原料 {} 累計用量溢位", ingredient.id))
                })?;
            }
            None => {
                self.index.insert(ingredient.id, self.accumulated.len());
                self.accumulated.push(AccumulatedTotal {
                    ingredient,
                    base_amount: amount,
                });
            }
        }
        Ok(())
    }

    /// 按首次出現順序的累加結果
    pub fn accumulated(&self) -> &[AccumulatedTotal] {
        &self.accumulated
    }

    /// 查詢單一原料的累計用量
    pub fn accumulated_amount(&self, ingredient_id: IngredientId) -> Option<Decimal> {
        self.index
            .get(&ingredient_id)
            .map(|&position| self.accumulated[position].base_amount)
    }

    /// 已略過組成行的警告
    pub fn warnings(&self) -> &[BatchWarning] {
        &self.warnings
    }

    /// 遍歷統計
    pub fn stats(&self) -> TraversalStats {
        self.stats
    }

    /// 取出累加結果與警告
    pub fn into_parts(self) -> (Vec<AccumulatedTotal>, Vec<BatchWarning>, TraversalStats) {
        (self.accumulated, self.warnings, self.stats)
    }
}
