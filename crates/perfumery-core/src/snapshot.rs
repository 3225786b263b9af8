//! 配方資料快照（唯讀輸入）

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::formula::{CompositionRecord, CompositionRow, Formula, FormulaId};
use crate::ingredient::{Ingredient, IngredientId};
use crate::FormulaError;

/// 原料查詢介面（由外部儲存層提供）
///
/// 查詢為同步呼叫，返回 `None` 代表找不到該原料。
pub trait IngredientResolver: Send + Sync {
    fn lookup(&self, id: IngredientId) -> Option<Ingredient>;
}

impl<F> IngredientResolver for F
where
    F: Fn(IngredientId) -> Option<Ingredient> + Send + Sync,
{
    fn lookup(&self, id: IngredientId) -> Option<Ingredient> {
        self(id)
    }
}

/// 不做任何查詢的解析器，僅依賴快照內的資料
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

impl IngredientResolver for NoResolver {
    fn lookup(&self, _id: IngredientId) -> Option<Ingredient> {
        None
    }
}

/// 快照的 JSON 文件格式
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub formulas: Vec<Formula>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub rows: Vec<CompositionRecord>,
}

/// 配方快照
///
/// 包含所有配方、按所屬配方分組的組成行，以及預先載入的原料。
/// 組成行保持加入順序。
#[derive(Debug, Clone, Default)]
pub struct FormulaSnapshot {
    formulas: HashMap<FormulaId, Formula>,
    rows: HashMap<FormulaId, Vec<CompositionRow>>,
    ingredients: HashMap<IngredientId, Ingredient>,
}

impl FormulaSnapshot {
    /// 創建空快照
    pub fn new() -> Self {
        Self::default()
    }

    /// 由儲存層記錄建立快照
    pub fn from_records(
        formulas: Vec<Formula>,
        ingredients: Vec<Ingredient>,
        records: Vec<CompositionRecord>,
    ) -> crate::Result<Self> {
        let mut snapshot = Self::new();
        for formula in formulas {
            snapshot.add_formula(formula);
        }
        for ingredient in ingredients {
            snapshot.add_ingredient(ingredient);
        }
        for record in records {
            snapshot.add_row(CompositionRow::try_from(record)?);
        }
        Ok(snapshot)
    }

    /// 由 JSON 文件建立快照
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let document: SnapshotDocument = serde_json::from_str(json)
            .map_err(|e| FormulaError::InvalidSnapshot(e.to_string()))?;
        Self::from_document(document)
    }

    /// 由文件結構建立快照
    pub fn from_document(document: SnapshotDocument) -> crate::Result<Self> {
        Self::from_records(document.formulas, document.ingredients, document.rows)
    }

    /// 添加配方
    pub fn add_formula(&mut self, formula: Formula) {
        self.formulas.insert(formula.id, formula);
    }

    /// 添加原料
    pub fn add_ingredient(&mut self, ingredient: Ingredient) {
        self.ingredients.insert(ingredient.id, ingredient);
    }

    /// 添加組成行
    pub fn add_row(&mut self, row: CompositionRow) {
        self.rows.entry(row.formula_id).or_default().push(row);
    }

    /// 建構器模式：添加配方
    pub fn with_formula(mut self, formula: Formula) -> Self {
        self.add_formula(formula);
        self
    }

    /// 建構器模式：添加原料
    pub fn with_ingredient(mut self, ingredient: Ingredient) -> Self {
        self.add_ingredient(ingredient);
        self
    }

    /// 建構器模式：添加組成行
    pub fn with_row(mut self, row: CompositionRow) -> Self {
        self.add_row(row);
        self
    }

    /// 查詢配方
    pub fn formula(&self, id: FormulaId) -> Option<&Formula> {
        self.formulas.get(&id)
    }

    /// 查詢配方直接擁有的組成行
    pub fn rows_for(&self, id: FormulaId) -> &[CompositionRow] {
        self.rows.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 查詢預先載入的原料
    pub fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(&id)
    }

    /// 配方數量
    pub fn formula_count(&self) -> usize {
        self.formulas.len()
    }

    /// 組成行總數
    pub fn row_count(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }
}
