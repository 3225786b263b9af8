//! 配方與組成行模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ingredient::{Ingredient, IngredientId};
use crate::unit::try_normalize;
use crate::FormulaError;

/// 配方ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormulaId(pub u64);

impl fmt::Display for FormulaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn default_version() -> u32 {
    1
}

/// 配方
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    /// 配方ID
    pub id: FormulaId,

    /// 配方名稱
    pub name: String,

    /// 版本號
    #[serde(default = "default_version")]
    pub version: u32,
}

impl Formula {
    /// 創建新的配方（版本 1）
    pub fn new(id: FormulaId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            version: default_version(),
        }
    }

    /// 建構器模式：設置版本號
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

/// 組成行引用的對象：原料或子配方（二擇一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentRef {
    /// 原料
    Ingredient(IngredientId),
    /// 子配方
    SubFormula(FormulaId),
}

/// 配方組成行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionRow {
    /// 所屬配方
    pub formula_id: FormulaId,

    /// 用量
    pub amount: Decimal,

    /// 單位
    pub unit: String,

    /// 引用對象
    pub component: ComponentRef,

    /// 預先載入的原料資料
    #[serde(default)]
    pub ingredient: Option<Ingredient>,
}

impl CompositionRow {
    /// 創建原料組成行
    pub fn ingredient(
        formula_id: FormulaId,
        ingredient_id: IngredientId,
        amount: Decimal,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            formula_id,
            amount,
            unit: unit.into(),
            component: ComponentRef::Ingredient(ingredient_id),
            ingredient: None,
        }
    }

    /// 創建子配方組成行
    ///
    /// 子配方不可為所屬配方本身。
    pub fn sub_formula(
        formula_id: FormulaId,
        sub_formula_id: FormulaId,
        amount: Decimal,
        unit: impl Into<String>,
    ) -> crate::Result<Self> {
        if sub_formula_id == formula_id {
            return Err(FormulaError::InvalidCompositionRow(format!(
                "配方 {} 不可引用自身作為子配方",
                formula_id
            )));
        }
        Ok(Self {
            formula_id,
            amount,
            unit: unit.into(),
            component: ComponentRef::SubFormula(sub_formula_id),
            ingredient: None,
        })
    }

    /// 建構器模式：預先載入原料資料
    pub fn with_ingredient(mut self, ingredient: Ingredient) -> Self {
        self.ingredient = Some(ingredient);
        self
    }

    /// 換算為公克的用量
    pub fn normalized_amount(&self) -> crate::Result<Decimal> {
        try_normalize(self.amount, &self.unit).ok_or_else(|| {
            FormulaError::InvalidQuantity(format!(
                "配方 {} 的用量 {} {} 換算為公克時溢位",
                self.formula_id, self.amount, self.unit
            ))
        })
    }

    /// 是否為子配方行
    pub fn is_sub_formula(&self) -> bool {
        matches!(self.component, ComponentRef::SubFormula(_))
    }
}

/// 儲存層格式的組成行（兩個引用欄位皆可為空）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositionRecord {
    pub formula_id: u64,
    pub amount: Decimal,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub ingredient_id: Option<u64>,
    #[serde(default)]
    pub sub_formula_id: Option<u64>,
    #[serde(default)]
    pub ingredient: Option<Ingredient>,
}

impl TryFrom<CompositionRecord> for CompositionRow {
    type Error = FormulaError;

    fn try_from(record: CompositionRecord) -> crate::Result<Self> {
        let formula_id = FormulaId(record.formula_id);
        // ID 0 代表未設定
        let ingredient_id = record.ingredient_id.filter(|id| *id != 0);
        let sub_formula_id = record.sub_formula_id.filter(|id| *id != 0);

        let row = match (ingredient_id, sub_formula_id) {
            (Some(ingredient_id), None) => CompositionRow::ingredient(
                formula_id,
                IngredientId(ingredient_id),
                record.amount,
                record.unit,
            ),
            (None, Some(sub_formula_id)) => CompositionRow::sub_formula(
                formula_id,
                FormulaId(sub_formula_id),
                record.amount,
                record.unit,
            )?,
            (Some(_), Some(_)) => {
                return Err(FormulaError::InvalidCompositionRow(format!(
                    "配方 {} 的組成行同時引用原料與子配方",
                    formula_id
                )))
            }
            (None, None) => {
                return Err(FormulaError::InvalidCompositionRow(format!(
                    "配方 {} 的組成行未引用原料或子配方",
                    formula_id
                )))
            }
        };

        Ok(match record.ingredient {
            Some(ingredient) if !row.is_sub_formula() => row.with_ingredient(ingredient),
            _ => row,
        })
    }
}
