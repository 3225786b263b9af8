//! # Perfumery
//!
//! 香料配方批次報表引擎
//!
//! - [`perfumery_core`]：原料、配方、組成行與報表資料模型
//! - [`perfumery_calc`]：配方展開、縮放、排序與報表組裝

pub use perfumery_calc;
pub use perfumery_core;

pub use perfumery_calc::{BatchCalculator, BatchRequest};
pub use perfumery_core::{
    BatchConfig, BatchReport, BatchReportRow, Clock, CompositionRow, FixedClock, Formula,
    FormulaError, FormulaId, FormulaSnapshot, Ingredient, IngredientId, IngredientResolver,
    MassUnit, PyramidPosition, SystemClock,
};
