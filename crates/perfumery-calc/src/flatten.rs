//! 配方展開與原料累加

use perfumery_core::{
    BatchWarning, ComponentRef, CompositionRow, FormulaError, FormulaId, Ingredient,
    IngredientId, WarningKind,
};
use rust_decimal::Decimal;

use crate::traversal::Traversal;

impl<'a> Traversal<'a> {
    /// 遞迴展開配方，將每個原料的用量乘以繼承的倍率後累加
    ///
    /// 子配方行以 `用量 / 子配方總量` 作為子倍率繼續展開。
    /// 任何錯誤都會中止整個展開，不返回部分結果。
    pub fn accumulate(&mut self, formula_id: FormulaId, factor: Decimal) -> perfumery_core::Result<()> {
        self.enter(formula_id)?;
        let result = self.accumulate_rows(formula_id, factor);
        self.leave(formula_id);
        result
    }

    fn accumulate_rows(&mut self, formula_id: FormulaId, factor: Decimal) -> perfumery_core::Result<()> {
        let snapshot = self.snapshot;
        let rows = snapshot.rows_for(formula_id);
        if rows.is_empty() {
            return Err(FormulaError::EmptyComposition(formula_id));
        }

        for row in rows {
            self.stats.rows_visited += 1;

            let amount = row.normalized_amount()?.checked_mul(factor).ok_or_else(|| {
                FormulaError::InvalidQuantity(format!(
                    "配方 {} 的用量 {} × {} 溢位",
                    formula_id, row.amount, factor
                ))
            })?;

            if amount <= Decimal::ZERO {
                tracing::debug!("配方 {} 略過用量不為正的組成行: {}", formula_id, amount);
                self.warnings.push(BatchWarning::new(
                    formula_id,
                    WarningKind::NonPositiveAmount,
                    format!("{:?} 的計算用量為 {}，已略過", row.component, amount),
                ));
                continue;
            }

            match row.component {
                ComponentRef::Ingredient(ingredient_id) => {
                    let ingredient = self.resolve_ingredient(row, ingredient_id)?;
                    self.add_amount(ingredient, amount)?;
                }
                ComponentRef::SubFormula(sub_formula_id) => {
                    let sub_total = self.total(sub_formula_id)?;
                    if sub_total <= Decimal::ZERO {
                        tracing::debug!("子配方 {} 總量不為正，略過", sub_formula_id);
                        self.warnings.push(BatchWarning::new(
                            formula_id,
                            WarningKind::NonPositiveSubFormulaTotal,
                            format!("子配方 {} 總量為 {}，已略過", sub_formula_id, sub_total),
                        ));
                        continue;
                    }

                    let sub_factor = amount.checked_div(sub_total).ok_or_else(|| {
                        FormulaError::InvalidQuantity(format!(
                            "子配方 {} 的倍率無法計算",
                            sub_formula_id
                        ))
                    })?;

                    tracing::debug!(
                        "展開子配方: {} → {} (用量: {} g, 倍率: {})",
                        formula_id,
                        sub_formula_id,
                        amount,
                        sub_factor
                    );

                    self.accumulate(sub_formula_id, sub_factor)?;
                }
            }
        }

        Ok(())
    }

    /// 依序從組成行預載資料、快照、外部解析器取得原料
    fn resolve_ingredient(
        &mut self,
        row: &CompositionRow,
        ingredient_id: IngredientId,
    ) -> perfumery_core::Result<Ingredient> {
        if let Some(ingredient) = &row.ingredient {
            return Ok(ingredient.clone());
        }
        if let Some(ingredient) = self.snapshot.ingredient(ingredient_id) {
            return Ok(ingredient.clone());
        }

        self.stats.resolver_lookups += 1;
        self.resolver
            .lookup(ingredient_id)
            .ok_or(FormulaError::IngredientLookupFailed(ingredient_id))
    }
}
