//! 配方總量計算

use perfumery_core::{FormulaError, FormulaId, FormulaSnapshot};
use rust_decimal::Decimal;

use crate::traversal::Traversal;

impl<'a> Traversal<'a> {
    /// 計算配方直接組成行換算為公克後的總和
    ///
    /// 不會遞迴進入子配方：子配方行的用量代表使用多少成品子配方。
    /// 結果在本次遍歷內快取；沒有組成行的配方返回 `EmptyComposition`。
    pub fn total(&mut self, formula_id: FormulaId) -> perfumery_core::Result<Decimal> {
        if let Some(&total) = self.totals.get(&formula_id) {
            self.stats.total_cache_hits += 1;
            return Ok(total);
        }

        self.enter(formula_id)?;
        let result = Self::sum_rows(self.snapshot, formula_id);
        self.leave(formula_id);
        let total = result?;

        tracing::debug!(
            "配方 {} 總量: {} g（{} 行）",
            formula_id,
            total,
            self.snapshot.rows_for(formula_id).len()
        );

        self.totals.insert(formula_id, total);
        Ok(total)
    }

    fn sum_rows(snapshot: &FormulaSnapshot, formula_id: FormulaId) -> perfumery_core::Result<Decimal> {
        let rows = snapshot.rows_for(formula_id);
        if rows.is_empty() {
            return Err(FormulaError::EmptyComposition(formula_id));
        }

        rows.iter().try_fold(Decimal::ZERO, |total, row| {
            total.checked_add(row.normalized_amount()?).ok_or_else(|| {
                FormulaError::InvalidQuantity(format!("配方 {} 總量溢位", formula_id))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfumery_core::{CompositionRow, IngredientId, NoResolver};

    fn snapshot() -> FormulaSnapshot {
        FormulaSnapshot::new()
            .with_row(CompositionRow::ingredient(
                FormulaId(1),
                IngredientId(1),
                Decimal::from(10),
                "g",
            ))
            .with_row(CompositionRow::ingredient(
                FormulaId(1),
                IngredientId(2),
                Decimal::from(500),
                "mg",
            ))
            .with_row(
                CompositionRow::sub_formula(FormulaId(1), FormulaId(2), Decimal::new(2, 3), "kg")
                    .unwrap(),
            )
            .with_row(CompositionRow::ingredient(
                FormulaId(2),
                IngredientId(3),
                Decimal::from(1000),
                "g",
            ))
    }

    #[test]
    fn test_total_sums_declared_amounts_only() {
        let snapshot = snapshot();
        let mut traversal = Traversal::new(&snapshot, &NoResolver);

        // 10 g + 0.5 g + 2 g（子配方宣告用量，不展開其內部 1000 g）
        assert_eq!(traversal.total(FormulaId(1)).unwrap(), Decimal::new(125, 1));
        assert_eq!(traversal.total(FormulaId(2)).unwrap(), Decimal::from(1000));
    }

    #[test]
    fn test_total_is_memoized() {
        let snapshot = snapshot();
        let mut traversal = Traversal::new(&snapshot, &NoResolver);

        traversal.total(FormulaId(1)).unwrap();
        traversal.total(FormulaId(1)).unwrap();
        traversal.total(FormulaId(1)).unwrap();

        assert_eq!(traversal.stats().total_cache_hits, 2);
        assert!(!traversal.is_expanding(FormulaId(1)));
    }

    #[test]
    fn test_total_of_empty_formula() {
        let snapshot = snapshot();
        let mut traversal = Traversal::new(&snapshot, &NoResolver);

        assert_eq!(
            traversal.total(FormulaId(42)),
            Err(FormulaError::EmptyComposition(FormulaId(42)))
        );
        assert!(!traversal.is_expanding(FormulaId(42)));
    }

    #[test]
    fn test_total_while_expanding_is_circular() {
        let snapshot = snapshot();
        let mut traversal = Traversal::new(&snapshot, &NoResolver);

        traversal.enter(FormulaId(2)).unwrap();
        assert_eq!(
            traversal.total(FormulaId(2)),
            Err(FormulaError::CircularReference(FormulaId(2)))
        );
    }

    #[test]
    fn test_total_overflow_is_invalid_quantity() {
        let huge = Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0);
        let snapshot = FormulaSnapshot::new()
            .with_row(CompositionRow::ingredient(FormulaId(1), IngredientId(1), huge, "g"))
            .with_row(CompositionRow::ingredient(FormulaId(1), IngredientId(2), huge, "g"));
        let mut traversal = Traversal::new(&snapshot, &NoResolver);

        assert!(matches!(
            traversal.total(FormulaId(1)),
            Err(FormulaError::InvalidQuantity(_))
        ));
        assert!(!traversal.is_expanding(FormulaId(1)));
    }
}
