//! 批次報表主計算器

use perfumery_core::{
    BatchConfig, BatchReport, BatchReportRow, Clock, FormulaError, FormulaId, FormulaSnapshot,
    IngredientResolver, MassUnit, NoResolver, SystemClock,
};
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::lot::LotNumberGenerator;
use crate::ordering::ReportOrdering;
use crate::traversal::{AccumulatedTotal, Traversal};
use crate::BatchRequest;

/// 批次報表計算器
///
/// 持有唯讀的配方快照；每次計算建立獨立的遍歷狀態，
/// 因此同一個計算器可以同時在多個執行緒上使用。
pub struct BatchCalculator {
    /// 配方快照
    snapshot: FormulaSnapshot,

    /// 報表配置
    config: BatchConfig,

    /// 時間來源
    clock: Box<dyn Clock>,

    /// 快照外的原料查詢
    resolver: Box<dyn IngredientResolver>,
}

impl BatchCalculator {
    /// 創建新的計算器（系統時鐘，不做外部原料查詢）
    pub fn new(snapshot: FormulaSnapshot, config: BatchConfig) -> Self {
        Self {
            snapshot,
            config,
            clock: Box::new(SystemClock),
            resolver: Box::new(NoResolver),
        }
    }

    /// 建構器模式：設置時間來源
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// 建構器模式：設置原料解析器
    pub fn with_resolver(mut self, resolver: impl IngredientResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// 產生批次生產報表
    pub fn build_report(
        &self,
        formula_id: FormulaId,
        target_quantity: Decimal,
    ) -> perfumery_core::Result<BatchReport> {
        tracing::info!(
            "開始批次報表計算：配方 {}，目標數量 {} g",
            formula_id,
            target_quantity
        );

        let start_time = std::time::Instant::now();
        self.config.validate()?;

        // Step 1: 檢查目標數量
        if target_quantity <= Decimal::ZERO {
            return Err(FormulaError::InvalidQuantity(format!(
                "目標數量必須為正: {}",
                target_quantity
            )));
        }

        let formula = self
            .snapshot
            .formula(formula_id)
            .ok_or(FormulaError::FormulaNotFound(formula_id))?;

        if self.snapshot.rows_for(formula_id).is_empty() {
            return Err(FormulaError::EmptyComposition(formula_id));
        }

        // Step 2: 基準總量
        tracing::debug!("Step 2: 計算基準總量");
        let mut traversal = Traversal::new(&self.snapshot, self.resolver.as_ref());
        let base_total = traversal.total(formula_id)?;
        if base_total <= Decimal::ZERO {
            return Err(FormulaError::InvalidQuantity(format!(
                "配方 {} 基準總量不為正: {}",
                formula_id, base_total
            )));
        }
        tracing::debug!("基準總量: {} g", base_total);

        // Step 3: 展開並累加原料
        tracing::debug!("Step 3: 展開配方");
        traversal.accumulate(formula_id, Decimal::ONE)?;

        // Step 4: 縮放倍率
        let scale = target_quantity.checked_div(base_total).ok_or_else(|| {
            FormulaError::InvalidQuantity(format!(
                "無法計算縮放倍率: {} / {}",
                target_quantity, base_total
            ))
        })?;
        tracing::debug!("Step 4: 縮放倍率 {}", scale);

        let (accumulated, warnings, stats) = traversal.into_parts();
        tracing::debug!(
            "展開完成：原料 {} 種，組成行 {} 筆，快取命中 {} 次",
            accumulated.len(),
            stats.rows_visited,
            stats.total_cache_hits
        );

        // Step 5: 建立報表行
        let mut rows = Self::scale_rows(accumulated, scale)?;

        // Step 6: 排序與編號
        ReportOrdering::sort(&mut rows, self.config.quantity_epsilon);
        ReportOrdering::assign_ranks(&mut rows);

        // Step 7: 批次資訊
        let run_date = self.clock.now();
        let lot_number = LotNumberGenerator::generate(&self.config, &run_date, formula.version);

        let report = BatchReport {
            formula_id,
            formula_name: formula.name.clone(),
            formula_version: formula.version,
            target_quantity,
            target_unit: MassUnit::Gram,
            base_batch_quantity: base_total,
            base_batch_unit: MassUnit::Gram,
            scale_factor: scale,
            lot_number,
            run_date,
            rows,
            warnings,
        };

        tracing::info!("批次報表完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "批號 {}：原料 {} 種，警告 {} 筆",
            report.lot_number,
            report.rows.len(),
            report.warnings.len()
        );

        Ok(report)
    }

    /// 並行產生多份報表，每份報表各自擁有遍歷狀態
    pub fn build_reports(
        &self,
        requests: &[BatchRequest],
    ) -> Vec<perfumery_core::Result<BatchReport>> {
        tracing::info!("並行產生批次報表：{} 份", requests.len());
        requests
            .par_iter()
            .map(|request| self.build_report(request.formula_id, request.target_quantity))
            .collect()
    }

    /// 將累加結果乘上倍率，略過不為正的用量
    fn scale_rows(
        accumulated: Vec<AccumulatedTotal>,
        scale: Decimal,
    ) -> perfumery_core::Result<Vec<BatchReportRow>> {
        let mut rows = Vec::with_capacity(accumulated.len());

        for total in accumulated {
            let final_quantity = total.base_amount.checked_mul(scale).ok_or_else(|| {
                FormulaError::InvalidQuantity(format!(
                    "原料 {} 縮放後用量溢位",
                    total.ingredient.id
                ))
            })?;
            if final_quantity <= Decimal::ZERO {
                continue;
            }

            let ingredient = total.ingredient;
            rows.push(BatchReportRow {
                rank: 0,
                ingredient_id: ingredient.id,
                pyramid_label: ingredient.pyramid_label(),
                pyramid: ingredient.pyramid_position,
                cas_number: ingredient.cas_number,
                ingredient_name: ingredient.name,
                base_quantity: total.base_amount,
                final_quantity,
                unit: MassUnit::Gram,
            });
        }

        Ok(rows)
    }

    /// 獲取配方快照引用
    pub fn snapshot(&self) -> &FormulaSnapshot {
        &self.snapshot
    }

    /// 獲取配置引用
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }
}
