//! 批次生產報表範例
//!
//! 從 JSON 快照載入配方，展開並縮放至目標數量後輸出報表
//!
//! ```text
//! cargo run --example batch_report -- [snapshot.json] [formula_id] [target_grams]
//! ```

use anyhow::Context;
use perfumery::{BatchCalculator, BatchConfig, FormulaId, FormulaSnapshot};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

const DEFAULT_SNAPSHOT: &str = "demos/data/auric_essence.json";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| DEFAULT_SNAPSHOT.to_string());
    let formula_id = match args.next() {
        Some(raw) => FormulaId(raw.parse().context("formula_id 必須為正整數")?),
        None => FormulaId(2),
    };
    let target_quantity = match args.next() {
        Some(raw) => Decimal::from_str(&raw).context("目標數量格式錯誤")?,
        None => Decimal::from(100),
    };

    println!("===== Batch Production Report =====\n");

    // 步驟 1: 載入快照
    println!("[1] Load Snapshot: {}", path);
    let json = std::fs::read_to_string(&path).with_context(|| format!("無法讀取 {}", path))?;
    let calculator = BatchCalculator::new(FormulaSnapshot::from_json(&json)?, BatchConfig::default());
    println!(
        "    Formulas: {}, Rows: {}, Lot prefix: {}\n",
        calculator.snapshot().formula_count(),
        calculator.snapshot().row_count(),
        calculator.config().lot_prefix
    );

    // 步驟 2: 產生報表
    println!("[2] Build Report: formula {} → {} g\n", formula_id, target_quantity);
    let report = match calculator.build_report(formula_id, target_quantity) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("    {}", err.user_message());
            return Err(err.into());
        }
    };

    // 步驟 3: 輸出
    println!(
        "    {} v{}  Lot {}  ({})",
        report.formula_name,
        report.formula_version,
        report.lot_number,
        report.formatted_run_date()
    );
    println!(
        "    Base batch {} {}, scale ×{}\n",
        report.base_batch_quantity.round_dp(4),
        report.base_batch_unit,
        report.scale_factor.round_dp(4)
    );
    for row in &report.rows {
        println!(
            "    {:>2}. {:<14} {:<12} {:<11} {:>12}",
            row.rank,
            row.ingredient_name,
            row.cas_number.as_deref().unwrap_or("—"),
            row.pyramid_label,
            row.formatted_quantity()
        );
    }
    for warning in &report.warnings {
        println!("    ! {}", warning.message);
    }

    println!("\n[3] JSON");
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
