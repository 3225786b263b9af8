//! 批號產生

use chrono::{DateTime, Utc};
use perfumery_core::BatchConfig;

/// 批號產生器
pub struct LotNumberGenerator;

impl LotNumberGenerator {
    /// 產生批號：`{前綴}-{YYYYMMDD}-{補零版本號}`
    ///
    /// 日期取自 UTC 時間，相同輸入必定得到相同批號。
    pub fn generate(config: &BatchConfig, run_time: &DateTime<Utc>, version: u32) -> String {
        format!(
            "{}-{}-{:0width$}",
            config.lot_prefix.trim(),
            run_time.format("%Y%m%d"),
            version,
            width = config.lot_version_width
        )
    }
}
