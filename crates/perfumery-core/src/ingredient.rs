//! 香料原料模型

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 原料ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(pub u64);

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 香調金字塔位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PyramidPosition {
    /// 前調
    Top,
    /// 前中調
    #[serde(alias = "heart-top")]
    TopHeart,
    /// 中調
    Heart,
    /// 中後調
    #[serde(alias = "base-heart")]
    HeartBase,
    /// 後調
    Base,
    /// 全調
    All,
}

impl PyramidPosition {
    /// 未設定位置的排序值
    pub const UNSET_RANK: u8 = 5;

    /// 解析位置字串
    ///
    /// 去除空白、轉小寫，並將 `_` 與空格視為 `-`。
    /// 空白或無法識別的值返回 `None`。
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value
            .trim()
            .to_lowercase()
            .replace(['_', ' '], "-");

        match normalized.as_str() {
            "top" => Some(PyramidPosition::Top),
            "top-heart" | "heart-top" => Some(PyramidPosition::TopHeart),
            "heart" => Some(PyramidPosition::Heart),
            "heart-base" | "base-heart" => Some(PyramidPosition::HeartBase),
            "base" => Some(PyramidPosition::Base),
            "all" => Some(PyramidPosition::All),
            _ => None,
        }
    }

    /// 標準化字串
    pub fn as_str(&self) -> &'static str {
        match self {
            PyramidPosition::Top => "top",
            PyramidPosition::TopHeart => "top-heart",
            PyramidPosition::Heart => "heart",
            PyramidPosition::HeartBase => "heart-base",
            PyramidPosition::Base => "base",
            PyramidPosition::All => "all",
        }
    }

    /// 報表排序值（後調在前）
    pub fn rank(&self) -> u8 {
        match self {
            PyramidPosition::Base => 0,
            PyramidPosition::HeartBase => 1,
            PyramidPosition::Heart => 2,
            PyramidPosition::TopHeart => 3,
            PyramidPosition::Top => 4,
            PyramidPosition::All => Self::UNSET_RANK,
        }
    }

    /// 顯示標籤，例如 `Top-Heart`
    pub fn label(&self) -> String {
        self.as_str()
            .split('-')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for PyramidPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 可選位置的排序值，未設定排最後
pub fn pyramid_rank(position: Option<PyramidPosition>) -> u8 {
    position
        .map(|p| p.rank())
        .unwrap_or(PyramidPosition::UNSET_RANK)
}

/// 可選位置的顯示標籤，未設定顯示破折號
pub fn pyramid_label(position: Option<PyramidPosition>) -> String {
    position
        .map(|p| p.label())
        .unwrap_or_else(|| "—".to_string())
}

/// 寬鬆解析香調位置：空白或無法識別的值視為未設定
fn deserialize_pyramid<'de, D>(deserializer: D) -> Result<Option<PyramidPosition>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(PyramidPosition::parse))
}

/// 香料原料（Aroma Chemical）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// 原料ID
    pub id: IngredientId,

    /// 顯示名稱
    pub name: String,

    /// CAS 登錄號
    #[serde(default)]
    pub cas_number: Option<String>,

    /// 香調金字塔位置
    #[serde(default, deserialize_with = "deserialize_pyramid")]
    pub pyramid_position: Option<PyramidPosition>,
}

impl Ingredient {
    /// 創建新的原料
    pub fn new(id: IngredientId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            cas_number: None,
            pyramid_position: None,
        }
    }

    /// 建構器模式：設置 CAS 登錄號（空白視為未設定）
    pub fn with_cas_number(mut self, cas_number: &str) -> Self {
        let trimmed = cas_number.trim();
        self.cas_number = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// 建構器模式：設置香調位置
    pub fn with_pyramid_position(mut self, position: PyramidPosition) -> Self {
        self.pyramid_position = Some(position);
        self
    }

    /// 建構器模式：由字串設置香調位置（無法識別時為未設定）
    pub fn with_pyramid_str(mut self, value: &str) -> Self {
        self.pyramid_position = PyramidPosition::parse(value);
        self
    }

    /// 排序值
    pub fn pyramid_rank(&self) -> u8 {
        pyramid_rank(self.pyramid_position)
    }

    /// 顯示標籤
    pub fn pyramid_label(&self) -> String {
        pyramid_label(self.pyramid_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("top", Some(PyramidPosition::Top))]
    #[case("  Heart ", Some(PyramidPosition::Heart))]
    #[case("heart_base", Some(PyramidPosition::HeartBase))]
    #[case("base heart", Some(PyramidPosition::HeartBase))]
    #[case("HEART-TOP", Some(PyramidPosition::TopHeart))]
    #[case("all", Some(PyramidPosition::All))]
    #[case("", None)]
    #[case("middle", None)]
    fn test_parse_pyramid(#[case] input: &str, #[case] expected: Option<PyramidPosition>) {
        assert_eq!(PyramidPosition::parse(input), expected);
    }

    #[test]
    fn test_pyramid_rank_order() {
        assert_eq!(PyramidPosition::Base.rank(), 0);
        assert_eq!(PyramidPosition::HeartBase.rank(), 1);
        assert_eq!(PyramidPosition::Heart.rank(), 2);
        assert_eq!(PyramidPosition::TopHeart.rank(), 3);
        assert_eq!(PyramidPosition::Top.rank(), 4);
        assert_eq!(PyramidPosition::All.rank(), 5);
        assert_eq!(pyramid_rank(None), 5);
    }

    #[test]
    fn test_pyramid_label() {
        assert_eq!(PyramidPosition::TopHeart.label(), "Top-Heart");
        assert_eq!(PyramidPosition::Base.label(), "Base");
        assert_eq!(pyramid_label(None), "—");
    }

    #[test]
    fn test_ingredient_builder() {
        let ingredient = Ingredient::new(IngredientId(1), "Iso E Super")
            .with_cas_number("  54464-57-2 ")
            .with_pyramid_str("heart_base");

        assert_eq!(ingredient.cas_number.as_deref(), Some("54464-57-2"));
        assert_eq!(ingredient.pyramid_position, Some(PyramidPosition::HeartBase));
        assert_eq!(ingredient.pyramid_rank(), 1);

        let blank = Ingredient::new(IngredientId(2), "Hedione").with_cas_number("   ");
        assert_eq!(blank.cas_number, None);
        assert_eq!(blank.pyramid_label(), "—");
    }

    #[test]
    fn test_pyramid_serde_aliases() {
        let position: PyramidPosition = serde_json::from_str("\"base-heart\"").unwrap();
        assert_eq!(position, PyramidPosition::HeartBase);

        let json = serde_json::to_string(&PyramidPosition::TopHeart).unwrap();
        assert_eq!(json, "\"top-heart\"");
    }
}
