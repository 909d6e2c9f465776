//! 参考字符表加载 - 业务能力层
//!
//! TOML 格式：
//!
//! ```toml
//! [[glyph]]
//! character = "A"
//! samples = ["M10 0 h4 l10 30 h-4 l-3 -8 h-10 l-3 8 h-4 z m-1 16 h6 l-3 -10 z"]
//!
//! [[glyph]]
//! character = "1"
//! [[glyph.signatures]]
//! curve_count = 0
//! line_count = 6
//! move_count = 1
//! bbox = { min_x = 5.0, min_y = 0.0, max_x = 12.0, max_y = 30.0 }
//! ```

use crate::error::{AppError, AppResult};
use crate::models::BoundingBox;
use crate::services::reference_model::{ReferenceModel, ReferenceModelBuilder};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    glyph: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    character: String,
    #[serde(default)]
    samples: Vec<String>,
    #[serde(default)]
    signatures: Vec<SignatureRow>,
}

#[derive(Debug, Deserialize)]
struct SignatureRow {
    curve_count: usize,
    line_count: usize,
    move_count: usize,
    bbox: BoundingBox,
}

impl CatalogEntry {
    /// 字符字段必须恰好是一个字符
    fn single_char(&self) -> AppResult<char> {
        let mut chars = self.character.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(AppError::invalid_catalog_entry(
                &self.character,
                "character 必须是单个字符",
            )),
        }
    }

    fn register(self, mut builder: ReferenceModelBuilder) -> AppResult<ReferenceModelBuilder> {
        let character = self.single_char()?;
        if self.samples.is_empty() && self.signatures.is_empty() {
            return Err(AppError::invalid_catalog_entry(
                &self.character,
                "至少需要一个 sample 或 signature",
            ));
        }

        for d in &self.samples {
            builder = builder.register_sample(character, d);
        }
        for row in self.signatures {
            builder = builder.register_counts(
                character,
                row.curve_count,
                row.line_count,
                row.move_count,
                row.bbox,
            );
        }
        Ok(builder)
    }
}

/// 从 TOML 文本解析参考模型
///
/// 条目按文件中的顺序注册
pub fn parse_reference_model(content: &str) -> AppResult<ReferenceModel> {
    let catalog: CatalogFile = toml::from_str(content)?;

    let mut builder = ReferenceModel::builder();
    for entry in catalog.glyph {
        builder = entry.register(builder)?;
    }
    builder.build()
}

/// 从 TOML 文件加载参考模型
pub async fn load_reference_model(path: &Path) -> Result<ReferenceModel> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取字符表文件: {}", path.display()))?;

    let model = parse_reference_model(&content)
        .with_context(|| format!("无法解析字符表文件: {}", path.display()))?;

    tracing::info!(
        "成功加载字符表 {}: {} 个条目, 字符 {}",
        path.display(),
        model.len(),
        model.alphabet()
    );

    Ok(model)
}
