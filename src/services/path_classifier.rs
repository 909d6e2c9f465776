//! 路径分类服务 - 业务能力层
//!
//! 区分装饰性噪声曲线和字符字形路径

use crate::error::{AppResult, CaptchaError};
use crate::models::{PathElement, SvgDocument};
use tracing::debug;

/// 路径类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// 字符字形
    Glyph,
    /// 噪声曲线
    Noise,
}

/// 路径分类服务
///
/// 判定规则：没有 stroke 属性、stroke 为空串或恰好为 `none` 的路径是字形；
/// 其余路径（包括 `" none "` 这类带空白的值）都是噪声，与 fill 无关
#[derive(Debug, Clone, Copy, Default)]
pub struct PathClassifier;

impl PathClassifier {
    pub fn new() -> Self {
        Self
    }

    /// 判断单条路径的类别
    pub fn kind_of(&self, path: &PathElement) -> PathKind {
        if path.is_stroked() {
            PathKind::Noise
        } else {
            PathKind::Glyph
        }
    }

    /// 过滤出字形路径，保持文档顺序
    ///
    /// # 错误
    /// 没有任何字形路径时返回 `CaptchaError::NoGlyphsFound`
    pub fn classify<'a>(&self, doc: &'a SvgDocument) -> AppResult<Vec<&'a PathElement>> {
        let glyphs: Vec<&PathElement> = doc
            .iter()
            .filter(|p| self.kind_of(p) == PathKind::Glyph)
            .collect();

        debug!(
            "路径分类完成: 字形 {} 条, 噪声 {} 条",
            glyphs.len(),
            doc.len() - glyphs.len()
        );

        if glyphs.is_empty() {
            return Err(CaptchaError::NoGlyphsFound {
                total_paths: doc.len(),
            }
            .into());
        }

        Ok(glyphs)
    }
}
