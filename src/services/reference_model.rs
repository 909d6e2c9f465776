//! 参考模型 - 业务能力层
//!
//! 字符到标准签名的只读字符表。构建完成后不再修改，可以在线程间随意共享。

use crate::error::{AppResult, ModelError};
use crate::models::{BoundingBox, PathSignature};
use crate::services::catalog::BUILTIN_GLYPHS;
use crate::services::geometry_normalizer::compute_signature;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// 进程级内置模型，首次使用时构建一次
static BUILTIN_MODEL: Lazy<Arc<ReferenceModel>> = Lazy::new(|| {
    let entries = BUILTIN_GLYPHS
        .iter()
        .map(|(character, d)| ReferenceEntry {
            character: *character,
            signature: compute_signature(d),
        })
        .collect();
    Arc::new(ReferenceModel { entries })
});

/// 字符表中的一条记录
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceEntry {
    pub character: char,
    pub signature: PathSignature,
}

/// 参考模型
///
/// 条目顺序即注册顺序，匹配距离相同时先注册的条目优先
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceModel {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceModel {
    /// 内置模型（数字和部分大写字母）
    pub fn builtin() -> Arc<ReferenceModel> {
        BUILTIN_MODEL.clone()
    }

    pub fn builder() -> ReferenceModelBuilder {
        ReferenceModelBuilder::default()
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 模型能识别的字符（按首次注册顺序，去重）
    pub fn alphabet(&self) -> String {
        let mut alphabet = String::new();
        for entry in &self.entries {
            if !alphabet.contains(entry.character) {
                alphabet.push(entry.character);
            }
        }
        alphabet
    }

    /// 某个字符的全部标准签名
    pub fn signatures_for(&self, character: char) -> Vec<&PathSignature> {
        self.entries
            .iter()
            .filter(|e| e.character == character)
            .map(|e| &e.signature)
            .collect()
    }
}

/// 参考模型构建器
#[derive(Debug, Clone, Default)]
pub struct ReferenceModelBuilder {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceModelBuilder {
    /// 以标准签名注册字符
    pub fn register(mut self, character: char, signature: PathSignature) -> Self {
        self.entries.push(ReferenceEntry {
            character,
            signature,
        });
        self
    }

    /// 以样本路径注册字符，签名由路径计算得到
    pub fn register_sample(self, character: char, d: &str) -> Self {
        self.register(character, compute_signature(d))
    }

    /// 以命令计数和包围盒注册字符
    pub fn register_counts(
        self,
        character: char,
        curve_count: usize,
        line_count: usize,
        move_count: usize,
        bbox: BoundingBox,
    ) -> Self {
        self.register(
            character,
            PathSignature::from_counts(curve_count, line_count, move_count, bbox),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 完成构建
    ///
    /// # 错误
    /// 没有任何条目时返回 `ModelError::EmptyCatalog`
    pub fn build(self) -> AppResult<ReferenceModel> {
        if self.entries.is_empty() {
            return Err(ModelError::EmptyCatalog.into());
        }
        Ok(ReferenceModel {
            entries: self.entries,
        })
    }
}
