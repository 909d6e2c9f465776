use crate::models::signature::PathSignature;
use serde::{Deserialize, Serialize};

/// 单个字形路径的匹配结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 识别出的字符
    pub character: char,
    /// 置信度（0-1）
    pub confidence: f64,
    /// 命中的参考签名
    pub used_signature: PathSignature,
    /// 与参考签名的加权距离
    pub distance: f64,
    /// 超出可接受距离时为 true，调用方可据此决定是否换一张验证码
    pub low_confidence: bool,
}

/// 一次识别的完整结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveOutcome {
    pub text: String,
    pub matches: Vec<MatchResult>,
}

impl SolveOutcome {
    /// 低置信度字符的数量
    pub fn low_confidence_count(&self) -> usize {
        self.matches.iter().filter(|m| m.low_confidence).count()
    }

    /// 是否存在任意低置信度字符
    pub fn is_low_confidence(&self) -> bool {
        self.low_confidence_count() > 0
    }

    /// 所有字符中最低的置信度
    pub fn min_confidence(&self) -> Option<f64> {
        self.matches.iter().map(|m| m.confidence).reduce(f64::min)
    }
}
