//! 识别上下文
//!
//! 封装"我正在识别哪一张验证码"这一信息，只用于日志

use std::fmt::Display;

/// 识别上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveCtx {
    /// 验证码标识（文件名或请求ID）
    pub label: String,

    /// 批次内序号（从1开始，仅用于日志显示）
    pub index: usize,
}

impl SolveCtx {
    /// 创建新的识别上下文
    pub fn new(label: impl Into<String>, index: usize) -> Self {
        Self {
            label: label.into(),
            index,
        }
    }

    /// 未命名的单次识别
    pub fn anonymous() -> Self {
        Self::new("-", 0)
    }
}

impl Display for SolveCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[验证码 #{} {}]", self.index, self.label)
    }
}
