//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 批量识别和并发调度。识别库本身不需要这一层，它只服务于命令行程序。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<CaptchaFile>)
//!     ↓
//! workflow::CaptchaSolver (处理单张验证码)
//!     ↓
//! services (能力层：extract / classify / normalize / match)
//!     ↓
//! models (数据：SvgDocument / PathSignature / MatchResult)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源共享**：所有任务共享同一个 `Arc<CaptchaSolver>`
//! 2. **向下依赖**：编排层 → workflow → services → models
//! 3. **无业务逻辑**：只做调度和统计，不做识别判断

pub mod batch_processor;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats, SolveRecord};
