//! # SVG Captcha Solver
//!
//! 一个用于识别 SVG 矢量验证码的 Rust 库
//!
//! 验证码由填充的字形路径和带描边的干扰曲线组成，本库从 SVG 文本中还原出验证码文字。
//! 网络请求、登录提交等都不在本库范围内：调用方拿到 SVG 文本后调用 `solve()`，得到字符串。
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - `SvgDocument`、`PathSignature`、`MatchResult` 等纯数据
//! - `models/loaders` - 从磁盘读取验证码文件
//!
//! ### ② 业务能力层（Services）
//! - `PathExtractor` - SVG → 有序 path 列表
//! - `PathClassifier` - 区分字形和噪声
//! - `GeometryNormalizer` - 路径命令 → 几何签名（带有界缓存）
//! - `ReferenceModel` / `PatternMatcher` - 字符表与最近邻匹配
//! - `catalog_loader` - 从 TOML 文件加载自定义字符表
//!
//! ### ③ 流程层（Workflow）
//! - `CaptchaSolver` - 解析 → 分类 → 归一化 → 匹配 → 拼接
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量识别文件，控制并发
//!
//! ## 示例
//!
//! ```no_run
//! use svg_captcha_solver::{CaptchaSolver, Config};
//!
//! let solver = CaptchaSolver::new(&Config::default())?;
//! let text = solver.solve(r#"<svg xmlns="http://www.w3.org/2000/svg">...</svg>"#)?;
//! println!("{}", text);
//! # Ok::<(), svg_captcha_solver::AppError>(())
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, CaptchaError};
pub use models::{MatchResult, PathSignature, SolveOutcome};
pub use orchestrator::App;
pub use services::{MatchWeights, ReferenceModel};
pub use workflow::CaptchaSolver;
