//! 验证码识别流程 - 流程层
//!
//! 核心职责：定义"一张验证码"的完整识别流程
//!
//! 流程顺序（线性，不回退）：
//! 1. 解析 SVG → path 列表
//! 2. 分类 → 字形路径
//! 3. 每个字形：归一化 → 匹配
//! 4. 拼接结果
//!
//! 除共享的只读参考模型和有界签名缓存外，不在调用之间保留任何状态。

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppResult, CaptchaError};
use crate::models::{MatchResult, SolveOutcome};
use crate::services::{
    CacheStats, GeometryNormalizer, PathClassifier, PathExtractor, PatternMatcher, ReferenceModel,
};
use crate::utils::logging::truncate_text;
use crate::workflow::solve_ctx::SolveCtx;

/// 验证码识别器
///
/// - 编排完整的识别流程
/// - 持有全部编译好的解析器和签名缓存，实例之间互不影响
/// - 可以放进 `Arc` 在多个线程中同时调用
pub struct CaptchaSolver {
    extractor: PathExtractor,
    classifier: PathClassifier,
    normalizer: GeometryNormalizer,
    matcher: PatternMatcher,
    model: Arc<ReferenceModel>,
    verbose_logging: bool,
}

impl CaptchaSolver {
    /// 使用内置字符表创建识别器
    pub fn new(config: &Config) -> AppResult<Self> {
        Self::with_model(config, ReferenceModel::builtin())
    }

    /// 使用指定字符表创建识别器
    pub fn with_model(config: &Config, model: Arc<ReferenceModel>) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            extractor: PathExtractor::new()?,
            classifier: PathClassifier::new(),
            normalizer: GeometryNormalizer::new(config.cache_capacity),
            matcher: PatternMatcher::new(
                config.weights,
                config.max_distance,
                config.low_confidence_cutoff,
            ),
            model,
            verbose_logging: config.verbose_logging,
        })
    }

    /// 识别验证码，返回文本
    ///
    /// # 错误
    /// - `CaptchaError::MalformedInput`: SVG 无法解析
    /// - `CaptchaError::NoGlyphsFound`: 没有字形路径
    /// - `CaptchaError::EmptyResult`: 没有得到任何字符
    pub fn solve(&self, markup: &str) -> AppResult<String> {
        self.solve_detailed(markup).map(|outcome| outcome.text)
    }

    /// 识别验证码，同时返回每个字符的匹配详情
    pub fn solve_detailed(&self, markup: &str) -> AppResult<SolveOutcome> {
        self.solve_with_ctx(markup, &SolveCtx::anonymous())
    }

    /// 带上下文的识别（上下文只影响日志）
    pub fn solve_with_ctx(&self, markup: &str, ctx: &SolveCtx) -> AppResult<SolveOutcome> {
        let doc = self.extractor.parse(markup)?;
        let glyphs = self.classifier.classify(&doc)?;
        debug!(
            "{} 共 {} 条路径，其中字形 {} 条",
            ctx,
            doc.len(),
            glyphs.len()
        );

        let mut matches: Vec<MatchResult> = Vec::with_capacity(glyphs.len());
        for glyph in glyphs {
            let sig = self.normalizer.signature(&glyph.d);
            if self.verbose_logging {
                debug!(
                    "{} 字形 #{} d={} 签名: curves={} lines={} moves={} complexity={} aspect={:.3}",
                    ctx,
                    glyph.index,
                    truncate_text(&glyph.d, 40),
                    sig.curve_count,
                    sig.line_count,
                    sig.move_count,
                    sig.complexity,
                    sig.aspect_ratio()
                );
                debug!(
                    "{} 候选: {:?}",
                    ctx,
                    self.matcher.top_candidates(&sig, &self.model, 3)
                );
            }
            if let Some(result) = self.matcher.find_best_match(&sig, &self.model) {
                matches.push(result);
            }
        }

        let text: String = matches.iter().map(|m| m.character).collect();
        if text.is_empty() {
            return Err(CaptchaError::EmptyResult.into());
        }

        let outcome = SolveOutcome { text, matches };
        if outcome.is_low_confidence() {
            warn!(
                "{} ⚠️ 识别结果 {} 含 {} 个低置信度字符",
                ctx,
                outcome.text,
                outcome.low_confidence_count()
            );
        } else {
            info!("{} ✓ 识别结果: {}", ctx, outcome.text);
        }

        Ok(outcome)
    }

    pub fn model(&self) -> &ReferenceModel {
        &self.model
    }

    /// 当前缓存的签名数量
    pub fn cache_len(&self) -> usize {
        self.normalizer.cache().len()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.normalizer.cache_stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::catalog::builtin_sample;

    fn svg(body: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="150" height="50">{}</svg>"#,
            body
        )
    }

    fn glyph(ch: char) -> String {
        format!(r##"<path d="{}" fill="#222"/>"##, builtin_sample(ch).unwrap())
    }

    #[test]
    fn test_noise_then_glyph() {
        let solver = CaptchaSolver::new(&Config::default()).unwrap();
        let markup = svg(&format!(
            r##"<path d="M0 10 C30 40 60 0 150 30" stroke="#777"/><path d="M0 30 Q70 0 150 10" stroke="#666"/>{}"##,
            glyph('A')
        ));
        assert_eq!(solver.solve(&markup).unwrap(), "A");
    }

    #[test]
    fn test_malformed_input_propagates_unchanged() {
        let solver = CaptchaSolver::new(&Config::default()).unwrap();
        let err = solver.solve("<svg><path d=\"M0 0\"/></svg>").unwrap_err();
        assert!(matches!(
            err,
            AppError::Captcha(CaptchaError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_solve_detailed_reports_matches() {
        let solver = CaptchaSolver::new(&Config::default()).unwrap();
        let outcome = solver
            .solve_detailed(&svg(&format!("{}{}", glyph('5'), glyph('X'))))
            .unwrap();

        assert_eq!(outcome.text, "5X");
        assert_eq!(outcome.matches.len(), 2);
        assert!(!outcome.is_low_confidence());
        assert_eq!(outcome.min_confidence(), Some(1.0));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            low_confidence_cutoff: 0.0,
            ..Config::default()
        };
        assert!(CaptchaSolver::new(&config).is_err());
    }

    #[test]
    fn test_cache_is_filled_per_distinct_path() {
        let solver = CaptchaSolver::new(&Config::default()).unwrap();
        let markup = svg(&format!("{}{}{}", glyph('1'), glyph('1'), glyph('7')));

        assert_eq!(solver.solve(&markup).unwrap(), "117");
        assert_eq!(solver.cache_len(), 2);
        assert_eq!(solver.cache_stats().hits, 1);
    }
}
