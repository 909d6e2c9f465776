/// 字形匹配服务
///
/// 在参考模型中找出与给定签名最接近的字符
use crate::models::{MatchResult, PathSignature};
use crate::services::reference_model::{ReferenceEntry, ReferenceModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 特征距离权重
///
/// 距离 = Σ 权重 × |特征差|，特征为曲线数、直线数、命令总数和包围盒宽高比
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    pub curve: f64,
    pub line: f64,
    pub total: f64,
    pub aspect: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            curve: 1.0,
            line: 1.0,
            total: 0.5,
            aspect: 4.0,
        }
    }
}

impl MatchWeights {
    /// 两个签名之间的加权距离
    ///
    /// 坐标溢出时宽高比可能是 NaN，此时距离记为无穷大
    pub fn distance(&self, a: &PathSignature, b: &PathSignature) -> f64 {
        let diff = |x: usize, y: usize| (x as f64 - y as f64).abs();
        let distance = self.curve * diff(a.curve_count, b.curve_count)
            + self.line * diff(a.line_count, b.line_count)
            + self.total * diff(a.total_commands, b.total_commands)
            + self.aspect * (a.aspect_ratio() - b.aspect_ratio()).abs();
        if distance.is_nan() {
            f64::INFINITY
        } else {
            distance
        }
    }
}

/// 字形匹配服务
pub struct PatternMatcher {
    weights: MatchWeights,
    /// 可接受的最大距离，超出时结果标记为低置信度
    max_distance: f64,
    /// 置信度低于该值视为低置信度
    low_confidence_cutoff: f64,
}

impl PatternMatcher {
    /// 创建新的匹配服务
    pub fn new(weights: MatchWeights, max_distance: f64, low_confidence_cutoff: f64) -> Self {
        Self {
            weights,
            max_distance,
            low_confidence_cutoff,
        }
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    pub fn low_confidence_cutoff(&self) -> f64 {
        self.low_confidence_cutoff
    }

    /// 找出最接近的参考字符
    ///
    /// 总是给出答案：没有候选在可接受距离内时，退回全局最近的条目并标记为低置信度。
    /// 距离相同时先注册的条目优先。只有模型为空时才返回 `None`。
    pub fn find_best_match(
        &self,
        sig: &PathSignature,
        model: &ReferenceModel,
    ) -> Option<MatchResult> {
        let mut best: Option<(&ReferenceEntry, f64)> = None;
        for entry in model.entries() {
            let distance = self.weights.distance(sig, &entry.signature);
            // 严格小于才替换，保证先注册优先
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((entry, distance));
            }
        }

        let (entry, distance) = best?;
        let result = self.build_result(entry, distance);

        if result.low_confidence {
            warn!(
                "⚠️ 低置信度匹配: '{}' (距离 {:.3}, 置信度 {:.3})",
                result.character, distance, result.confidence
            );
        } else {
            debug!(
                "匹配 '{}' (距离 {:.3}, 置信度 {:.3})",
                result.character, distance, result.confidence
            );
        }

        Some(result)
    }

    /// 按距离排序的前 `limit` 个候选（用于详细日志）
    pub fn top_candidates(
        &self,
        sig: &PathSignature,
        model: &ReferenceModel,
        limit: usize,
    ) -> Vec<(char, f64)> {
        let mut ranked: Vec<(usize, char, f64)> = model
            .entries()
            .iter()
            .enumerate()
            .map(|(i, e)| (i, e.character, self.weights.distance(sig, &e.signature)))
            .collect();
        // 稳定排序，距离相同保持注册顺序
        ranked.sort_by(|a, b| a.2.total_cmp(&b.2).then(a.0.cmp(&b.0)));
        ranked
            .into_iter()
            .take(limit)
            .map(|(_, c, d)| (c, d))
            .collect()
    }

    fn build_result(&self, entry: &ReferenceEntry, distance: f64) -> MatchResult {
        let raw = 1.0 / (1.0 + distance);
        let confidence = if distance > self.max_distance {
            // 超出阈值，压到阈值以下
            raw * self.low_confidence_cutoff
        } else {
            raw
        };

        MatchResult {
            character: entry.character,
            confidence,
            used_signature: entry.signature,
            distance,
            // NaN 也算低置信度
            low_confidence: !(confidence >= self.low_confidence_cutoff),
        }
    }
}

impl Default for PatternMatcher {
    fn default() -> Self {
        Self::new(MatchWeights::default(), 1.0, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundingBox;
    use crate::services::catalog::builtin_sample;
    use crate::services::geometry_normalizer::compute_signature;

    fn bbox(w: f64, h: f64) -> BoundingBox {
        BoundingBox::new(0.0, 0.0, w, h)
    }

    #[test]
    fn test_exact_signature_matches_with_full_confidence() {
        let model = ReferenceModel::builtin();
        let matcher = PatternMatcher::default();

        for ch in ['0', '1', '4', '7', 'A', 'K', 'X'] {
            let sig = compute_signature(builtin_sample(ch).unwrap());
            let result = matcher.find_best_match(&sig, &model).unwrap();
            assert_eq!(result.character, ch);
            assert_eq!(result.distance, 0.0);
            assert_eq!(result.confidence, 1.0);
            assert!(!result.low_confidence);
            assert_eq!(result.used_signature, sig);
        }
    }

    #[test]
    fn test_tie_prefers_first_registered() {
        let sig = PathSignature::from_counts(0, 4, 1, bbox(10.0, 10.0));
        let model = ReferenceModel::builder()
            .register('X', sig)
            .register('Y', sig)
            .build()
            .unwrap();

        let result = PatternMatcher::default()
            .find_best_match(&sig, &model)
            .unwrap();
        assert_eq!(result.character, 'X');
    }

    #[test]
    fn test_far_signature_falls_back_with_low_confidence() {
        let model = ReferenceModel::builtin();
        let matcher = PatternMatcher::default();
        let sig = compute_signature("M0 0 L1000 1 L2000 2");

        let result = matcher.find_best_match(&sig, &model).unwrap();
        assert!(result.low_confidence);
        assert!(result.confidence < matcher.low_confidence_cutoff());
        assert!(result.distance > 1.0);
    }

    #[test]
    fn test_overflowing_coordinates_are_low_confidence() {
        let model = ReferenceModel::builtin();
        let matcher = PatternMatcher::default();
        let sig = compute_signature("M0 0 L1e308 1e308 l1e308 1e308");
        assert!(sig.aspect_ratio().is_nan());

        let result = matcher.find_best_match(&sig, &model).unwrap();
        assert_eq!(result.distance, f64::INFINITY);
        assert!(!result.confidence.is_nan());
        assert!(result.confidence < matcher.low_confidence_cutoff());
        assert!(result.low_confidence);
    }

    #[test]
    fn test_nearest_neighbour_on_weighted_distance() {
        let model = ReferenceModel::builder()
            .register_counts('a', 0, 6, 1, bbox(20.0, 30.0))
            .register_counts('b', 4, 4, 2, bbox(20.0, 30.0))
            .build()
            .unwrap();
        let matcher = PatternMatcher::default();

        // 少一条直线，仍然最接近 a
        let probe = PathSignature::from_counts(0, 5, 1, bbox(20.0, 30.0));
        let result = matcher.find_best_match(&probe, &model).unwrap();
        assert_eq!(result.character, 'a');
        assert_eq!(result.distance, 1.5);
        assert!(result.low_confidence);
    }

    #[test]
    fn test_weights_are_configurable() {
        let model = ReferenceModel::builder()
            .register_counts('w', 0, 6, 1, bbox(30.0, 30.0))
            .register_counts('n', 0, 9, 1, bbox(10.0, 30.0))
            .build()
            .unwrap();
        let probe = PathSignature::from_counts(0, 9, 1, bbox(30.0, 30.0));

        let by_counts = PatternMatcher::new(
            MatchWeights {
                curve: 1.0,
                line: 1.0,
                total: 0.0,
                aspect: 0.0,
            },
            1.0,
            0.5,
        );
        let by_shape = PatternMatcher::new(
            MatchWeights {
                curve: 0.0,
                line: 0.0,
                total: 0.0,
                aspect: 1.0,
            },
            1.0,
            0.5,
        );

        assert_eq!(by_counts.find_best_match(&probe, &model).unwrap().character, 'n');
        assert_eq!(by_shape.find_best_match(&probe, &model).unwrap().character, 'w');
    }

    #[test]
    fn test_top_candidates_sorted() {
        let model = ReferenceModel::builtin();
        let sig = compute_signature(builtin_sample('E').unwrap());
        let top = PatternMatcher::default().top_candidates(&sig, &model, 3);

        assert_eq!(top.len(), 3);
        assert_eq!(top[0], ('E', 0.0));
        assert!(top[1].1 <= top[2].1);
    }
}
