use crate::error::{AppError, AppResult, FileError};
use crate::services::MatchWeights;
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 识别配置 ---
    /// 签名缓存容量（0 表示不缓存）
    pub cache_capacity: usize,
    /// 可接受的最大匹配距离
    pub max_distance: f64,
    /// 低置信度阈值
    pub low_confidence_cutoff: f64,
    /// 特征距离权重
    pub weights: MatchWeights,
    /// 自定义字符表（TOML），为空时使用内置字符表
    pub model_path: Option<String>,
    // --- 批量处理配置 ---
    /// 验证码文件或目录
    pub input_path: String,
    /// 同时识别的验证码数量
    pub max_concurrent_solves: usize,
    /// 输出日志文件
    pub output_log_file: String,
    /// JSON 报告文件
    pub output_report_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 256,
            max_distance: 1.0,
            low_confidence_cutoff: 0.5,
            weights: MatchWeights::default(),
            model_path: None,
            input_path: "captchas".to_string(),
            max_concurrent_solves: 8,
            output_log_file: "solve_log.txt".to_string(),
            output_report_file: None,
            verbose_logging: false,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 用环境变量覆盖当前配置，无法解析的值保持原样
    pub fn with_env_overrides(self) -> Self {
        let weights = MatchWeights {
            curve: env_parse("CAPTCHA_WEIGHT_CURVE").unwrap_or(self.weights.curve),
            line: env_parse("CAPTCHA_WEIGHT_LINE").unwrap_or(self.weights.line),
            total: env_parse("CAPTCHA_WEIGHT_TOTAL").unwrap_or(self.weights.total),
            aspect: env_parse("CAPTCHA_WEIGHT_ASPECT").unwrap_or(self.weights.aspect),
        };
        Self {
            cache_capacity: env_parse("CAPTCHA_CACHE_CAPACITY").unwrap_or(self.cache_capacity),
            max_distance: env_parse("CAPTCHA_MAX_DISTANCE").unwrap_or(self.max_distance),
            low_confidence_cutoff: env_parse("CAPTCHA_LOW_CONFIDENCE_CUTOFF").unwrap_or(self.low_confidence_cutoff),
            weights,
            model_path: std::env::var("CAPTCHA_MODEL_PATH").ok().or(self.model_path),
            input_path: std::env::var("CAPTCHA_INPUT").unwrap_or(self.input_path),
            max_concurrent_solves: env_parse("MAX_CONCURRENT_SOLVES").unwrap_or(self.max_concurrent_solves),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            output_report_file: std::env::var("OUTPUT_REPORT_FILE").ok().or(self.output_report_file),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
        }
    }

    /// 从 TOML 文本解析配置，缺省字段使用默认值
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let display = path.display().to_string();
        if !path.exists() {
            return Err(FileError::NotFound { path: display }.into());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| AppError::file_read_failed(&display, e))?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            AppError::File(FileError::TomlParseFailed {
                path: display,
                source: Box::new(e),
            })
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 读取 `CAPTCHA_CONFIG` 指向的配置文件（如果有），再应用环境变量覆盖
    pub fn load() -> AppResult<Self> {
        let base = match std::env::var("CAPTCHA_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        let config = base.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 校验配置取值
    pub fn validate(&self) -> AppResult<()> {
        if !(self.low_confidence_cutoff > 0.0 && self.low_confidence_cutoff <= 1.0) {
            return Err(AppError::invalid_config(
                "low_confidence_cutoff",
                self.low_confidence_cutoff,
                "必须在 (0, 1] 区间内",
            ));
        }
        if !self.max_distance.is_finite() || self.max_distance < 0.0 {
            return Err(AppError::invalid_config(
                "max_distance",
                self.max_distance,
                "必须是非负有限数",
            ));
        }

        let weights = [
            ("weights.curve", self.weights.curve),
            ("weights.line", self.weights.line),
            ("weights.total", self.weights.total),
            ("weights.aspect", self.weights.aspect),
        ];
        for (key, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::invalid_config(key, value, "权重必须是非负有限数"));
            }
        }
        if weights.iter().all(|(_, v)| *v == 0.0) {
            return Err(AppError::invalid_config("weights", "0", "权重不能全部为 0"));
        }

        if self.max_concurrent_solves == 0 {
            return Err(AppError::invalid_config(
                "max_concurrent_solves",
                self.max_concurrent_solves,
                "必须大于 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_toml_overrides_only_given_fields() {
        let config = Config::from_toml_str(
            r#"
cache_capacity = 16
low_confidence_cutoff = 0.8

[weights]
aspect = 2.5
"#,
        )
        .unwrap();

        assert_eq!(config.cache_capacity, 16);
        assert_eq!(config.low_confidence_cutoff, 0.8);
        assert_eq!(config.weights.aspect, 2.5);
        assert_eq!(config.weights.curve, MatchWeights::default().curve);
        assert_eq!(config.max_concurrent_solves, 8);
    }

    #[test]
    fn test_invalid_cutoff_rejected() {
        let err = Config::from_toml_str("low_confidence_cutoff = 1.5").unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = Config::default();
        config.weights.line = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let mut config = Config::default();
        config.weights = MatchWeights {
            curve: 0.0,
            line: 0.0,
            total: 0.0,
            aspect: 0.0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, AppError::File(FileError::NotFound { .. })));
    }

    #[test]
    fn test_from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("captcha.toml");
        std::fs::write(&path, "max_distance = 2.0\nverbose_logging = true\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.max_distance, 2.0);
        assert!(config.verbose_logging);
    }
}
