use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 验证码识别错误
    #[error("验证码错误: {0}")]
    Captcha(#[from] CaptchaError),
    /// 参考模型错误
    #[error("模型错误: {0}")]
    Model(#[from] ModelError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 验证码识别流程错误
///
/// 三种错误对单次 `solve()` 都是终止性的，不会返回部分结果
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptchaError {
    /// 输入不是可解析的 SVG（空串、未闭合、缺少命名空间等）
    #[error("SVG 格式错误: {reason}")]
    MalformedInput { reason: String },
    /// 过滤噪声后没有剩余字形路径
    #[error("未找到字形路径 (共 {total_paths} 条路径，全部为噪声或不存在)")]
    NoGlyphsFound { total_paths: usize },
    /// 流程完成但没有得到任何字符
    #[error("识别结果为空")]
    EmptyResult,
}

/// 参考模型错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// 字符表为空
    #[error("参考模型不能为空")]
    EmptyCatalog,
    /// 字符表条目无效
    #[error("无效的字符表条目 '{character}': {reason}")]
    InvalidEntry { character: String, reason: String },
}

/// 配置错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// 配置值不合法
    #[error("配置项 {key} 的值 '{value}' 不合法: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// JSON 序列化失败
    #[error("JSON序列化失败: {source}")]
    JsonSerializeFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::JsonSerializeFailed {
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 SVG 格式错误
    pub fn malformed_input(reason: impl Into<String>) -> Self {
        AppError::Captcha(CaptchaError::MalformedInput {
            reason: reason.into(),
        })
    }

    /// 创建配置值错误
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        AppError::Config(ConfigError::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        })
    }

    /// 创建字符表条目错误
    pub fn invalid_catalog_entry(character: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Model(ModelError::InvalidEntry {
            character: character.into(),
            reason: reason.into(),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 返回验证码错误（如果是）
    pub fn as_captcha(&self) -> Option<&CaptchaError> {
        match self {
            AppError::Captcha(e) => Some(e),
            _ => None,
        }
    }

    /// 调用方是否应该重新获取一张新的验证码
    ///
    /// 样本本身无法识别时返回 true；格式错误通常意味着上游取到的不是验证码
    pub fn should_refetch(&self) -> bool {
        matches!(
            self,
            AppError::Captcha(CaptchaError::NoGlyphsFound { .. })
                | AppError::Captcha(CaptchaError::EmptyResult)
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_refetch_only_for_sample_failures() {
        assert!(AppError::from(CaptchaError::NoGlyphsFound { total_paths: 2 }).should_refetch());
        assert!(AppError::from(CaptchaError::EmptyResult).should_refetch());
        assert!(!AppError::malformed_input("空输入").should_refetch());
        assert!(!AppError::from(ModelError::EmptyCatalog).should_refetch());
    }

    #[test]
    fn test_display_keeps_category_prefix() {
        let err = AppError::malformed_input("缺少 <svg> 开始标签");
        assert_eq!(err.to_string(), "验证码错误: SVG 格式错误: 缺少 <svg> 开始标签");
        assert_eq!(
            err.as_captcha(),
            Some(&CaptchaError::MalformedInput {
                reason: "缺少 <svg> 开始标签".to_string()
            })
        );
    }

    #[test]
    fn test_io_error_converts_to_file_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::File(FileError::ReadFailed { .. })));
    }
}
