use serde::{Deserialize, Serialize};

/// 单个 `<path>` 元素
///
/// 属性值按原文保存，不做任何规范化。解析完成后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathElement {
    /// 在文档中的序号（从0开始，仅统计 path 元素）
    pub index: usize,
    /// 路径命令数据（`d` 属性）
    pub d: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

impl PathElement {
    pub fn new(index: usize, d: impl Into<String>) -> Self {
        Self {
            index,
            d: d.into(),
            stroke: None,
            fill: None,
        }
    }

    pub fn with_stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// 是否带有有效描边
    ///
    /// 只有没有 stroke 属性、属性为空串或恰好为 `none` 时才视为无描边。
    /// 值按原文比较，带空白的 `" none "` 或纯空白都算有描边
    pub fn is_stroked(&self) -> bool {
        !matches!(self.stroke.as_deref(), None | Some("") | Some("none"))
    }
}

/// 解析后的 SVG 文档
///
/// 路径顺序即文档顺序，也就是验证码的阅读顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SvgDocument {
    pub paths: Vec<PathElement>,
}

impl SvgDocument {
    pub fn new(paths: Vec<PathElement>) -> Self {
        Self { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.paths.iter()
    }
}
