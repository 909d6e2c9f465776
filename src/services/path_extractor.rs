//! 路径提取服务 - 业务能力层
//!
//! 只负责"把 SVG 文本解析为有序的 path 列表"，不判断字形还是噪声

use crate::error::{AppError, AppResult};
use crate::models::{PathElement, SvgDocument};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use tracing::debug;

/// SVG 命名空间
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// `<path>` 上需要读取的属性
#[derive(Debug, Default)]
struct PathAttrs {
    d: Option<String>,
    stroke: Option<String>,
    fill: Option<String>,
}

impl PathAttrs {
    fn from_event(e: &BytesStart<'_>) -> AppResult<Self> {
        let mut attrs = Self::default();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| AppError::malformed_input(format!("属性解析失败: {}", err)))?;
            let value = String::from_utf8_lossy(&attr.value).to_string();
            match attr.key.as_ref() {
                b"d" => attrs.d = Some(value),
                b"stroke" => attrs.stroke = Some(value),
                b"fill" => attrs.fill = Some(value),
                _ => {}
            }
        }
        Ok(attrs)
    }

    fn into_element(self, index: usize) -> PathElement {
        PathElement {
            index,
            d: self.d.unwrap_or_default(),
            stroke: self.stroke,
            fill: self.fill,
        }
    }
}

/// 根元素是否声明了 SVG 命名空间（默认或带前缀均可）
fn declares_svg_namespace(e: &BytesStart<'_>) -> AppResult<bool> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| AppError::malformed_input(format!("属性解析失败: {}", err)))?;
        let key = attr.key.as_ref();
        if (key == b"xmlns" || key.starts_with(b"xmlns:")) && attr.value.as_ref() == SVG_NAMESPACE.as_bytes() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// 解析过程中的状态
#[derive(Debug, Default)]
struct ParseState {
    /// 已经遇到根元素
    root_seen: bool,
    /// 根元素已经闭合
    root_closed: bool,
    depth: usize,
    paths: Vec<PathElement>,
}

impl ParseState {
    /// 处理开始标签（包括自闭合标签）
    fn open(&mut self, e: &BytesStart<'_>, self_closing: bool) -> AppResult<()> {
        if self.root_closed {
            return Err(AppError::malformed_input("根元素之后还有其他元素"));
        }

        if !self.root_seen {
            if e.local_name().as_ref() != b"svg" {
                return Err(AppError::malformed_input(format!(
                    "根元素必须是 <svg>，实际为 <{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                )));
            }
            if !declares_svg_namespace(e)? {
                return Err(AppError::malformed_input("缺少 SVG 命名空间声明"));
            }
            self.root_seen = true;
            if self_closing {
                self.root_closed = true;
            } else {
                self.depth = 1;
            }
            return Ok(());
        }

        if e.local_name().as_ref() == b"path" {
            let index = self.paths.len();
            self.paths.push(PathAttrs::from_event(e)?.into_element(index));
        }
        if !self_closing {
            self.depth += 1;
        }
        Ok(())
    }

    /// 处理文本和 CDATA：根元素之外只允许空白
    fn text(&self, content: &[u8]) -> AppResult<()> {
        let outside_root = !self.root_seen || self.root_closed;
        if outside_root && !content.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::malformed_input("根元素之外出现文本内容"));
        }
        Ok(())
    }

    fn close(&mut self) -> AppResult<()> {
        if self.depth == 0 {
            return Err(AppError::malformed_input("多余的结束标签"));
        }
        self.depth -= 1;
        if self.depth == 0 {
            self.root_closed = true;
        }
        Ok(())
    }
}

/// 路径提取服务
///
/// 职责：
/// - 校验 SVG 根元素和命名空间
/// - 按文档顺序提取所有 `<path>` 的 d / stroke / fill
/// - 属性值保持原样
#[derive(Debug, Clone)]
pub struct PathExtractor {
    svg_open_tag: Regex,
}

impl PathExtractor {
    /// 创建新的路径提取服务
    pub fn new() -> AppResult<Self> {
        let svg_open_tag = Regex::new(r"<(?:[A-Za-z_][\w.-]*:)?svg[\s/>]")
            .map_err(|e| AppError::Other(format!("正则表达式编译失败: {}", e)))?;
        Ok(Self { svg_open_tag })
    }

    /// 解析 SVG 文本
    ///
    /// # 错误
    /// 输入为空、缺少 `<svg>` 开始标签、缺少命名空间声明、
    /// 标签未闭合或 XML 本身不合法时返回 `CaptchaError::MalformedInput`
    pub fn parse(&self, markup: &str) -> AppResult<SvgDocument> {
        if markup.trim().is_empty() {
            return Err(AppError::malformed_input("输入为空"));
        }
        if !self.svg_open_tag.is_match(markup) {
            return Err(AppError::malformed_input("缺少 <svg> 开始标签"));
        }

        let mut reader = Reader::from_str(markup);
        reader.trim_text(true);
        let mut buf = Vec::new();
        let mut state = ParseState::default();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => state.open(&e, false)?,
                Ok(Event::Empty(e)) => state.open(&e, true)?,
                Ok(Event::End(_)) => state.close()?,
                Ok(Event::Text(t)) => state.text(&t)?,
                Ok(Event::CData(t)) => state.text(&t)?,
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(AppError::malformed_input(format!(
                        "XML 解析失败 (位置 {}): {}",
                        reader.buffer_position(),
                        e
                    )));
                }
                _ => {}
            }
            buf.clear();
        }

        if !state.root_seen {
            return Err(AppError::malformed_input("缺少 <svg> 根元素"));
        }
        if !state.root_closed {
            return Err(AppError::malformed_input("<svg> 标签未闭合"));
        }

        debug!("SVG 解析完成，共 {} 条路径", state.paths.len());
        Ok(SvgDocument::new(state.paths))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaptchaError;

    fn extractor() -> PathExtractor {
        PathExtractor::new().unwrap()
    }

    fn assert_malformed(markup: &str) {
        let err = extractor().parse(markup).unwrap_err();
        assert!(
            matches!(err.as_captcha(), Some(CaptchaError::MalformedInput { .. })),
            "期望格式错误，实际: {}",
            err
        );
    }

    #[test]
    fn test_parse_paths_in_document_order() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="40">
    <path d="M0 0 L10 10" stroke="#777" fill="none"/>
    <g>
        <path d="M5 5 h4" fill="#222"></path>
    </g>
    <path d="M1 1"/>
</svg>"##;

        let doc = extractor().parse(svg).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.paths[0].index, 0);
        assert_eq!(doc.paths[0].stroke.as_deref(), Some("#777"));
        assert_eq!(doc.paths[0].fill.as_deref(), Some("none"));
        assert_eq!(doc.paths[1].d, "M5 5 h4");
        assert_eq!(doc.paths[1].stroke, None);
        assert_eq!(doc.paths[2].index, 2);
        assert_eq!(doc.paths[2].fill, None);
    }

    #[test]
    fn test_attribute_values_are_verbatim() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="  M0,0   L 1 , 1 " stroke=" none "/></svg>"#;
        let doc = extractor().parse(svg).unwrap();
        assert_eq!(doc.paths[0].d, "  M0,0   L 1 , 1 ");
        assert_eq!(doc.paths[0].stroke.as_deref(), Some(" none "));
    }

    #[test]
    fn test_prefixed_namespace_is_accepted() {
        let svg = r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg"><svg:path d="M0 0"/></svg:svg>"#;
        let doc = extractor().parse(svg).unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_xml_declaration_is_allowed() {
        let svg = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0"/></svg>"#;
        assert_eq!(extractor().parse(svg).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_svg_has_no_paths() {
        let doc = extractor()
            .parse(r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#)
            .unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_rejects_empty_input() {
        assert_malformed("");
        assert_malformed("   \n\t");
    }

    #[test]
    fn test_rejects_missing_svg_tag() {
        assert_malformed(r#"<html><path d="M0 0"/></html>"#);
        assert_malformed("just some text");
    }

    #[test]
    fn test_rejects_missing_namespace() {
        assert_malformed(r#"<svg width="10"><path d="M0 0"/></svg>"#);
        assert_malformed(r#"<svg xmlns="http://example.com/other"><path d="M0 0"/></svg>"#);
    }

    #[test]
    fn test_rejects_unterminated_markup() {
        assert_malformed(r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0"/>"#);
        assert_malformed(r#"<svg xmlns="http://www.w3.org/2000/svg"><g><path d="M0 0"/></svg>"#);
    }

    #[test]
    fn test_rejects_text_outside_root() {
        assert_malformed(r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M8 0 h4"/></svg>garbage<"#);
        assert_malformed(r#"<svg xmlns="http://www.w3.org/2000/svg"></svg>trailing"#);
        assert_malformed(r#"<svg xmlns="http://www.w3.org/2000/svg"></svg><![CDATA[x]]>"#);
        assert_malformed(r#"leading<svg xmlns="http://www.w3.org/2000/svg"></svg>"#);
    }

    #[test]
    fn test_text_inside_root_and_trailing_whitespace_are_allowed() {
        let svg = "<svg xmlns=\"http://www.w3.org/2000/svg\"><text>AB</text><path d=\"M0 0\"/></svg>\n  ";
        assert_eq!(extractor().parse(svg).unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_non_svg_root() {
        assert_malformed(r#"<div><svg xmlns="http://www.w3.org/2000/svg"></svg></div>"#);
    }
}
