use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从磁盘读取的验证码文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptchaFile {
    /// 文件名（用于日志和报告）
    pub name: String,
    pub path: PathBuf,
    /// SVG 原文
    pub markup: String,
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}

/// 读取单个验证码文件
pub async fn load_captcha_file(path: &Path) -> Result<CaptchaFile> {
    let markup = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取验证码文件: {}", path.display()))?;

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    Ok(CaptchaFile {
        name,
        path: path.to_path_buf(),
        markup,
    })
}

/// 加载验证码文件
///
/// `path` 为文件时只读取该文件；为目录时读取其中全部 `.svg` 文件（按文件名排序）。
/// 单个文件读取失败只记录警告，不影响其余文件。
pub async fn load_captcha_files(path: &Path) -> Result<Vec<CaptchaFile>> {
    if !path.exists() {
        anyhow::bail!("路径不存在: {}", path.display());
    }

    if path.is_file() {
        return Ok(vec![load_captcha_file(path).await?]);
    }

    let mut svg_paths = Vec::new();
    let mut entries = fs::read_dir(path)
        .await
        .with_context(|| format!("无法读取文件夹: {}", path.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let entry_path = entry.path();
        if entry_path.is_file() && is_svg(&entry_path) {
            svg_paths.push(entry_path);
        }
    }
    svg_paths.sort();

    if svg_paths.is_empty() {
        tracing::warn!("在文件夹 {} 中没有找到 SVG 文件", path.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::with_capacity(svg_paths.len());
    for svg_path in svg_paths {
        match load_captcha_file(&svg_path).await {
            Ok(file) => {
                tracing::debug!("已加载: {}", file.name);
                files.push(file);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", svg_path.display(), e);
            }
        }
    }

    tracing::info!("成功加载 {} 个验证码文件", files.len());
    Ok(files)
}
