//! 批量验证码识别器 - 编排层
//!
//! ## 职责
//!
//! 本模块是命令行程序的入口，负责批量识别和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、加载字符表、创建识别器
//! 2. **批量加载**：扫描并加载所有待识别的验证码文件
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：每批完成后再开始下一批
//! 5. **全局统计**：汇总识别结果，可选输出 JSON 报告
//!
//! 识别本身是纯 CPU 计算，放在 `spawn_blocking` 中执行；
//! 所有任务共享同一个 `CaptchaSolver`（只读字符表 + 线程安全缓存）。

use crate::config::Config;
use crate::models::{load_captcha_files, CaptchaFile};
use crate::services::load_reference_model;
use crate::utils::logging::{
    init_log_file, log_batch_complete, log_batch_start, log_captchas_loaded, log_startup,
    print_final_stats,
};
use crate::workflow::{CaptchaSolver, SolveCtx};
use anyhow::{Context, Result};
use futures::future::join_all;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 单个验证码的识别记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveRecord {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
    pub low_confidence_chars: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 是否建议重新获取验证码
    pub refetch: bool,
}

impl SolveRecord {
    pub fn is_success(&self) -> bool {
        self.text.is_some()
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub low_confidence: usize,
    pub failed: usize,
    pub total: usize,
}

impl ProcessingStats {
    fn from_records(records: &[SolveRecord]) -> Self {
        let success = records.iter().filter(|r| r.is_success()).count();
        Self {
            success,
            low_confidence: records
                .iter()
                .filter(|r| r.is_success() && r.low_confidence_chars > 0)
                .count(),
            failed: records.len() - success,
            total: records.len(),
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    solver: Arc<CaptchaSolver>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建日志文件: {}", config.output_log_file))?;

        log_startup(&config);

        let solver = match &config.model_path {
            Some(path) => {
                let model = load_reference_model(Path::new(path)).await?;
                CaptchaSolver::with_model(&config, Arc::new(model))?
            }
            None => {
                info!("使用内置字符表");
                CaptchaSolver::new(&config)?
            }
        };

        Ok(Self::with_solver(config, Arc::new(solver)))
    }

    /// 使用已有识别器创建应用（不创建日志文件）
    pub fn with_solver(config: Config, solver: Arc<CaptchaSolver>) -> Self {
        Self { config, solver }
    }

    pub fn solver(&self) -> &Arc<CaptchaSolver> {
        &self.solver
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        info!("📁 正在扫描待识别的验证码...");
        let files = load_captcha_files(Path::new(&self.config.input_path)).await?;

        if files.is_empty() {
            warn!("⚠️ 没有找到待识别的SVG文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_captchas_loaded(files.len(), self.config.max_concurrent_solves);

        let records = self.solve_all(files).await?;
        let stats = ProcessingStats::from_records(&records);

        if let Some(report_path) = &self.config.output_report_file {
            write_report(report_path, &records)?;
            info!("📝 识别报告已写入: {}", report_path);
        }

        print_final_stats(
            stats.success,
            stats.low_confidence,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 分批识别全部验证码，结果顺序与输入一致
    pub async fn solve_all(&self, files: Vec<CaptchaFile>) -> Result<Vec<SolveRecord>> {
        let batch_size = self.config.max_concurrent_solves.max(1);
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total = files.len();
        let total_batches = (total + batch_size - 1) / batch_size;
        let mut records = Vec::with_capacity(total);

        for (batch_idx, batch) in files.chunks(batch_size).enumerate() {
            let batch_start = batch_idx * batch_size;
            let batch_num = batch_idx + 1;
            log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total,
            );

            let batch_records = self
                .process_batch(batch, batch_start, semaphore.clone())
                .await?;

            let success = batch_records.iter().filter(|r| r.is_success()).count();
            log_batch_complete(batch_num, success, batch_records.len());
            records.extend(batch_records);
        }

        Ok(records)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch: &[CaptchaFile],
        batch_start: usize,
        semaphore: Arc<Semaphore>,
    ) -> Result<Vec<SolveRecord>> {
        let mut handles = Vec::with_capacity(batch.len());

        for (idx, file) in batch.iter().enumerate() {
            let permit = semaphore.clone().acquire_owned().await?;
            let solver = self.solver.clone();
            let ctx = SolveCtx::new(file.name.clone(), batch_start + idx + 1);
            let markup = file.markup.clone();

            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let result = solver.solve_with_ctx(&markup, &ctx);
                (ctx, result)
            }));
        }

        let mut records = Vec::with_capacity(handles.len());
        for (file, joined) in batch.iter().zip(join_all(handles).await) {
            let record = match joined {
                Ok((_, Ok(outcome))) => SolveRecord {
                    file: file.name.clone(),
                    min_confidence: outcome.min_confidence(),
                    low_confidence_chars: outcome.low_confidence_count(),
                    text: Some(outcome.text),
                    error: None,
                    refetch: false,
                },
                Ok((ctx, Err(e))) => {
                    error!("{} ❌ 识别失败: {}", ctx, e);
                    SolveRecord {
                        file: file.name.clone(),
                        text: None,
                        min_confidence: None,
                        low_confidence_chars: 0,
                        refetch: e.should_refetch(),
                        error: Some(e.to_string()),
                    }
                }
                Err(e) => {
                    error!("[验证码 {}] 任务执行失败: {}", file.name, e);
                    SolveRecord {
                        file: file.name.clone(),
                        text: None,
                        min_confidence: None,
                        low_confidence_chars: 0,
                        refetch: false,
                        error: Some(e.to_string()),
                    }
                }
            };
            records.push(record);
        }

        Ok(records)
    }
}

/// 把识别记录写成 JSON 报告
fn write_report(path: &str, records: &[SolveRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json).with_context(|| format!("无法写入报告文件: {}", path))?;
    Ok(())
}
