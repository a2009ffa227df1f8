//! 应用入口：根据命令行模式构造协作方并运行

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{parse_app_id, parse_concurrency, Cli, Command};
use crate::clients::{AppStoreClient, AsoClient};
use crate::config::{BatchSize, Config};
use crate::error::{AppError, ValidationError};
use crate::models::{AppMetadata, Platform};
use crate::orchestrator::{AnalysisRun, AppAnalysis, AppPipeline, BatchProcessor, Pacing};
use crate::services::LlmService;
use crate::utils::logging;
use crate::workflow::{normalize_keywords, render_json, render_text};

/// 经过校验的运行模式
#[derive(Debug)]
enum Mode {
    AnalyzeApp {
        app_id: u64,
        sampled: bool,
        batch_size: BatchSize,
    },
    Search { keywords: Vec<String>, batch_size: BatchSize },
}

/// 应用主结构
pub struct App {
    config: Config,
    mode: Mode,
    platform: Platform,
    json_output: bool,
}

impl App {
    /// 校验命令行参数，不发起任何网络请求
    pub fn initialize(config: Config, cli: Cli) -> Result<Self, AppError> {
        let mode = match cli.command {
            Command::App { app_id } => Mode::AnalyzeApp {
                app_id: parse_app_id(&app_id)?,
                sampled: false,
                batch_size: BatchSize::from_usize(config.default_concurrency)?,
            },
            Command::Sample { app_id } => Mode::AnalyzeApp {
                app_id: parse_app_id(&app_id)?,
                sampled: true,
                batch_size: BatchSize::from_usize(config.default_concurrency)?,
            },
            Command::Search {
                keywords,
                concurrency,
            } => {
                let keywords = normalize_keywords(&keywords);
                if keywords.is_empty() {
                    return Err(ValidationError::EmptyKeywordList.into());
                }
                let batch_size =
                    parse_concurrency(concurrency.as_deref(), config.default_concurrency)?;
                Mode::Search {
                    keywords,
                    batch_size,
                }
            }
        };

        let mut config = config;
        if cli.no_delay {
            config.batch_delay_ms = 0;
        }

        Ok(Self {
            config,
            mode,
            platform: cli.platform,
            json_output: cli.json,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        match &self.mode {
            Mode::Search {
                keywords,
                batch_size,
            } => {
                logging::log_startup("关键词批量分析", batch_size.get());
                let run = self.search(keywords, *batch_size).await?;
                self.print_report(&run, None, &[])?;
            }
            Mode::AnalyzeApp {
                app_id,
                sampled,
                batch_size,
            } => {
                let mode = if *sampled {
                    "应用关键词抽样分析"
                } else {
                    "应用关键词分析"
                };
                logging::log_startup(mode, batch_size.get());

                let analysis = self.analyze_app(*app_id, *sampled, *batch_size).await?;
                self.print_report(&analysis.run, Some(&analysis.app), &analysis.similar_apps)?;
            }
        }
        Ok(())
    }

    async fn search(&self, keywords: &[String], batch_size: BatchSize) -> Result<AnalysisRun> {
        let scorer = Arc::new(AsoClient::new(&self.config)?);
        let mut processor = BatchProcessor::new(scorer, self.platform, batch_size)
            .with_pacing(Pacing::fixed(self.config.batch_delay()));
        if let Some(timeout) = self.config.keyword_timeout() {
            processor = processor.with_keyword_timeout(timeout);
        }

        Ok(processor.run(keywords).await)
    }

    async fn analyze_app(
        &self,
        app_id: u64,
        sampled: bool,
        batch_size: BatchSize,
    ) -> Result<AppAnalysis> {
        // 每次运行构造一次协作方
        let pipeline = AppPipeline::new(
            Arc::new(AppStoreClient::new(&self.config)?),
            Arc::new(LlmService::new(&self.config)),
            Arc::new(AsoClient::new(&self.config)?),
        )
        .configured(&self.config)
        .with_platform(self.platform)
        .with_batch_size(batch_size);

        let analysis = if sampled {
            let mut rng = rand::rng();
            pipeline
                .analyze_app_sampled(app_id, self.config.sample_size, &mut rng)
                .await
        } else {
            pipeline.analyze_app(app_id).await
        };

        analysis.with_context(|| format!("应用 {} 分析失败", app_id))
    }

    fn print_report(
        &self,
        run: &AnalysisRun,
        app: Option<&AppMetadata>,
        similar_apps: &[AppMetadata],
    ) -> Result<()> {
        if self.json_output {
            println!("{}", render_json(run, app, similar_apps)?);
        } else {
            println!("{}", render_text(run, app));
        }
        info!("✓ 报告输出完成");
        Ok(())
    }
}
