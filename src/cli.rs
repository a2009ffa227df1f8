//! 命令行参数

use clap::{Parser, Subcommand};

use crate::config::BatchSize;
use crate::error::{ConfigError, ValidationError};
use crate::models::Platform;

/// App Store 关键词研究工具
#[derive(Debug, Parser)]
#[command(name = "aso-keywords", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 应用商店平台 (app-store | google-play)
    #[arg(long, global = true, default_value = "app-store", value_parser = parse_platform)]
    pub platform: Platform,

    /// 以 JSON 格式输出报告
    #[arg(long, global = true)]
    pub json: bool,

    /// 关闭批次间等待
    #[arg(long, global = true)]
    pub no_delay: bool,

    /// 显示调试日志
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 分析单个应用：生成关键词并全部评分
    App {
        /// 应用ID（正整数）
        app_id: String,
    },
    /// 分析逗号分隔的关键词列表
    Search {
        /// 例如 "photo editor, collage maker"
        keywords: String,
        /// 每批并发数 [1, 20]，默认 3
        #[arg(allow_negative_numbers = true)]
        concurrency: Option<String>,
    },
    /// 分析单个应用：只随机评分其中几个生成关键词
    Sample {
        /// 应用ID（正整数）
        app_id: String,
    },
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    Platform::parse(s).ok_or_else(|| format!("未知平台 '{}'，可选 app-store / google-play", s))
}

/// 解析应用ID，必须是正整数
pub fn parse_app_id(raw: &str) -> Result<u64, ValidationError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidAppId {
            value: raw.to_string(),
        }),
    }
}

/// 解析并发数参数，未提供时使用默认值
pub fn parse_concurrency(raw: Option<&str>, default: usize) -> Result<BatchSize, ConfigError> {
    match raw {
        Some(raw) => {
            let value = raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidConcurrency {
                    value: raw.to_string(),
                })?;
            BatchSize::new(value)
        }
        None => BatchSize::from_usize(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_app_id() {
        assert_eq!(parse_app_id(" 284882215 ").unwrap(), 284882215);
        assert!(parse_app_id("0").is_err());
        assert!(parse_app_id("-5").is_err());
        assert!(parse_app_id("facebook").is_err());
        assert!(parse_app_id("").is_err());
    }

    #[test]
    fn test_parse_concurrency() {
        assert_eq!(parse_concurrency(None, 3).unwrap().get(), 3);
        assert_eq!(parse_concurrency(Some("20"), 3).unwrap().get(), 20);
        assert!(matches!(
            parse_concurrency(Some("0"), 3),
            Err(ConfigError::ConcurrencyOutOfRange { value: 0, .. })
        ));
        assert!(matches!(
            parse_concurrency(Some("25"), 3),
            Err(ConfigError::ConcurrencyOutOfRange { value: 25, .. })
        ));
        assert!(matches!(
            parse_concurrency(None, usize::MAX),
            Err(ConfigError::ConcurrencyOutOfRange { value, .. }) if value > 0
        ));
        assert!(matches!(
            parse_concurrency(Some("many"), 3),
            Err(ConfigError::InvalidConcurrency { .. })
        ));
    }

    #[test]
    fn test_cli_parses_search_mode() {
        let cli = Cli::try_parse_from([
            "aso-keywords",
            "search",
            "budget, savings",
            "5",
            "--no-delay",
        ])
        .unwrap();
        assert!(cli.no_delay);
        assert_eq!(cli.platform, Platform::AppStore);
        match cli.command {
            Command::Search {
                keywords,
                concurrency,
            } => {
                assert_eq!(keywords, "budget, savings");
                assert_eq!(concurrency.as_deref(), Some("5"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_requires_arguments() {
        assert!(Cli::try_parse_from(["aso-keywords"]).is_err());
        assert!(Cli::try_parse_from(["aso-keywords", "app"]).is_err());
        assert!(Cli::try_parse_from(["aso-keywords", "search", "x", "--platform", "nokia"]).is_err());
    }
}
