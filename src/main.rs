use std::process::ExitCode;

use aso_keywords::{logger, App, AppError, Cli, Config};
use clap::Parser;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // 参数缺失时 clap 直接打印用法并以非零状态退出
    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    let verbose = cli.verbose || config.as_ref().is_ok_and(|c| c.verbose_logging);
    logger::init(verbose);

    // 校验参数（不发起任何网络请求）
    let app = match config
        .map_err(AppError::from)
        .and_then(|config| App::initialize(config, cli))
    {
        Ok(app) => app,
        Err(e) => {
            error!("❌ {}", e);
            return ExitCode::from(2);
        }
    };

    // 运行应用
    if let Err(e) = app.run().await {
        error!("❌ {:#}", e);
        let usage = e
            .downcast_ref::<AppError>()
            .is_some_and(AppError::is_usage_error);
        return ExitCode::from(if usage { 2 } else { 1 });
    }

    ExitCode::SUCCESS
}
