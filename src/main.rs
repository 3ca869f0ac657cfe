use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use spacetraveling::cli;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统，默认 info，可用 RUST_LOG 调整
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // 解析命令行参数
    let cli = cli::Cli::parse();

    println!("{} {}", "spacetraveling".bright_magenta(), env!("CARGO_PKG_VERSION").bright_green());
    println!("{}", "A blog renderer backed by a headless CMS".bright_white());
    println!();

    // 执行命令
    if let Err(e) = cli::execute(cli).await {
        error!("Error: {}", e);

        // 打印错误链
        let mut source = e.source();
        while let Some(e) = source {
            error!("Caused by: {}", e);
            source = e.source();
        }

        std::process::exit(1);
    }

    Ok(())
}
