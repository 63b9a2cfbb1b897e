// ==========================================
// 啤酒库存对账系统 - 命令行入口
// ==========================================
// 用法:
//   beer-stock-manager --stock stock.xlsx [--suppliers suppliers.csv]
//                      [--out-dir out] [--dry-run true|false]
//                      [--locale uk|en] [--json-logs]
// 退出码: 0 成功 / 1 处理失败
// ==========================================

use anyhow::Context;
use beer_stock_manager::config::{AppConfig, ConfigOverrides};
use beer_stock_manager::delivery::OrderPipeline;
use beer_stock_manager::{logging, APP_NAME, VERSION};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "beer-stock-manager", version, about = "库存表 → 采购订单 CSV + Telegram 通知")]
struct Cli {
    /// 库存表路径（.xlsx/.xls/.ods/.csv）
    #[arg(long)]
    stock: PathBuf,

    /// 供应商目录路径（.csv 或 .xlsx）
    #[arg(long, default_value = "suppliers.csv")]
    suppliers: PathBuf,

    /// 输出目录（覆盖 OUT_DIR）
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// 试运行: 只写日志不发通知（覆盖 DRY_RUN）
    #[arg(long)]
    dry_run: Option<bool>,

    /// 摘要/表头语言（覆盖 LOCALE）
    #[arg(long)]
    locale: Option<String>,

    /// 输出 JSON 格式日志
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", APP_NAME, VERSION);
    tracing::info!("==================================================");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("运行失败: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load()
        .context("配置加载失败")?
        .with_overrides(ConfigOverrides {
            out_dir: cli.out_dir,
            dry_run: cli.dry_run,
            locale: cli.locale,
        })
        .context("命令行参数无效")?;

    tracing::info!(
        out_dir = %config.out_dir.display(),
        dry_run = config.dry_run,
        locale = %config.locale,
        "配置已加载"
    );

    let pipeline = OrderPipeline::from_config(config).context("通知通道初始化失败")?;
    let outcome = pipeline.run(&cli.stock, &cli.suppliers).await?;

    for path in outcome
        .files
        .order_files
        .iter()
        .chain(outcome.files.missing_suppliers.iter())
        .chain(outcome.files.report.iter())
    {
        tracing::info!("[LOCAL SAVE] {}", path.display());
    }
    Ok(())
}
