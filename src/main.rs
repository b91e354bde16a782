//! HUD Console CLI
//!
//! 单操作员状态控制台：告警模式切换、诊断扫描、后台心跳与事件日志

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hud_console::{
    cli::{
        handle_info, handle_logs, handle_scan, handle_setup, prepare_log_dirs, run_reported,
        ConsoleArgs, InfoArgs, LogsArgs, ScanArgs, SetupArgs,
    },
    config::config_dir,
    ErrorLog, Session,
};
use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "hud")]
#[command(about = "HUD Console - 状态监控、告警模式与诊断扫描")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[command(flatten)]
    console: ConsoleArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动 TUI 控制台（默认）
    Tui {
        /// 界面刷新间隔（毫秒）
        #[arg(long, default_value = "250")]
        refresh_interval: u64,
    },
    /// 无界面运行一次诊断扫描
    Scan(ScanArgs),
    /// 显示系统信息
    Info(InfoArgs),
    /// 查看最近的事件日志
    Logs(LogsArgs),
    /// 交互式配置向导
    Setup(SetupArgs),
}

/// 初始化 tracing
///
/// TUI 占用终端时写入 ~/.config/hud-console/hud.log，其余命令写 stderr。
/// 通过 RUST_LOG 控制级别，默认 info。
fn init_tracing(to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hud_console=info,hud=info"));

    if to_file {
        let dir = config_dir();
        fs::create_dir_all(&dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("hud.log"))
            .context("Failed to open hud.log")?;
        fmt()
            .with_writer(Mutex::new(file))
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(false)
            .with_thread_ids(false)
            .init();
    } else {
        fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .init();
    }
    Ok(())
}

async fn run_tui(console: &ConsoleArgs, refresh_interval: u64) -> Result<()> {
    use hud_console::tui::{init_terminal, restore_terminal, run, App, FeedPresentation};

    let config = console.resolve()?;
    prepare_log_dirs(&config)?;

    let presentation = FeedPresentation::new(config.feed_capacity);
    let feed = presentation.feed();
    let session = Session::start(config, Arc::new(presentation));

    let mut terminal = init_terminal().context("Error starting UI")?;
    let mut app = App::new(session, feed);

    // 备用屏幕期间 panic 信息写入 hud.log，不直接打到终端
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|panic| error!(%panic, "Task panicked")));

    let result = run(&mut terminal, &mut app, refresh_interval);

    let restored = restore_terminal(&mut terminal);
    std::panic::set_hook(default_hook);
    restored?;
    app.session.shutdown().await;

    result
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Tui {
        refresh_interval: 250,
    }) {
        Commands::Tui { refresh_interval } => run_tui(&cli.console, refresh_interval).await?,
        Commands::Scan(args) => {
            let outcome = handle_scan(args, &cli.console).await?;
            info!(outcome = ?outcome, "Scan finished");
        }
        Commands::Info(args) => handle_info(args, &cli.console)?,
        Commands::Logs(args) => handle_logs(args, &cli.console)?,
        Commands::Setup(args) => handle_setup(args, &cli.console)?,
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let tui_mode = matches!(cli.command, None | Some(Commands::Tui { .. }));
    if let Err(e) = init_tracing(tui_mode) {
        eprintln!("Failed to initialise logging: {e:#}");
    }

    let error_log = ErrorLog::new(cli.console.error_log_path());
    let code = run_reported(dispatch(cli), &error_log).await;
    if code != 0 {
        std::process::exit(code);
    }
}
