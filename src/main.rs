use anyhow::Result;
use clap::{Parser, Subcommand};

use video_privater::{logger, App, ChromiumDriver, Config};

/// 批量把自己主页的视频设为仅自己可见
#[derive(Parser)]
#[command(name = "video_privater", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 收集主页视频并逐条改为 "Only you"
    Run {
        /// 主页用户名（不带 @）
        username: String,

        /// 最多处理的视频数量
        #[arg(default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..))]
        limit: u32,

        /// 放慢节奏，使用更接近人工操作的延迟
        #[arg(long)]
        slow: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 参数缺失或不合法时打印用法并以退出码 1 结束
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    match cli.command {
        Commands::Run {
            username,
            limit,
            slow,
        } => {
            // 配置构建一次，显式传给各组件
            let config = Config::new(!slow);
            let driver = Box::new(ChromiumDriver::new());

            let mut app = App::initialize(config, driver).await?;
            app.run(&username, limit as usize).await?;
        }
    }

    Ok(())
}
