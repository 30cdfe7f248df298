//! Isard VDI CLI 应用

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "isard")]
#[command(about = "Isard VDI - 部署与持久桌面管理", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径 (默认 ~/.config/isard/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// 输出格式 (table/json/yaml)
    #[arg(short, long, default_value = "table", global = true)]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 部署管理
    Deployment {
        #[command(subcommand)]
        action: DeploymentAction,
    },

    /// 持久桌面管理
    Desktop {
        #[command(subcommand)]
        action: DesktopAction,
    },

    /// 模板查询
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// 用户组查询
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },
}

#[derive(Subcommand)]
enum DeploymentAction {
    /// 解析部署请求体（只读取模板，不创建）
    Resolve {
        /// 部署参数文件 (YAML/JSON/TOML)
        spec: String,
    },
    /// 创建部署
    Create {
        /// 部署参数文件 (YAML/JSON/TOML)
        spec: String,
    },
    /// 查看部署
    Get { id: String },
    /// 查看部署详细信息 (原始 JSON)
    Info { id: String },
    /// 更新部署
    Update {
        /// 部署 ID
        id: String,
        /// 更新内容文件 (YAML/JSON/TOML)
        #[arg(long)]
        file: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        desktop_name: Option<String>,
        #[arg(long)]
        visible: Option<bool>,
    },
    /// 删除部署
    Delete {
        id: String,
        /// 永久删除（不进入回收站）
        #[arg(long)]
        permanent: bool,
    },
    /// 启动部署内所有桌面
    Start { id: String },
    /// 停止部署内所有桌面
    Stop { id: String },
}

#[derive(Subcommand)]
enum DesktopAction {
    /// 创建持久桌面
    Create {
        /// 桌面参数文件 (YAML/JSON/TOML)
        spec: String,
    },
    /// 查看持久桌面
    Get { id: String },
    /// 删除持久桌面
    Delete { id: String },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// 查看模板
    Show { id: String },
}

#[derive(Subcommand)]
enum GroupAction {
    /// 列出用户组
    List {
        /// 按名称过滤（子串，不区分大小写）
        #[arg(long)]
        name_filter: Option<String>,
        /// 按分类 ID 过滤
        #[arg(long)]
        category_id: Option<String>,
    },
}

fn init_logging(log_level: &str) {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
        return;
    }

    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);
    debug!("Isard CLI 启动");

    let config = CliConfig::load(cli.config.as_deref())?;
    let format = cli.format.as_str();

    match cli.command {
        Commands::Deployment { action } => {
            commands::deployment::handle(action, &config, format).await?
        }
        Commands::Desktop { action } => commands::desktop::handle(action, &config, format).await?,
        Commands::Template { action } => {
            commands::template::handle(action, &config, format).await?
        }
        Commands::Group { action } => commands::group::handle(action, &config, format).await?,
    }

    Ok(())
}
