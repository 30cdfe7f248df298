//! 持久桌面管理命令

use anyhow::{Context, Result};
use colored::Colorize;
use isard_vdiplatform::{DesktopSpec, DesktopState};

use crate::commands::common::{create_client, load_spec};
use crate::commands::output::output_formatted;
use crate::config::CliConfig;
use crate::DesktopAction;

pub async fn handle(action: DesktopAction, config: &CliConfig, format: &str) -> Result<()> {
    match action {
        DesktopAction::Create { spec } => create(config, &spec, format).await?,
        DesktopAction::Get { id } => get(config, &id, format).await?,
        DesktopAction::Delete { id } => delete(config, &id).await?,
    }
    Ok(())
}

async fn create(config: &CliConfig, spec_path: &str, format: &str) -> Result<()> {
    let spec: DesktopSpec = load_spec(spec_path)?;
    let client = create_client(config).await?;

    let state = DesktopState::provision(&client, &spec)
        .await
        .with_context(|| format!("创建持久桌面 {} 失败", spec.name))?;

    println!(
        "{} 持久桌面 {} 创建成功 (ID: {})",
        "✓".green().bold(),
        state.name.cyan().bold(),
        state.id.yellow()
    );
    output_formatted(&[state], format)
}

async fn get(config: &CliConfig, id: &str, format: &str) -> Result<()> {
    let client = create_client(config).await?;

    let state = DesktopState {
        id: id.to_string(),
        ..Default::default()
    };
    match state.refresh(&client).await.context("读取持久桌面失败")? {
        Some(state) => output_formatted(&[state], format),
        None => {
            println!("{} 持久桌面 {} 不存在", "✗".red().bold(), id);
            Ok(())
        }
    }
}

async fn delete(config: &CliConfig, id: &str) -> Result<()> {
    let client = create_client(config).await?;
    client
        .desktop()
        .delete(id)
        .await
        .with_context(|| format!("删除持久桌面 {} 失败", id))?;

    println!("{} 持久桌面 {} 已删除", "✓".green().bold(), id.cyan().bold());
    Ok(())
}
