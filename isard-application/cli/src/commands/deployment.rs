//! 部署管理命令

use anyhow::{Context, Result};
use colored::Colorize;
use isard_vdiplatform::{DeploymentSpec, DeploymentState, DeploymentUpdate};

use crate::commands::common::{create_client, load_spec};
use crate::commands::output::{output_document, output_formatted};
use crate::config::CliConfig;
use crate::DeploymentAction;

pub async fn handle(action: DeploymentAction, config: &CliConfig, format: &str) -> Result<()> {
    match action {
        DeploymentAction::Resolve { spec } => resolve(config, &spec, format).await?,
        DeploymentAction::Create { spec } => create(config, &spec, format).await?,
        DeploymentAction::Get { id } => get(config, &id, format).await?,
        DeploymentAction::Info { id } => info(config, &id, format).await?,
        DeploymentAction::Update {
            id,
            file,
            name,
            description,
            desktop_name,
            visible,
        } => {
            let mut changes = match file {
                Some(path) => load_spec::<DeploymentUpdate>(&path)?,
                None => DeploymentUpdate::default(),
            };
            changes.name = name.or(changes.name);
            changes.description = description.or(changes.description);
            changes.desktop_name = desktop_name.or(changes.desktop_name);
            changes.visible = visible.or(changes.visible);

            update(config, &id, &changes).await?
        }
        DeploymentAction::Delete { id, permanent } => delete(config, &id, permanent).await?,
        DeploymentAction::Start { id } => start(config, &id).await?,
        DeploymentAction::Stop { id } => stop(config, &id).await?,
    }
    Ok(())
}

async fn resolve(config: &CliConfig, spec_path: &str, format: &str) -> Result<()> {
    let spec: DeploymentSpec = load_spec(spec_path)?;
    let client = create_client(config).await?;

    let payload = client
        .deployment()
        .resolve(&spec)
        .await
        .context("解析部署配置失败")?;

    output_document(&payload, format)
}

async fn create(config: &CliConfig, spec_path: &str, format: &str) -> Result<()> {
    let spec: DeploymentSpec = load_spec(spec_path)?;
    let client = create_client(config).await?;

    let state = DeploymentState::provision(&client, &spec)
        .await
        .with_context(|| format!("创建部署 {} 失败", spec.name))?;

    println!(
        "{} 部署 {} 创建成功 (ID: {})",
        "✓".green().bold(),
        state.name.cyan().bold(),
        state.id.yellow()
    );
    output_formatted(&[state], format)
}

async fn get(config: &CliConfig, id: &str, format: &str) -> Result<()> {
    let client = create_client(config).await?;

    let state = DeploymentState {
        id: id.to_string(),
        ..Default::default()
    };
    match state.refresh(&client).await.context("读取部署失败")? {
        Some(state) => output_formatted(&[state], format),
        None => {
            println!("{} 部署 {} 不存在", "✗".red().bold(), id);
            Ok(())
        }
    }
}

async fn info(config: &CliConfig, id: &str, format: &str) -> Result<()> {
    let client = create_client(config).await?;

    match client
        .deployment()
        .get_info(id)
        .await
        .context("读取部署详细信息失败")?
    {
        Some(info) => output_document(&info, format),
        None => {
            println!("{} 部署 {} 不存在", "✗".red().bold(), id);
            Ok(())
        }
    }
}

async fn update(config: &CliConfig, id: &str, update: &DeploymentUpdate) -> Result<()> {
    if update.is_empty() {
        anyhow::bail!("没有需要更新的字段");
    }

    let client = create_client(config).await?;
    client
        .deployment()
        .update(id, update)
        .await
        .with_context(|| format!("更新部署 {} 失败", id))?;

    println!("{} 部署 {} 已更新", "✓".green().bold(), id.cyan().bold());
    Ok(())
}

async fn delete(config: &CliConfig, id: &str, permanent: bool) -> Result<()> {
    let client = create_client(config).await?;
    client
        .deployment()
        .delete(id, permanent)
        .await
        .with_context(|| format!("删除部署 {} 失败", id))?;

    println!("{} 部署 {} 已删除", "✓".green().bold(), id.cyan().bold());
    Ok(())
}

async fn start(config: &CliConfig, id: &str) -> Result<()> {
    let client = create_client(config).await?;
    client
        .deployment()
        .start(id)
        .await
        .with_context(|| format!("启动部署 {} 失败", id))?;

    println!("{} 部署 {} 已启动", "✓".green().bold(), id.cyan().bold());
    Ok(())
}

async fn stop(config: &CliConfig, id: &str) -> Result<()> {
    let client = create_client(config).await?;
    client
        .deployment()
        .stop(id)
        .await
        .with_context(|| format!("停止部署 {} 失败", id))?;

    println!("{} 部署 {} 已停止", "✓".green().bold(), id.cyan().bold());
    Ok(())
}
