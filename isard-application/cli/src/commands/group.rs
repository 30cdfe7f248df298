//! 用户组查询命令

use anyhow::{Context, Result};
use colored::Colorize;
use isard_vdiplatform::GroupFilter;

use crate::commands::common::create_client;
use crate::commands::output::output_formatted;
use crate::config::CliConfig;
use crate::GroupAction;

pub async fn handle(action: GroupAction, config: &CliConfig, format: &str) -> Result<()> {
    match action {
        GroupAction::List {
            name_filter,
            category_id,
        } => list(config, GroupFilter::new(name_filter, category_id), format).await?,
    }
    Ok(())
}

async fn list(config: &CliConfig, filter: GroupFilter, format: &str) -> Result<()> {
    let client = create_client(config).await?;
    let groups = client
        .group()
        .list_filtered(&filter)
        .await
        .context("获取用户组列表失败")?;

    if groups.is_empty() && format == "table" {
        println!("{}", "没有匹配的用户组".yellow());
        return Ok(());
    }

    output_formatted(&groups, format)
}
