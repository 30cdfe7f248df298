//! CLI 通用输出格式化模块
//!
//! 提供 table/json/yaml 三种输出格式的通用实现

use anyhow::Result;
use colored::Colorize;
use isard_vdiplatform::{DeploymentState, DesktopState, Group};
use serde::Serialize;

/// 可输出为表格行的数据 trait
pub trait TableRow {
    /// 返回表格列标题
    fn headers() -> Vec<&'static str>;

    /// 返回该项的表格行数据
    fn row(&self) -> Vec<String>;
}

/// 表格格式输出
pub fn print_table<T: TableRow>(items: &[T]) {
    let headers = T::headers();

    let header_line: String = headers
        .iter()
        .map(|h| format!("{:<20}", h))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", header_line.bold());
    println!("{}", "-".repeat(header_line.len()));

    for item in items {
        let row_line: String = item
            .row()
            .iter()
            .map(|c| format!("{:<20}", c))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{}", row_line);
    }
}

/// JSON 格式输出
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// YAML 格式输出
pub fn print_yaml<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    print!("{}", serde_yaml::to_string(value)?);
    Ok(())
}

/// 根据格式参数选择输出方式
pub fn output_formatted<T: TableRow + Serialize>(items: &[T], format: &str) -> Result<()> {
    match format {
        "json" => print_json(items)?,
        "yaml" => print_yaml(items)?,
        _ => print_table(items),
    }
    Ok(())
}

/// 输出没有表格形式的单个文档（table 格式下按 JSON 输出）
pub fn output_document<T: Serialize + ?Sized>(value: &T, format: &str) -> Result<()> {
    match format {
        "yaml" => print_yaml(value),
        _ => print_json(value),
    }
}

fn memory_cell(memory: Option<f64>) -> String {
    memory.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string())
}

impl TableRow for Group {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "名称", "分类", "描述"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.parent_category.clone(),
            self.description.clone(),
        ]
    }
}

impl TableRow for DeploymentState {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "名称", "模板", "可见", "桌面 (运行/总数)"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.template_id.clone(),
            self.visible.to_string(),
            format!("{}/{}", self.started_desktops, self.total_desktops),
        ]
    }
}

impl TableRow for DesktopState {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "名称", "模板", "vCPU", "内存"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.template_id.clone(),
            self.vcpus.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()),
            memory_cell(self.memory),
        ]
    }
}
