//! 用户组模型

use serde::{Deserialize, Serialize};

use super::{null_or_default, JsonMap};

/// 用户组 (`GET /api/v3/admin/groups`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, deserialize_with = "null_or_default")]
    pub id: String,

    #[serde(default, deserialize_with = "null_or_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_or_default")]
    pub description: String,

    /// 所属分类 ID
    #[serde(default, deserialize_with = "null_or_default")]
    pub parent_category: String,

    #[serde(default, deserialize_with = "null_or_default")]
    pub linked_groups: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<JsonMap>,
}

/// 用户组过滤条件
///
/// 空字符串与 `None` 等价，表示不过滤。
#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
    /// 名称子串（不区分大小写）
    pub name: Option<String>,

    /// 分类 ID（精确匹配）
    pub category_id: Option<String>,
}

impl GroupFilter {
    pub fn new(name: Option<String>, category_id: Option<String>) -> Self {
        Self {
            name: name.filter(|s| !s.is_empty()),
            category_id: category_id.filter(|s| !s.is_empty()),
        }
    }

    /// 判断用户组是否满足过滤条件
    pub fn matches(&self, group: &Group) -> bool {
        if let Some(name) = &self.name {
            if !group.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &self.category_id {
            if &group.parent_category != category {
                return false;
            }
        }
        true
    }

    /// 过滤用户组列表
    pub fn apply(&self, groups: Vec<Group>) -> Vec<Group> {
        groups.into_iter().filter(|g| self.matches(g)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, category: &str) -> Group {
        Group {
            id: format!("{}-id", name),
            name: name.to_string(),
            parent_category: category.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_group_null_fields() {
        let g: Group = serde_json::from_value(serde_json::json!({
            "id": "g1",
            "name": "Students",
            "description": null,
            "parent_category": null,
            "linked_groups": null,
            "enrollment": null
        }))
        .unwrap();

        assert_eq!(g.description, "");
        assert_eq!(g.parent_category, "");
        assert!(g.linked_groups.is_empty());
        assert!(g.enrollment.is_none());
    }

    #[test]
    fn test_filter_name_case_insensitive() {
        let filter = GroupFilter::new(Some("STUD".into()), None);
        assert!(filter.matches(&group("Students-2024", "default")));
        assert!(!filter.matches(&group("Teachers", "default")));
    }

    #[test]
    fn test_filter_category_exact() {
        let filter = GroupFilter::new(None, Some("cat-a".into()));
        let groups = vec![group("a", "cat-a"), group("b", "cat-ab"), group("c", "cat-a")];
        let result = filter.apply(groups);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|g| g.parent_category == "cat-a"));
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = GroupFilter::new(Some(String::new()), Some(String::new()));
        assert!(filter.matches(&group("anything", "any")));
    }
}
