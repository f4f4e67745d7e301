//! Category Model

use serde::{Deserialize, Deserializer, Serialize};

/// Category entity (tree via `parent_id`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
}

/// Update category payload
///
/// `parentId` absent keeps the parent, `null` moves the category to the root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub parent_id: Option<Option<i64>>,
}

/// Distinguish an explicit `null` (`Some(None)`) from a missing field (`None`)
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_parent_absent_null_or_set() {
        let keep: CategoryUpdate = serde_json::from_str(r#"{"name":"Lamps"}"#).unwrap();
        assert_eq!(keep.parent_id, None);

        let root: CategoryUpdate = serde_json::from_str(r#"{"parentId":null}"#).unwrap();
        assert_eq!(root.parent_id, Some(None));

        let moved: CategoryUpdate = serde_json::from_str(r#"{"parentId":4}"#).unwrap();
        assert_eq!(moved.parent_id, Some(Some(4)));
    }
}
