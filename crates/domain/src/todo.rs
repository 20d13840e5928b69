use crate::assignee::{Assignee, AssigneeId};
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};

/// ToDo ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// 文字列から ToDo ID を作成
    pub fn from_string(id: String) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidTodoId(
                "Todo ID cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ToDo（担当者は常に 1 人）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub message: String,
    pub assignee: Assignee,
}

impl Todo {
    /// メッセージの検証
    pub fn validate_message(message: &str) -> Result<(), DomainError> {
        if message.trim().is_empty() {
            return Err(DomainError::Validation(
                "Message cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// 担当者名による並び順
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// `desc` フラグから並び順を決定（未指定は昇順）
    pub fn from_desc_flag(desc: Option<bool>) -> Self {
        if desc.unwrap_or(false) {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}

/// ToDo 一覧の検索条件
///
/// `offset` 件読み飛ばしたうえで最大 `first` 件を返す。`first` に上限は設けない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoQuery {
    pub assignee: Option<AssigneeId>,
    pub first: u64,
    pub offset: u64,
    pub order: SortOrder,
}

impl TodoQuery {
    pub fn new(
        assignee: Option<AssigneeId>,
        first: i64,
        offset: i64,
        order: SortOrder,
    ) -> Result<Self, DomainError> {
        let first = u64::try_from(first)
            .map_err(|_| DomainError::Validation("first must not be negative".to_string()))?;
        let offset = u64::try_from(offset)
            .map_err(|_| DomainError::Validation("offset must not be negative".to_string()))?;

        Ok(Self {
            assignee,
            first,
            offset,
            order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_from_desc_flag() {
        assert_eq!(SortOrder::from_desc_flag(None), SortOrder::Ascending);
        assert_eq!(SortOrder::from_desc_flag(Some(false)), SortOrder::Ascending);
        assert_eq!(SortOrder::from_desc_flag(Some(true)), SortOrder::Descending);
    }

    #[test]
    fn test_todo_query_rejects_negative_paging() {
        // Arrange & Act
        let negative_first = TodoQuery::new(None, -1, 0, SortOrder::Ascending);
        let negative_offset = TodoQuery::new(None, 10, -5, SortOrder::Ascending);
        let valid = TodoQuery::new(None, 10, 2, SortOrder::Descending).unwrap();

        // Assert
        assert!(matches!(negative_first, Err(DomainError::Validation(_))));
        assert!(matches!(negative_offset, Err(DomainError::Validation(_))));
        assert_eq!(valid.first, 10);
        assert_eq!(valid.offset, 2);
        assert_eq!(valid.order, SortOrder::Descending);
    }

    #[test]
    fn test_validate_message() {
        assert!(Todo::validate_message("Foo").is_ok());
        assert!(Todo::validate_message("  ").is_err());
    }

    #[test]
    fn test_todo_id_rejects_empty() {
        assert!(TodoId::from_string(String::new()).is_err());
        assert_eq!(TodoId::from_string("1".to_string()).unwrap().to_string(), "1");
    }
}
