use crate::errors::DomainError;
use serde::{Deserialize, Serialize};

/// 担当者ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssigneeId(String);

impl AssigneeId {
    /// 文字列から担当者IDを作成
    pub fn from_string(id: String) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidAssigneeId(
                "Assignee ID cannot be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssigneeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 担当者
///
/// `password_hash` は PHC 形式のハッシュ文字列。平文のパスワードは保持しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    pub id: AssigneeId,
    pub name: String,
    pub password_hash: String,
}

impl Assignee {
    /// 担当者名の検証
    pub fn validate_name(name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation(
                "Assignee name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// パスワードの検証（空文字のみ拒否）
    pub fn validate_password(password: &str) -> Result<(), DomainError> {
        if password.is_empty() {
            return Err(DomainError::Validation(
                "Password cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignee_id_rejects_blank() {
        assert!(AssigneeId::from_string("   ".to_string()).is_err());
        assert_eq!(
            AssigneeId::from_string("42".to_string()).unwrap().as_str(),
            "42"
        );
    }

    #[test]
    fn test_validate_name_and_password() {
        assert!(Assignee::validate_name("Hans").is_ok());
        assert_eq!(
            Assignee::validate_name(""),
            Err(DomainError::Validation(
                "Assignee name cannot be empty".to_string()
            ))
        );
        assert!(Assignee::validate_password("1234").is_ok());
        assert!(Assignee::validate_password("").is_err());
    }
}
