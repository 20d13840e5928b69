use async_graphql::{SimpleObject, ID};

/// ToDo（担当者と結合済み）
#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct Todo {
    pub id: ID,
    pub message: String,
    pub assignee: Assignee,
}

/// 担当者。パスワード（ハッシュ）は公開しない
#[derive(Debug, Clone, PartialEq, SimpleObject)]
pub struct Assignee {
    pub id: ID,
    pub name: String,
}

impl From<domain::Todo> for Todo {
    fn from(todo: domain::Todo) -> Self {
        Self {
            id: ID(todo.id.to_string()),
            message: todo.message,
            assignee: todo.assignee.into(),
        }
    }
}

impl From<domain::Assignee> for Assignee {
    fn from(assignee: domain::Assignee) -> Self {
        Self {
            id: ID(assignee.id.to_string()),
            name: assignee.name,
        }
    }
}
