use domain::{Assignee, AssigneeId, Todo, TodoId, TodoQuery};
use serde::Deserialize;

use crate::executor::SessionExecutor;
use crate::graph::{Row, StoreError};
use crate::statements;

/// ストア上の Todo ノードのプロパティ
#[derive(Debug, Deserialize)]
struct TodoRecord {
    id: String,
    message: String,
}

/// ストア上の Assignee ノードのプロパティ
#[derive(Debug, Deserialize)]
struct AssigneeRecord {
    id: String,
    name: String,
    password: String,
}

impl TryFrom<AssigneeRecord> for Assignee {
    type Error = StoreError;

    fn try_from(record: AssigneeRecord) -> Result<Self, Self::Error> {
        Ok(Assignee {
            id: AssigneeId::from_string(record.id)
                .map_err(|e| StoreError::Decode(e.to_string()))?,
            name: record.name,
            password_hash: record.password,
        })
    }
}

fn assignee_from_row(row: &Row) -> Result<Assignee, StoreError> {
    row.get("p")?.decode::<AssigneeRecord>()?.try_into()
}

fn todo_from_row(row: &Row) -> Result<Todo, StoreError> {
    let record: TodoRecord = row.get("t")?.decode()?;
    Ok(Todo {
        id: TodoId::from_string(record.id).map_err(|e| StoreError::Decode(e.to_string()))?,
        message: record.message,
        assignee: assignee_from_row(row)?,
    })
}

fn first_todo(rows: Vec<Row>) -> Result<Option<Todo>, StoreError> {
    rows.first().map(todo_from_row).transpose()
}

#[derive(Debug, Clone)]
pub struct TodoRepository {
    executor: SessionExecutor,
}

impl TodoRepository {
    pub fn new(executor: SessionExecutor) -> Self {
        Self { executor }
    }

    pub async fn find(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let rows = self.executor.run(statements::find_todo(id)).await?;
        first_todo(rows)
    }

    pub async fn list(&self, query: &TodoQuery) -> Result<Vec<Todo>, StoreError> {
        let rows = self.executor.run(statements::list_todos(query)).await?;
        rows.iter().map(todo_from_row).collect()
    }

    /// 担当者と結び付けて作成する。担当者が存在しなければ `None`
    pub async fn create(
        &self,
        id: &str,
        message: &str,
        assignee: &AssigneeId,
    ) -> Result<Option<Todo>, StoreError> {
        let rows = self
            .executor
            .run(statements::create_todo(id, message, assignee))
            .await?;
        first_todo(rows)
    }

    pub async fn update(
        &self,
        id: &TodoId,
        message: Option<&str>,
    ) -> Result<Option<Todo>, StoreError> {
        let rows = self
            .executor
            .run(statements::update_todo(id, message))
            .await?;
        first_todo(rows)
    }

    /// 削除して削除前の状態を返す
    pub async fn delete(&self, id: &TodoId) -> Result<Option<Todo>, StoreError> {
        let rows = self.executor.run(statements::delete_todo(id)).await?;
        first_todo(rows)
    }
}

#[derive(Debug, Clone)]
pub struct AssigneeRepository {
    executor: SessionExecutor,
}

impl AssigneeRepository {
    pub fn new(executor: SessionExecutor) -> Self {
        Self { executor }
    }

    pub async fn find(&self, id: &AssigneeId) -> Result<Option<Assignee>, StoreError> {
        let rows = self.executor.run(statements::find_assignee(id)).await?;
        rows.first().map(assignee_from_row).transpose()
    }

    /// 名前は一意ではないため該当者を全件返す
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Assignee>, StoreError> {
        let rows = self
            .executor
            .run(statements::find_assignees_by_name(name))
            .await?;
        rows.iter().map(assignee_from_row).collect()
    }

    pub async fn create(
        &self,
        id: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<Assignee, StoreError> {
        let rows = self
            .executor
            .run(statements::create_assignee(id, name, password_hash))
            .await?;
        rows.first()
            .map(assignee_from_row)
            .transpose()?
            .ok_or_else(|| StoreError::Statement("CREATE returned no rows".to_string()))
    }

    pub async fn update(
        &self,
        id: &AssigneeId,
        name: &str,
        password_hash: &str,
    ) -> Result<Option<Assignee>, StoreError> {
        let rows = self
            .executor
            .run(statements::update_assignee(id, name, password_hash))
            .await?;
        rows.first().map(assignee_from_row).transpose()
    }
}
