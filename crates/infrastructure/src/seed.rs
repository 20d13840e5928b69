use domain::{Assignee, IdGenerator, Todo};
use shared::{AuthError, PasswordService};
use thiserror::Error;
use tracing::info;

use crate::executor::SessionExecutor;
use crate::graph::StoreError;
use crate::repositories::{AssigneeRepository, TodoRepository};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Seed assignee disappeared: {0}")]
    MissingAssignee(String),
}

/// デモデータとして投入した内容
#[derive(Debug, Clone)]
pub struct DemoData {
    pub hans: Assignee,
    pub hanna: Assignee,
    pub todos: Vec<Todo>,
}

/// デモ用の担当者 2 名と ToDo 3 件を投入する
///
/// Hans(1234) / Hanna(5678)、Foo→Hans、Bar→Hanna、Baz→Hans の順に作成する。
pub async fn seed_demo_data(
    executor: &SessionExecutor,
    ids: &dyn IdGenerator,
    passwords: &PasswordService,
) -> Result<DemoData, SeedError> {
    let assignees = AssigneeRepository::new(executor.clone());
    let todos = TodoRepository::new(executor.clone());

    let hans = assignees
        .create(&ids.next_id(), "Hans", &passwords.hash("1234")?)
        .await?;
    let hanna = assignees
        .create(&ids.next_id(), "Hanna", &passwords.hash("5678")?)
        .await?;

    let mut created = Vec::new();
    for (message, assignee) in [("Foo", &hans), ("Bar", &hanna), ("Baz", &hans)] {
        let todo = todos
            .create(&ids.next_id(), message, &assignee.id)
            .await?
            .ok_or_else(|| SeedError::MissingAssignee(assignee.id.to_string()))?;
        created.push(todo);
    }

    info!(
        assignees = 2,
        todos = created.len(),
        "デモデータを投入しました"
    );

    Ok(DemoData {
        hans,
        hanna,
        todos: created,
    })
}
