use async_graphql::{Context, Object, Result, ID};
use domain::{AssigneeId, SortOrder, TodoId, TodoQuery};
use tracing::debug;

use super::types::Todo;
use crate::context::RequestContext;
use crate::error::ResultExt;

#[derive(Debug, Default)]
pub struct QueryRoot;

#[Object(name = "Query")]
impl QueryRoot {
    /// ID で ToDo を取得する。存在しなければ null
    async fn todo(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Todo>> {
        let request = ctx.data::<RequestContext>()?;
        // 空白だけの ID に一致する ToDo はない
        let Ok(id) = TodoId::from_string(id.0) else {
            return Ok(None);
        };

        let todo = request.todos().find(&id).await.extend_err()?;
        Ok(todo.map(Todo::from))
    }

    /// 担当者名順の ToDo 一覧
    ///
    /// `assigneeId` 指定時はその担当者の ToDo のみ。`offset` 件飛ばして最大 `first` 件。
    async fn todos(
        &self,
        ctx: &Context<'_>,
        assignee_id: Option<ID>,
        first: i32,
        offset: i32,
        desc: Option<bool>,
    ) -> Result<Vec<Todo>> {
        let request = ctx.data::<RequestContext>()?;
        let assignee = assignee_id
            .map(|id| AssigneeId::from_string(id.0))
            .transpose()
            .extend_err()?;
        let query = TodoQuery::new(
            assignee,
            i64::from(first),
            i64::from(offset),
            SortOrder::from_desc_flag(desc),
        )
        .extend_err()?;

        let todos = request.todos().list(&query).await.extend_err()?;
        debug!(count = todos.len(), order = ?query.order, "ToDo 一覧を取得");

        Ok(todos.into_iter().map(Todo::from).collect())
    }
}
