use async_graphql::{Context, ErrorExtensions, Object, Result, ID};
use domain::{Assignee as AssigneeEntity, AssigneeId, Todo as TodoEntity, TodoId};
use shared::AuthError;
use tracing::{info, warn};

use super::types::{Assignee, Todo};
use super::Services;
use crate::context::RequestContext;
use crate::error::{ApiError, ResultExt};

#[derive(Debug, Default)]
pub struct MutationRoot;

#[Object(name = "Mutation")]
impl MutationRoot {
    /// 担当者名とパスワードを照合し、1 日有効なトークンを返す
    async fn login(&self, ctx: &Context<'_>, user_name: String, password: String) -> Result<String> {
        let request = ctx.data::<RequestContext>()?;
        let services = ctx.data::<Services>()?;

        let candidates = request.assignees().find_by_name(&user_name).await.extend_err()?;
        // 該当者がいなくても照合 1 回分のコストをかける
        let verified = if candidates.is_empty() {
            services.passwords.verify_unknown_user(&password)
        } else {
            candidates
                .iter()
                .any(|assignee| services.passwords.verify(&password, &assignee.password_hash))
        };
        if !verified {
            warn!(user_name = %user_name, "ログインに失敗");
            return Err(ApiError::from(AuthError::InvalidCredentials).extend());
        }

        let token = services.tokens.issue(&user_name).extend_err()?;
        info!(user_name = %user_name, "ログインしました");
        Ok(token)
    }

    /// ToDo を作成して担当者に割り当てる。担当者が存在しなければ NOT_FOUND
    async fn create_todo(&self, ctx: &Context<'_>, message: String, assignee_id: ID) -> Result<Todo> {
        let request = ctx.data::<RequestContext>()?;
        let services = ctx.data::<Services>()?;

        TodoEntity::validate_message(&message).extend_err()?;
        let assignee = AssigneeId::from_string(assignee_id.0).extend_err()?;

        let id = services.ids.next_id();
        let created = request
            .todos()
            .create(&id, &message, &assignee)
            .await
            .extend_err()?
            .ok_or_else(|| ApiError::NotFound(format!("Assignee {assignee}")).extend())?;

        info!(todo_id = %created.id, assignee_id = %assignee, "ToDo を作成しました");
        Ok(created.into())
    }

    /// メッセージを更新する。`message` 未指定なら変更しない
    async fn update_todo(&self, ctx: &Context<'_>, id: ID, message: Option<String>) -> Result<Option<Todo>> {
        let request = ctx.data::<RequestContext>()?;

        let Ok(id) = TodoId::from_string(id.0) else {
            return Ok(None);
        };
        if let Some(message) = &message {
            TodoEntity::validate_message(message).extend_err()?;
        }

        let updated = request
            .todos()
            .update(&id, message.as_deref())
            .await
            .extend_err()?;

        if updated.is_some() {
            info!(todo_id = %id, "ToDo を更新しました");
        }
        Ok(updated.map(Todo::from))
    }

    /// ToDo を削除し、削除前の状態を返す
    async fn delete_todo(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Todo>> {
        let request = ctx.data::<RequestContext>()?;

        let Ok(id) = TodoId::from_string(id.0) else {
            return Ok(None);
        };
        let deleted = request.todos().delete(&id).await.extend_err()?;

        if deleted.is_some() {
            info!(todo_id = %id, "ToDo を削除しました");
        }
        Ok(deleted.map(Todo::from))
    }

    async fn create_assignee(&self, ctx: &Context<'_>, name: String, password: String) -> Result<Assignee> {
        let request = ctx.data::<RequestContext>()?;
        let services = ctx.data::<Services>()?;

        AssigneeEntity::validate_name(&name).extend_err()?;
        AssigneeEntity::validate_password(&password).extend_err()?;
        let password_hash = services.passwords.hash(&password).extend_err()?;

        let id = services.ids.next_id();
        let created = request
            .assignees()
            .create(&id, &name, &password_hash)
            .await
            .extend_err()?;

        info!(assignee_id = %created.id, "担当者を作成しました");
        Ok(created.into())
    }

    /// 名前とパスワードを 1 つのステートメントでまとめて更新する
    async fn update_assignee(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: String,
        password: String,
    ) -> Result<Option<Assignee>> {
        let request = ctx.data::<RequestContext>()?;
        let services = ctx.data::<Services>()?;

        let Ok(id) = AssigneeId::from_string(id.0) else {
            return Ok(None);
        };
        AssigneeEntity::validate_name(&name).extend_err()?;
        AssigneeEntity::validate_password(&password).extend_err()?;
        let password_hash = services.passwords.hash(&password).extend_err()?;

        let updated = request
            .assignees()
            .update(&id, &name, &password_hash)
            .await
            .extend_err()?;

        if updated.is_some() {
            info!(assignee_id = %id, "担当者を更新しました");
        }
        Ok(updated.map(Assignee::from))
    }
}
