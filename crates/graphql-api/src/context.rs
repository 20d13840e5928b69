use axum::http::{header::AUTHORIZATION, HeaderMap};
use infrastructure::{AssigneeRepository, SessionExecutor, TodoRepository};
use shared::bearer_token;
use uuid::Uuid;

/// リクエスト単位のコンテキスト
///
/// 生のトークン文字列とストアへのハンドルを持つ。
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    token: Option<String>,
    executor: SessionExecutor,
}

impl RequestContext {
    pub fn new(token: Option<String>, executor: SessionExecutor) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            token,
            executor,
        }
    }

    /// Authorization ヘッダーからトークンを取り出して作成
    pub fn from_headers(headers: &HeaderMap, executor: SessionExecutor) -> Self {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_string);

        Self::new(token, executor)
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn todos(&self) -> TodoRepository {
        TodoRepository::new(self.executor.clone())
    }

    pub fn assignees(&self) -> AssigneeRepository {
        AssigneeRepository::new(self.executor.clone())
    }
}
