//! HTTP サーバーの組み立て

use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use infrastructure::SessionExecutor;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info_span, Instrument};

use crate::context::RequestContext;
use crate::schema::TodoSchema;

/// リクエストヘッダーからコンテキストを作る関数
pub type ContextFactory = Arc<dyn Fn(&HeaderMap) -> RequestContext + Send + Sync>;

/// 認可ミドルウェア付きスキーマとコンテキスト生成をまとめたサーバー
#[derive(Clone)]
pub struct Server {
    schema: TodoSchema,
    context: ContextFactory,
}

impl Server {
    /// リクエストごとに Authorization ヘッダーとストアのハンドルからコンテキストを作る
    pub fn new(schema: TodoSchema, executor: SessionExecutor) -> Self {
        let context: ContextFactory = Arc::new(move |headers: &HeaderMap| {
            RequestContext::from_headers(headers, executor.clone())
        });
        Self { schema, context }
    }

    /// 全リクエストに同じコンテキストを注入する（テスト用）
    pub fn with_context(schema: TodoSchema, context: RequestContext) -> Self {
        let context: ContextFactory = Arc::new(move |_: &HeaderMap| context.clone());
        Self { schema, context }
    }

    pub fn schema(&self) -> &TodoSchema {
        &self.schema
    }

    pub async fn execute(
        &self,
        headers: &HeaderMap,
        request: async_graphql::Request,
    ) -> async_graphql::Response {
        let context = (self.context)(headers);
        let span = info_span!("graphql_request", request_id = %context.request_id());

        self.schema
            .execute(request.data(context))
            .instrument(span)
            .await
    }

    /// ルータを構築して返す
    pub fn router(self) -> Router {
        Router::new()
            .route("/graphql", get(graphql_playground).post(graphql_handler))
            .route("/health", get(health))
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(self)
    }
}

async fn graphql_handler(
    State(server): State<Server>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    server.execute(&headers, request.into_inner()).await.into()
}

async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

/// ヘルスチェック用ハンドラ
async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}
