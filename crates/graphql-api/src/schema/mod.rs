//! GraphQL スキーマ
//!
//! - [`types`] - Todo / Assignee の出力型
//! - [`query`] - `todo`, `todos`
//! - [`mutation`] - `login` と各エンティティの作成・更新・削除

mod mutation;
mod query;
mod types;

use async_graphql::extensions::Tracing;
use async_graphql::{EmptySubscription, Schema};
use domain::{IdGenerator, UlidGenerator};
use shared::{Config, PasswordService, TokenService};
use std::sync::Arc;

use crate::permissions::{PermissionPolicy, Permissions};

pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use types::*;

pub type TodoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// リゾルバが共有するサービス群（スキーマ単位で 1 つ）
#[derive(Clone)]
pub struct Services {
    pub tokens: TokenService,
    pub passwords: PasswordService,
    pub ids: Arc<dyn IdGenerator>,
}

impl Services {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tokens: TokenService::new(config.jwt_secret.as_bytes()),
            passwords: PasswordService::default(),
            ids: Arc::new(UlidGenerator),
        }
    }
}

/// スキーマを組み立て、認可ミドルウェアで包む
pub fn build_schema(services: Services, policy: Arc<dyn PermissionPolicy>) -> TodoSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .extension(Tracing)
        .extension(Permissions::new(policy))
        .data(services)
        .finish()
}
