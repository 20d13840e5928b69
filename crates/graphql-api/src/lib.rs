//! ToDo アプリの GraphQL API
//!
//! - [`schema`] - 型定義とクエリ・ミューテーションのリゾルバ
//! - [`permissions`] - 全リゾルバを包む認可ミドルウェア
//! - [`context`] - リクエスト単位のコンテキスト
//! - [`server`] - HTTP サーバーの組み立て

#![cfg_attr(not(test), deny(clippy::unwrap_used))]

pub mod context;
pub mod error;
pub mod permissions;
pub mod schema;
pub mod server;

pub use context::RequestContext;
pub use error::ApiError;
pub use permissions::{AllowAll, Decision, FieldAccess, PermissionPolicy, Permissions, RequireToken};
pub use schema::{build_schema, Services, TodoSchema};
pub use server::Server;
