//! 認可ミドルウェア
//!
//! スキーマ拡張として全リゾルバを包み、実行前に [`PermissionPolicy`] へ問い合わせる。
//! 拒否された場合はリゾルバを呼ばずに `Not Authorised!` を返す。

use async_graphql::extensions::{Extension, ExtensionContext, ExtensionFactory, NextResolve, ResolveInfo};
use async_graphql::{ErrorExtensionValues, ServerError, ServerResult, Value};
use shared::TokenService;
use std::sync::Arc;
use tracing::warn;

use crate::context::RequestContext;

pub const NOT_AUTHORISED: &str = "Not Authorised!";

/// 解決対象のフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAccess<'a> {
    pub parent_type: &'a str,
    pub field_name: &'a str,
}

impl FieldAccess<'_> {
    /// Query / Mutation 直下のフィールドか
    pub fn is_root(&self) -> bool {
        matches!(self.parent_type, "Query" | "Mutation")
    }

    pub fn is_introspection(&self) -> bool {
        self.field_name.starts_with("__") || self.parent_type.starts_with("__")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

/// 差し替え可能な認可ルール
pub trait PermissionPolicy: Send + Sync + 'static {
    fn check(&self, field: &FieldAccess<'_>, ctx: &RequestContext) -> Decision;
}

/// すべて許可（テスト用）
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionPolicy for AllowAll {
    fn check(&self, _field: &FieldAccess<'_>, _ctx: &RequestContext) -> Decision {
        Decision::Allow
    }
}

/// ルートフィールドに有効なトークンを要求する既定ルール
///
/// `login` と `createAssignee` だけはトークンなしで呼べる。
#[derive(Debug, Clone)]
pub struct RequireToken {
    tokens: TokenService,
    public_fields: Vec<(&'static str, &'static str)>,
}

impl RequireToken {
    pub fn new(tokens: TokenService) -> Self {
        Self {
            tokens,
            public_fields: vec![("Mutation", "login"), ("Mutation", "createAssignee")],
        }
    }

    fn is_public(&self, field: &FieldAccess<'_>) -> bool {
        self.public_fields
            .iter()
            .any(|(p, f)| *p == field.parent_type && *f == field.field_name)
    }
}

impl PermissionPolicy for RequireToken {
    fn check(&self, field: &FieldAccess<'_>, ctx: &RequestContext) -> Decision {
        if !field.is_root() || self.is_public(field) {
            return Decision::Allow;
        }

        match ctx.token() {
            None => Decision::Deny("missing bearer token".to_string()),
            Some(token) => match self.tokens.verify(token) {
                Ok(_) => Decision::Allow,
                Err(e) => Decision::Deny(e.to_string()),
            },
        }
    }
}

/// スキーマに登録する拡張ファクトリ
#[derive(Clone)]
pub struct Permissions {
    policy: Arc<dyn PermissionPolicy>,
}

impl Permissions {
    pub fn new(policy: Arc<dyn PermissionPolicy>) -> Self {
        Self { policy }
    }
}

impl ExtensionFactory for Permissions {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(PermissionExtension {
            policy: Arc::clone(&self.policy),
        })
    }
}

struct PermissionExtension {
    policy: Arc<dyn PermissionPolicy>,
}

#[async_trait::async_trait]
impl Extension for PermissionExtension {
    async fn resolve(
        &self,
        ctx: &ExtensionContext<'_>,
        info: ResolveInfo<'_>,
        next: NextResolve<'_>,
    ) -> ServerResult<Option<Value>> {
        let field = FieldAccess {
            parent_type: info.parent_type,
            field_name: info.name,
        };
        if field.is_introspection() {
            return next.run(ctx, info).await;
        }

        let decision = match ctx.data_opt::<RequestContext>() {
            Some(request) => self.policy.check(&field, request),
            None => Decision::Deny("request context missing".to_string()),
        };

        match decision {
            Decision::Allow => next.run(ctx, info).await,
            Decision::Deny(reason) => {
                warn!(
                    parent_type = field.parent_type,
                    field = field.field_name,
                    reason = %reason,
                    "フィールドへのアクセスを拒否"
                );
                Err(forbidden())
            }
        }
    }
}

fn forbidden() -> ServerError {
    let mut extensions = ErrorExtensionValues::default();
    extensions.set("code", "FORBIDDEN");

    let mut error = ServerError::new(NOT_AUTHORISED, None);
    error.extensions = Some(extensions);
    error
}
