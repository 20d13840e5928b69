use std::sync::atomic::{AtomicU64, Ordering};

/// 新規エンティティの識別子を払い出すジェネレータ
///
/// サーバー側で生成する不透明な文字列を返す。クライアントから識別子を受け取ることはない。
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// ULID による識別子生成（本番用）
#[derive(Debug, Clone, Copy, Default)]
pub struct UlidGenerator;

impl IdGenerator for UlidGenerator {
    fn next_id(&self) -> String {
        ulid::Ulid::new().to_string()
    }
}

/// 単調増加カウンタによる識別子生成（テスト用）
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}
