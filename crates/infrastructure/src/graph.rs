//! グラフストアのドライバ契約
//!
//! ストア本体は外部の協調者として扱う。この層が要求するのは
//! 「セッションを開く」「パラメータ付きステートメントを実行して行を得る」「セッションを閉じる」の 3 つだけ。

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Statement failed: {0}")]
    Statement(String),

    #[error("Unsupported statement: {0}")]
    UnsupportedStatement(String),

    #[error("Missing parameter: ${0}")]
    MissingParameter(&'static str),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Failed to decode row: {0}")]
    Decode(String),

    #[error("Session already closed")]
    SessionClosed,
}

pub type Properties = Map<String, Value>;

/// ラベルとプロパティを持つノード
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub labels: Vec<String>,
    pub properties: Properties,
}

impl Node {
    pub fn new(labels: &[&str], properties: Properties) -> Self {
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties,
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn str_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// プロパティを任意の型にデコード
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        serde_json::from_value(Value::Object(self.properties.clone()))
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// 結果の 1 行（列名 → ノード）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: BTreeMap<String, Node>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, node: Node) -> Self {
        self.columns.insert(column.to_string(), node);
        self
    }

    pub fn get(&self, column: &str) -> Result<&Node, StoreError> {
        self.columns
            .get(column)
            .ok_or_else(|| StoreError::MissingColumn(column.to_string()))
    }
}

/// パラメータ付きステートメント
///
/// 本文は事前に用意した定数のみ。利用者の入力は必ず名前付きパラメータで渡す。
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    text: &'static str,
    params: BTreeMap<&'static str, Value>,
}

impl Statement {
    pub fn new(text: &'static str) -> Self {
        Self {
            text,
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.params.insert(name, value.into());
        self
    }

    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn params(&self) -> &BTreeMap<&'static str, Value> {
        &self.params
    }

    pub fn value(&self, name: &'static str) -> Result<&Value, StoreError> {
        self.params
            .get(name)
            .ok_or(StoreError::MissingParameter(name))
    }

    pub fn str_param(&self, name: &'static str) -> Result<&str, StoreError> {
        self.value(name)?
            .as_str()
            .ok_or_else(|| StoreError::Statement(format!("${name} must be a string")))
    }

    /// null は None として扱う
    pub fn optional_str_param(&self, name: &'static str) -> Result<Option<&str>, StoreError> {
        match self.value(name)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            _ => Err(StoreError::Statement(format!(
                "${name} must be a string or null"
            ))),
        }
    }

    pub fn u64_param(&self, name: &'static str) -> Result<u64, StoreError> {
        self.value(name)?
            .as_u64()
            .ok_or_else(|| StoreError::Statement(format!("${name} must be a non-negative integer")))
    }
}

/// ストアへの接続を払い出すドライバ
#[async_trait]
pub trait GraphDriver: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn GraphSession>, StoreError>;
}

/// 1 単位の作業に対応するセッション
#[async_trait]
pub trait GraphSession: Send {
    async fn run(&mut self, statement: &Statement) -> Result<Vec<Row>, StoreError>;

    async fn close(&mut self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_statement_params() {
        let statement = Statement::new("MATCH (n {id: $id}) RETURN n")
            .param("id", "42")
            .param("limit", 10u64)
            .param("message", Value::Null);

        assert_eq!(statement.str_param("id").unwrap(), "42");
        assert_eq!(statement.u64_param("limit").unwrap(), 10);
        assert_eq!(statement.optional_str_param("message").unwrap(), None);
        assert_eq!(
            statement.str_param("missing"),
            Err(StoreError::MissingParameter("missing"))
        );
        assert!(statement.u64_param("id").is_err());
    }

    #[test]
    fn test_row_and_node_decoding() {
        #[derive(serde::Deserialize)]
        struct Named {
            name: String,
        }

        let props = json!({"name": "Hans"}).as_object().cloned().unwrap();
        let row = Row::new().with("p", Node::new(&["Assignee"], props));

        let node = row.get("p").unwrap();
        assert!(node.has_label("Assignee"));
        assert_eq!(node.str_property("name"), Some("Hans"));
        assert_eq!(node.decode::<Named>().unwrap().name, "Hans");
        assert_eq!(
            row.get("t"),
            Err(StoreError::MissingColumn("t".to_string()))
        );
    }
}
