//! プロセス内グラフストア
//!
//! このサービスが発行するステートメント（`statements` モジュール）だけを解釈する。
//! 実行ごと・テストごとに新しいインスタンスを作る。

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use crate::graph::{GraphDriver, GraphSession, Node, Row, Statement, StoreError};
use crate::statements;

const TODO: &str = "Todo";
const ASSIGNEE: &str = "Assignee";
const PERSON: &str = "Person";

#[derive(Debug, Default)]
struct GraphData {
    assignees: Vec<Node>,
    // 挿入順を保持する
    todos: Vec<StoredTodo>,
}

#[derive(Debug, Clone)]
struct StoredTodo {
    node: Node,
    // IS_ASSIGNED_TO の向き先
    assignee_id: String,
}

#[derive(Clone, Default)]
pub struct MemoryGraph {
    data: Arc<Mutex<GraphData>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 格納されている ToDo の件数
    pub fn todo_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.todos.len())
    }

    /// 格納されている担当者の件数
    pub fn assignee_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.assignees.len())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, GraphData>, StoreError> {
        self.data
            .lock()
            .map_err(|_| StoreError::Connection("memory graph lock poisoned".to_string()))
    }

    fn execute(&self, statement: &Statement) -> Result<Vec<Row>, StoreError> {
        let mut data = self.lock()?;

        match statement.text() {
            statements::FIND_TODO => {
                let id = statement.str_param("id")?;
                Ok(data.todo_rows(|t| t.node.str_property("id") == Some(id)))
            }
            statements::LIST_TODOS_ASC | statements::LIST_TODOS_DESC => {
                let rows = data.todo_rows(|_| true);
                page(rows, statement)
            }
            statements::LIST_TODOS_BY_ASSIGNEE_ASC | statements::LIST_TODOS_BY_ASSIGNEE_DESC => {
                let assignee = statement.str_param("assignee")?;
                let rows = data.todo_rows(|t| t.assignee_id == assignee);
                page(rows, statement)
            }
            statements::CREATE_TODO => {
                let assignee_id = statement.str_param("assignee")?;
                let Some(assignee) = data.assignee(assignee_id).cloned() else {
                    return Ok(Vec::new());
                };

                let node = Node::new(
                    &[TODO],
                    properties(json!({
                        "id": statement.str_param("id")?,
                        "message": statement.str_param("message")?,
                    })),
                );
                data.todos.push(StoredTodo {
                    node: node.clone(),
                    assignee_id: assignee_id.to_string(),
                });

                Ok(vec![Row::new().with("t", node).with("p", assignee)])
            }
            statements::UPDATE_TODO => {
                let id = statement.str_param("id")?;
                let message = statement.optional_str_param("message")?;

                let Some(todo) = data
                    .todos
                    .iter_mut()
                    .find(|t| t.node.str_property("id") == Some(id))
                else {
                    return Ok(Vec::new());
                };
                if let Some(message) = message {
                    todo.node
                        .properties
                        .insert("message".to_string(), Value::from(message));
                }

                Ok(data.todo_rows(|t| t.node.str_property("id") == Some(id)))
            }
            statements::DELETE_TODO => {
                let id = statement.str_param("id")?;
                let rows = data.todo_rows(|t| t.node.str_property("id") == Some(id));
                data.todos.retain(|t| t.node.str_property("id") != Some(id));
                Ok(rows)
            }
            statements::FIND_ASSIGNEE => {
                let id = statement.str_param("id")?;
                Ok(data
                    .assignee(id)
                    .map(|p| vec![Row::new().with("p", p.clone())])
                    .unwrap_or_default())
            }
            statements::FIND_ASSIGNEES_BY_NAME => {
                let name = statement.str_param("name")?;
                Ok(data
                    .assignees
                    .iter()
                    .filter(|p| p.str_property("name") == Some(name))
                    .map(|p| Row::new().with("p", p.clone()))
                    .collect())
            }
            statements::CREATE_ASSIGNEE => {
                let node = Node::new(
                    &[PERSON, ASSIGNEE],
                    properties(json!({
                        "id": statement.str_param("id")?,
                        "name": statement.str_param("name")?,
                        "password": statement.str_param("password")?,
                    })),
                );
                data.assignees.push(node.clone());
                Ok(vec![Row::new().with("p", node)])
            }
            statements::UPDATE_ASSIGNEE => {
                let id = statement.str_param("id")?;
                let name = statement.str_param("name")?;
                let password = statement.str_param("password")?;

                let Some(assignee) = data
                    .assignees
                    .iter_mut()
                    .find(|p| p.str_property("id") == Some(id))
                else {
                    return Ok(Vec::new());
                };
                assignee
                    .properties
                    .insert("name".to_string(), Value::from(name));
                assignee
                    .properties
                    .insert("password".to_string(), Value::from(password));

                Ok(vec![Row::new().with("p", assignee.clone())])
            }
            other => Err(StoreError::UnsupportedStatement(other.to_string())),
        }
    }
}

impl GraphData {
    fn assignee(&self, id: &str) -> Option<&Node> {
        self.assignees
            .iter()
            .find(|p| p.has_label(ASSIGNEE) && p.str_property("id") == Some(id))
    }

    /// 条件に合う ToDo を担当者と結合した行（挿入順）
    fn todo_rows<F>(&self, predicate: F) -> Vec<Row>
    where
        F: Fn(&StoredTodo) -> bool,
    {
        self.todos
            .iter()
            .filter(|t| predicate(t))
            .filter_map(|t| {
                self.assignee(&t.assignee_id)
                    .map(|p| Row::new().with("t", t.node.clone()).with("p", p.clone()))
            })
            .collect()
    }
}

/// 担当者名で並べ替えて SKIP/LIMIT を適用する
/// 安定ソートなので同名の担当者の ToDo は挿入順のまま
fn page(mut rows: Vec<Row>, statement: &Statement) -> Result<Vec<Row>, StoreError> {
    let skip = to_usize(statement.u64_param("skip")?);
    let limit = to_usize(statement.u64_param("limit")?);

    let descending = matches!(
        statement.text(),
        statements::LIST_TODOS_DESC | statements::LIST_TODOS_BY_ASSIGNEE_DESC
    );
    rows.sort_by(|a, b| {
        let ordering = assignee_name(a).cmp(assignee_name(b));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });

    Ok(rows.into_iter().skip(skip).take(limit).collect())
}

fn assignee_name(row: &Row) -> &str {
    row.get("p")
        .ok()
        .and_then(|p| p.str_property("name"))
        .unwrap_or_default()
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn properties(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

#[async_trait]
impl GraphDriver for MemoryGraph {
    async fn open_session(&self) -> Result<Box<dyn GraphSession>, StoreError> {
        Ok(Box::new(MemorySession {
            graph: self.clone(),
            open: true,
        }))
    }
}

struct MemorySession {
    graph: MemoryGraph,
    open: bool,
}

#[async_trait]
impl GraphSession for MemorySession {
    async fn run(&mut self, statement: &Statement) -> Result<Vec<Row>, StoreError> {
        if !self.open {
            return Err(StoreError::SessionClosed);
        }
        self.graph.execute(statement)
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        self.open = false;
        Ok(())
    }
}
