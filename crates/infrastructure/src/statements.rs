//! このサービスが発行する Cypher ステートメント
//!
//! 並び順の切り替えは昇順・降順の定数を選ぶことで行い、本文に値を埋め込まない。

use domain::{AssigneeId, SortOrder, TodoId, TodoQuery};

use crate::graph::Statement;

pub const FIND_TODO: &str = "\
MATCH (t:Todo {id: $id})-[:IS_ASSIGNED_TO]->(p:Assignee)
RETURN t, p";

pub const LIST_TODOS_ASC: &str = "\
MATCH (t:Todo)-[:IS_ASSIGNED_TO]->(p:Assignee)
RETURN t, p
ORDER BY p.name
SKIP $skip
LIMIT $limit";

pub const LIST_TODOS_DESC: &str = "\
MATCH (t:Todo)-[:IS_ASSIGNED_TO]->(p:Assignee)
RETURN t, p
ORDER BY p.name DESC
SKIP $skip
LIMIT $limit";

pub const LIST_TODOS_BY_ASSIGNEE_ASC: &str = "\
MATCH (t:Todo)-[:IS_ASSIGNED_TO]->(p:Assignee {id: $assignee})
RETURN t, p
ORDER BY p.name
SKIP $skip
LIMIT $limit";

pub const LIST_TODOS_BY_ASSIGNEE_DESC: &str = "\
MATCH (t:Todo)-[:IS_ASSIGNED_TO]->(p:Assignee {id: $assignee})
RETURN t, p
ORDER BY p.name DESC
SKIP $skip
LIMIT $limit";

/// 担当者が存在しなければ何も作らず 0 行を返す
pub const CREATE_TODO: &str = "\
MATCH (p:Assignee {id: $assignee})
CREATE (t:Todo {id: $id, message: $message})-[:IS_ASSIGNED_TO]->(p)
RETURN t, p";

pub const UPDATE_TODO: &str = "\
MATCH (t:Todo {id: $id})-[:IS_ASSIGNED_TO]->(p:Assignee)
SET t.message = coalesce($message, t.message)
RETURN t, p";

pub const DELETE_TODO: &str = "\
MATCH (t:Todo {id: $id})-[:IS_ASSIGNED_TO]->(p:Assignee)
WITH t, p, properties(t) AS snapshot
DETACH DELETE t
RETURN snapshot AS t, p";

pub const FIND_ASSIGNEE: &str = "\
MATCH (p:Assignee {id: $id})
RETURN p";

pub const FIND_ASSIGNEES_BY_NAME: &str = "\
MATCH (p:Assignee {name: $name})
RETURN p";

pub const CREATE_ASSIGNEE: &str = "\
CREATE (p:Person:Assignee {id: $id, name: $name, password: $password})
RETURN p";

pub const UPDATE_ASSIGNEE: &str = "\
MATCH (p:Assignee {id: $id})
SET p.name = $name, p.password = $password
RETURN p";

pub fn find_todo(id: &TodoId) -> Statement {
    Statement::new(FIND_TODO).param("id", id.as_str())
}

pub fn list_todos(query: &TodoQuery) -> Statement {
    let text = match (&query.assignee, query.order) {
        (None, SortOrder::Ascending) => LIST_TODOS_ASC,
        (None, SortOrder::Descending) => LIST_TODOS_DESC,
        (Some(_), SortOrder::Ascending) => LIST_TODOS_BY_ASSIGNEE_ASC,
        (Some(_), SortOrder::Descending) => LIST_TODOS_BY_ASSIGNEE_DESC,
    };

    let statement = Statement::new(text)
        .param("skip", query.offset)
        .param("limit", query.first);

    match &query.assignee {
        Some(assignee) => statement.param("assignee", assignee.as_str()),
        None => statement,
    }
}

pub fn create_todo(id: &str, message: &str, assignee: &AssigneeId) -> Statement {
    Statement::new(CREATE_TODO)
        .param("id", id)
        .param("message", message)
        .param("assignee", assignee.as_str())
}

pub fn update_todo(id: &TodoId, message: Option<&str>) -> Statement {
    Statement::new(UPDATE_TODO)
        .param("id", id.as_str())
        .param("message", message)
}

pub fn delete_todo(id: &TodoId) -> Statement {
    Statement::new(DELETE_TODO).param("id", id.as_str())
}

pub fn find_assignee(id: &AssigneeId) -> Statement {
    Statement::new(FIND_ASSIGNEE).param("id", id.as_str())
}

pub fn find_assignees_by_name(name: &str) -> Statement {
    Statement::new(FIND_ASSIGNEES_BY_NAME).param("name", name)
}

pub fn create_assignee(id: &str, name: &str, password_hash: &str) -> Statement {
    Statement::new(CREATE_ASSIGNEE)
        .param("id", id)
        .param("name", name)
        .param("password", password_hash)
}

pub fn update_assignee(id: &AssigneeId, name: &str, password_hash: &str) -> Statement {
    Statement::new(UPDATE_ASSIGNEE)
        .param("id", id.as_str())
        .param("name", name)
        .param("password", password_hash)
}
