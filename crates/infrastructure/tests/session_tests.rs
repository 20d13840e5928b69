use async_trait::async_trait;
use domain::{AssigneeId, SequentialIdGenerator, SortOrder, TodoId, TodoQuery};
use infrastructure::{
    seed_demo_data, AssigneeRepository, GraphDriver, GraphSession, MemoryGraph, Row,
    SessionExecutor, Statement, StoreError, TodoRepository,
};
use shared::PasswordService;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// セッションの開閉回数を記録するテストダブル
#[derive(Default)]
struct SessionLog {
    opened: AtomicUsize,
    closed: AtomicUsize,
}

/// ステートメント実行時の振る舞い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunMode {
    Normal,
    Fail,
    /// 応答が返らないまま止まる
    Stall,
}

struct RecordingDriver {
    inner: MemoryGraph,
    log: Arc<SessionLog>,
    mode: RunMode,
}

#[async_trait]
impl GraphDriver for RecordingDriver {
    async fn open_session(&self) -> Result<Box<dyn GraphSession>, StoreError> {
        self.log.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingSession {
            inner: self.inner.open_session().await?,
            log: Arc::clone(&self.log),
            mode: self.mode,
        }))
    }
}

struct RecordingSession {
    inner: Box<dyn GraphSession>,
    log: Arc<SessionLog>,
    mode: RunMode,
}

#[async_trait]
impl GraphSession for RecordingSession {
    async fn run(&mut self, statement: &Statement) -> Result<Vec<Row>, StoreError> {
        match self.mode {
            RunMode::Normal => self.inner.run(statement).await,
            RunMode::Fail => Err(StoreError::Connection("connection reset".to_string())),
            RunMode::Stall => std::future::pending().await,
        }
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        self.log.closed.fetch_add(1, Ordering::SeqCst);
        self.inner.close().await
    }
}

fn recording_executor(mode: RunMode) -> (SessionExecutor, MemoryGraph, Arc<SessionLog>) {
    let graph = MemoryGraph::new();
    let log = Arc::new(SessionLog::default());
    let driver = RecordingDriver {
        inner: graph.clone(),
        log: Arc::clone(&log),
        mode,
    };
    (SessionExecutor::new(Arc::new(driver)), graph, log)
}

fn passwords() -> PasswordService {
    PasswordService::with_cost(256, 1).unwrap()
}

fn todo_id(value: &str) -> TodoId {
    TodoId::from_string(value.to_string()).unwrap()
}

#[tokio::test]
async fn test_session_is_closed_after_success() {
    let (executor, _graph, log) = recording_executor(RunMode::Normal);
    let todos = TodoRepository::new(executor);

    let found = todos.find(&todo_id("1")).await.unwrap();

    assert!(found.is_none());
    assert_eq!(log.opened.load(Ordering::SeqCst), 1);
    assert_eq!(log.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_session_is_closed_when_statement_fails() {
    // Arrange: 実行が必ず失敗するドライバ
    let (executor, _graph, log) = recording_executor(RunMode::Fail);
    let todos = TodoRepository::new(executor);

    // Act
    let result = todos.find(&todo_id("1")).await;

    // Assert: エラーは伝播し、セッションは閉じられている
    assert_eq!(
        result,
        Err(StoreError::Connection("connection reset".to_string()))
    );
    assert_eq!(log.opened.load(Ordering::SeqCst), 1);
    assert_eq!(log.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_session_is_closed_when_caller_gives_up() {
    // Arrange: 応答が返らないドライバ
    let (executor, _graph, log) = recording_executor(RunMode::Stall);
    let todos = TodoRepository::new(executor);

    // Act: 呼び出し側のタイムアウトでフューチャーが破棄される
    let result = tokio::time::timeout(Duration::from_millis(50), todos.find(&todo_id("1"))).await;

    // Assert: バックグラウンドのクローズを待ってから開閉数を比べる
    assert!(result.is_err());
    for _ in 0..100 {
        if log.closed.load(Ordering::SeqCst) == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(log.opened.load(Ordering::SeqCst), 1);
    assert_eq!(log.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_run_all_stops_at_first_failure_and_closes_once() {
    let (executor, graph, log) = recording_executor(RunMode::Normal);

    let result = executor
        .run_all(vec![
            Statement::new(infrastructure::statements::CREATE_ASSIGNEE)
                .param("id", "1")
                .param("name", "Hans")
                .param("password", "x"),
            Statement::new("MATCH (n) DETACH DELETE n"),
            Statement::new(infrastructure::statements::CREATE_ASSIGNEE)
                .param("id", "2")
                .param("name", "Hanna")
                .param("password", "y"),
        ])
        .await;

    assert!(matches!(result, Err(StoreError::UnsupportedStatement(_))));
    assert_eq!(graph.assignee_count().unwrap(), 1);
    assert_eq!(log.opened.load(Ordering::SeqCst), 1);
    assert_eq!(log.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_every_repository_call_uses_its_own_session() {
    let (executor, _graph, log) = recording_executor(RunMode::Normal);
    let ids = SequentialIdGenerator::default();

    seed_demo_data(&executor, &ids, &passwords()).await.unwrap();

    // 担当者 2 件 + ToDo 3 件
    assert_eq!(log.opened.load(Ordering::SeqCst), 5);
    assert_eq!(log.closed.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_seeded_scenario_lists_in_assignee_name_order() {
    let executor = SessionExecutor::new(Arc::new(MemoryGraph::new()));
    let ids = SequentialIdGenerator::default();
    let demo = seed_demo_data(&executor, &ids, &passwords()).await.unwrap();
    let todos = TodoRepository::new(executor);

    let query = TodoQuery::new(None, 10, 0, SortOrder::Ascending).unwrap();
    let listed = todos.list(&query).await.unwrap();

    let pairs: Vec<(&str, &str)> = listed
        .iter()
        .map(|t| (t.assignee.name.as_str(), t.message.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("Hanna", "Bar"), ("Hans", "Foo"), ("Hans", "Baz")]
    );
    assert_eq!(listed[0].assignee, demo.hanna);
    assert_eq!(listed[1].assignee, demo.hans);
}

#[tokio::test]
async fn test_filter_by_assignee_and_paging() {
    let executor = SessionExecutor::new(Arc::new(MemoryGraph::new()));
    let ids = SequentialIdGenerator::default();
    let demo = seed_demo_data(&executor, &ids, &passwords()).await.unwrap();
    let todos = TodoRepository::new(executor);

    let only_hans = TodoQuery::new(Some(demo.hans.id.clone()), 10, 0, SortOrder::Ascending).unwrap();
    let listed = todos.list(&only_hans).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|t| t.assignee.id == demo.hans.id));

    let first_two = TodoQuery::new(None, 2, 0, SortOrder::Ascending).unwrap();
    let skip_one = TodoQuery::new(None, 2, 1, SortOrder::Ascending).unwrap();
    let first_page = todos.list(&first_two).await.unwrap();
    let second_page = todos.list(&skip_one).await.unwrap();
    assert_eq!(first_page.len(), 2);
    assert_eq!(second_page[0], first_page[1]);
}

#[tokio::test]
async fn test_assignee_repository_update_and_lookup() {
    let executor = SessionExecutor::new(Arc::new(MemoryGraph::new()));
    let assignees = AssigneeRepository::new(executor);

    let created = assignees.create("a1", "Hans", "hash-1").await.unwrap();
    let updated = assignees
        .update(&created.id, "Hans Peter", "hash-2")
        .await
        .unwrap()
        .unwrap();
    let missing = assignees
        .update(
            &AssigneeId::from_string("nobody".to_string()).unwrap(),
            "X",
            "Y",
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Hans Peter");
    assert_eq!(updated.password_hash, "hash-2");
    assert!(missing.is_none());
    assert_eq!(assignees.find(&created.id).await.unwrap(), Some(updated));
    assert!(assignees.find_by_name("Hans").await.unwrap().is_empty());
    assert_eq!(assignees.find_by_name("Hans Peter").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_returns_prior_state() {
    let executor = SessionExecutor::new(Arc::new(MemoryGraph::new()));
    let ids = SequentialIdGenerator::default();
    let demo = seed_demo_data(&executor, &ids, &passwords()).await.unwrap();
    let todos = TodoRepository::new(executor);
    let target = demo.todos[1].clone();

    let deleted = todos.delete(&target.id).await.unwrap();

    assert_eq!(deleted, Some(target.clone()));
    assert_eq!(todos.find(&target.id).await.unwrap(), None);
    assert_eq!(todos.delete(&target.id).await.unwrap(), None);
}
