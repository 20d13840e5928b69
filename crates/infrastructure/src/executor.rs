use std::sync::Arc;
use tracing::{debug, warn};

use crate::graph::{GraphDriver, GraphSession, Row, Statement, StoreError};

/// セッション単位でステートメントを実行する
///
/// 1 回の呼び出しごとにセッションを開き、成功・失敗に関わらず必ず閉じてから結果を返す。
#[derive(Clone)]
pub struct SessionExecutor {
    driver: Arc<dyn GraphDriver>,
}

impl SessionExecutor {
    pub fn new(driver: Arc<dyn GraphDriver>) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> Arc<dyn GraphDriver> {
        Arc::clone(&self.driver)
    }

    /// 単一ステートメントを実行
    pub async fn run(&self, statement: Statement) -> Result<Vec<Row>, StoreError> {
        let mut results = self.run_all(vec![statement]).await?;
        Ok(results.pop().unwrap_or_default())
    }

    /// 複数ステートメントを同一セッションで順に実行
    /// 途中で失敗した場合は残りを実行しない
    ///
    /// 呼び出し側がフューチャーを破棄した場合もセッションはガードが閉じる。
    pub async fn run_all(&self, statements: Vec<Statement>) -> Result<Vec<Vec<Row>>, StoreError> {
        let mut guard = SessionGuard::new(self.driver.open_session().await?);
        debug!(statements = statements.len(), "セッションを開始");

        let outcome = match guard.session_mut() {
            Some(session) => run_each(session, &statements).await,
            None => Err(StoreError::SessionClosed),
        };
        let closed = guard.close().await;

        match (&outcome, &closed) {
            (Err(e), _) => warn!(error = %e, "ステートメントの実行に失敗"),
            (Ok(_), Err(e)) => warn!(error = %e, "セッションのクローズに失敗"),
            (Ok(_), Ok(())) => debug!("セッションを終了"),
        }

        let rows = outcome?;
        closed?;
        Ok(rows)
    }
}

impl std::fmt::Debug for SessionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionExecutor").finish_non_exhaustive()
    }
}

/// 開いたセッションを保持し、閉じられないまま破棄されたらバックグラウンドで閉じる
struct SessionGuard {
    session: Option<Box<dyn GraphSession>>,
}

impl SessionGuard {
    fn new(session: Box<dyn GraphSession>) -> Self {
        Self {
            session: Some(session),
        }
    }

    fn session_mut(&mut self) -> Option<&mut dyn GraphSession> {
        match self.session.as_mut() {
            Some(session) => Some(session.as_mut()),
            None => None,
        }
    }

    /// クローズ完了まではガードがセッションを持ち続ける
    async fn close(&mut self) -> Result<(), StoreError> {
        let result = match self.session.as_mut() {
            Some(session) => session.close().await,
            None => Ok(()),
        };
        self.session = None;
        result
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!("実行が中断されたためセッションをバックグラウンドで閉じる");
                handle.spawn(async move {
                    if let Err(e) = session.close().await {
                        warn!(error = %e, "中断後のセッションクローズに失敗");
                    }
                });
            }
            Err(_) => warn!("ランタイム外で破棄されたためセッションを閉じられない"),
        }
    }
}

async fn run_each(
    session: &mut dyn GraphSession,
    statements: &[Statement],
) -> Result<Vec<Vec<Row>>, StoreError> {
    let mut results = Vec::with_capacity(statements.len());
    for statement in statements {
        results.push(session.run(statement).await?);
    }
    Ok(results)
}
