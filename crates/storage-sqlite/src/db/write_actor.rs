//! Single-writer actor for SQLite.
//!
//! SQLite allows one writer at a time. Instead of letting request handlers
//! contend for the write lock, all writes funnel through one background task
//! owning one dedicated connection, each job wrapped in an immediate
//! transaction.

use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use finclue_core::Result;
use log::error;
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

type ErasedResult = Box<dyn Any + Send + 'static>;
type Job = Box<dyn FnOnce(&mut SqliteConnection) -> Result<ErasedResult> + Send + 'static>;

const QUEUE_DEPTH: usize = 1024;

/// Cloneable handle for submitting write jobs to the actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(Job, oneshot::Sender<Result<ErasedResult>>)>,
}

impl WriteHandle {
    /// Runs `job` inside a transaction on the writer's connection and
    /// returns its result.
    ///
    /// Panics if the writer task has stopped, which only happens when its
    /// startup connection checkout failed.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + Any + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let erased: Job = Box::new(move |conn| job(conn).map(|v| Box::new(v) as ErasedResult));

        self.tx
            .send((erased, reply_tx))
            .await
            .expect("database writer task is gone");

        reply_rx
            .await
            .expect("database writer dropped a reply")
            .map(|boxed| {
                *boxed
                    .downcast::<T>()
                    .unwrap_or_else(|_| panic!("writer job returned an unexpected type"))
            })
    }
}

/// Spawns the writer task and returns its handle.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<(Job, oneshot::Sender<Result<ErasedResult>>)>(QUEUE_DEPTH);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Writer task could not check out a connection: {}", e);
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            // Immediate transactions take the write lock up front, so a
            // busy database surfaces here rather than mid-job.
            let result: Result<ErasedResult> = conn
                .immediate_transaction::<_, StorageError, _>(|c| {
                    job(c).map_err(StorageError::from)
                })
                .map_err(|e: StorageError| e.into());

            // The caller may have given up waiting; that's fine.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
