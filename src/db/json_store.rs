//! JSON document store with a commit journal
//!
//! Two documents live in the state directory: `tickers.json` and
//! `trades.json`. A commit first writes both into `commit.json`; once that
//! file is renamed into place the commit is durable, and the documents are
//! then replaced one by one. Loading finishes any journal left behind by an
//! interrupted commit, so the documents never disagree with each other.

use crate::ledger::TradeLedger;
use crate::models::trade::InvalidLedgerKey;
use crate::state::TickerStateStore;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

pub const TICKERS_FILE: &str = "tickers.json";
pub const TRADES_FILE: &str = "trades.json";
pub const JOURNAL_FILE: &str = "commit.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    InvalidKey(#[from] InvalidLedgerKey),

    /// The journal is durable but the documents were not all replaced. The
    /// next `load` finishes the commit.
    #[error("commit journaled, documents pending roll-forward: {source}")]
    PendingRollForward {
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Serialize)]
struct JournalRef<'a> {
    tickers: &'a TickerStateStore,
    trades: &'a TradeLedger,
}

#[derive(Deserialize)]
struct Journal {
    tickers: TickerStateStore,
    trades: TradeLedger,
}

#[derive(Debug, Clone)]
pub struct JsonStateStore {
    dir: PathBuf,
}

impl JsonStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn tickers_path(&self) -> PathBuf {
        self.dir.join(TICKERS_FILE)
    }

    pub fn trades_path(&self) -> PathBuf {
        self.dir.join(TRADES_FILE)
    }

    pub fn journal_path(&self) -> PathBuf {
        self.dir.join(JOURNAL_FILE)
    }

    /// Load both documents. Missing documents load as empty.
    pub async fn load(&self) -> Result<(TickerStateStore, TradeLedger), StoreError> {
        let journal_path = self.journal_path();
        if let Some(bytes) = read_optional(&journal_path).await? {
            let journal: Journal = serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::json(&journal_path, e))?;
            journal.trades.validate_keys()?;
            warn!(
                path = %journal_path.display(),
                "JsonStateStore: found unfinished commit, rolling forward"
            );
            self.apply(&journal.tickers, &journal.trades).await?;
            remove_file(&journal_path).await?;
            return Ok((journal.tickers, journal.trades));
        }

        let tickers: TickerStateStore = self.read_document(&self.tickers_path()).await?;
        let trades: TradeLedger = self.read_document(&self.trades_path()).await?;
        trades.validate_keys()?;

        debug!(
            tickers = tickers.len(),
            trades = trades.len(),
            "JsonStateStore: loaded state from {}",
            self.dir.display()
        );
        Ok((tickers, trades))
    }

    /// Commit both documents as one unit of work.
    ///
    /// Errors other than `PendingRollForward` mean nothing was committed.
    pub async fn commit(
        &self,
        tickers: &TickerStateStore,
        trades: &TradeLedger,
    ) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?;

        let journal_path = self.journal_path();
        let journal = serde_json::to_vec(&JournalRef { tickers, trades })
            .map_err(|e| StoreError::json(&journal_path, e))?;
        write_atomic(&journal_path, &journal).await?;

        let finish = async {
            self.apply(tickers, trades).await?;
            remove_file(&journal_path).await
        };
        if let Err(e) = finish.await {
            warn!(
                path = %journal_path.display(),
                error = %e,
                "JsonStateStore: documents not updated, journal kept for roll-forward"
            );
            return Err(StoreError::PendingRollForward {
                source: Box::new(e),
            });
        }

        info!(
            tickers = tickers.len(),
            trades = trades.len(),
            "JsonStateStore: committed state to {}",
            self.dir.display()
        );
        Ok(())
    }

    async fn apply(
        &self,
        tickers: &TickerStateStore,
        trades: &TradeLedger,
    ) -> Result<(), StoreError> {
        let tickers_path = self.tickers_path();
        let body = serde_json::to_vec_pretty(tickers)
            .map_err(|e| StoreError::json(&tickers_path, e))?;
        write_atomic(&tickers_path, &body).await?;

        let trades_path = self.trades_path();
        let body =
            serde_json::to_vec_pretty(trades).map_err(|e| StoreError::json(&trades_path, e))?;
        write_atomic(&trades_path, &body).await?;
        Ok(())
    }

    async fn read_document<T>(&self, path: &Path) -> Result<T, StoreError>
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        match read_optional(path).await? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::json(path, e)),
            None => Ok(T::default()),
        }
    }
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

async fn remove_file(path: &Path) -> Result<(), StoreError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Write to a sibling temp file, fsync, then rename over `path`.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = tokio::fs::File::create(&tmp)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    file.write_all(bytes)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    file.sync_all().await.map_err(|e| StoreError::io(&tmp, e))?;
    drop(file);

    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))
}
