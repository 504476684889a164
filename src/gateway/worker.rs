use std::{
    io,
    sync::{
        mpsc::{self, Receiver, Sender},
        Arc, RwLock,
    },
    thread::{self, JoinHandle},
};

use envelope_domain::{BucketSet, Snapshot};
use tracing::{debug, warn};

use super::{PersistenceGateway, SyncStatus};

enum SyncJob {
    Save(Snapshot),
    Reset(BucketSet),
    Flush(Sender<()>),
}

/// Background thread that owns the gateway and applies saves in order.
///
/// Commands hand snapshots over and return immediately; the latest outcome is
/// readable through [`SyncWorker::status`].
pub struct SyncWorker {
    sender: Option<Sender<SyncJob>>,
    status: Arc<RwLock<SyncStatus>>,
    handle: Option<JoinHandle<()>>,
    remote: bool,
}

impl SyncWorker {
    pub fn spawn(gateway: PersistenceGateway) -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let status = Arc::new(RwLock::new(SyncStatus::Idle));
        let remote = gateway.has_remote();
        let shared = Arc::clone(&status);
        let handle = thread::Builder::new()
            .name("envelope-sync".into())
            .spawn(move || run(gateway, receiver, shared))?;
        Ok(Self {
            sender: Some(sender),
            status,
            handle: Some(handle),
            remote,
        })
    }

    pub fn has_remote(&self) -> bool {
        self.remote
    }

    pub fn save(&self, snapshot: Snapshot) {
        self.submit(SyncJob::Save(snapshot));
    }

    pub fn save_reset(&self, buckets: BucketSet) {
        self.submit(SyncJob::Reset(buckets));
    }

    pub fn status(&self) -> SyncStatus {
        read_status(&self.status)
    }

    /// Blocks until every job queued so far has been applied.
    pub fn flush(&self) -> SyncStatus {
        let (done, wait) = mpsc::channel();
        self.submit(SyncJob::Flush(done));
        let _ = wait.recv();
        self.status()
    }

    fn submit(&self, job: SyncJob) {
        let delivered = self
            .sender
            .as_ref()
            .map(|sender| sender.send(job).is_ok())
            .unwrap_or(false);
        if !delivered {
            warn!("sync worker stopped; change kept in memory only");
            write_status(
                &self.status,
                SyncStatus::Failed("sync worker stopped".into()),
            );
        }
    }
}

impl Drop for SyncWorker {
    fn drop(&mut self) {
        // Closing the channel lets the thread drain pending jobs and exit.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("sync worker panicked");
            }
        }
    }
}

fn run(gateway: PersistenceGateway, jobs: Receiver<SyncJob>, status: Arc<RwLock<SyncStatus>>) {
    for job in jobs {
        let outcome = match job {
            SyncJob::Save(snapshot) => gateway.save(&snapshot),
            SyncJob::Reset(buckets) => gateway.save_reset(&buckets),
            SyncJob::Flush(done) => {
                let _ = done.send(());
                continue;
            }
        };
        debug!(status = %outcome, "sync job finished");
        write_status(&status, outcome);
    }
}

fn read_status(status: &RwLock<SyncStatus>) -> SyncStatus {
    match status.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn write_status(status: &RwLock<SyncStatus>, value: SyncStatus) {
    match status.write() {
        Ok(mut guard) => *guard = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}
