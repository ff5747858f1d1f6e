//! Asynchronous model loading
//!
//! A load request returns immediately. The parse runs on a worker thread and
//! its outcome comes back through a channel that the UI thread drains once
//! per frame with [`ModelLoader::poll`]. Every request carries a ticket so
//! the receiver can tell whether the completion is still wanted.

use crate::registry::ReaderRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use vitrine_core::{Error, ModelNode, Result};

/// Anything that can turn a path into a model
pub trait ModelSource: Send + Sync + 'static {
    fn read_model(&self, path: &Path) -> Result<ModelNode>;
}

impl ModelSource for ReaderRegistry {
    fn read_model(&self, path: &Path) -> Result<ModelNode> {
        ReaderRegistry::read_model(self, path)
    }
}

/// Outcome of one load request
#[derive(Debug)]
pub struct LoadCompletion {
    pub ticket: u64,
    pub path: PathBuf,
    pub result: Result<ModelNode>,
}

/// Where the parse runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// One worker thread per request
    Background,
    /// On the calling thread; the completion is still delivered through
    /// the channel so callers observe it at the next poll
    Inline,
}

/// Dispatches model loads and collects their completions
pub struct ModelLoader {
    source: Arc<dyn ModelSource>,
    mode: LoadMode,
    tx: flume::Sender<LoadCompletion>,
    rx: flume::Receiver<LoadCompletion>,
}

impl ModelLoader {
    pub fn new(source: Arc<dyn ModelSource>, mode: LoadMode) -> Self {
        let (tx, rx) = flume::unbounded();
        Self { source, mode, tx, rx }
    }

    /// Background loader over the default reader registry
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(ReaderRegistry::with_defaults()), LoadMode::Background)
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Start loading `path`. Never blocks in background mode.
    pub fn request(&self, ticket: u64, path: impl Into<PathBuf>) {
        let path = path.into();
        log::debug!("load #{} requested: {}", ticket, path.display());

        match self.mode {
            LoadMode::Inline => {
                let result = self.source.read_model(&path);
                let _ = self.tx.send(LoadCompletion { ticket, path, result });
            }
            LoadMode::Background => {
                let source = Arc::clone(&self.source);
                let tx = self.tx.clone();
                let job_path = path.clone();
                let spawned = std::thread::Builder::new()
                    .name(format!("vitrine-load-{}", ticket))
                    .spawn(move || {
                        let result = source.read_model(&job_path);
                        // The receiver is gone when the loader was dropped
                        let _ = tx.send(LoadCompletion {
                            ticket,
                            path: job_path,
                            result,
                        });
                    });
                if let Err(e) = spawned {
                    let _ = self.tx.send(LoadCompletion {
                        ticket,
                        path,
                        result: Err(Error::Load(format!("failed to start loader thread: {}", e))),
                    });
                }
            }
        }
    }

    /// Drain every completion that has arrived so far
    pub fn poll(&self) -> Vec<LoadCompletion> {
        self.rx.try_iter().collect()
    }

    /// Block until the next completion or the timeout
    pub fn wait(&self, timeout: Duration) -> Option<LoadCompletion> {
        self.rx.recv_timeout(timeout).ok()
    }
}

impl std::fmt::Debug for ModelLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelLoader")
            .field("mode", &self.mode)
            .field("pending", &self.rx.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::glb_fixture::{triangle_glb, GlbFixture, TempDir};

    struct Failing;

    impl ModelSource for Failing {
        fn read_model(&self, path: &Path) -> Result<ModelNode> {
            Err(Error::Load(format!("cannot fetch {}", path.display())))
        }
    }

    #[test]
    fn test_inline_delivers_on_poll() {
        let loader = ModelLoader::new(Arc::new(Failing), LoadMode::Inline);
        loader.request(7, "a.glb");
        let done = loader.poll();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].ticket, 7);
        assert!(done[0].result.is_err());
        assert!(loader.poll().is_empty());
    }

    #[test]
    fn test_background_load_from_disk() {
        let dir = TempDir::new("loader-bg");
        let path = dir.write("tri.glb", &triangle_glb(&GlbFixture::default()));
        let loader = ModelLoader::with_defaults();
        loader.request(1, &path);
        let done = loader.wait(Duration::from_secs(10)).expect("completion");
        assert_eq!(done.ticket, 1);
        assert_eq!(done.path, path);
        assert_eq!(done.result.unwrap().face_count(), 1);
    }

    #[test]
    fn test_tickets_are_preserved() {
        let loader = ModelLoader::new(Arc::new(Failing), LoadMode::Background);
        loader.request(1, "one.glb");
        loader.request(2, "two.glb");
        let mut tickets: Vec<u64> = (0..2)
            .filter_map(|_| loader.wait(Duration::from_secs(10)))
            .map(|c| c.ticket)
            .collect();
        tickets.sort();
        assert_eq!(tickets, vec![1, 2]);
    }
}
