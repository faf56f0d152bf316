use crate::{AssetError, EnvironmentMap};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// One-shot background decode of an environment map.
///
/// `poll` is non-blocking and yields the result exactly once; afterwards it
/// returns `None` forever.
#[derive(Debug)]
pub struct EnvironmentLoad {
    path: PathBuf,
    rx: Option<Receiver<Result<EnvironmentMap, AssetError>>>,
}

impl EnvironmentLoad {
    pub fn spawn(path: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let path = path.into();
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        thread::Builder::new()
            .name("env-loader".into())
            .spawn(move || {
                let result = EnvironmentMap::load(&worker_path);
                // Receiver gone means nobody wants the result any more.
                let _ = tx.send(result);
            })?;
        tracing::info!(path = %path.display(), "environment load started");
        Ok(Self { path, rx: Some(rx) })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// True once the result has been handed out.
    pub fn is_finished(&self) -> bool {
        self.rx.is_none()
    }

    pub fn poll(&mut self) -> Option<Result<EnvironmentMap, AssetError>> {
        let rx = self.rx.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(AssetError::Disconnected),
        };
        self.rx = None;
        self.log(&result);
        Some(result)
    }

    /// Block until the worker finishes.
    pub fn wait(mut self) -> Result<EnvironmentMap, AssetError> {
        let rx = self.rx.take().ok_or(AssetError::Disconnected)?;
        let result = rx.recv().unwrap_or(Err(AssetError::Disconnected));
        self.log(&result);
        result
    }

    fn log(&self, result: &Result<EnvironmentMap, AssetError>) {
        match result {
            Ok(env) => tracing::info!(
                path = %self.path.display(),
                width = env.width,
                height = env.height,
                "environment map loaded"
            ),
            Err(e) => tracing::error!(path = %self.path.display(), "environment map failed: {e}"),
        }
    }
}
