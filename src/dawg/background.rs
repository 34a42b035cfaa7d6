//! Runs a whole build on a background thread.

use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use log::debug;

use super::builder::{BuildReport, DawgBuilder};
use super::config::LexiconConfig;
use super::error::{DawgError, Result};

/// Handle to a build started with [`spawn_build`].
#[derive(Debug)]
pub struct BuildHandle {
    handle: JoinHandle<Result<BuildReport>>,
}

impl BuildHandle {
    /// Returns true once the build has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the build to finish.
    ///
    /// # Errors
    ///
    /// Returns the error of the build, or [`DawgError::ThreadPanic`] if the build thread
    /// panicked.
    pub fn join(self) -> Result<BuildReport> {
        self.handle.join().map_err(|e| {
            let panic_msg = if let Some(s) = e.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = e.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            DawgError::ThreadPanic(panic_msg)
        })?
    }
}

/// Inserts `words`, compresses and saves to `path` on a new thread.
///
/// The build cannot be cancelled once started. The output file only appears once it has
/// been completely written.
///
/// ```no_run
/// use lexdawg::{spawn_build, LexiconConfig};
///
/// let words = vec!["ALFA".to_string(), "BRAVO".to_string()];
/// let handle = spawn_build(LexiconConfig::default(), words, "words.dawg");
/// let report = handle.join().unwrap();
/// assert_eq!(report.num_words, 2);
/// ```
pub fn spawn_build<I>(config: LexiconConfig, words: I, path: impl Into<PathBuf>) -> BuildHandle
where
    I: IntoIterator<Item = String> + Send + 'static,
{
    let path = path.into();
    let handle = thread::spawn(move || -> Result<BuildReport> {
        debug!("Background build of '{}' started", config.name);
        let mut builder = DawgBuilder::new(config);
        for word in words {
            builder.add_word(word)?;
        }
        builder.compress()?;
        builder.save(&path)?;
        builder.report()
    });
    BuildHandle { handle }
}
