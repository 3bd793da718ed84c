use std::path::{Path, PathBuf};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::UnboundedSender;

use crate::event::Event;

/// Keeps the underlying watcher alive; dropping it stops following.
pub struct CaptureWatcher {
    _watcher: RecommendedWatcher,
}

/// Post `Event::CaptureChanged` whenever the capture file is written.
///
/// The parent directory is watched instead of the file so that editors and
/// exporters that replace the file by rename are still picked up.
pub fn follow(path: &Path, tx: UnboundedSender<Event>) -> notify::Result<CaptureWatcher> {
    let target = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let dir = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let file_name = target.file_name().map(|n| n.to_os_string());
    let changed = target.clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "capture watcher error");
                return;
            }
        };
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            return;
        }
        let ours = event
            .paths
            .iter()
            .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
        if ours {
            let _ = tx.send(Event::CaptureChanged(changed.clone()));
        }
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    tracing::info!(path = %target.display(), "following capture file");

    Ok(CaptureWatcher { _watcher: watcher })
}
