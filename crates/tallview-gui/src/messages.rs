use std::path::PathBuf;

use tallview_core::config::ViewerConfig;

/// Results delivered to the UI thread from file-dialog helper threads.
pub enum UiMessage {
    /// A file was picked in the open dialog.
    OpenFile { path: PathBuf },
    /// A TOML config was read and parsed.
    ConfigImported { config: ViewerConfig },
    /// Something worth showing in the log area.
    Log { message: String },
}
