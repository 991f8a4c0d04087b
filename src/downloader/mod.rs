pub mod error;
pub mod models;
pub mod notify;
pub mod observer;
pub mod progress;
pub mod task;
pub mod transport;

pub use error::DownloadError;
pub use models::{DownloadRequest, Priority, TaskState, Token};
#[allow(deprecated)]
pub use notify::{DownloadEvent, set_max_concurrent_downloads, subscribe};
pub use observer::DownloadObserver;
pub use task::DownloadTask;
pub use transport::{HttpTransport, Transport, TransportResponse};
