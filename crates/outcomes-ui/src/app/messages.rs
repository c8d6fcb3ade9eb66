use outcomes_core::{FetchError, VerdictData};

/// Messages from background tasks to the view owner.
#[derive(Debug)]
pub enum BackgroundMessage {
    /// A verdict fetch finished, successfully or not
    VerdictFetched {
        request_id: u64,
        result: Result<VerdictData, FetchError>,
    },
    /// A background task panicked before it could report back
    TaskCrashed {
        task_name: &'static str,
        detail: String,
    },
}
