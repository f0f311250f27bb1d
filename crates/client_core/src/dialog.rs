use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub text: String,
    /// Auto-dismiss after this many milliseconds instead of waiting for the user.
    pub auto_close_ms: Option<u64>,
}

impl Notice {
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error!".to_string(),
            text: text.into(),
            auto_close_ms: None,
        }
    }

    pub fn no_data() -> Self {
        Self {
            kind: NoticeKind::Info,
            title: "No Data".to_string(),
            text: "There is no data to export".to_string(),
            auto_close_ms: None,
        }
    }

    pub fn row_deleted() -> Self {
        Self {
            kind: NoticeKind::Success,
            title: "Deleted!".to_string(),
            text: "The row has been deleted.".to_string(),
            auto_close_ms: Some(1500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub text: String,
    pub confirm_label: String,
}

impl ConfirmPrompt {
    pub fn delete_row() -> Self {
        Self {
            title: "Are you sure?".to_string(),
            text: "You won't be able to revert this!".to_string(),
            confirm_label: "Yes, delete it!".to_string(),
        }
    }
}

/// Modal confirm/notify surface. Both calls block the flow that issued them
/// until the user (or the auto-close timer) dismisses the dialog.
#[async_trait]
pub trait DialogService: Send + Sync {
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool;
    async fn notify(&self, notice: Notice);
}
