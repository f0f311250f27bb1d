use std::{
    io::{self, BufRead, Write},
    time::Duration,
};

use async_trait::async_trait;
use client_core::{ConfirmPrompt, DialogService, Notice, NoticeKind};
use tracing::warn;

/// Answers dialogs on the terminal. Prompts go to stderr so stdout stays
/// clean for rendered output.
pub struct TerminalDialogs {
    assume_yes: bool,
}

impl TerminalDialogs {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl DialogService for TerminalDialogs {
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        eprintln!("{}\n{}", prompt.title, prompt.text);
        if self.assume_yes {
            eprintln!("{} (--yes)", prompt.confirm_label);
            return true;
        }

        let label = prompt.confirm_label;
        let answer = tokio::task::spawn_blocking(move || -> io::Result<String> {
            eprint!("{label} [y/N] ");
            io::stderr().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_yes(&line),
            Ok(Err(error)) => {
                warn!(%error, "failed to read confirmation");
                false
            }
            Err(error) => {
                warn!(%error, "confirmation prompt aborted");
                false
            }
        }
    }

    async fn notify(&self, notice: Notice) {
        eprintln!("{}", format_notice(&notice));
        if let Some(ms) = notice.auto_close_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

pub fn is_yes(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn format_notice(notice: &Notice) -> String {
    let marker = match notice.kind {
        NoticeKind::Info => "i",
        NoticeKind::Success => "+",
        NoticeKind::Error => "!",
    };
    format!("[{marker}] {} {}", notice.title, notice.text)
}
