use chrono::Utc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One user-visible notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub timestamp: String,
    pub level: LogLevel,
    pub title: String,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    pub entries: Vec<Notice>,
}

impl ActivityLog {
    pub fn push(&mut self, level: LogLevel, title: &str, message: &str) {
        match level {
            LogLevel::Error => tracing::error!("{title}: {message}"),
            LogLevel::Warning => tracing::warn!("{title}: {message}"),
            LogLevel::Info | LogLevel::Success => tracing::info!("{title}: {message}"),
        }
        self.entries.push(Notice {
            timestamp: current_time(),
            level,
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.entries.last()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.level == LogLevel::Error)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn current_time() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}
