use std::sync::Arc;

use crate::loader::ModuleUnit;
use crate::services::{Colors, Console};

/// User-facing message printer: `[<prefix>] <title> <message>`
pub struct Log {
    console: Arc<dyn Console>,
    colors: Colors,
    prefix: String,
}

impl Log {
    #[must_use]
    pub fn new(console: Arc<dyn Console>, colors: Colors, prefix: impl Into<String>) -> Self {
        Log {
            console,
            colors,
            prefix: prefix.into(),
        }
    }

    /// Render a line; empty parts are left out together with their separator.
    #[must_use]
    pub fn format(&self, title: &str, message: Option<&str>) -> String {
        let mut line = self.colors.yellow(&format!("[{}]", self.prefix));
        if !title.is_empty() {
            line.push_str(&self.colors.blue(&format!(" {title}")));
        }
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            line.push_str(&self.colors.gray(&format!(" {message}")));
        }
        line
    }

    pub fn debug(&self, title: &str, message: Option<&str>) {
        self.console.log(&self.format(title, message));
    }
}

impl std::fmt::Debug for Log {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Log")
            .field("prefix", &self.prefix)
            .field("colors", &self.colors)
            .finish_non_exhaustive()
    }
}

#[must_use]
pub fn unit() -> ModuleUnit {
    ModuleUnit::new("log", |deps| {
        let services = deps.services();
        Ok(Log::new(
            Arc::clone(&services.console),
            services.colors,
            services.settings.prefix.clone(),
        ))
    })
}
