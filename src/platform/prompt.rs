use std::sync::Mutex;

/// Blocking user dialogs shown by the popup.
pub trait UserPrompt: Send + Sync {
    /// Asks for confirmation before a destructive operation.
    fn confirm(&self, message: &str) -> bool;
    /// Shows a blocking notice, e.g. a validation failure.
    fn notify(&self, message: &str);
}

/// Prompt with a fixed answer that records every message it was shown.
#[derive(Debug)]
pub struct ScriptedPrompt {
    answer: bool,
    shown: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn accepting() -> Self {
        Self {
            answer: true,
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn declining() -> Self {
        Self {
            answer: false,
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.shown.lock().map(|m| m.clone()).unwrap_or_default()
    }

    fn record(&self, message: &str) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push(message.to_string());
        }
    }
}

impl UserPrompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.record(message);
        self.answer
    }

    fn notify(&self, message: &str) {
        self.record(message);
    }
}
