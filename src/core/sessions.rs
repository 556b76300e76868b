use crate::config::Config;
use crate::core::bridge::{InterpreterSession, TaskDescriptor};
use crate::errors::{AppError, AppResult};

/// The two interpreter sessions a run needs.
pub struct Sessions {
    pub extractor: InterpreterSession,
    pub freeform: InterpreterSession,
}

impl Sessions {
    pub fn start(cfg: &Config) -> AppResult<Self> {
        let extractor = TaskDescriptor::for_script("intent", &cfg.intent_script, cfg)?;
        let freeform = TaskDescriptor::for_script("custom", &cfg.custom_script, cfg)?;
        Self::start_tasks(&extractor, &freeform)
    }

    /// Start both tasks. If the second one fails the first is shut down before
    /// the startup error is returned.
    pub fn start_tasks(extractor: &TaskDescriptor, freeform: &TaskDescriptor) -> AppResult<Self> {
        let extractor = InterpreterSession::start(extractor)?;
        let freeform = match InterpreterSession::start(freeform) {
            Ok(session) => session,
            Err(e) => {
                // a failed close still kills the child on drop
                let _ = extractor.close();
                return Err(e);
            }
        };

        Ok(Self {
            extractor,
            freeform,
        })
    }

    /// Close both sessions; returns every shutdown error instead of stopping at the first.
    pub fn close(self) -> Vec<AppError> {
        let mut errors = Vec::new();
        if let Err(e) = self.freeform.close() {
            errors.push(e);
        }
        if let Err(e) = self.extractor.close() {
            errors.push(e);
        }
        errors
    }
}
