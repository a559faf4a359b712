//! Process-wide command routing to the live timer engine

use std::{
    fmt,
    str::FromStr,
    sync::{Arc, OnceLock, PoisonError, RwLock, Weak},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::TimerEngine;

static GLOBAL_ROUTER: OnceLock<Arc<CommandRouter>> = OnceLock::new();

/// Commands deliverable from outside the normal call chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    TogglePauseResume,
    Stop,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::TogglePauseResume => "TOGGLE_PAUSE_RESUME",
            Command::Stop => "STOP",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command name outside the known vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command: {}", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for Command {
    type Err = UnknownCommand;

    /// Accepts `TOGGLE_PAUSE_RESUME` and `STOP`, optionally prefixed with
    /// `ACTION_` as notification actions name them, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let name = normalized.strip_prefix("ACTION_").unwrap_or(&normalized);
        match name {
            "TOGGLE_PAUSE_RESUME" => Ok(Command::TogglePauseResume),
            "STOP" => Ok(Command::Stop),
            _ => Err(UnknownCommand(s.to_string())),
        }
    }
}

/// What happened to a dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    Delivered,
    /// No engine is registered, or it has been dropped
    NoEngine,
    /// The command name was not recognised
    Ignored,
}

/// Lookup from out-of-band command sources to the active engine.
///
/// Holds only a weak reference, so registering never extends the engine's
/// lifetime.
#[derive(Debug, Default)]
pub struct CommandRouter {
    engine: RwLock<Weak<TimerEngine>>,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self {
            engine: RwLock::new(Weak::new()),
        }
    }

    /// The router shared by the whole process
    pub fn global() -> Arc<CommandRouter> {
        Arc::clone(GLOBAL_ROUTER.get_or_init(|| Arc::new(CommandRouter::new())))
    }

    /// Make `engine` the target of future commands, replacing any previous one
    pub fn register(&self, engine: &Arc<TimerEngine>) {
        *self.engine.write().unwrap_or_else(PoisonError::into_inner) = Arc::downgrade(engine);
        info!("Timer engine registered with command router");
    }

    pub fn unregister(&self) {
        *self.engine.write().unwrap_or_else(PoisonError::into_inner) = Weak::new();
        debug!("Command router cleared");
    }

    pub fn engine(&self) -> Option<Arc<TimerEngine>> {
        self.engine
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .upgrade()
    }

    /// Deliver `command` to the registered engine, or drop it if there is none
    pub fn dispatch(&self, command: Command) -> DispatchOutcome {
        // Release the registry lock before touching the engine
        let Some(engine) = self.engine() else {
            debug!("No engine registered, dropping {}", command);
            return DispatchOutcome::NoEngine;
        };

        info!("Dispatching {}", command);
        match command {
            Command::TogglePauseResume => engine.toggle_pause_resume(),
            Command::Stop => engine.reset_timer(),
        }
        DispatchOutcome::Delivered
    }

    /// Parse and deliver a command by name; unknown names are ignored
    pub fn dispatch_str(&self, name: &str) -> DispatchOutcome {
        match name.parse::<Command>() {
            Ok(command) => self.dispatch(command),
            Err(e) => {
                debug!("Ignoring {}", e);
                DispatchOutcome::Ignored
            }
        }
    }
}
