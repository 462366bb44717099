//! WhatsApp chat bot: authorization-gated command routing over a WhatsApp
//! REST bridge.

pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod jobs;
pub mod runtime;
pub mod services;

pub use config::Config;
pub use dispatcher::{Collaborators, Dispatcher, DispatcherSettings, DropReason, Outcome};
pub use error::{AppError, AppResult, CollaboratorError};
pub use jobs::{AthMonitor, AthRecords, DailyNews, Schedule, ScheduledJobs};
pub use runtime::{run, RunStats};
pub use services::{AiService, MessageSender, NewsService, OpenAiService, PriceService};
