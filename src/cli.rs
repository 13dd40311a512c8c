//! CLI domain: parse, route, output and presentation only.
//! No domain orchestration; the route table dispatches to the sync service.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, ProposeKind};
pub use presentation::{
    format_ngrams, format_queue_status, format_queue_status_text, format_sync_outcome,
};
pub use route::RunContext;
