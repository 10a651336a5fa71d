//! CLI domain: parse, route, output, and presentation only.
//! No reconcile logic lives here; the route table dispatches to the library.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, FillArg, RunArgs};
pub use presentation::{
    format_preview_json, format_preview_text, format_report_json, format_report_text,
};
pub use route::RunContext;
