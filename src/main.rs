mod app;
mod args;
mod config;
mod entry;
mod error;
mod logger;
mod observe;
mod shutdown;
mod sinks;
mod trace;
mod vitals;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
