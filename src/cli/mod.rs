//! Command line interface for the release runner.

mod args;

pub use args::Args;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::runner::{Context, TaskOptions};
use crate::tasks;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let runner = tasks::registry();

    if args.list {
        for task in runner.tasks() {
            println!("{:24}{}", task.name, task.about);
        }
        return Ok(0);
    }

    args.validate().map_err(Error::InvalidArguments)?;

    let config = Config::load(args.config.as_deref())?;
    let ctx = Context {
        config,
        opts: TaskOptions {
            pyver: args.pyver.clone(),
            scratch: !args.no_scratch,
        },
    };

    let names: Vec<&str> = args.tasks.iter().map(String::as_str).collect();
    runner.run(&names, &ctx).await?;
    Ok(0)
}
