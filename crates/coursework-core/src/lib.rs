pub mod cli;
pub mod columns;
pub mod config;
pub mod datetime;
pub mod feed;
pub mod render;
pub mod store;
pub mod task;
pub mod textcase;
pub mod view;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info, warn};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = cli::GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(verbose = cli.verbose, quiet = cli.quiet, "starting coursework CLI");

    let mut cfg = config::Config::load(cli.courserc.as_deref())?;
    cfg.apply_overrides(
        cli.rc_overrides
            .into_iter()
            .map(|kv| (kv.key, kv.value)),
    );

    let feed_path = config::resolve_feed_path(&cfg, cli.feed.as_deref())
        .context("failed to resolve feed path")?;
    let feed = feed::TaskFeed::load(&feed_path)
        .with_context(|| format!("failed to load feed from {}", feed_path.display()))?;

    let user_id = cli.user.unwrap_or(feed.current_user_id);
    debug!(user_id, "resolved current participant");

    let mut view = view::TaskListView::from_feed(feed, user_id);
    for id in cli.toggle {
        if !view.toggle(id) {
            warn!(id, "toggle target not in task list");
        }
    }

    let mut renderer = render::Renderer::new(&cfg)?;
    renderer.print_sidebar_summary(&view)?;
    renderer.print_task_table(&view)?;

    info!("done");
    Ok(())
}
