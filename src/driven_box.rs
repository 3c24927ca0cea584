use anyhow::Context;
use tracing::{ info, warn, Level };
use driven_box::{
    config::{ Config, CONFIG_FILE },
    output,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let config = Config::load_or_default(CONFIG_FILE)
        .with_context(|| format!("loading {}", CONFIG_FILE))?;
    if let Some(threads) = config.run.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring thread pool")?;
    }

    let summary = output::run(&config)?;
    if let Some(first) = summary.first {
        info!("first: {}", first);
    }
    if let Some(last) = summary.last {
        info!("last:  {}", last);
    }
    if let Some(bad) = summary.diverged {
        warn!("run stopped early at t = {} (norm = {})", bad.time, bad.norm);
    }

    println!("done");
    Ok(())
}
