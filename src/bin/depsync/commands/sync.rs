//! `depsync sync` command

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::SyncArgs;
use crate::commands::read_manifest;
use depsync::util::config::{global_config_path, load_config, project_config_path, Config};
use depsync::{ComponentCache, ComponentStatus, Reconciler, SyncRequest};

pub fn execute(args: SyncArgs) -> Result<()> {
    let config = load(&args)?;

    // Set up rayon thread pool
    if let Some(j) = args.jobs.or(config.sync.jobs) {
        rayon::ThreadPoolBuilder::new()
            .num_threads(j)
            .build_global()
            .ok(); // Ignore if already set
    }

    let reconciler = Reconciler::from_config(&config, Arc::new(ComponentCache::new()))?;

    let mut request = SyncRequest::new(
        args.format,
        read_manifest(&args.manifest)?,
        args.vcs_host,
        args.repository,
    );
    if let Some(path) = &args.manifest_other {
        request = request.with_manifest_other(read_manifest(path)?);
    }
    if let Some(application) = args.application {
        request = request.with_application(application);
    }
    if let Some(language) = args.language {
        request = request.with_language(language, args.language_version);
    }

    let counts = reconciler.process_request(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        for (status, n) in counts.iter() {
            println!("{:>9} {}", status, n);
        }
    }

    if counts.get(ComponentStatus::Created) > 0 {
        println!("created");
    } else {
        println!("ok");
    }

    Ok(())
}

fn load(args: &SyncArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir().context("failed to get current directory")?;
            let global = global_config_path().unwrap_or_default();
            load_config(&global, &project_config_path(&cwd))
        }
    };
    config.apply_env();

    tracing::debug!("Using config: {:?}", config);
    Ok(config)
}
