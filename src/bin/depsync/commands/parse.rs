//! `depsync parse` command
//!
//! Normalizes a manifest without contacting the inventory.

use anyhow::Result;

use crate::cli::ParseArgs;
use crate::commands::read_manifest;
use depsync::parsers;

pub fn execute(args: ParseArgs) -> Result<()> {
    let manifest = read_manifest(&args.manifest)?;
    let other = args.other.as_deref().map(read_manifest).transpose()?;

    let deps = parsers::normalize(args.format, &manifest, other.as_deref())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&deps)?);
    } else {
        for dep in &deps {
            println!("{} {}", dep.name(), dep.version());
        }
    }

    tracing::info!("Found {} {} dependencies", deps.len(), args.format);
    Ok(())
}
