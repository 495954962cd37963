/*

    Cull bounding volumes against view frustums given in
    JSON culling queries, and print one report per query.

    Usage: cull [query.json | directory]

    @date: 26 Nov, 2025
    @author: Bartu

*/

use std::{self, env, path::{Path, PathBuf}};
use tracing::{info, warn, error, debug};
use tracing_subscriber;
use walkdir::WalkDir;

use frustum_bounds::culling::CullingQuery;
use frustum_bounds::json_parser::load_json;

fn collect_queries(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {

    // Logging on console
    tracing_subscriber::fmt::init();

    // Parse args
    let args: Vec<String> = env::args().collect();
    let query_path: &str = if args.len() == 1 {
        warn!("No arguments were provided, setting default query path...");
        "./queries"
    } else if args.len() == 2 {
        &args[1]
    } else {
        error!("Usage: {} [query.json | directory]", args[0]);
        std::process::exit(1);
    };

    let paths = collect_queries(Path::new(query_path));
    if paths.is_empty() {
        error!("No culling queries found under {}", query_path);
        std::process::exit(1);
    }
    info!("Found {} culling queries under {}", paths.len(), query_path);

    let mut failures = 0;
    for path in paths.iter() {
        let query: CullingQuery = match load_json(path) {
            Ok(query) => query,
            Err(e) => {
                error!("Failed to load query: {}", e);
                failures += 1;
                continue;
            }
        };
        debug!("Loaded query {:#?}", query);

        match query.run() {
            Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
            Err(e) => {
                error!("Failed to run {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} queries failed", failures, paths.len()).into());
    }
    info!("Finished execution.");
    Ok(())
}
