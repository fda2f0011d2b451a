use crate::core::{
    deps::{Deps, SessionActivity},
    error::Result,
    output::{print_destinations, print_warning},
    pipeline::Resolver,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Emit the records as a JSON array instead of picker lines
    pub json: bool,
    /// Skip the session feed entirely
    pub no_sessions: bool,
}

pub fn execute_list(deps: &Deps, config_file: Option<PathBuf>, options: ListOptions) -> Result<()> {
    let resolver = Resolver::initialize(deps, config_file)?;
    for warning in &resolver.config.warnings {
        print_warning(warning);
    }

    let history = resolver.load_history();
    let live_activity = if options.no_sessions {
        SessionActivity::new()
    } else {
        deps.sessions.activity()
    };

    let destinations = resolver.resolve_destinations(&history, &live_activity)?;
    log::debug!("Listing {} destinations", destinations.len());

    if options.json {
        println!("{}", serde_json::to_string_pretty(&destinations)?);
    } else {
        print_destinations(&destinations);
    }

    Ok(())
}
