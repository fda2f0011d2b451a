use crate::core::{deps::Deps, error::Result, output::print_warning, pipeline::Resolver};
use std::path::PathBuf;

/// Print the reduced project directories with their display depth, one
/// `path<TAB>depth` line each, in config order
pub fn execute_paths(deps: &Deps, config_file: Option<PathBuf>) -> Result<()> {
    let resolver = Resolver::initialize(deps, config_file)?;
    for warning in &resolver.config.warnings {
        print_warning(warning);
    }

    for resolved in resolver.resolve_paths() {
        println!("{}\t{}", resolved.path.display(), resolved.display_depth);
    }

    Ok(())
}
