//! Init command - write an example config file

use anyhow::Result;
use console::style;
use repocat::config::Config;
use std::path::Path;

/// Write the example config to `path`, or to the user config location
pub fn run(path: Option<&Path>) -> Result<()> {
    let (config_path, created) = match path {
        Some(p) => (p.to_path_buf(), Config::write_example(p)?),
        None => {
            let p = Config::user_config_path()
                .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
            let created = Config::write_example(&p)?;
            (p, created)
        }
    };

    if created {
        println!(
            "{} Created {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
    } else {
        println!(
            "{} Config already exists at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
    }
    println!(
        "\nSet {} and {} (or edit the file) before running {}.",
        style("OPENROUTER_API_KEY").bold(),
        style("TOGETHER_API_KEY").bold(),
        style("repocat analyze").cyan()
    );
    Ok(())
}
