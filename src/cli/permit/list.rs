use compliance::Config;

use crate::cli::terminal::Colorize;

pub fn run(config: &Config) {
    let registry = config.permits();
    let width = registry.iter().map(|p| p.id.len()).max().unwrap_or(0);

    for permit in registry.iter() {
        let active = permit.id == registry.active_id();
        let marker = if active { "*" } else { " " };
        let line = format!("{marker} {:<width$}  {}", permit.id, permit.name);
        if active {
            println!("{}", line.success());
        } else {
            println!("{line}");
        }
        if !permit.description.is_empty() {
            println!("    {}", permit.description.dim());
        }
    }

    if registry.active().is_none() {
        println!(
            "{}",
            format!(
                "⚠️  Active permit '{}' is not registered",
                registry.active_id()
            )
            .warning()
        );
    }
}
