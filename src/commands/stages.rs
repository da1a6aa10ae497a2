use colored::*;
use eyre::Result;
use indexmap::IndexMap;

use crate::cli::OutputFormat;
use crate::formatter::stages::{self, header_lines};

pub fn run(role: Option<&str>, format: OutputFormat) -> Result<()> {
    match role {
        Some(role) => lookup(role, format),
        None => list(format),
    }
}

fn list(format: OutputFormat) -> Result<()> {
    let table: IndexMap<&str, &str> = stages::stages().collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&table)?),
        OutputFormat::Text => {
            println!("{}", "Deployment stages:".bold());
            println!();

            let width = table.keys().map(|role| role.len()).max().unwrap_or(0);
            for (index, (role, title)) in table.iter().enumerate() {
                let role = format!("{:<width$}", role, width = width);
                println!("  {:>2}. {}  {}", index + 1, role.cyan(), title);
            }
            println!();
            println!("  {} stages", table.len());
        }
    }

    Ok(())
}

fn lookup(role: &str, format: OutputFormat) -> Result<()> {
    let Some(title) = stages::stage_title(role) else {
        log::debug!("Stage lookup for unknown role '{}'", role);
        eprintln!("{} No stage is mapped to role: {}", "✗".red(), role);
        std::process::exit(1);
    };

    match format {
        OutputFormat::Json => {
            let entry = serde_json::json!({ "role": role, "title": title });
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        OutputFormat::Yaml => {
            let entry = IndexMap::from([("role", role), ("title", title)]);
            print!("{}", serde_yaml::to_string(&entry)?);
        }
        OutputFormat::Text => {
            for line in header_lines(title) {
                println!("{}", line);
            }
        }
    }

    Ok(())
}
