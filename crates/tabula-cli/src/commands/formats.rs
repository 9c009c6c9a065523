//! Formats command - list what can be read and written.

use colored::Colorize;
use tabula::Tabula;

use super::{CommandResult, Output};

pub fn run(tabula: &Tabula, json_output: bool, out: &Output) -> CommandResult {
    if json_output {
        return out.report(tabula.list_formats());
    }

    let formats = tabula.registry().describe_formats();
    println!("{} ({})", "Supported formats".cyan().bold(), formats.len());
    println!();

    for format in formats {
        let access = match (format.supports_read, format.supports_write) {
            (true, true) => "read/write".green(),
            (true, false) => "read only".yellow(),
            _ => "write only".yellow(),
        };
        println!(
            "  {:<8} {:<11} {}",
            format.identifier.white().bold(),
            access,
            format.description
        );
        println!(
            "  {:<8} {}",
            "",
            format!("extensions: {}", format.extensions.join(", ")).dimmed()
        );
    }

    Ok(())
}
