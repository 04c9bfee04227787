use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::model::Talk;

pub mod formatters;

pub use formatters::*;

/// Save extraction results to file
pub fn save_to_file(talks: &[Talk], path: &Path, format: &OutputFormat) -> Result<()> {
    let content = render(talks, format)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print extraction results to console
pub fn print_to_console(talks: &[Talk], format: &OutputFormat) -> Result<()> {
    println!("{}", render(talks, format)?);
    Ok(())
}

fn render(talks: &[Talk], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => format_as_json(talks),
        OutputFormat::Csv => Ok(format_as_csv(talks)),
        OutputFormat::Txt => Ok(format_as_txt(talks)),
    }
}
