use docddl_core::error::DocDdlError;
use docddl_core::extraction::docx::DocxExtractor;
use docddl_core::extraction::pdftotext::PdftotextExtractor;

use crate::output;
use crate::RunArgs;

pub fn run(args: &RunArgs, output_format: &str) -> Result<(), DocDdlError> {
    let options = super::scan_options(args)?;
    let pdf = PdftotextExtractor::new();
    let docx = DocxExtractor::new();
    let report = docddl_core::scan_directory(&args.dir, &[&pdf, &docx], &options)?;

    match output_format {
        "json" => output::json::print(&report)?,
        _ => print!("{}", output::table::format_report(&report)),
    }

    Ok(())
}
