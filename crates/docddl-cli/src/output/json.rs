use std::path::Path;

use docddl_core::ddl;
use docddl_core::error::DocDdlError;
use docddl_core::model::QualityReport;

pub fn print(report: &QualityReport) -> Result<(), DocDdlError> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

pub fn write_report(report: &QualityReport, path: &Path) -> Result<(), DocDdlError> {
    let json = serde_json::to_string_pretty(report)?;
    ddl::write_file(path, &json)
}
