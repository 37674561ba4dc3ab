pub mod generate;
pub mod scan;
pub mod schema;

use std::path::Path;

use docddl_core::error::DocDdlError;
use docddl_core::quality::ScoreWeights;
use docddl_core::schema::builtin;
use docddl_core::schema::def::SchemaDef;
use docddl_core::ScanOptions;

use crate::RunArgs;

/// The custom schema when given, otherwise the built-in banking schema.
pub fn active_schema(path: Option<&Path>) -> Result<SchemaDef, DocDdlError> {
    match path {
        Some(path) => docddl_core::schema::load_schema(path),
        None => builtin::banking(),
    }
}

pub fn scan_options(args: &RunArgs) -> Result<ScanOptions, DocDdlError> {
    let weights = match args.completeness_weight {
        Some(share) => ScoreWeights::from_completeness_share(share)?,
        None => ScoreWeights::default(),
    };
    Ok(ScanOptions {
        min_rows: args.min_rows,
        weights,
    })
}
