use docddl_core::ddl::draft;
use docddl_core::error::DocDdlError;
use docddl_core::extraction::docx::DocxExtractor;
use docddl_core::extraction::pdftotext::PdftotextExtractor;
use docddl_core::RunOptions;
use tracing::info;

use crate::output;
use crate::RunArgs;

pub fn run(args: &RunArgs, quiet: bool) -> Result<(), DocDdlError> {
    let schema = super::active_schema(args.schema.as_deref())?;
    let options = RunOptions {
        input_dir: args.dir.clone(),
        tables_out: args.tables_out.clone(),
        views_out: args.views_out.clone(),
        top: args.top,
        scan: super::scan_options(args)?,
    };

    let pdf = PdftotextExtractor::new();
    let docx = DocxExtractor::new();
    let generated = chrono::Local::now().date_naive();
    let outcome = docddl_core::generate(&options, &schema, &[&pdf, &docx], generated)?;

    if let Some(ref path) = args.report {
        output::json::write_report(&outcome.report, path)?;
        info!(path = %path.display(), "wrote quality report");
    }

    let drafts = match args.drafts {
        Some(ref dir) => draft::write_drafts(&outcome.report.ranked, dir)?.len(),
        None => 0,
    };

    if !quiet {
        let report = &outcome.report;
        println!(
            "Processed {} document(s): {} PDF table(s), {} DOCX table(s)",
            report.documents.len(),
            report.pdf_tables,
            report.docx_tables
        );
        println!("  Tables DDL: {}", outcome.written.tables.display());
        println!("  Views DDL:  {}", outcome.written.views.display());
        if let Some(ref dir) = args.drafts {
            println!("  Drafts:     {} file(s) under {}", drafts, dir.display());
        }
    }

    Ok(())
}
