use std::path::Path;

use docddl_core::ddl;
use docddl_core::error::DocDdlError;
use docddl_core::schema::builtin;

pub fn show(custom: Option<&Path>) -> Result<(), DocDdlError> {
    let schema = super::active_schema(custom)?;
    print!("{}", ddl::render_schema(&schema));
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), DocDdlError> {
    let schema = docddl_core::schema::load_schema(file)?;

    println!("Schema '{}' (v{}) is valid.", schema.name, schema.version);
    println!(
        "  Tables: {}",
        schema
            .tables
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Views: {}", schema.views.len());

    let mut warnings = Vec::new();
    if schema.lineage_table.is_none() {
        warnings.push("no lineage_table set; document lineage rows will not be emitted".to_string());
    }
    for table in &schema.tables {
        let has_pk = table
            .constraints
            .iter()
            .any(|c| matches!(c, docddl_core::schema::def::ConstraintDef::PrimaryKey { .. }));
        if !has_pk {
            warnings.push(format!("table '{}' has no primary key", table.name));
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

pub fn dump() -> Result<(), DocDdlError> {
    print!("{}", builtin::builtin_json("banking")?);
    Ok(())
}
