use crate::error::DocDdlError;
use crate::schema::def::SchemaDef;

const BANKING_JSON: &str = include_str!("../../../../schemas/banking.json");

/// Available built-in schemas.
pub const BUILTIN_SCHEMAS: &[&str] = &["banking"];

/// Raw JSON of a built-in schema.
pub fn builtin_json(name: &str) -> Result<&'static str, DocDdlError> {
    match name {
        "banking" => Ok(BANKING_JSON),
        _ => Err(DocDdlError::SchemaInvalid(format!(
            "unknown built-in schema '{}'. Available: {}",
            name,
            BUILTIN_SCHEMAS.join(", ")
        ))),
    }
}

/// Load and validate a built-in schema by name.
pub fn load_builtin(name: &str) -> Result<SchemaDef, DocDdlError> {
    let schema: SchemaDef = serde_json::from_str(builtin_json(name)?)?;
    crate::schema::validate_schema(&schema)?;
    Ok(schema)
}

/// The fixed five-table banking schema.
pub fn banking() -> Result<SchemaDef, DocDdlError> {
    load_builtin("banking")
}
