use crate::model::Grid;

/// Clean a raw cell: CR/LF become spaces, whitespace runs collapse, ends are trimmed.
pub fn clean_cell(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean every cell and drop rows with no cells at all.
pub fn clean_grid(raw: Grid) -> Grid {
    raw.into_iter()
        .filter(|row| !row.is_empty())
        .map(|row| row.iter().map(|c| clean_cell(c)).collect())
        .collect()
}

/// Pad ragged rows with empty cells up to the widest row.
pub fn pad_grid(grid: &[Vec<String>]) -> Grid {
    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    grid.iter()
        .map(|row| {
            let mut padded = row.clone();
            padded.resize(width, String::new());
            padded
        })
        .collect()
}

/// Turn a header cell into an SQL identifier.
///
/// Steps:
/// 1. Trim and replace whitespace runs with `_`
/// 2. Drop anything that is not alphanumeric or `_`
/// 3. Uppercase
/// 4. Prefix `C_` if the result starts with a digit; `COL` if nothing is left
pub fn clean_column_name(raw: &str) -> String {
    let joined = raw.split_whitespace().collect::<Vec<_>>().join("_");
    let mut name: String = joined
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_uppercase)
        .collect();

    if name.is_empty() {
        return "COL".into();
    }
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert_str(0, "C_");
    }
    name
}

/// Make cleaned column names unique by suffixing repeats with `_2`, `_3`, ...
pub fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        let mut n = 2;
        while seen.contains(&candidate) {
            candidate = format!("{name}_{n}");
            n += 1;
        }
        seen.push(candidate);
    }
    seen
}
