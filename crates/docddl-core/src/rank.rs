use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::model::{ExtractedTable, TableId};

/// Order table identities by descending score.
///
/// Ties fall back to source document name, then table index, then format,
/// so the result never depends on input order.
pub fn rank(scores: &BTreeMap<TableId, Decimal>) -> Vec<(TableId, Decimal)> {
    let mut ranked: Vec<(TableId, Decimal)> =
        scores.iter().map(|(id, s)| (id.clone(), *s)).collect();
    ranked.sort_by(|(id_a, s_a), (id_b, s_b)| compare(id_a, *s_a, id_b, *s_b));
    ranked
}

/// Rank extracted tables, consuming them.
pub fn rank_tables(tables: Vec<ExtractedTable>) -> Vec<ExtractedTable> {
    let scores: BTreeMap<TableId, Decimal> =
        tables.iter().map(|t| (t.id.clone(), t.score())).collect();
    let mut by_id: HashMap<TableId, ExtractedTable> =
        tables.into_iter().map(|t| (t.id.clone(), t)).collect();

    rank(&scores)
        .into_iter()
        .filter_map(|(id, _)| by_id.remove(&id))
        .collect()
}

fn compare(id_a: &TableId, score_a: Decimal, id_b: &TableId, score_b: Decimal) -> Ordering {
    score_b
        .cmp(&score_a)
        .then_with(|| id_a.source.cmp(&id_b.source))
        .then_with(|| id_a.index.cmp(&id_b.index))
        .then_with(|| id_a.format.cmp(&id_b.format))
}
