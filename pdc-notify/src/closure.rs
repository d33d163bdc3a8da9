//! Location closure resolver
//!
//! Computes the descendant set of a location (self included) over the
//! directed `location_containment` relation. The closure is expressed as a
//! recursive CTE so the reconciler can join against it as a sub-relation
//! instead of materializing location id lists application-side. Identity
//! pairs are synthesized here; they are never stored.

use pdc_common::Result;
use sqlx::SqlitePool;
use std::collections::HashSet;

/// Recursive CTE body producing `(root_id, location_id)` closure pairs.
///
/// Every location is its own dependent; beyond that, rows follow
/// `location_containment` edges transitively. `UNION` (not `UNION ALL`)
/// deduplicates, so diamond-shaped containment terminates and yields each
/// pair once. Embed as `WITH RECURSIVE {LOCATION_CLOSURE_CTE} ...`.
pub const LOCATION_CLOSURE_CTE: &str = "\
location_closure(root_id, location_id) AS (\
    SELECT id, id FROM locations \
    UNION \
    SELECT location_closure.root_id, lc.dependent_location_id \
    FROM location_closure \
    JOIN location_containment lc ON lc.parent_location_id = location_closure.location_id\
)";

/// All locations contained within `location_id`, inclusive of itself
pub async fn descendants_of(pool: &SqlitePool, location_id: i64) -> Result<HashSet<i64>> {
    let sql = format!(
        "WITH RECURSIVE {LOCATION_CLOSURE_CTE} \
         SELECT location_id FROM location_closure WHERE root_id = ?"
    );
    let ids: Vec<i64> = sqlx::query_scalar(&sql)
        .bind(location_id)
        .fetch_all(pool)
        .await?;

    Ok(ids.into_iter().collect())
}
