//! SQL templates and the names they are registered under.
//!
//! Every query the API can run lives here. Handlers never build SQL.

use crate::config::VerseFilter;

use super::errors::StoreResult;
use super::registry::StatementRegistry;

pub const VERSE: &str = "apb-verse";
pub const RELATED_VERSES: &str = "apb-related-verse";
pub const NORTH_AMERICA: &str = "ne-north-america";
pub const COUNTIES_IN_STATE: &str = "pop-places-counties-in-state";
pub const PLACES_IN_COUNTY: &str = "pop-places-places-in-county";
pub const PLACES_IN_STATE: &str = "pop-places-places-in-state";
pub const PLACE_DETAILS: &str = "pop-places-details";

// Returns every verse that has not been explicitly disallowed.
const VERSE_PERMISSIVE_SQL: &str = "
    SELECT v.reference_id, s.text
    FROM apb.verse_cleanup v
    LEFT JOIN apb.scriptures s
        ON v.reference_id = s.reference_id
    WHERE
        v.reference_id = $1 AND
        (v.use = TRUE OR v.use IS NULL) AND
        s.version = 'KJV'
";

// Returns only verses that have been explicitly allowed.
const VERSE_STRICT_SQL: &str = "
    SELECT v.reference_id, s.text
    FROM apb.verse_cleanup v
    LEFT JOIN apb.scriptures s
        ON v.reference_id = s.reference_id
    WHERE
        v.reference_id = $1 AND
        v.use = TRUE AND
        s.version = 'KJV'
";

const RELATED_VERSES_SQL: &str = "
    SELECT reference_id
    FROM apb.verse_cleanup
    WHERE reference_use = $1 AND reference_id != reference_use
    ORDER BY reference_id
";

const NORTH_AMERICA_SQL: &str = "
    SELECT json_build_object(
        'type', 'FeatureCollection',
        'features', COALESCE(json_agg(countries.feature), '[]'::json)
    )::text
    FROM (
        SELECT json_build_object(
            'type', 'Feature',
            'id', adm0_a3,
            'properties', json_build_object('name', name),
            'geometry', ST_AsGeoJSON(geom_50m, 6)::json
        ) AS feature
        FROM naturalearth.countries
        WHERE continent = 'North America' AND adm0_a3 != 'GRL' AND geom_50m IS NOT NULL
    ) AS countries
";

const COUNTIES_IN_STATE_SQL: &str = "
    SELECT DISTINCT county_ahcb, county
    FROM popplaces_1926
    WHERE state = $1
    ORDER BY county
";

const PLACES_IN_COUNTY_SQL: &str = "
    SELECT place_id, place
    FROM popplaces_1926
    WHERE county_ahcb = $1
    ORDER BY place
";

const PLACES_IN_STATE_SQL: &str = "
    SELECT place_id, place
    FROM popplaces_1926
    WHERE state = $1
    ORDER BY place
";

const PLACE_DETAILS_SQL: &str = "
    SELECT place_id, place, county, county_ahcb, state
    FROM popplaces_1926
    WHERE place_id = $1
";

/// The verse lookup matching the configured filter
pub fn verse_sql(filter: VerseFilter) -> &'static str {
    match filter {
        VerseFilter::Permissive => VERSE_PERMISSIVE_SQL,
        VerseFilter::Strict => VERSE_STRICT_SQL,
    }
}

/// Build the registry holding every statement the API serves
pub fn standard_registry(filter: VerseFilter) -> StoreResult<StatementRegistry> {
    let mut registry = StatementRegistry::new();
    registry.register(VERSE, verse_sql(filter))?;
    registry.register(RELATED_VERSES, RELATED_VERSES_SQL)?;
    registry.register(NORTH_AMERICA, NORTH_AMERICA_SQL)?;
    registry.register(COUNTIES_IN_STATE, COUNTIES_IN_STATE_SQL)?;
    registry.register(PLACES_IN_COUNTY, PLACES_IN_COUNTY_SQL)?;
    registry.register(PLACES_IN_STATE, PLACES_IN_STATE_SQL)?;
    registry.register(PLACE_DETAILS, PLACE_DETAILS_SQL)?;
    Ok(registry)
}
