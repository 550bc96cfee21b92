//! Overpass query generation.

/// Offset turning an OSM relation id into its Overpass area id.
pub const AREA_OFFSET: u64 = 3_600_000_000;

/// Returns the Overpass area id of a relation.
pub fn area_id(osmrelation: u64) -> u64 {
    osmrelation + AREA_OFFSET
}

/// Fills the `@RELATION@` and `@AREA@` placeholders of a query template.
pub fn render_template(template: &str, osmrelation: u64) -> String {
    template
        .replace("@RELATION@", &osmrelation.to_string())
        .replace("@AREA@", &area_id(osmrelation).to_string())
}

/// Builds an overpass turbo query fetching the named streets of a relation.
///
/// Each street is searched both as a member of the relation and inside its
/// area.
pub fn make_turbo_query_for_streets<S: AsRef<str>>(osmrelation: u64, streets: &[S]) -> String {
    let mut query = format!(
        "[out:json][timeout:425];\nrel({})->.searchRelation;\narea({})->.searchArea;\n(",
        osmrelation,
        area_id(osmrelation)
    );
    for street in streets {
        let street = escape_quotes(street.as_ref());
        query.push_str(&format!("way[\"name\"=\"{}\"](r.searchRelation);\n", street));
        query.push_str(&format!("way[\"name\"=\"{}\"](area.searchArea);\n", street));
    }
    query.push_str(");\nout body;\n>;\nout skel qt;");
    query
}

/// Escapes a value for use inside a double-quoted Overpass QL string.
fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
