//! The dashboard's built-in functions.

use crate::{FunctionCatalog, PlotFunction};
use gdelt_params::{
    CategoryParameter, CategoryTable, CategoryTables, ParameterKind, ParameterSpec,
};
use gdelt_types::{
    ChartKind, ParamValue, ParameterValues, PlotRenderer, Selection, ValidationError,
};
use std::sync::Arc;

/// Upper bound (exclusive) on requested clusters.
const MAX_CLUSTERS: i64 = 260;

fn codes(codes: &[&str]) -> ParamValue {
    ParamValue::Category(Selection::Codes(
        codes.iter().map(|c| c.to_string()).collect(),
    ))
}

fn month_range(start: &str, end: &str) -> ParamValue {
    ParamValue::MonthRange(start.to_string(), end.to_string())
}

fn category(table: &Arc<CategoryTable>) -> CategoryParameter {
    CategoryParameter::new(Arc::clone(table))
}

fn clustering_methods(with_affinity: bool) -> Arc<CategoryTable> {
    let mut methods = vec![
        ("agglomerative", "Agglomerative"),
        ("britch", "Britch"),
        ("kmeans", "KMeans"),
    ];
    if with_affinity {
        methods.push(("affinity_prop", "AffinityPropagation"));
    }
    Arc::new(CategoryTable::from_pairs("clustering_method", methods))
}

fn ordered_dates(params: &ParameterValues) -> Result<(), ValidationError> {
    let start = params.get("start").and_then(ParamValue::as_str);
    let end = params.get("end").and_then(ParamValue::as_str);
    match (start, end) {
        (Some(s), Some(e)) if s > e => Err(ValidationError::new(
            "End time must not be before start time",
            "end",
        )),
        _ => Ok(()),
    }
}

fn cluster_count(params: &ParameterValues) -> Result<(), ValidationError> {
    match params.int("n_clusters") {
        Some(n) if n > 0 && n < MAX_CLUSTERS => Ok(()),
        _ => Err(ValidationError::new("Wrong number of clusters", "n_clusters")),
    }
}

fn cluster_count_or_affinity(params: &ParameterValues) -> Result<(), ValidationError> {
    if params.code("method") == Some("affinity_prop") {
        return match params.int("n_clusters") {
            Some(0) => Ok(()),
            _ => Err(ValidationError::new(
                "for Affinity Propagation Number of clusters must be 0",
                "n_clusters",
            )),
        };
    }
    cluster_count(params)
}

/// Parameters shared by the two event density maps.
fn density_params(f: PlotFunction, tables: &CategoryTables) -> PlotFunction {
    let multi = |t: &Arc<CategoryTable>| ParameterKind::Category(category(t).allow_all().allow_multiple());
    f.with_param(
        ParameterSpec::new("range", "Time range", ParameterKind::DateRange),
        ParamValue::DateRange("20130101".to_string(), "20190101".to_string()),
    )
    .with_param(
        ParameterSpec::new(
            "loc_country",
            "Country of events location",
            ParameterKind::Category(category(&tables.fips_country)),
        ),
        codes(&["PL"]),
    )
    .with_param(
        ParameterSpec::new("a1_country", "Actor 1", multi(&tables.fips_country)),
        codes(&["US"]),
    )
    .with_param(
        ParameterSpec::new("a2_country", "Actor 2", multi(&tables.fips_country)),
        codes(&["US"]),
    )
    .with_param(
        ParameterSpec::new("quad_class", "Quad class", multi(&tables.quad_class)),
        ParamValue::Category(Selection::All),
    )
    .with_param(
        ParameterSpec::new("event_code", "Event Base code", multi(&tables.cameo_event_base)),
        ParamValue::Category(Selection::All),
    )
}

/// Catalog of every dashboard function, plotting through `renderer`.
pub fn builtin_catalog(tables: &CategoryTables, renderer: Arc<dyn PlotRenderer>) -> FunctionCatalog {
    let role = || {
        ParameterSpec::new(
            "actor_type",
            "Country role",
            ParameterKind::Category(category(&tables.actor_role)),
        )
    };
    let range = || ParameterSpec::new("range", "Time range", ParameterKind::MonthRange);
    let fips = |id: &str| {
        ParameterSpec::new(
            id,
            "Country",
            ParameterKind::Category(category(&tables.fips_country)),
        )
    };
    let clusters = || ParameterSpec::new("n_clusters", "Clusters number", ParameterKind::Int);
    let new = |name: &str, label: &str, chart: ChartKind| {
        PlotFunction::new(name, label, chart, Arc::clone(&renderer))
    };

    let functions = vec![
        new("event_count", "Event Count", ChartKind::Line)
            .with_description("Number of events in the database for each month of a time span")
            .with_param(
                ParameterSpec::new("start", "Start Time", ParameterKind::Date),
                ParamValue::Date("20130101".to_string()),
            )
            .with_param(
                ParameterSpec::new("end", "End Time", ParameterKind::Date),
                ParamValue::Date("20190101".to_string()),
            )
            .with_rule(ordered_dates),
        new("country_connection_count", "Country connection Count", ChartKind::Pie)
            .with_description(
                "Share of events between one country and every other country, \
                 with the country as Actor 1 and as Actor 2",
            )
            .with_param(range(), month_range("201301", "201906"))
            .with_param(fips("country_code"), codes(&["US"])),
        new("event_count_by_country", "Event Count By Country", ChartKind::Choropleth)
            .with_description("Number of events in database for each year for each country")
            .with_param(range(), month_range("201301", "201906"))
            .with_param(fips("country_id"), codes(&["US"]))
            .with_param(role(), codes(&["1"])),
        new("country_relations", "Country relations", ChartKind::Choropleth)
            .with_description(
                "Characteristic of events (Event count, Average tone, Sum mentions, \
                 Average Goldstein scale value) between one country and others for each month",
            )
            .with_param(range(), month_range("201301", "201906"))
            .with_param(fips("country_id"), codes(&["US"]))
            .with_param(role(), codes(&["1"]))
            .with_param(
                ParameterSpec::new(
                    "target_type",
                    "Measure type",
                    ParameterKind::Category(category(&tables.measure)),
                ),
                codes(&["1"]),
            ),
        density_params(
            new("event_density_by_country", "Event density by country", ChartKind::Heatmap)
                .with_description("Event density by country"),
            tables,
        ),
        density_params(
            new("event_density_timeline", "Event density timeline", ChartKind::HeatmapTimeline)
                .with_description("Event density heatmap by country for each month"),
            tables,
        ),
        new("event_correlation", "Event Correlation", ChartKind::Bar)
            .with_description(
                "Correlation between number of events of each day to each country for month",
            )
            .with_param(
                ParameterSpec::new("month", "Month", ParameterKind::Month),
                ParamValue::Month("201905".to_string()),
            ),
        new("event_base_type", "Event types percentage", ChartKind::StackedArea)
            .with_description("Share of each base event type among a country's events, per month")
            .with_param(range(), month_range("201301", "201901"))
            .with_param(
                ParameterSpec::new(
                    "country",
                    "Country",
                    ParameterKind::Category(category(&tables.cameo_country)),
                ),
                codes(&["POL"]),
            )
            .with_param(role(), codes(&["1"])),
        new("clustering", "Countries clustering", ChartKind::Choropleth)
            .with_description(
                "Clustering of countries by average tone multiplied by event count \
                 between each pair of countries",
            )
            .with_param(range(), month_range("201301", "201906"))
            .with_param(role(), codes(&["2"]))
            .with_param(
                ParameterSpec::new(
                    "method",
                    "Clustering method",
                    ParameterKind::Category(CategoryParameter::new(clustering_methods(false))),
                ),
                codes(&["britch"]),
            )
            .with_param(clusters(), ParamValue::Int(20))
            .with_rule(cluster_count),
        new("domestic_policy_clustering", "Domestic policy clustering", ChartKind::Choropleth)
            .with_description(
                "Clustering of countries by average tone multiplied by event count \
                 between each pair of countries",
            )
            .with_param(range(), month_range("201301", "201906"))
            .with_param(
                ParameterSpec::new(
                    "method",
                    "Clustering method",
                    ParameterKind::Category(CategoryParameter::new(clustering_methods(true))),
                ),
                codes(&["britch"]),
            )
            .with_param(clusters(), ParamValue::Int(20))
            .with_rule(cluster_count_or_affinity),
    ];

    let mut catalog = FunctionCatalog::new();
    for function in functions {
        catalog.register(Arc::new(function));
    }
    catalog
}
