//! The category tables the dashboard functions draw on.

use crate::category::{CategoryTable, TableError};
use std::path::Path;
use std::sync::Arc;

pub const CAMEO_COUNTRY_FILE: &str = "CAMEO.country.csv";
pub const FIPS_COUNTRY_FILE: &str = "FIPS.country.csv";
pub const CAMEO_EVENTCODES_FILE: &str = "CAMEO.eventcodes.csv";

/// Shared lookup tables: resource-file backed ones plus small built-ins.
#[derive(Debug, Clone)]
pub struct CategoryTables {
    pub cameo_country: Arc<CategoryTable>,
    pub fips_country: Arc<CategoryTable>,
    pub cameo_event_base: Arc<CategoryTable>,
    pub actor_role: Arc<CategoryTable>,
    pub measure: Arc<CategoryTable>,
    pub quad_class: Arc<CategoryTable>,
}

fn read(dir: &Path, file: &str) -> Result<String, TableError> {
    let path = dir.join(file);
    std::fs::read_to_string(&path).map_err(|source| TableError::Io {
        path: path.display().to_string(),
        source,
    })
}

impl CategoryTables {
    /// Load the resource tables from `dir` (tab-separated files).
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, TableError> {
        let dir = dir.as_ref();
        let cameo_country =
            CategoryTable::from_tsv("cameo_country", &read(dir, CAMEO_COUNTRY_FILE)?, "CODE", "LABEL")?;
        let fips_country =
            CategoryTable::from_headerless_tsv("fips_country", &read(dir, FIPS_COUNTRY_FILE)?)?;
        let cameo_event_base = CategoryTable::from_tsv(
            "cameo_event_base",
            &read(dir, CAMEO_EVENTCODES_FILE)?,
            "CAMEOEVENTCODE",
            "EVENTDESCRIPTION",
        )?
        .retain_codes(|code| code.len() == 2);
        tracing::info!(
            cameo_country = cameo_country.len(),
            fips_country = fips_country.len(),
            cameo_event_base = cameo_event_base.len(),
            "category tables loaded"
        );
        Ok(Self::from_tables(cameo_country, fips_country, cameo_event_base))
    }

    /// Assemble from already-built resource tables; built-ins are added.
    pub fn from_tables(
        cameo_country: CategoryTable,
        fips_country: CategoryTable,
        cameo_event_base: CategoryTable,
    ) -> Self {
        Self {
            cameo_country: Arc::new(cameo_country),
            fips_country: Arc::new(fips_country),
            cameo_event_base: Arc::new(cameo_event_base),
            actor_role: Arc::new(actor_role()),
            measure: Arc::new(measure()),
            quad_class: Arc::new(quad_class()),
        }
    }
}

/// Which side of an event a country plays.
pub fn actor_role() -> CategoryTable {
    CategoryTable::from_pairs("actor_role", [("1", "Actor 1"), ("2", "Actor 2")])
}

/// Aggregate measured between two countries.
pub fn measure() -> CategoryTable {
    CategoryTable::from_pairs(
        "measure",
        [
            ("1", "Event Count"),
            ("2", "Average Tone"),
            ("3", "Sum of Mentions"),
            ("4", "Average Goldstein scale"),
        ],
    )
}

pub fn quad_class() -> CategoryTable {
    CategoryTable::from_pairs(
        "quad_class",
        [
            ("1", "Verbal Cooperation"),
            ("2", "Material Cooperation"),
            ("3", "Verbal Conflict"),
            ("4", "Material Conflict"),
        ],
    )
}
