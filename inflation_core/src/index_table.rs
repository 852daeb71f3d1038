// inflation_core/src/index_table.rs

//! Read-only price-index table keyed by calendar year.
//! Built once (from the built-in CPI series or a JSON file) and shared by reference.

use anyhow::Context;

use crate::error;

/// Annual CPI series shipped with the calculator. 2025 is a projection.
const BUILTIN_CPI: &[(i32, f64)] = &[
    (1980, 82.4), (1981, 90.9), (1982, 96.5), (1983, 99.6), (1984, 103.9), (1985, 107.6),
    (1986, 109.6), (1987, 113.6), (1988, 118.3), (1989, 124.0), (1990, 130.7),
    (1991, 136.2), (1992, 140.3), (1993, 144.5), (1994, 148.2), (1995, 152.4),
    (1996, 156.9), (1997, 160.5), (1998, 163.0), (1999, 166.6), (2000, 172.2),
    (2001, 177.1), (2002, 179.9), (2003, 184.0), (2004, 188.9), (2005, 195.3),
    (2006, 201.6), (2007, 207.3), (2008, 215.3), (2009, 214.5), (2010, 218.1),
    (2011, 224.9), (2012, 229.6), (2013, 233.0), (2014, 236.7), (2015, 237.0),
    (2016, 240.0), (2017, 245.1), (2018, 251.1), (2019, 255.7), (2020, 258.8),
    (2021, 270.9), (2022, 292.6), (2023, 304.7), (2024, 314.0), (2025, 325.0),
];

/// Anything that can resolve index values for a set of years.
pub trait IndexSource {
    /// Returns the index value of every requested year, or `DataUnavailable`
    /// naming each year that could not be resolved.
    fn lookup(&self, years: &[i32]) -> Result<std::collections::BTreeMap<i32, f64>, error::CalcError>;

    /// Smallest and largest year present in the source.
    fn supported_range(&self) -> (i32, i32);
}

/// Serializes to the same year-to-value JSON object that `load` reads.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct IndexTable {
    values: std::collections::BTreeMap<i32, f64>,
    #[serde(skip)]
    min_year: i32,
    #[serde(skip)]
    max_year: i32,
}

impl IndexTable {
    /// Builds a table from `(year, index)` pairs.
    ///
    /// # Errors
    /// * The table is empty.
    /// * A year appears twice.
    /// * An index value is not finite or not strictly positive.
    pub fn new<I>(entries: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (i32, f64)>,
    {
        let mut values = std::collections::BTreeMap::new();
        for (year, index_value) in entries {
            validate_entry(year, index_value)?;
            if values.insert(year, index_value).is_some() {
                anyhow::bail!("Validation error for year {}: duplicate entry", year);
            }
        }

        let (min_year, max_year) = match (values.keys().next(), values.keys().next_back()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => anyhow::bail!("Index table cannot be empty!"),
        };

        anyhow::Ok(Self { values, min_year, max_year })
    }

    /// The CPI series the calculator ships with (1980..=2025).
    pub fn builtin() -> Self {
        let values: std::collections::BTreeMap<i32, f64> = BUILTIN_CPI.iter().copied().collect();
        Self {
            values,
            min_year: BUILTIN_CPI[0].0,
            max_year: BUILTIN_CPI[BUILTIN_CPI.len() - 1].0,
        }
    }

    /// Loads a table from a JSON object mapping year to index value,
    /// e.g. `{"1995": 152.4, "2025": 325.0}`.
    pub fn load<P: AsRef<std::path::Path>>(file_path: P) -> anyhow::Result<Self> {
        let file_path = file_path.as_ref();
        let contents = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read index table '{}'", file_path.display()))?;

        let table = Self::from_json(&contents)
            .with_context(|| format!("Invalid index table '{}'", file_path.display()))?;

        log::warn!(
            "Using index table from '{}' ({} years, {}..={}) instead of the built-in series",
            file_path.display(),
            table.len(),
            table.min_year,
            table.max_year,
        );

        anyhow::Ok(table)
    }

    /// Parses the year-to-value JSON object. Entries are kept in file order so
    /// a repeated year reaches the duplicate check in `new`.
    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        let raw: YearEntries = serde_json::from_str(contents)
            .map_err(|e| anyhow::anyhow!("Failed to parse index table JSON: {}", e))?;
        Self::new(raw.0)
    }

    pub fn get(&self, year: i32) -> Option<f64> {
        self.values.get(&year).copied()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for IndexTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IndexSource for IndexTable {
    fn lookup(&self, years: &[i32]) -> Result<std::collections::BTreeMap<i32, f64>, error::CalcError> {
        let mut found = std::collections::BTreeMap::new();
        let mut missing_years: Vec<i32> = Vec::new();

        for &year in years {
            match self.get(year) {
                Some(index_value) if is_eligible(index_value) => {
                    found.insert(year, index_value);
                }
                _ => {
                    if !missing_years.contains(&year) {
                        missing_years.push(year);
                    }
                }
            }
        }

        log::debug!("Lookup {:?}: found {}, missing {:?}", years, found.len(), missing_years);

        if !missing_years.is_empty() {
            return Err(error::CalcError::DataUnavailable {
                missing_years,
                min_supported: self.min_year,
                max_supported: self.max_year,
            });
        }

        Ok(found)
    }

    fn supported_range(&self) -> (i32, i32) {
        (self.min_year, self.max_year)
    }
}

/// Raw `(year, index)` pairs of a JSON object, duplicates included.
struct YearEntries(Vec<(i32, f64)>);

impl<'de> serde::Deserialize<'de> for YearEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct YearEntriesVisitor;

        impl<'de> serde::de::Visitor<'de> for YearEntriesVisitor {
            type Value = YearEntries;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("an object mapping years to index values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, index_value)) = map.next_entry::<String, f64>()? {
                    let year = key.trim().parse::<i32>().map_err(|_| {
                        serde::de::Error::custom(format!("'{}' is not a valid year", key))
                    })?;
                    entries.push((year, index_value));
                }
                Ok(YearEntries(entries))
            }
        }

        deserializer.deserialize_map(YearEntriesVisitor)
    }
}

fn is_eligible(index_value: f64) -> bool {
    index_value.is_finite() && index_value > 0.0
}

fn validate_entry(year: i32, index_value: f64) -> anyhow::Result<()> {
    if !is_eligible(index_value) {
        anyhow::bail!(
            "Validation error for year {}: index value must be a positive number, got {}",
            year,
            index_value,
        );
    }
    anyhow::Ok(())
}
