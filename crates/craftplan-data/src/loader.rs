//! Loading pipeline: reads data files, validates them, builds the catalog.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers, plus [`load_catalog`] which ties them together
//! for a data directory.

use crate::schema::{
    ClassificationData, CostData, IngredientData, OutputData, PlannerFileData, QuantityData,
    RecipeData,
};
use craftplan_core::recipe::{Classification, Cost, Ingredient, Output, Quantity, Recipe};
use craftplan_core::{CatalogBuilder, CatalogError, PlannerConfig, RecipeCatalog};
use craftplan_graph::GraphConfig;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A recipe parsed but holds values the planner cannot use.
    #[error("invalid recipe '{recipe}' in {file}: {detail}")]
    Invalid {
        file: PathBuf,
        recipe: String,
        detail: String,
    },

    /// The catalog rejected a recipe.
    #[error("catalog error in {file}: {source}")]
    Catalog {
        file: PathBuf,
        #[source]
        source: CatalogError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name.
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Read a file and deserialize it according to its format.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let table: toml::Value = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

// ===========================================================================
// Validation
// ===========================================================================

struct Validator<'a> {
    file: &'a Path,
    recipe: &'a str,
}

impl Validator<'_> {
    fn invalid(&self, detail: String) -> DataLoadError {
        DataLoadError::Invalid {
            file: self.file.to_path_buf(),
            recipe: self.recipe.to_string(),
            detail,
        }
    }

    fn non_negative(&self, what: &str, value: f64) -> Result<f64, DataLoadError> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(self.invalid(format!("{what} must be a non-negative number, got {value}")))
        }
    }

    fn quantity(&self, item: &str, data: QuantityData) -> Result<Quantity, DataLoadError> {
        match data {
            QuantityData::Fixed(q) => Ok(Quantity::Fixed(self.non_negative(item, q)?)),
            QuantityData::Range { min, max } => {
                let min = self.non_negative(item, min)?;
                let max = self.non_negative(item, max)?;
                if min > max {
                    return Err(self.invalid(format!("range for {item} has min {min} above max {max}")));
                }
                Ok(Quantity::Range { min, max })
            }
        }
    }

    fn output(&self, data: OutputData) -> Result<Output, DataLoadError> {
        let (item, quantity, chance) = match data {
            OutputData::Short(item, quantity) => (item, quantity, None),
            OutputData::Full {
                item,
                quantity,
                chance,
            } => (item, quantity, chance),
        };
        if let Some(c) = chance
            && !(0.0..=1.0).contains(&c)
        {
            return Err(self.invalid(format!("chance for {item} must be within 0..=1, got {c}")));
        }
        Ok(Output {
            quantity: self.quantity(&item, quantity)?,
            item,
            chance,
        })
    }

    fn ingredient(&self, data: &IngredientData) -> Result<Ingredient, DataLoadError> {
        let quantity = self.non_negative(data.item(), data.quantity())?;
        Ok(Ingredient::new(data.item(), quantity))
    }

    fn cost(&self, data: CostData) -> Result<Cost, DataLoadError> {
        match data {
            CostData::Effort(effort) => Ok(Cost::Synchronous {
                effort: self.non_negative("effort", effort)?,
            }),
            CostData::Passive { seconds, structure } => Ok(Cost::Asynchronous {
                seconds: self.non_negative("seconds", seconds)?,
                structure,
            }),
        }
    }
}

/// Validate one data-file recipe into a core [`Recipe`].
pub fn resolve_recipe(data: RecipeData, file: &Path) -> Result<Recipe, DataLoadError> {
    let name = data.name;
    let v = Validator {
        file,
        recipe: &name,
    };

    let ingredients = data
        .ingredients
        .iter()
        .map(|i| v.ingredient(i))
        .collect::<Result<Vec<_>, _>>()?;
    let outputs = data
        .outputs
        .into_iter()
        .map(|o| v.output(o))
        .collect::<Result<Vec<_>, _>>()?;
    let cost = v.cost(data.cost)?;

    let classification = match (data.classification, &cost) {
        (Some(ClassificationData::Profession(p)), _) => Classification::Profession(p),
        (Some(ClassificationData::Structure(s)), _) => Classification::Structure(s),
        (None, Cost::Asynchronous { structure, .. }) => Classification::Structure(structure.clone()),
        (None, Cost::Synchronous { .. }) => {
            return Err(v.invalid("effort recipes need a classification".to_string()));
        }
    };

    Ok(Recipe {
        name,
        tier: data.tier,
        ingredients,
        outputs,
        cost,
        classification,
    })
}

// ===========================================================================
// Loading pipeline
// ===========================================================================

/// Everything loaded from a data directory.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub catalog: RecipeCatalog,
    pub config: PlannerConfig,
    pub graph_config: GraphConfig,
}

/// Read and validate every recipe in a single data file.
pub fn load_recipes_file(path: &Path) -> Result<Vec<Recipe>, DataLoadError> {
    let data: Vec<RecipeData> = deserialize_list(path, "recipes")?;
    data.into_iter()
        .map(|recipe| resolve_recipe(recipe, path))
        .collect()
}

/// Load a data directory.
///
/// Requires a `recipes.{ron,toml,json}` file. An optional
/// `planner.{ron,toml,json}` file supplies [`PlannerConfig`] and
/// [`GraphConfig`]; without it both take their defaults.
pub fn load_catalog(dir: &Path) -> Result<LoadedData, DataLoadError> {
    let recipes_path = require_data_file(dir, "recipes")?;
    let recipes = load_recipes_file(&recipes_path)?;

    let mut builder = CatalogBuilder::new();
    builder
        .register_all(recipes)
        .map_err(|source| DataLoadError::Catalog {
            file: recipes_path.clone(),
            source,
        })?;
    let catalog = builder.build();

    let settings = match find_data_file(dir, "planner")? {
        Some(path) => deserialize_file::<PlannerFileData>(&path)?,
        None => PlannerFileData::default(),
    };

    tracing::debug!(
        dir = %dir.display(),
        recipes = catalog.len(),
        items = catalog.items().len(),
        "catalog loaded"
    );

    Ok(LoadedData {
        catalog,
        config: settings.planner,
        graph_config: settings.graph,
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use craftplan_core::EffortScaling;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "craftplan_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const PLANK_RON: &str = r#"[
        (
            name: "Saw Plank",
            ingredients: [("Stripped Wood", 1)],
            outputs: [("Plank", 1)],
            cost: Effort(40),
            classification: Some(Profession("Carpentry")),
        ),
        (
            name: "Strip Log",
            ingredients: [("Log", 3)],
            outputs: [("Stripped Wood", 1)],
            cost: Effort(50),
            classification: Some(Profession("Carpentry")),
        ),
    ]"#;

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("recipes.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("recipes.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("recipes.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        assert!(matches!(
            detect_format(Path::new("recipes.yaml")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            detect_format(Path::new("recipes")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    // -----------------------------------------------------------------------
    // find_data_file / require_data_file
    // -----------------------------------------------------------------------

    #[test]
    fn find_data_file_found_and_missing() {
        let dir = make_test_dir("find");
        assert_eq!(find_data_file(&dir, "recipes").unwrap(), None);
        fs::write(dir.join("recipes.json"), "[]").unwrap();
        assert_eq!(
            find_data_file(&dir, "recipes").unwrap(),
            Some(dir.join("recipes.json"))
        );
        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("recipes.ron"), "[]").unwrap();
        fs::write(dir.join("recipes.json"), "[]").unwrap();
        assert!(matches!(
            find_data_file(&dir, "recipes"),
            Err(DataLoadError::ConflictingFormats { .. })
        ));
        cleanup(&dir);
    }

    #[test]
    fn require_data_file_missing() {
        let dir = make_test_dir("require_missing");
        let err = require_data_file(&dir, "recipes").unwrap_err();
        assert!(matches!(err, DataLoadError::MissingRequired { ref file, .. } if file == "recipes"));
        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // deserialize_list
    // -----------------------------------------------------------------------

    #[test]
    fn deserialize_list_toml_missing_key() {
        let dir = make_test_dir("list_toml_missing");
        let path = dir.join("recipes.toml");
        fs::write(&path, r#"foo = "bar""#).unwrap();
        let result: Result<Vec<RecipeData>, _> = deserialize_list(&path, "recipes");
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));
        cleanup(&dir);
    }

    #[test]
    fn deserialize_file_parse_error() {
        let dir = make_test_dir("parse_err");
        let path = dir.join("recipes.ron");
        fs::write(&path, "this is not valid RON {{{").unwrap();
        let result: Result<Vec<RecipeData>, _> = deserialize_file(&path);
        assert!(matches!(result, Err(DataLoadError::Parse { .. })));
        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    fn recipe_from_ron(ron_str: &str) -> Result<Recipe, DataLoadError> {
        let data: RecipeData = ron::from_str(ron_str).unwrap();
        resolve_recipe(data, Path::new("recipes.ron"))
    }

    #[test]
    fn resolve_passive_classified_by_structure() {
        let recipe = recipe_from_ron(
            r#"(name: "Smelt Iron", ingredients: [("Iron Ore", 2)], outputs: [("Iron Bar", 1)],
                cost: Passive(seconds: 300, structure: "Smelter"))"#,
        )
        .unwrap();
        assert_eq!(recipe.classification, Classification::Structure("Smelter".into()));
        assert_eq!(recipe.passive(), Some((300.0, "Smelter")));
        assert_eq!(recipe.ingredients[0], Ingredient::new("Iron Ore", 2.0));
    }

    #[test]
    fn chance_out_of_range_is_invalid() {
        let err = recipe_from_ron(
            r#"(name: "Pan Gold", outputs: [(item: "Gold", quantity: 1, chance: Some(1.5))],
                cost: Effort(5), classification: Some(Profession("Mining")))"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataLoadError::Invalid { ref recipe, .. } if recipe == "Pan Gold"));
    }

    #[test]
    fn inverted_range_is_invalid() {
        let err = recipe_from_ron(
            r#"(name: "Forge Nails", outputs: [("Nail", (min: 3, max: 1))],
                cost: Effort(5), classification: Some(Profession("Smithing")))"#,
        )
        .unwrap_err();
        assert!(matches!(err, DataLoadError::Invalid { .. }));
    }

    #[test]
    fn negative_values_are_invalid() {
        let negative_ingredient = recipe_from_ron(
            r#"(name: "Bad", ingredients: [("Log", -1)], outputs: [("Plank", 1)],
                cost: Effort(5), classification: Some(Profession("Carpentry")))"#,
        );
        assert!(matches!(negative_ingredient, Err(DataLoadError::Invalid { .. })));

        let negative_cost = recipe_from_ron(
            r#"(name: "Bad", outputs: [("Plank", 1)],
                cost: Passive(seconds: -3, structure: "Kiln"))"#,
        );
        assert!(matches!(negative_cost, Err(DataLoadError::Invalid { .. })));
    }

    #[test]
    fn effort_recipe_needs_classification() {
        let err = recipe_from_ron(r#"(name: "Saw Plank", outputs: [("Plank", 1)], cost: Effort(5))"#)
            .unwrap_err();
        assert!(matches!(err, DataLoadError::Invalid { .. }));
    }

    // -----------------------------------------------------------------------
    // load_catalog
    // -----------------------------------------------------------------------

    #[test]
    fn load_catalog_ron_with_defaults() {
        let dir = make_test_dir("load_ron");
        fs::write(dir.join("recipes.ron"), PLANK_RON).unwrap();
        let loaded = load_catalog(&dir).unwrap();
        assert_eq!(loaded.catalog.len(), 2);
        assert_eq!(loaded.catalog.recipes_for("Plank")[0].name, "Saw Plank");
        assert!(loaded.catalog.is_raw("Log"));
        assert_eq!(loaded.config, PlannerConfig::default());
        assert_eq!(loaded.graph_config, GraphConfig::default());
        cleanup(&dir);
    }

    #[test]
    fn load_catalog_reads_planner_file() {
        let dir = make_test_dir("load_planner");
        fs::write(dir.join("recipes.ron"), PLANK_RON).unwrap();
        fs::write(
            dir.join("planner.toml"),
            r#"
[planner]
parallel_slots_per_structure = 4
effort_scaling = "per_attempt"

[graph]
max_depth = 3
"#,
        )
        .unwrap();
        let loaded = load_catalog(&dir).unwrap();
        assert_eq!(loaded.config.parallel_slots_per_structure, 4);
        assert_eq!(loaded.config.effort_scaling, EffortScaling::PerAttempt);
        assert_eq!(loaded.graph_config.max_depth, 3);
        assert_eq!(loaded.graph_config.level_spacing, 120.0);
        cleanup(&dir);
    }

    #[test]
    fn load_catalog_missing_recipes() {
        let dir = make_test_dir("load_missing");
        assert!(matches!(
            load_catalog(&dir),
            Err(DataLoadError::MissingRequired { .. })
        ));
        cleanup(&dir);
    }

    #[test]
    fn load_catalog_rejects_empty_outputs() {
        let dir = make_test_dir("load_no_outputs");
        fs::write(
            dir.join("recipes.json"),
            r#"[{"name": "Nothing", "outputs": [], "cost": {"Effort": 1},
                 "classification": {"Profession": "Idling"}}]"#,
        )
        .unwrap();
        assert!(matches!(
            load_catalog(&dir),
            Err(DataLoadError::Catalog {
                source: CatalogError::NoOutputs(_),
                ..
            })
        ));
        cleanup(&dir);
    }

    #[test]
    fn duplicate_names_load_with_warning() {
        let dir = make_test_dir("load_duplicates");
        fs::write(
            dir.join("recipes.json"),
            r#"[
                {"name": "Saw Plank", "ingredients": [["Log", 1]], "outputs": [["Plank", 1]],
                 "cost": {"Effort": 10}, "classification": {"Profession": "Carpentry"}},
                {"name": "Saw Plank", "ingredients": [["Bamboo", 2]], "outputs": [["Plank", 1]],
                 "cost": {"Effort": 20}, "classification": {"Profession": "Carpentry"}}
            ]"#,
        )
        .unwrap();
        let loaded = load_catalog(&dir).unwrap();
        assert_eq!(loaded.catalog.recipes_for("Plank").len(), 2);
        assert_eq!(loaded.catalog.warnings().len(), 1);
        cleanup(&dir);
    }
}
