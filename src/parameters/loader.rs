//! JSON parameter file loader
//!
//! Parameter files use the camelCase keys of `ParameterName` plus
//! `capexScenario` and an optional `yearlyOverrides` object.

use super::{ParameterName, ParameterSet};
use crate::error::{ParameterError, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Default location of the bundled parameter files
pub const DEFAULT_PARAMETERS_PATH: &str = "data/parameters";

/// Keys that must be present in every parameter file
fn required_keys() -> impl Iterator<Item = &'static str> {
    ParameterName::ALL
        .iter()
        .map(|name| name.as_str())
        .chain(std::iter::once("capexScenario"))
}

/// Build a parameter set from an already parsed JSON document.
///
/// Missing required keys are reported by name before any type checking.
pub fn parameters_from_value(value: Value) -> Result<ParameterSet> {
    let object = value
        .as_object()
        .ok_or_else(|| ParameterError::Missing("<parameter object>".to_string()))?;

    if let Some(missing) = required_keys().find(|key| !object.contains_key(*key)) {
        return Err(ParameterError::Missing(missing.to_string()).into());
    }

    Ok(serde_json::from_value(value)?)
}

/// Parse a parameter set from JSON text
pub fn parameters_from_str(json: &str) -> Result<ParameterSet> {
    parameters_from_value(serde_json::from_str(json)?)
}

/// Load a parameter set from a JSON file
pub fn load_parameters(path: &Path) -> Result<ParameterSet> {
    let reader = BufReader::new(File::open(path)?);
    let value: Value = serde_json::from_reader(reader)?;
    let params = parameters_from_value(value)?;
    log::debug!("Loaded parameters from {}", path.display());
    Ok(params)
}

/// Load a named file (e.g. `realistic`) from the default directory
pub fn load_default(name: &str) -> Result<ParameterSet> {
    load_parameters(&Path::new(DEFAULT_PARAMETERS_PATH).join(format!("{}.json", name)))
}

/// Write a parameter set as pretty-printed JSON
pub fn save_parameters(path: &Path, params: &ParameterSet) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, params)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::parameters::CapexCatalog;

    #[test]
    fn test_load_default_parameters() {
        let result = load_default("realistic");
        assert!(result.is_ok(), "Failed to load parameters: {:?}", result.err());
        assert_eq!(result.unwrap(), ParameterSet::default());
    }

    #[test]
    fn test_round_trip_through_json() {
        let params = ParameterSet::default();
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(parameters_from_str(&json).unwrap(), params);
    }

    #[test]
    fn test_missing_parameter_is_named() {
        let mut value = serde_json::to_value(ParameterSet::default()).unwrap();
        value.as_object_mut().unwrap().remove("tuitionIncreaseRate");

        match parameters_from_value(value) {
            Err(ModelError::InvalidParameter(ParameterError::Missing(name))) => {
                assert_eq!(name, "tuitionIncreaseRate")
            }
            other => panic!("expected missing parameter, got {:?}", other),
        }
    }

    #[test]
    fn test_yearly_overrides_are_optional_and_parsed() {
        let mut value = serde_json::to_value(ParameterSet::default()).unwrap();
        value.as_object_mut().unwrap().insert(
            "yearlyOverrides".to_string(),
            serde_json::json!({ "5": { "values": { "marketingRate": 0.12 } } }),
        );

        let params = parameters_from_value(value).unwrap();
        let patch = params.year_override(5).unwrap();
        assert_eq!(patch.get(ParameterName::MarketingRate), Some(0.12));
    }

    #[test]
    fn test_load_overrides_from_disk() {
        let params = load_default("realistic_with_overrides").unwrap();
        params.validate(&CapexCatalog::default()).unwrap();

        assert_eq!(params.yearly_overrides.len(), 2);
        let year2 = params.year_override(2).unwrap();
        assert_eq!(year2.get(ParameterName::MarketingRate), Some(0.14));
        let year5 = params.year_override(5).unwrap();
        assert_eq!(year5.get(ParameterName::FlagshipTuition), Some(6_000.0));
        assert_eq!(year5.capex_scenario.as_deref(), Some("premium"));

        let mut base = params.clone();
        base.yearly_overrides.clear();
        assert_eq!(base, ParameterSet::default());
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(parameters_from_str("[1, 2, 3]").unwrap_err().is_invalid_parameter());
    }
}
