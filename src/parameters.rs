//! The aggregate description of a community and how long to simulate it.
//!
//! Parameters come either from a community description file (see [`crate::loader`]) or from a
//! JSON file with one field per parameter:
//!
//! ```json
//! {
//!     "population": 1000,
//!     "household_median": 3.0,
//!     "household_scatter": 2.0,
//!     "workplace_median": 20.0,
//!     "workplace_scatter": 30.0,
//!     "employment_probability": 0.6,
//!     "initial_infected": 10,
//!     "end_time": 30.0
//! }
//! ```
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::EpidemicError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommunityParameters {
    pub population: usize,
    pub household_median: f64,
    pub household_scatter: f64,
    pub workplace_median: f64,
    pub workplace_scatter: f64,
    /// Probability that any one person is employed.
    pub employment_probability: f64,
    /// Exactly this many people start out infected.
    pub initial_infected: usize,
    /// Simulation time, in days, at which the run stops.
    pub end_time: f64,
}

impl CommunityParameters {
    /// Checks every parameter, reporting all the problems found at once.
    ///
    /// # Errors
    ///
    /// Returns `EpidemicError::ConfigError` listing each invalid parameter.
    pub fn validate(&self) -> Result<(), EpidemicError> {
        let mut problems = Vec::new();
        if self.population < 1 {
            problems.push("population must be at least 1".to_string());
        }
        for (name, median, scatter) in [
            ("household", self.household_median, self.household_scatter),
            ("workplace", self.workplace_median, self.workplace_scatter),
        ] {
            if !(median.is_finite() && median >= 1.0) {
                problems.push(format!("{name} median {median} must be at least 1"));
            }
            if !(scatter.is_finite() && scatter >= 0.0) {
                problems.push(format!("{name} scatter {scatter} must not be negative"));
            }
        }
        if !(0.0..=1.0).contains(&self.employment_probability) {
            problems.push(format!(
                "employment probability {} must be between 0 and 1",
                self.employment_probability
            ));
        }
        if self.initial_infected > self.population {
            problems.push(format!(
                "initial infected {} is greater than the population {}",
                self.initial_infected, self.population
            ));
        }
        if !(self.end_time.is_finite() && self.end_time > 0.0) {
            problems.push(format!("end time {} must be positive", self.end_time));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(EpidemicError::ConfigError(problems))
        }
    }
}

/// Reads and validates parameters from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON for `CommunityParameters`, or
/// describes an invalid community.
pub fn load_parameters_file(path: &Path) -> Result<CommunityParameters, EpidemicError> {
    debug!("loading parameters from {}", path.display());
    let contents = fs::read_to_string(path)?;
    let parameters: CommunityParameters = serde_json::from_str(&contents)?;
    parameters.validate()?;
    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn valid() -> CommunityParameters {
        CommunityParameters {
            population: 100,
            household_median: 3.0,
            household_scatter: 2.0,
            workplace_median: 10.0,
            workplace_scatter: 5.0,
            employment_probability: 0.5,
            initial_infected: 3,
            end_time: 7.0,
        }
    }

    fn problems(parameters: &CommunityParameters) -> Vec<String> {
        match parameters.validate() {
            Err(EpidemicError::ConfigError(problems)) => problems,
            other => panic!("expected a ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn valid_parameters() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn boundaries_are_valid() {
        let mut parameters = valid();
        parameters.population = 1;
        parameters.initial_infected = 1;
        parameters.household_median = 1.0;
        parameters.household_scatter = 0.0;
        parameters.employment_probability = 1.0;
        assert!(parameters.validate().is_ok());

        parameters.initial_infected = 0;
        parameters.employment_probability = 0.0;
        assert!(parameters.validate().is_ok());
    }

    #[test]
    fn every_problem_is_reported() {
        let parameters = CommunityParameters {
            population: 0,
            household_median: 0.5,
            household_scatter: -1.0,
            workplace_median: 10.0,
            workplace_scatter: f64::NAN,
            employment_probability: 1.5,
            initial_infected: 1,
            end_time: 0.0,
        };
        assert_eq!(
            problems(&parameters),
            vec![
                "population must be at least 1",
                "household median 0.5 must be at least 1",
                "household scatter -1 must not be negative",
                "workplace scatter NaN must not be negative",
                "employment probability 1.5 must be between 0 and 1",
                "initial infected 1 is greater than the population 0",
                "end time 0 must be positive",
            ]
        );
    }

    #[test]
    fn load_from_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&valid()).unwrap().as_bytes())
            .unwrap();
        let parameters = load_parameters_file(file.path()).unwrap();
        assert_eq!(parameters, valid());
    }

    #[test]
    fn load_rejects_invalid_values() {
        let mut parameters = valid();
        parameters.initial_infected = 1000;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&parameters).unwrap().as_bytes())
            .unwrap();
        assert!(matches!(
            load_parameters_file(file.path()),
            Err(EpidemicError::ConfigError(_))
        ));
    }

    #[test]
    fn load_rejects_missing_fields() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{ "population": 10 }"#).unwrap();
        assert!(matches!(
            load_parameters_file(file.path()),
            Err(EpidemicError::JsonError(_))
        ));
    }

    #[test]
    fn load_missing_file() {
        assert!(matches!(
            load_parameters_file(Path::new("no/such/parameters.json")),
            Err(EpidemicError::IoError(_))
        ));
    }
}
