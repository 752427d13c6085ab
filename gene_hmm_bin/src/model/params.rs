use ndarray::{Array1, Array2, Array4};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::Path;

use crate::model::state::{ALPHABET_SIZE, HMM_STATES};
use crate::model::{Error, Result};

// The full parameter set of a trained model, as exchanged with disk.
// A bundle is plain data; HmmModel::from_bundle re-checks the shapes.
#[derive(Clone, Serialize, Deserialize)]
pub struct ParameterBundle {
    pub init_probs: Array1<f64>,
    pub trans_probs: Array2<f64>,
    pub emission_probs: Array4<f64>,
    pub num_obs_seen: u64,
}

impl ParameterBundle {
    pub fn zeroed() -> ParameterBundle {
        ParameterBundle {
            init_probs: Array1::zeros(HMM_STATES),
            trans_probs: Array2::zeros((HMM_STATES, HMM_STATES)),
            emission_probs: Array4::zeros((
                HMM_STATES,
                ALPHABET_SIZE,
                ALPHABET_SIZE,
                ALPHABET_SIZE,
            )),
            num_obs_seen: 0,
        }
    }

    pub fn check_shape(&self) -> Result<()> {
        if self.init_probs.len() != HMM_STATES {
            return Err(Error::BundleShape(format!(
                "init_probs has {} entries, expected {}",
                self.init_probs.len(),
                HMM_STATES
            )));
        }

        if self.trans_probs.dim() != (HMM_STATES, HMM_STATES) {
            return Err(Error::BundleShape(format!(
                "trans_probs is {:?}, expected ({}, {})",
                self.trans_probs.dim(),
                HMM_STATES,
                HMM_STATES
            )));
        }

        let emission_dim = (HMM_STATES, ALPHABET_SIZE, ALPHABET_SIZE, ALPHABET_SIZE);
        if self.emission_probs.dim() != emission_dim {
            return Err(Error::BundleShape(format!(
                "emission_probs is {:?}, expected {:?}",
                self.emission_probs.dim(),
                emission_dim
            )));
        }

        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<ParameterBundle> {
        let file = File::open(path)?;
        let bundle: ParameterBundle = serde_json::from_reader(BufReader::new(file))?;
        bundle.check_shape()?;
        Ok(bundle)
    }

    // A missing file means "no prior training"; any other failure surfaces.
    pub fn load_optional(path: &Path) -> Result<Option<ParameterBundle>> {
        match File::open(path) {
            Ok(file) => {
                let bundle: ParameterBundle = serde_json::from_reader(BufReader::new(file))?;
                bundle.check_shape()?;
                Ok(Some(bundle))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_bundle_has_expected_shape() {
        assert!(ParameterBundle::zeroed().check_shape().is_ok());
    }

    #[test]
    fn test_shape_check_rejects_wrong_dimensions() {
        let mut bundle = ParameterBundle::zeroed();
        bundle.init_probs = Array1::zeros(67);

        assert!(matches!(bundle.check_shape(), Err(Error::BundleShape(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut bundle = ParameterBundle::zeroed();
        bundle.num_obs_seen = 42;
        bundle.init_probs[0] = 1.0;

        let encoded = serde_json::to_string(&bundle).unwrap();
        let decoded: ParameterBundle = serde_json::from_str(&encoded).unwrap();

        assert!(decoded.check_shape().is_ok());
        assert_eq!(decoded.num_obs_seen, 42);
        assert_eq!(decoded.init_probs, bundle.init_probs);
    }

    #[test]
    fn test_load_optional_signals_absence() {
        let path = Path::new("definitely-not-a-real-parameter-file.json");
        assert!(matches!(ParameterBundle::load_optional(path), Ok(None)));
    }
}
