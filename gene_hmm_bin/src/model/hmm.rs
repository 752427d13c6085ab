use ndarray::{Array1, Array2, Array4, Axis};
use std::fmt::{self, Display};

use crate::model::params::ParameterBundle;
use crate::model::state::{self, ALPHABET_SIZE, HMM_STATES};
use crate::model::{Error, Result};

const PROB_SUM_TOLERANCE: f64 = 1e-9;

// Transition counting needs three leading states before emission counting
// can start, so training requires at least one full codon worth of input.
const MIN_TRAINING_LENGTH: usize = 3;


#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ValidationFailure
{
    InitSum(f64),
    TransRowSum(usize, f64),
    EmissionSliceSum(usize, usize, usize, f64),
    OutOfRange(&'static str),
}

impl Display for ValidationFailure
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match self
        {
            ValidationFailure::InitSum(sum) =>
                write!(f, "init_probs sums to {}, expected 1", sum),
            ValidationFailure::TransRowSum(state, sum) =>
                write!(f, "trans_probs row {} sums to {}, expected 1", state, sum),
            ValidationFailure::EmissionSliceSum(state, prev2, prev1, sum) =>
                write!(f, "emission_probs[{}][{}][{}] sums to {}, expected 1", state, prev2, prev1, sum),
            ValidationFailure::OutOfRange(table) =>
                write!(f, "{} contains an entry outside [0, 1]", table),
        }
    }
}

fn close_to_one(sum: f64) -> bool
{
    (sum - 1.0).abs() <= PROB_SUM_TOLERANCE
}


pub struct HmmModel
{
    init_probs: Array1<f64>,
    trans_probs: Array2<f64>,
    emission_probs: Array4<f64>,

    num_obs_seen: u64,
}


impl HmmModel
{
    pub fn zeroed() -> HmmModel
    {
        HmmModel {
            init_probs: Array1::zeros(HMM_STATES),
            trans_probs: Array2::zeros((HMM_STATES, HMM_STATES)),
            emission_probs: Array4::zeros((HMM_STATES, ALPHABET_SIZE, ALPHABET_SIZE, ALPHABET_SIZE)),
            num_obs_seen: 0,
        }
    }

    pub fn from_bundle(bundle: ParameterBundle) -> Result<HmmModel>
    {
        bundle.check_shape()?;

        Ok(HmmModel {
            init_probs: bundle.init_probs,
            trans_probs: bundle.trans_probs,
            emission_probs: bundle.emission_probs,
            num_obs_seen: bundle.num_obs_seen,
        })
    }

    pub fn to_bundle(&self) -> ParameterBundle
    {
        ParameterBundle {
            init_probs: self.init_probs.clone(),
            trans_probs: self.trans_probs.clone(),
            emission_probs: self.emission_probs.clone(),
            num_obs_seen: self.num_obs_seen,
        }
    }

    pub fn get_init_probs(&self) -> &Array1<f64> { &self.init_probs }

    pub fn get_trans_probs(&self) -> &Array2<f64> { &self.trans_probs }

    pub fn get_emission_probs(&self) -> &Array4<f64> { &self.emission_probs }

    pub fn get_num_obs_seen(&self) -> u64 { self.num_obs_seen }


    // Diagnostic only; reports the first failing condition and never mutates.
    pub fn validate(&self) -> std::result::Result<(), ValidationFailure>
    {
        let init_sum = self.init_probs.sum();
        if !close_to_one(init_sum)
            { return Err(ValidationFailure::InitSum(init_sum)); }

        for (state, row) in self.trans_probs.rows().into_iter().enumerate()
            {
            let row_sum = row.sum();
            if !close_to_one(row_sum)
                { return Err(ValidationFailure::TransRowSum(state, row_sum)); }
            }

        for current_state in 0..HMM_STATES
            {
            for prev2 in 0..ALPHABET_SIZE
                {
                for prev1 in 0..ALPHABET_SIZE
                    {
                    let mut slice_sum = 0.0;
                    for current in 0..ALPHABET_SIZE
                        { slice_sum += self.emission_probs[[current_state, prev2, prev1, current]]; }

                    if !close_to_one(slice_sum)
                        { return Err(ValidationFailure::EmissionSliceSum(current_state, prev2, prev1, slice_sum)); }
                    }
                }
            }

        if self.init_probs.iter().any(|&p| !(0.0..=1.0).contains(&p))
            { return Err(ValidationFailure::OutOfRange("init_probs")); }

        if self.trans_probs.iter().any(|&p| !(0.0..=1.0).contains(&p))
            { return Err(ValidationFailure::OutOfRange("trans_probs")); }

        if self.emission_probs.iter().any(|&p| !(0.0..=1.0).contains(&p))
            { return Err(ValidationFailure::OutOfRange("emission_probs")); }

        Ok(())
    }


    pub fn train_by_counting(&mut self, nucleotides: &str, annotation: &str) -> Result<()>
    {
        let x = state::sequence_to_indices(nucleotides)?;
        let labels = state::annotation_to_labels(annotation)?;

        if x.len() != labels.len()
            { return Err(Error::LengthMismatch(labels.len(), x.len())); }

        if x.len() < MIN_TRAINING_LENGTH
            { return Err(Error::SequenceTooShort(x.len(), MIN_TRAINING_LENGTH)); }

        let z = state::expand_annotation_to_states(&x, &labels)?;

        // Count tables seeded at one so no probability normalizes to zero
        let mut init = Array1::<f64>::ones(HMM_STATES);
        let mut trans = Array2::<f64>::ones((HMM_STATES, HMM_STATES));
        let mut emission =
            Array4::<f64>::ones((HMM_STATES, ALPHABET_SIZE, ALPHABET_SIZE, ALPHABET_SIZE));

        // Emission counting needs two symbols of context, so the main loop
        // starts at position 2; the first two transitions are seeded here.
        init[z[0]] += 1.0;
        trans[[z[0], z[1]]] += 1.0;
        trans[[z[1], z[2]]] += 1.0;

        for i in 2..x.len()
            {
            trans[[z[i - 1], z[i]]] += 1.0;
            emission[[z[i], x[i - 2] as usize, x[i - 1] as usize, x[i] as usize]] += 1.0;
            }

        let init_total = init.sum();
        init /= init_total;

        for mut row in trans.rows_mut()
            {
            let row_total = row.sum();
            row /= row_total;
            }

        for mut slice in emission.lanes_mut(Axis(3))
            {
            let slice_total = slice.sum();
            slice /= slice_total;
            }

        self.merge(&init, &trans, &emission, x.len() as u64);

        Ok(())
    }


    // Folds a freshly counted estimate into the running parameters, weighted
    // by relative evidence mass. All four fields update together.
    pub fn merge(&mut self, new_init: &Array1<f64>, new_trans: &Array2<f64>,
                 new_emission: &Array4<f64>, weight: u64)
    {
        let proportion = weight as f64 / ((self.num_obs_seen + weight) as f64);

        self.init_probs = &self.init_probs * (1.0 - proportion) + new_init * proportion;
        self.trans_probs = &self.trans_probs * (1.0 - proportion) + new_trans * proportion;
        self.emission_probs = &self.emission_probs * (1.0 - proportion) + new_emission * proportion;
        self.num_obs_seen += weight;
    }


    pub fn predict(&self, nucleotides: &str) -> Result<String>
    {
        let x = state::sequence_to_indices(nucleotides)?;

        if x.is_empty()
            { return Err(Error::EmptySequence); }

        let n = x.len();

        let log_init = self.init_probs.mapv(f64::ln);
        let log_trans = self.trans_probs.mapv(f64::ln);
        let log_emission = self.emission_probs.mapv(f64::ln);

        // Best predecessor per (position, state), flat indexed
        let mut track_table = vec![0usize; n * HMM_STATES];

        let mut column = log_init.to_vec();

        for pos in 1..n
        {
            let mut next_column = vec![f64::NEG_INFINITY; HMM_STATES];

            // No emission term until two preceding symbols exist
            let emission_ctx = if pos > 2
                { Some((x[pos - 2] as usize, x[pos - 1] as usize, x[pos] as usize)) }
            else
                { None };

            for next_state in 0..HMM_STATES
            {
                let mut best_prev = 0;
                let mut best_score = f64::NEG_INFINITY;

                for prev in 0..HMM_STATES
                    {
                    let score = column[prev] + log_trans[[prev, next_state]];
                    if score > best_score
                        {
                        best_score = score;
                        best_prev = prev;
                        }
                    }

                if let Some((prev2, prev1, current)) = emission_ctx
                    { best_score += log_emission[[next_state, prev2, prev1, current]]; }

                next_column[next_state] = best_score;
                track_table[pos * HMM_STATES + next_state] = best_prev;
            }

            if next_column.iter().all(|&score| score == f64::NEG_INFINITY)
                { return Err(Error::DegenerateColumn(pos)); }

            column = next_column;
        }

        let mut final_state = 0;
        let mut final_score = f64::NEG_INFINITY;
        for (state, &score) in column.iter().enumerate()
            {
            if score > final_score
                {
                final_score = score;
                final_state = state;
                }
            }

        if final_score == f64::NEG_INFINITY
            { return Err(Error::DegenerateColumn(n - 1)); }

        let mut path = vec![0usize; n];
        path[n - 1] = final_state;
        for pos in (0..n - 1).rev()
            { path[pos] = track_table[(pos + 1) * HMM_STATES + path[pos + 1]]; }

        Ok(state::collapse_states_to_annotation(&path))
    }
}
