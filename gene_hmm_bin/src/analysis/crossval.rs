use rayon::prelude::*;

use crate::analysis::rater::AnnotationComparison;
use crate::model::hmm::HmmModel;
use crate::model::{Error, Result};


pub struct Fold
{
    index: usize,
    model: HmmModel,
    comparison: AnnotationComparison,
}

impl Fold
{
    pub fn get_index(&self) -> usize { self.index }

    pub fn get_model(&self) -> &HmmModel { &self.model }

    pub fn get_comparison(&self) -> &AnnotationComparison { &self.comparison }
}


// Leave-one-out cross validation: each fold trains a fresh model on every
// other genome and scores its prediction of the held-out one. Folds are
// independent models, so they run in parallel; each model has one writer.
pub fn cross_validate(genomes: &[String], annotations: &[String]) -> Result<Vec<Fold>>
{
    if genomes.len() != annotations.len()
        { return Err(Error::LengthMismatch(annotations.len(), genomes.len())); }

    (0..genomes.len())
        .into_par_iter()
        .map(|held_out| {
            let mut model = HmmModel::zeroed();

            for i in (0..genomes.len()).filter(|&i| i != held_out)
                { model.train_by_counting(&genomes[i], &annotations[i])?; }

            let predicted = model.predict(&genomes[held_out])?;
            let comparison = AnnotationComparison::compare(&annotations[held_out], &predicted)?;

            Ok(Fold { index: held_out, model, comparison })
        })
        .collect()
}


// Best fold by combined approximate correlation; folds whose prediction
// lacks one of the gene classes rank below everything else.
pub fn select_best(folds: &[Fold]) -> Option<&Fold>
{
    let mut best: Option<(&Fold, f64)> = None;

    for fold in folds
    {
        let ac = match fold.get_comparison().combined_ac()
        {
            Some(ac) if !ac.is_nan() => ac,
            _ => f64::NEG_INFINITY,
        };

        match best
        {
            Some((_, best_ac)) if ac <= best_ac => {}
            _ => best = Some((fold, ac)),
        }
    }

    best.map(|(fold, _)| fold)
}
