

/*
    Sn = TP / ( TP + FN )
    Sp = TP / ( TP + FP )

    ACP = 0.25 * ( TP/(TP+FN) + TP/(TP+FP) + TN/(TN+FP) + TN/(TN+FN) )
    AC = ( ACP - 0.5 ) * 2
 */


use crate::model::state::{self, CoarseLabel};
use crate::model::{Error, Result};

#[derive(Clone, Copy)]
pub struct ClassCounts
{
    true_pos: u64,
    false_pos: u64,
    true_neg: u64,
    false_neg: u64,
}

impl ClassCounts
{
    fn new() -> ClassCounts
    {
        ClassCounts { true_pos: 0, false_pos: 0, true_neg: 0, false_neg: 0 }
    }

    pub fn get_tp(&self) -> u64 { self.true_pos }

    pub fn get_fp(&self) -> u64 { self.false_pos }

    pub fn get_tn(&self) -> u64 { self.true_neg }

    pub fn get_fn(&self) -> u64 { self.false_neg }

    // Positions the prediction assigned to this class
    pub fn predicted_total(&self) -> u64 { self.true_pos + self.false_pos }

    pub fn sensitivity(&self) -> f64
    {
        let tp = self.true_pos as f64;
        tp / (tp + self.false_neg as f64)
    }

    pub fn specificity(&self) -> f64
    {
        let tp = self.true_pos as f64;
        tp / (tp + self.false_pos as f64)
    }

    pub fn approximate_correlation(&self) -> f64
    {
        let tp = self.true_pos as f64;
        let fp = self.false_pos as f64;
        let tn = self.true_neg as f64;
        let false_neg = self.false_neg as f64;

        let acp = 0.25 * (tp / (tp + false_neg) + tp / (tp + fp) + tn / (tn + fp) + tn / (tn + false_neg));
        (acp - 0.5) * 2.0
    }

    pub fn dump(&self, label: &str)
    {
        println!("{} (tp={}, fp={}, tn={}, fn={}): Sn = {:.4}, Sp = {:.4}, AC = {:.4}",
                 label, self.true_pos, self.false_pos, self.true_neg, self.false_neg,
                 self.sensitivity(), self.specificity(), self.approximate_correlation());
    }
}




// Confusion counts between a true and a predicted coarse annotation.
//
// Counting is one-sided per class: positions predicted C (or R) score
// against the true label, positions predicted N score as negatives, and the
// opposite gene class contributes nothing to a class's counts.
pub struct AnnotationComparison
{
    coding: ClassCounts,
    reverse: ClassCounts,
    combined: ClassCounts,
}

impl AnnotationComparison
{
    pub fn compare(true_ann: &str, pred_ann: &str) -> Result<AnnotationComparison>
    {
        let true_labels = state::annotation_to_labels(true_ann)?;
        let pred_labels = state::annotation_to_labels(pred_ann)?;

        if true_labels.len() != pred_labels.len()
            { return Err(Error::LengthMismatch(pred_labels.len(), true_labels.len())); }

        let mut coding = ClassCounts::new();
        let mut reverse = ClassCounts::new();
        let mut combined = ClassCounts::new();

        for (&truth, &pred) in true_labels.iter().zip(pred_labels.iter())
        {
            match pred
            {
                CoarseLabel::Coding =>
                    {
                    if truth == CoarseLabel::Coding
                        {
                        coding.true_pos += 1;
                        combined.true_pos += 1;
                        }
                    else
                        {
                        coding.false_pos += 1;
                        combined.false_pos += 1;
                        }
                    },

                CoarseLabel::ReverseCoding =>
                    {
                    if truth == CoarseLabel::ReverseCoding
                        {
                        reverse.true_pos += 1;
                        combined.true_pos += 1;
                        }
                    else
                        {
                        reverse.false_pos += 1;
                        combined.false_pos += 1;
                        }
                    },

                CoarseLabel::NonCoding =>
                    {
                    if truth == CoarseLabel::Coding
                        { coding.false_neg += 1; }
                    else
                        { coding.true_neg += 1; }

                    if truth == CoarseLabel::ReverseCoding
                        { reverse.false_neg += 1; }
                    else
                        { reverse.true_neg += 1; }

                    if truth == CoarseLabel::NonCoding
                        { combined.true_neg += 1; }
                    else
                        { combined.false_neg += 1; }
                    },
            }
        }

        Ok(AnnotationComparison { coding, reverse, combined })
    }

    pub fn get_coding(&self) -> &ClassCounts { &self.coding }

    pub fn get_reverse(&self) -> &ClassCounts { &self.reverse }

    pub fn get_combined(&self) -> &ClassCounts { &self.combined }

    // Only meaningful when the prediction contains both gene classes
    pub fn combined_ac(&self) -> Option<f64>
    {
        if self.coding.predicted_total() > 0 && self.reverse.predicted_total() > 0
            { Some(self.combined.approximate_correlation()) }
        else
            { None }
    }

    pub fn dump(&self)
    {
        if self.coding.predicted_total() > 0
            { self.coding.dump("Cs  "); }

        if self.reverse.predicted_total() > 0
            { self.reverse.dump("Rs  "); }

        if self.coding.predicted_total() > 0 && self.reverse.predicted_total() > 0
            { self.combined.dump("Both"); }
    }
}
