//! Ordered observation windows and sample extraction
//!
//! Insertion order is chronological order. Nothing in this module sorts,
//! deduplicates or otherwise reorders observations: the regression component
//! uses the position in the window as its independent variable.

use std::ops::Index;
use std::slice;

use serde::{Deserialize, Serialize};

use crate::observation::{Observation, Variable};

/// An ordered, caller-owned sequence of observations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationWindow {
    observations: Vec<Observation>,
}

impl ObservationWindow {
    /// Create a window from observations in chronological order
    pub fn new(observations: Vec<Observation>) -> Self {
        ObservationWindow { observations }
    }

    /// Number of records (present or not)
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// The most recent `n` observations, order preserved
    pub fn tail(&self, n: usize) -> ObservationWindow {
        let start = self.observations.len().saturating_sub(n);
        ObservationWindow::new(self.observations[start..].to_vec())
    }

    /// Present values of `variable`, in window order
    pub fn sample(&self, variable: Variable) -> Vec<f64> {
        extract_sample(self, variable)
    }

    /// Present values of `variable` together with their window position
    pub fn indexed_sample(&self, variable: Variable) -> Vec<(usize, f64)> {
        extract_indexed(self, variable)
    }
}

impl From<Vec<Observation>> for ObservationWindow {
    fn from(observations: Vec<Observation>) -> Self {
        ObservationWindow::new(observations)
    }
}

impl FromIterator<Observation> for ObservationWindow {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        ObservationWindow::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ObservationWindow {
    type Item = &'a Observation;
    type IntoIter = slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

impl Index<usize> for ObservationWindow {
    type Output = Observation;

    fn index(&self, index: usize) -> &Observation {
        &self.observations[index]
    }
}

/// Project one field out of the window, skipping missing values.
///
/// Absent (and non-finite) readings are elided per field, never zero-filled,
/// so the sample can be shorter than the window.
pub fn extract_sample(window: &ObservationWindow, variable: Variable) -> Vec<f64> {
    window
        .iter()
        .filter_map(|obs| obs.get(variable).finite())
        .collect()
}

/// Like [`extract_sample`], keeping the 0-based window position of each value
pub fn extract_indexed(window: &ObservationWindow, variable: Variable) -> Vec<(usize, f64)> {
    window
        .iter()
        .enumerate()
        .filter_map(|(i, obs)| obs.get(variable).finite().map(|v| (i, v)))
        .collect()
}

/// Values of two variables at the positions where both are present
pub fn extract_paired(
    window: &ObservationWindow,
    a: Variable,
    b: Variable,
) -> (Vec<f64>, Vec<f64>) {
    window
        .iter()
        .filter_map(|obs| match (obs.get(a).finite(), obs.get(b).finite()) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .unzip()
}
