//! Checks through the public facade.

use approx::assert_relative_eq;
use ensemble_cov::prelude::*;
use ensemble_cov::{CovarianceError, WeightingError};
use ndarray::{Array1, Array3, array};
use rstest::rstest;

fn ensemble(n_frames: usize, n_atoms: usize) -> Ensemble {
    let coordinates = Array3::from_shape_fn((n_frames, n_atoms, 3), |(f, a, k)| {
        (f as f64 * 0.45).sin() * (1.0 + 0.1 * a as f64)
            + ((f * 11 + a * 5 + k * 3) as f64 * 0.23).cos() * 0.3
    });
    let masses: Array1<f64> = (0..n_atoms).map(|a| 1.0 + a as f64).collect();
    Ensemble::new(coordinates, masses).unwrap()
}

#[rstest]
#[case(EstimatorConfig::MaximumLikelihood)]
#[case(EstimatorConfig::default())]
#[case(EstimatorConfig::Shrinkage(ShrinkageConfig { intensity: Some(0.5), ..Default::default() }))]
fn every_estimator_yields_symmetric_matrix(#[case] estimator: EstimatorConfig) {
    let options = CovarianceOptions {
        estimator,
        ..Default::default()
    };
    let sigma = covariance_matrix(&ensemble(12, 3), &options, None).unwrap();

    assert_eq!(sigma.dim(), (9, 9));
    for i in 0..9 {
        assert!(sigma[[i, i]] >= 0.0);
        for j in 0..9 {
            assert_relative_eq!(sigma[[i, j]], sigma[[j, i]], epsilon = 1e-12);
        }
    }
}

#[test]
fn half_intensity_is_midpoint_of_sample_and_prior() {
    let ensemble = ensemble(10, 2);
    let observations = ensemble.observations(&Selection::All).unwrap();
    let parts = LedoitWolfEstimator::default()
        .decompose(&observations, None)
        .unwrap();

    let options = CovarianceOptions {
        estimator: EstimatorConfig::Shrinkage(ShrinkageConfig {
            intensity: Some(0.5),
            ..Default::default()
        }),
        mass_weighted: false,
        ..Default::default()
    };
    let sigma = covariance_matrix(&ensemble, &options, None).unwrap();

    for ((i, j), value) in sigma.indexed_iter() {
        let midpoint = 0.5 * (parts.sample[[i, j]] + parts.prior[[i, j]]);
        assert_relative_eq!(*value, midpoint, epsilon = 1e-12);
    }
}

#[test]
fn degenerate_factor_surfaces_as_error() {
    // Two atoms mirrored through the origin: every frame averages to zero
    let coordinates = Array3::from_shape_fn((4, 2, 3), |(f, a, k)| {
        let value = (f * 3 + k + 1) as f64;
        if a == 0 { value } else { -value }
    });
    let ensemble = Ensemble::unweighted(coordinates).unwrap();

    let result = covariance_matrix(&ensemble, &CovarianceOptions::default(), None);
    assert!(matches!(
        result,
        Err(WeightingError::Covariance(CovarianceError::DegenerateFactor(_)))
    ));
}

#[test]
fn maximum_likelihood_worked_example() {
    let frames = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
    let sigma = MaximumLikelihoodEstimator.estimate(&frames, None).unwrap();
    assert_eq!(sigma, array![[4.0, 4.0], [4.0, 4.0]]);
}
