use stochastic::input_modeling::{Distribution, Exponential, Normal, RandomVariable};
use stochastic::output_analysis::*;
use stochastic::utils::errors::SimulationError;

fn epsilon() -> f64 {
    1.0e-9
}

fn sample_estimator() -> Estimator<f64> {
    let mut estimator = Estimator::new(4);
    [124.2, 128.3, 100.9]
        .iter()
        .for_each(|value| estimator.add_observation(*value).unwrap());
    estimator
}

#[test]
fn partially_filled_estimator() {
    let estimator = sample_estimator();
    assert!((estimator.mean().unwrap() - (124.2 + 128.3 + 100.9) / 3.0).abs() < epsilon());
    let interval = estimator.confidence_interval(0.05).unwrap();
    assert_eq!(interval.count(), 3);
    assert_eq!(interval.z_gamma(), 1.960);
    assert_eq!(interval.std(), estimator.standard_deviation().unwrap());
    assert!((interval.half_width() - 16.723674396894165).abs() < epsilon());
}

#[test]
fn quantile_lookup() {
    assert_eq!(z_score(0.05).unwrap(), 1.960);
    assert!(matches!(
        z_score(0.5),
        Err(SimulationError::UnsupportedPrecision { .. })
    ));
    assert!(sample_estimator().confidence_interval(0.5).is_err());
}

#[test]
fn absolute_sample_size_plan() {
    let estimator = sample_estimator();
    let parameters = PlanningParameters::new(0.05, 0.01, Precision::Absolute).unwrap();
    let n = estimator.required_sample_size(&parameters).unwrap();
    let variance = estimator.variance().unwrap();
    assert_eq!(n, 1.960f64.powi(2) * variance / 0.01f64.powi(2));
    assert!((n - 8390438.56).abs() < 1.0e-3);
}

#[test]
fn relative_sample_size_plan() {
    let estimator = sample_estimator();
    let parameters = PlanningParameters::tagged(0.05, 0.03, "rel").unwrap();
    let n = estimator.required_sample_size(&parameters).unwrap();
    let variance = estimator.variance().unwrap();
    let mean = estimator.mean().unwrap();
    assert_eq!(
        n,
        1.960f64.powi(2) * variance / (0.03f64.powi(2) * mean.powi(2))
    );
}

#[test]
fn planning_from_yaml() {
    let parameters: PlanningParameters =
        serde_yaml::from_str("delta: 0.05\nepsilon: 3.1\nprecision: abs\n").unwrap();
    let n = sample_estimator().required_sample_size(&parameters).unwrap();
    assert!(n > 80.0 && n < 90.0);
}

#[test]
fn half_width_scales_with_inverse_root_count() {
    let mut normal = Normal::new(50.0, 16.0).unwrap();
    let half_widths: Vec<f64> = [400usize, 1600, 6400, 25600]
        .iter()
        .map(|count| {
            let mut estimator = Estimator::new(*count);
            (0..*count).for_each(|_| estimator.add_observation(normal.sample()).unwrap());
            let interval = estimator.confidence_interval(0.05).unwrap();
            // Exactly z · std / sqrt(n) for the observed std
            assert!(
                (interval.half_width() * (*count as f64).sqrt() / interval.std() - 1.960).abs()
                    < epsilon()
            );
            interval.half_width()
        })
        .collect();
    half_widths.windows(2).for_each(|pair| {
        let ratio = pair[1] / pair[0];
        assert!((ratio - 0.5).abs() < 0.1, "ratio {}", ratio);
    });
}

#[test]
fn intervals_cover_the_true_mean() {
    // 95% intervals on the mean of Exp(2), with true mean 0.5
    let mut exponential = Exponential::new(2.0).unwrap();
    let replications = 200;
    let covered = (0..replications)
        .filter(|_| {
            let mut estimator = Estimator::new(1000);
            (0..1000).for_each(|_| estimator.add_observation(exponential.sample()).unwrap());
            estimator.confidence_interval(0.05).unwrap().contains(0.5)
        })
        .count();
    assert!(covered >= 178, "{} of {} intervals covered", covered, replications);
}

#[test]
fn sequential_sampling_reaches_target_precision() {
    let mut variable = RandomVariable::from_json(r#"{"weibull": {"lambda": 1.0, "alpha": 2.0}}"#)
        .unwrap()
        .build()
        .unwrap();
    let parameters = PlanningParameters::new(0.05, 0.01, Precision::Relative).unwrap();
    let mut pilot = Estimator::new(500);
    (0..500).for_each(|_| pilot.add_observation(variable.sample()).unwrap());
    let required = pilot.required_sample_size(&parameters).unwrap().ceil() as usize;
    assert!(required > 500);

    // Double the plan, since it substitutes estimates for the true values
    let mut estimator = Estimator::new(2 * required);
    while !estimator.is_full() {
        estimator.add_observation(variable.sample()).unwrap();
    }
    let interval = estimator.confidence_interval(0.05).unwrap();
    assert!(interval.half_width() / interval.mean() < 0.01);
}

#[test]
fn full_estimator_rejects_further_observations() {
    let mut estimator = sample_estimator();
    estimator.add_observation(90.0).unwrap();
    assert!(matches!(
        estimator.add_observation(91.0),
        Err(SimulationError::CapacityExceeded { capacity: 4 })
    ));
    assert_eq!(estimator.len(), 4);
}

#[test]
fn interval_serializes_to_json() {
    let interval = sample_estimator().confidence_interval(0.05).unwrap();
    let json: serde_json::Value = serde_json::to_value(&interval).unwrap();
    assert_eq!(json["count"], 3);
    assert_eq!(json["zGamma"], 1.96);
    assert!(json["halfWidth"].as_f64().is_some());
}
