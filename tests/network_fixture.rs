//! End-to-end checks of the demo network through the public API

use gatenet::{
    assert_equal, backward_pass, demo_input, demo_weights, forward_pass, FixedPoint, Layer,
    NetworkTrainer, NetworkWeights, NeuronWeights, TrainingConfig, Vector,
};

fn fp(x: f64) -> FixedPoint {
    FixedPoint::from_decimal(x).unwrap()
}

fn fixture() -> (Vector, NetworkWeights) {
    let hidden = Layer::new(vec![
        NeuronWeights::from_numbers(&[0.5, 1.0], 1.0).unwrap(),
        NeuronWeights::from_numbers(&[-1.0, 2.0], 0.0).unwrap(),
        NeuronWeights::from_numbers(&[0.5, 1.0], -0.5).unwrap(),
    ])
    .unwrap();
    let output = NeuronWeights::from_numbers(&[-0.5, 1.0, 0.25], 0.5).unwrap();
    (
        Vector::from_numbers(&[1.0, -1.0]).unwrap(),
        NetworkWeights::new(hidden, output).unwrap(),
    )
}

#[test]
fn test_fixture_matches_demo() {
    let (input, weights) = fixture();
    assert_equal(&input, &demo_input().unwrap());
    assert_equal(&weights, &demo_weights().unwrap());
}

#[test]
fn test_forward_pass() {
    let (input, weights) = fixture();
    assert_equal(&forward_pass(&input, &weights).unwrap(), &fp(0.25));
}

#[test]
fn test_one_step_reaches_4_25() {
    let (input, weights) = fixture();
    let updated = backward_pass(&input, fp(4.0), &weights, fp(0.5)).unwrap();
    assert_equal(&forward_pass(&input, &updated).unwrap(), &fp(4.25));
}

#[test]
fn test_forward_pass_is_idempotent() {
    let (input, weights) = fixture();
    let first = forward_pass(&input, &weights).unwrap();
    for _ in 0..5 {
        assert_equal(&forward_pass(&input, &weights).unwrap(), &first);
    }
}

#[test]
fn test_backward_pass_is_pure() {
    let (input, weights) = fixture();
    let snapshot = weights.clone();
    let a = backward_pass(&input, fp(4.0), &weights, fp(0.5)).unwrap();
    let b = backward_pass(&input, fp(4.0), &weights, fp(0.5)).unwrap();
    assert_equal(&a, &b);
    assert_equal(&weights, &snapshot);
}

#[test]
fn test_trainer_with_json_config() {
    let config: TrainingConfig =
        serde_json::from_str(r#"{"learning_rate": 0.5, "overflow": "Error"}"#).unwrap();
    let trainer = NetworkTrainer::new(config).unwrap();
    let (input, weights) = fixture();

    assert_equal(&trainer.predict(&input, &weights).unwrap(), &fp(0.25));
    let updated = trainer.step(&input, fp(4.0), &weights).unwrap();
    assert_equal(&trainer.predict(&input, &updated).unwrap(), &fp(4.25));
}

#[test]
fn test_input_dimension_checked() {
    let (_, weights) = fixture();
    let wrong = Vector::from_numbers(&[1.0, -1.0, 0.5]).unwrap();
    assert!(forward_pass(&wrong, &weights).is_err());
    assert!(backward_pass(&wrong, fp(4.0), &weights, fp(0.5)).is_err());
}
