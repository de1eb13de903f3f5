use approx::assert_relative_eq;
use temp_forecast::metrics::{forecast_accuracy, mean_squared_error, EvaluationReport};
use temp_forecast::ForecastError;

#[test]
fn test_regression_metrics() {
    let actual = vec![10.0, 20.0, 30.0, 40.0, 50.0];
    let predicted = vec![12.0, 18.0, 33.0, 37.0, 52.0];

    let accuracy = forecast_accuracy(&predicted, &actual).unwrap();
    assert_relative_eq!(accuracy.mae, 2.4, epsilon = 1e-12);
    assert_relative_eq!(accuracy.mse, 6.0, epsilon = 1e-12);
    assert_relative_eq!(accuracy.rmse, 6.0_f64.sqrt(), epsilon = 1e-12);

    assert_relative_eq!(
        mean_squared_error(&predicted, &actual).unwrap(),
        6.0,
        epsilon = 1e-12
    );
}

#[test]
fn test_perfect_prediction() {
    let values = [21.5, 22.0, 23.25];
    let accuracy = forecast_accuracy(&values, &values).unwrap();
    assert_eq!(accuracy.mse, 0.0);
    assert_eq!(accuracy.mae, 0.0);
}

#[test]
fn test_length_mismatch() {
    assert!(matches!(
        forecast_accuracy(&[1.0, 2.0], &[1.0]),
        Err(ForecastError::InsufficientData(_))
    ));
    assert!(matches!(
        forecast_accuracy(&[], &[]),
        Err(ForecastError::InsufficientData(_))
    ));
}

#[test]
fn test_report_display() {
    let report = EvaluationReport {
        accuracy: forecast_accuracy(&[1.0, 3.0], &[2.0, 2.0]).unwrap(),
        train_size: 8,
        test_size: 2,
    };
    let text = report.to_string();
    assert!(text.contains("8 train / 2 test"));
    assert!(text.contains("MSE:   1.0000"));
}
