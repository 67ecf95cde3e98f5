use ising_core::errors::{check_temperature, ErrorInfo, IsingError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("site", 3)
        .with_context("reason", "example")
}

#[test]
fn size_error_surface() {
    let err = IsingError::InvalidSize(sample_info("S001", "empty configuration"));
    assert_eq!(err.info().code, "S001");
    assert!(err.info().context.contains_key("site"));
}

#[test]
fn dimension_error_surface() {
    let err = IsingError::DimensionMismatch(sample_info("D001", "length mismatch"));
    assert_eq!(err.info().code, "D001");
    assert!(err.info().context.contains_key("reason"));
}

#[test]
fn coupling_error_surface() {
    let err = IsingError::AsymmetricCoupling(sample_info("A001", "missing reverse edge"));
    assert_eq!(err.info().code, "A001");
}

#[test]
fn display_includes_context_and_hint() {
    let err = IsingError::IndexOutOfRange(
        ErrorInfo::new("config-index", "index must lie in [0, 2^N)")
            .with_context("index", 16)
            .with_hint("use fewer bits"),
    );
    let rendered = err.to_string();
    assert!(rendered.starts_with("index out of range: "));
    assert!(rendered.contains("index=16"));
    assert!(rendered.contains("hint: use fewer bits"));
}

#[test]
fn temperatures_must_be_positive_and_finite() {
    assert!(check_temperature(0.5).is_ok());
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            check_temperature(bad),
            Err(IsingError::InvalidTemperature(_))
        ));
    }
}
