use ising_core::errors::{ErrorInfo, IsingError};
use ising_core::SpinConfiguration;

#[test]
fn configuration_round_trip_json() {
    let config = SpinConfiguration::from_bits(&[0, 1, 1, 0, 1, 0, 1, 0]).unwrap();
    let json = serde_json::to_string(&config).expect("serialize");
    assert_eq!(json, "[0,1,1,0,1,0,1,0]");
    let decoded: SpinConfiguration = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, config);
}

#[test]
fn deserialization_revalidates_bits() {
    assert!(serde_json::from_str::<SpinConfiguration>("[0,2,1]").is_err());
    assert!(serde_json::from_str::<SpinConfiguration>("[]").is_err());
}

#[test]
fn errors_round_trip_json() {
    let err = IsingError::AsymmetricCoupling(
        ErrorInfo::new("coupling-symmetry", "reverse edge missing").with_context("site", 2),
    );
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"kind\":\"AsymmetricCoupling\""));
    let decoded: IsingError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
