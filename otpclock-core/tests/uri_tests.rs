//! Integration tests for provisioning URIs

use otpclock_core::error::OtpError;
use otpclock_core::otp::{uri, Base32Mode, DigestAlgorithm, ProvisioningUri, TotpParams};
use otpclock_core::types::Secret;

#[test]
fn test_uri_from_generated_secret_parses_back() {
    let secret = Secret::generate(32).unwrap();
    let built = uri::build(
        "carol@example.org",
        &secret.to_base32(),
        "Example Org",
        DigestAlgorithm::Sha256,
        6,
        30,
    )
    .unwrap();

    let parsed = ProvisioningUri::parse(&built, Base32Mode::Lenient).unwrap();
    assert_eq!(parsed.secret.expose(), secret.expose());
    assert_eq!(parsed.label, "carol@example.org");
    assert_eq!(parsed.issuer.as_deref(), Some("Example Org"));
    assert_eq!(parsed.to_uri().unwrap(), built);
}

#[test]
fn test_parsed_uri_generates_same_codes() {
    let parsed = ProvisioningUri::parse(
        "otpauth://totp/Test:rfc?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ&issuer=Test&digits=8",
        Base32Mode::Lenient,
    )
    .unwrap();

    let code = parsed.params.generate(&parsed.secret, 59).unwrap();
    assert_eq!(code.as_str(), "94287082");
}

#[test]
fn test_issuer_parameter_wins_over_prefix() {
    let parsed = ProvisioningUri::parse(
        "otpauth://totp/Old:alice?secret=JBSWY3DPEHPK3PXP&issuer=New",
        Base32Mode::Lenient,
    )
    .unwrap();
    assert_eq!(parsed.issuer.as_deref(), Some("New"));
}

#[test]
fn test_rejected_uris() {
    let reject = |uri: &str| ProvisioningUri::parse(uri, Base32Mode::Lenient).unwrap_err();

    assert!(matches!(
        reject("https://totp/Example:alice?secret=JBSWY3DPEHPK3PXP"),
        OtpError::InvalidUri { .. }
    ));
    assert!(matches!(
        reject("otpauth://hotp/Example:alice?secret=JBSWY3DPEHPK3PXP&counter=0"),
        OtpError::InvalidUri { .. }
    ));
    assert!(matches!(
        reject("otpauth://totp/Example:alice?issuer=Example"),
        OtpError::InvalidUri { .. }
    ));
    assert!(matches!(
        reject("otpauth://totp/Example:alice?secret=JBSWY3DPEHPK3PXP&digits=six"),
        OtpError::InvalidUri { .. }
    ));
    assert_eq!(
        reject("otpauth://totp/Example:alice?secret=JBSWY3DPEHPK3PXP&period=0"),
        OtpError::InvalidPeriod
    );
    assert_eq!(
        reject("otpauth://totp/Example:alice?secret=JBSWY3DPEHPK3PXP&algorithm=MD5"),
        OtpError::UnknownAlgorithm {
            name: "MD5".to_string()
        }
    );
    assert_eq!(
        reject("otpauth://totp/Example:?secret=JBSWY3DPEHPK3PXP"),
        OtpError::InvalidLabel
    );
}

#[test]
fn test_strict_mode_rejects_partial_group() {
    let uri = "otpauth://totp/Example:alice?secret=JBSWY3DPEHPK3PXPA";
    assert!(ProvisioningUri::parse(uri, Base32Mode::Lenient).is_ok());
    assert_eq!(
        ProvisioningUri::parse(uri, Base32Mode::Strict).unwrap_err(),
        OtpError::IncompleteGroup
    );
}

#[test]
fn test_build_uses_default_parameters() {
    let params = TotpParams::default();
    let built = uri::build(
        "alice",
        "JBSWY3DPEHPK3PXP",
        "Example",
        params.algorithm,
        params.digits,
        params.period,
    )
    .unwrap();
    assert!(built.ends_with("&algorithm=SHA1&digits=6&period=30"));
}
