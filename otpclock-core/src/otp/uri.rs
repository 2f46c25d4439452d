//! `otpauth://` provisioning URIs
//!
//! Builds the key URI format understood by authenticator apps (usually
//! delivered as a QR code) and parses it back when a user pastes one.
//!
//! Format:
//! `otpauth://totp/{issuer}:{label}?secret={base32}&issuer={issuer}&algorithm={alg}&digits={n}&period={p}`

use crate::error::OtpError;
use crate::otp::base32::Base32Mode;
use crate::otp::hmac::DigestAlgorithm;
use crate::otp::totp::TotpParams;
use crate::types::Secret;
use url::Url;

/// Build a TOTP provisioning URI
///
/// `issuer` and `label` are percent-encoded per RFC 3986 in both the path
/// and the query. Whether a scanning app supports the algorithm or digit
/// count is left to the app.
///
/// # Errors
///
/// Returns `OtpError::InvalidLabel` if `label` or `issuer` is empty
pub fn build(
    label: &str,
    secret_base32: &str,
    issuer: &str,
    algorithm: DigestAlgorithm,
    digits: u32,
    period: u32,
) -> Result<String, OtpError> {
    if label.trim().is_empty() || issuer.trim().is_empty() {
        return Err(OtpError::InvalidLabel);
    }

    let issuer = urlencoding::encode(issuer);
    Ok(format!(
        "otpauth://totp/{issuer}:{label}?secret={secret}&issuer={issuer}&algorithm={algorithm}&digits={digits}&period={period}",
        label = urlencoding::encode(label),
        secret = urlencoding::encode(secret_base32),
        algorithm = algorithm.as_str(),
    ))
}

/// A decoded TOTP provisioning URI
#[derive(Debug, Clone)]
pub struct ProvisioningUri {
    /// Account name, without the issuer prefix
    pub label: String,
    /// Issuer from the `issuer` parameter, or the label prefix if absent
    pub issuer: Option<String>,
    /// Decoded shared secret
    pub secret: Secret,
    /// Algorithm, digits and period (RFC defaults when omitted)
    pub params: TotpParams,
}

impl ProvisioningUri {
    /// Parse an `otpauth://totp/...` URI
    ///
    /// The secret is decoded with `mode`.
    ///
    /// # Errors
    ///
    /// - `OtpError::InvalidUri` for a malformed URI, a non-`otpauth`
    ///   scheme, a non-TOTP type, a missing secret, or an unparsable
    ///   parameter
    /// - `OtpError::InvalidLabel` when the label is empty
    /// - Base32 and parameter validation errors for the embedded values
    pub fn parse(uri: &str, mode: Base32Mode) -> Result<Self, OtpError> {
        let url = Url::parse(uri.trim()).map_err(|e| invalid(format!("{}", e)))?;

        if url.scheme() != "otpauth" {
            return Err(invalid(format!(
                "scheme must be otpauth, got: {}",
                url.scheme()
            )));
        }

        match url.host_str() {
            Some(kind) if kind.eq_ignore_ascii_case("totp") => {}
            Some(kind) => {
                return Err(invalid(format!("unsupported OTP type: {}", kind)));
            }
            None => return Err(invalid("missing OTP type".to_string())),
        }

        // Split on the literal separator; an encoded `%3A` belongs to its segment
        let path = url.path().trim_start_matches('/');
        let (prefix, label) = match path.split_once(':') {
            Some((prefix, label)) => (Some(decode_segment(prefix)?), decode_segment(label)?),
            None => (None, decode_segment(path)?),
        };
        if label.is_empty() {
            return Err(OtpError::InvalidLabel);
        }

        let mut secret = None;
        let mut issuer = None;
        let mut params = TotpParams::default();

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "secret" => secret = Some(Secret::from_base32_with(&value, mode)?),
                "issuer" => issuer = Some(value.into_owned()),
                "algorithm" => params.algorithm = value.parse()?,
                "digits" => params.digits = parse_number("digits", &value)?,
                "period" => params.period = parse_number("period", &value)?,
                // Unknown parameters (e.g. `image`) are ignored
                _ => {}
            }
        }
        params.validate()?;

        let secret = secret.ok_or_else(|| invalid("missing secret parameter".to_string()))?;
        let issuer = issuer
            .or(prefix)
            .filter(|issuer| !issuer.trim().is_empty());

        Ok(Self {
            label,
            issuer,
            secret,
            params,
        })
    }

    /// Render back to URI form
    ///
    /// Requires an issuer; see `build`.
    pub fn to_uri(&self) -> Result<String, OtpError> {
        build(
            &self.label,
            &self.secret.to_base32(),
            self.issuer.as_deref().unwrap_or_default(),
            self.params.algorithm,
            self.params.digits,
            self.params.period,
        )
    }
}

fn parse_number(name: &str, value: &str) -> Result<u32, OtpError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(format!("{} must be a positive integer, got: {}", name, value)))
}

fn decode_segment(segment: &str) -> Result<String, OtpError> {
    urlencoding::decode(segment)
        .map(|decoded| decoded.trim().to_string())
        .map_err(|_| invalid("label is not valid UTF-8".to_string()))
}

fn invalid(reason: String) -> OtpError {
    OtpError::InvalidUri { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_default_parameters() {
        let uri = build(
            "alice@example.com",
            "JBSWY3DPEHPK3PXP",
            "Example",
            DigestAlgorithm::Sha1,
            6,
            30,
        )
        .unwrap();

        assert_eq!(
            uri,
            "otpauth://totp/Example:alice%40example.com?secret=JBSWY3DPEHPK3PXP&issuer=Example&algorithm=SHA1&digits=6&period=30"
        );
    }

    #[test]
    fn test_build_percent_encodes_dynamic_segments() {
        let uri = build(
            "john doe",
            "JBSWY3DPEHPK3PXP",
            "ACME Co:&",
            DigestAlgorithm::Sha256,
            8,
            60,
        )
        .unwrap();

        assert!(uri.starts_with("otpauth://totp/ACME%20Co%3A%26:john%20doe?"));
        assert!(uri.contains("&issuer=ACME%20Co%3A%26&"));
        assert!(uri.ends_with("&algorithm=SHA256&digits=8&period=60"));
    }

    #[test]
    fn test_build_rejects_empty_label_or_issuer() {
        assert_eq!(
            build("", "JBSWY3DPEHPK3PXP", "Example", DigestAlgorithm::Sha1, 6, 30).unwrap_err(),
            OtpError::InvalidLabel
        );
        assert_eq!(
            build("alice", "JBSWY3DPEHPK3PXP", " ", DigestAlgorithm::Sha1, 6, 30).unwrap_err(),
            OtpError::InvalidLabel
        );
    }

    #[test]
    fn test_parse_full_uri() {
        let parsed = ProvisioningUri::parse(
            "otpauth://totp/ACME%20Co:john.doe@email.com?secret=HXDMVJECJJWSRB3HWIZR4IFUGFTMXBOZ&issuer=ACME%20Co&algorithm=SHA256&digits=8&period=60",
            Base32Mode::Lenient,
        )
        .unwrap();

        assert_eq!(parsed.label, "john.doe@email.com");
        assert_eq!(parsed.issuer.as_deref(), Some("ACME Co"));
        assert_eq!(parsed.secret.to_base32(), "HXDMVJECJJWSRB3HWIZR4IFUGFTMXBOZ");
        assert_eq!(
            parsed.params,
            TotpParams::new(DigestAlgorithm::Sha256, 8, 60).unwrap()
        );
    }

    #[test]
    fn test_parse_defaults_and_prefix_issuer() {
        let parsed = ProvisioningUri::parse(
            "otpauth://totp/Example:alice?secret=jbswy3dpehpk3pxp",
            Base32Mode::Lenient,
        )
        .unwrap();

        assert_eq!(parsed.label, "alice");
        assert_eq!(parsed.issuer.as_deref(), Some("Example"));
        assert_eq!(parsed.params, TotpParams::default());
        assert_eq!(parsed.params.digits, 6);
        assert_eq!(parsed.params.period, 30);
    }

    #[test]
    fn test_parse_label_without_issuer() {
        let parsed =
            ProvisioningUri::parse("otpauth://totp/alice?secret=JBSWY3DPEHPK3PXP", Base32Mode::Lenient)
                .unwrap();
        assert_eq!(parsed.label, "alice");
        assert_eq!(parsed.issuer, None);
        assert_eq!(parsed.to_uri().unwrap_err(), OtpError::InvalidLabel);
    }

    #[test]
    fn test_parse_keeps_encoded_colon_in_issuer() {
        let uri = build(
            "alice",
            "JBSWY3DPEHPK3PXP",
            "ACME:Corp",
            DigestAlgorithm::Sha1,
            6,
            30,
        )
        .unwrap();
        assert!(uri.starts_with("otpauth://totp/ACME%3ACorp:alice?"));

        let parsed = ProvisioningUri::parse(&uri, Base32Mode::Lenient).unwrap();
        assert_eq!(parsed.label, "alice");
        assert_eq!(parsed.issuer.as_deref(), Some("ACME:Corp"));
        assert_eq!(parsed.to_uri().unwrap(), uri);
    }

    #[test]
    fn test_parse_prefix_with_encoded_colon() {
        let parsed = ProvisioningUri::parse(
            "otpauth://totp/ACME%3ACorp:bob?secret=JBSWY3DPEHPK3PXP",
            Base32Mode::Lenient,
        )
        .unwrap();
        assert_eq!(parsed.label, "bob");
        assert_eq!(parsed.issuer.as_deref(), Some("ACME:Corp"));
    }

    #[test]
    fn test_parse_round_trip() {
        let uri = build(
            "bob@example.com",
            "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ",
            "Example Inc",
            DigestAlgorithm::Sha512,
            7,
            45,
        )
        .unwrap();
        let parsed = ProvisioningUri::parse(&uri, Base32Mode::Strict).unwrap();

        assert_eq!(parsed.secret.expose(), b"12345678901234567890");
        assert_eq!(parsed.to_uri().unwrap(), uri);
    }

    #[test]
    fn test_parse_rejects_invalid_uris() {
        let cases = [
            "not a uri",
            "https://totp/alice?secret=JBSWY3DPEHPK3PXP",
            "otpauth://hotp/alice?secret=JBSWY3DPEHPK3PXP&counter=1",
            "otpauth://totp/alice?issuer=Example",
            "otpauth://totp/alice?secret=JBSWY3DPEHPK3PXP&digits=six",
        ];

        for uri in cases {
            assert!(
                matches!(
                    ProvisioningUri::parse(uri, Base32Mode::Lenient),
                    Err(OtpError::InvalidUri { .. })
                ),
                "{}",
                uri
            );
        }
    }

    #[test]
    fn test_parse_validates_embedded_values() {
        assert!(matches!(
            ProvisioningUri::parse("otpauth://totp/alice?secret=JBSW!", Base32Mode::Lenient),
            Err(OtpError::InvalidCharacter { character: '!', .. })
        ));
        assert_eq!(
            ProvisioningUri::parse(
                "otpauth://totp/alice?secret=JBSWY3DPEHPK3PXP&period=0",
                Base32Mode::Lenient
            )
            .unwrap_err(),
            OtpError::InvalidPeriod
        );
        assert_eq!(
            ProvisioningUri::parse("otpauth://totp/?secret=JBSWY3DPEHPK3PXP", Base32Mode::Lenient)
                .unwrap_err(),
            OtpError::InvalidLabel
        );
    }
}
