//! AWS Signature Version 4 request signing for the Bedrock runtime.
//!
//! Only what `InvokeModel` needs: a POST with a JSON body, no query string,
//! header-based authorization.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Credentials and scope for one signature.
#[derive(Clone, Copy, Debug)]
pub struct SigningParams<'a> {
    pub access_key: &'a str,
    pub secret_key: &'a str,
    pub session_token: Option<&'a str>,
    pub region: &'a str,
    pub service: &'a str,
    pub time: DateTime<Utc>,
}

/// The parts of an HTTP request that go into the signature.
#[derive(Clone, Debug)]
pub struct SignableRequest<'a> {
    pub method: &'a str,
    /// `host[:port]` exactly as sent in the `Host` header.
    pub host: &'a str,
    /// Path as it appears on the wire (already percent-encoded).
    pub path: &'a str,
    /// Extra headers to sign, e.g. `content-type`.
    pub headers: &'a [(&'a str, &'a str)],
    pub body: &'a [u8],
}

/// Compute the headers to attach: `x-amz-date`, `authorization`, and
/// `x-amz-security-token` when a session token is present.
pub fn sign(request: &SignableRequest<'_>, params: &SigningParams<'_>) -> Vec<(&'static str, String)> {
    let amz_date = params.time.format("%Y%m%dT%H%M%SZ").to_string();
    let date = params.time.format("%Y%m%d").to_string();

    let mut headers: Vec<(String, String)> = request
        .headers
        .iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    headers.push(("host".into(), request.host.to_string()));
    headers.push(("x-amz-date".into(), amz_date.clone()));
    if let Some(token) = params.session_token {
        headers.push(("x-amz-security-token".into(), token.to_string()));
    }
    headers.sort();

    let canonical_uri = uri_encode(request.path, false);
    let payload_hash = sha256_hex(request.body);
    let (canonical, signed_headers) =
        canonical_request(request.method, &canonical_uri, "", &headers, &payload_hash);

    let scope = format!("{date}/{}/{}/aws4_request", params.region, params.service);
    let signature = signature(params.secret_key, &date, params.region, params.service, &amz_date, &canonical);

    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
        params.access_key
    );

    let mut out = vec![("x-amz-date", amz_date), ("authorization", authorization)];
    if let Some(token) = params.session_token {
        out.push(("x-amz-security-token", token.to_string()));
    }
    out
}

/// Build the canonical request. `headers` must be lowercase and sorted.
/// Returns the canonical request and the `SignedHeaders` list.
pub(crate) fn canonical_request(
    method: &str,
    canonical_uri: &str,
    canonical_query: &str,
    headers: &[(String, String)],
    payload_hash: &str,
) -> (String, String) {
    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{k}:{v}\n"))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical = format!(
        "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{payload_hash}"
    );
    (canonical, signed_headers)
}

/// Hex signature of `canonical` under the derived signing key.
pub(crate) fn signature(
    secret_key: &str,
    date: &str,
    region: &str,
    service: &str,
    amz_date: &str,
    canonical: &str,
) -> String {
    let scope = format!("{date}/{region}/{service}/aws4_request");
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        sha256_hex(canonical.as_bytes())
    );
    let key = signing_key(secret_key, date, region, service);
    hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()))
}

pub(crate) fn signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

pub(crate) fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// RFC 3986 percent-encoding: everything except `A-Z a-z 0-9 - _ . ~`
/// (and `/` unless `encode_slash`).
pub fn uri_encode(input: &str, encode_slash: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b'/' if !encode_slash => out.push('/'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const EXAMPLE_SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    fn params(time: DateTime<Utc>) -> SigningParams<'static> {
        SigningParams {
            access_key: "AKIDEXAMPLE",
            secret_key: EXAMPLE_SECRET,
            session_token: None,
            region: "us-east-1",
            service: "bedrock",
            time,
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_sha256_of_empty_payload() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_signing_key_matches_aws_example() {
        let key = signing_key(EXAMPLE_SECRET, "20120215", "us-east-1", "iam");
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn test_signature_matches_aws_example() {
        // IAM ListUsers example from the SigV4 documentation.
        let headers = vec![
            (
                "content-type".to_string(),
                "application/x-www-form-urlencoded; charset=utf-8".to_string(),
            ),
            ("host".to_string(), "iam.amazonaws.com".to_string()),
            ("x-amz-date".to_string(), "20150830T123600Z".to_string()),
        ];
        let (canonical, signed) = canonical_request(
            "GET",
            "/",
            "Action=ListUsers&Version=2010-05-08",
            &headers,
            &sha256_hex(b""),
        );
        assert_eq!(signed, "content-type;host;x-amz-date");
        assert_eq!(
            sha256_hex(canonical.as_bytes()),
            "f536975d06c0309214f805bb90ccff089219ecd68b2577efef23edd43b7e1a59"
        );
        assert_eq!(
            signature(EXAMPLE_SECRET, "20150830", "us-east-1", "iam", "20150830T123600Z", &canonical),
            "5d672d79c15b13162d9279b0855cfba6789a8edb4c82c400e06b5924a6f2b5d7"
        );
    }

    #[test]
    fn test_uri_encode() {
        assert_eq!(uri_encode("mistral.mistral-large-2402-v1:0", true), "mistral.mistral-large-2402-v1%3A0");
        assert_eq!(uri_encode("/model/a b/invoke", false), "/model/a%20b/invoke");
        assert_eq!(uri_encode("a/b", true), "a%2Fb");
        assert_eq!(uri_encode("~safe_-.", true), "~safe_-.");
    }

    #[test]
    fn test_canonical_uri_is_double_encoded() {
        let wire = format!("/model/{}/invoke", uri_encode("meta.llama3-70b-instruct-v1:0", true));
        assert_eq!(wire, "/model/meta.llama3-70b-instruct-v1%3A0/invoke");
        assert_eq!(
            uri_encode(&wire, false),
            "/model/meta.llama3-70b-instruct-v1%253A0/invoke"
        );
    }

    #[test]
    fn test_sign_produces_authorization_header() {
        let request = SignableRequest {
            method: "POST",
            host: "bedrock-runtime.us-east-1.amazonaws.com",
            path: "/model/meta.llama2-13b-chat-v1/invoke",
            headers: &[("Content-Type", "application/json")],
            body: br#"{"prompt":"x"}"#,
        };
        let headers = sign(&request, &params(fixed_time()));

        assert_eq!(headers[0], ("x-amz-date", "20240501T123000Z".to_string()));
        let (name, auth) = &headers[1];
        assert_eq!(*name, "authorization");
        assert!(auth.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240501/us-east-1/bedrock/aws4_request, \
             SignedHeaders=content-type;host;x-amz-date, Signature="
        ));
        let sig = auth.rsplit("Signature=").next().unwrap();
        assert_eq!(sig.len(), 64);
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_sign_is_deterministic_and_body_sensitive() {
        let make = |body: &'static [u8]| SignableRequest {
            method: "POST",
            host: "localhost:8080",
            path: "/model/x/invoke",
            headers: &[],
            body,
        };
        let p = params(fixed_time());
        let a = sign(&make(b"one"), &p);
        let b = sign(&make(b"one"), &p);
        let c = sign(&make(b"two"), &p);
        assert_eq!(a, b);
        assert_ne!(a[1], c[1]);
    }

    #[test]
    fn test_session_token_is_signed_and_returned() {
        let request = SignableRequest {
            method: "POST",
            host: "localhost",
            path: "/",
            headers: &[],
            body: b"",
        };
        let mut p = params(fixed_time());
        p.session_token = Some("FQoGZXIvYXdz");
        let headers = sign(&request, &p);
        assert!(headers[1].1.contains("SignedHeaders=host;x-amz-date;x-amz-security-token"));
        assert_eq!(headers[2], ("x-amz-security-token", "FQoGZXIvYXdz".to_string()));
    }
}
