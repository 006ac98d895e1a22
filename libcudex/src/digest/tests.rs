use super::*;
use std::str::FromStr;

// sha256("hello")
const HELLO_DIGEST: &str =
    "sha256:2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

#[test]
fn test_digest_from_valid_string_succeeds() {
    let digest = Digest::from_str(HELLO_DIGEST).unwrap();
    assert_eq!(digest.algorithm(), "sha256");
    assert_eq!(
        digest.hex(),
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
}

#[test]
fn test_digest_from_invalid_string_fails() {
    let digest = Digest::from_str("sha256:invalid-digest");
    assert!(matches!(digest.unwrap_err(), CudexError::Format { .. }));
}

#[test]
fn test_digest_display_trait() {
    let digest = Digest::from_str(HELLO_DIGEST).unwrap();
    assert_eq!(digest.to_string(), HELLO_DIGEST);
}

#[test]
fn test_verify_matching_content() {
    let digest = Digest::from_str(HELLO_DIGEST).unwrap();
    assert!(digest.verify(b"hello").is_ok());
}

#[test]
fn test_verify_mismatched_content() {
    let digest = Digest::from_str(HELLO_DIGEST).unwrap();
    let err = digest.verify(b"goodbye").unwrap_err();

    assert!(matches!(err, CudexError::Validation { .. }));
    assert!(err.to_string().contains("Digest mismatch"));
}
