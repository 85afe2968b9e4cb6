// Key decoding, classification and derived-key tests

use gunzip_relay::classify::{Classification, FormatClassifier};
use gunzip_relay::key::{decode_key, derive_key};
use rstest::rstest;

#[rstest]
#[case("a/b/file.GZ", true)]
#[case("a/b/file.gz", true)]
#[case("a/b/file.txt", false)]
#[case("a/b/file", false)]
#[case("a.gz/b/file", false)]
#[case("archive.tar.gz", true)]
#[case("", false)]
fn test_classifier_eligibility(#[case] key: &str, #[case] eligible: bool) {
    let classifier = FormatClassifier::default();
    let key = decode_key(key).unwrap();
    assert_eq!(classifier.is_eligible(&key), eligible, "key: {:?}", key);
}

#[rstest]
#[case("logs/2024/app.gz", "logs/2024/app.log")]
#[case("app.gz", "app.log")]
#[case("a/b/FILE.Gz", "a/b/FILE.log")]
#[case("nested.gz/dir/app.gz", "nested.gz/dir/app.log")]
fn test_derived_key_shape(#[case] source: &str, #[case] expected: &str) {
    let key = decode_key(source).unwrap();
    let derived = derive_key(&key, "gz", "log");
    assert_eq!(derived, expected);
    assert!(
        derived.starts_with(key.prefix()),
        "derived key must keep the directory prefix"
    );
}

#[rstest]
#[case("my+file.gz", "my file.gz")]
#[case("caf%C3%A9/menu.gz", "café/menu.gz")]
#[case("a%2Bb%20c.gz", "a+b c.gz")]
#[case("100%25/x.gz", "100%/x.gz")]
fn test_decode_raw_keys(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(decode_key(raw).unwrap().as_str(), expected);
}

#[test]
fn test_decode_is_idempotent_on_canonical_keys() {
    // Canonical keys without '+' or '%' are fixed points of decoding
    let canonical = [
        "logs/2024/app.gz",
        "space in name.gz",
        "über/straße.gz",
        "emoji/🚀.gz",
        "",
    ];
    for raw in canonical {
        let once = decode_key(raw).unwrap();
        assert_eq!(once.as_str(), raw);
        assert_eq!(decode_key(once.as_str()).unwrap(), once);
    }
}

#[test]
fn test_classification_reasons() {
    let classifier = FormatClassifier::default();
    assert_eq!(
        classifier.classify(&decode_key("x/y.txt").unwrap()),
        Classification::WrongExtension("txt".to_string())
    );
    assert_eq!(
        classifier.classify(&decode_key("x/y").unwrap()),
        Classification::MissingExtension
    );
}
