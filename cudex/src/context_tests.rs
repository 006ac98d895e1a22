use super::*;
use std::collections::HashMap;
use std::io::Write;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

fn build(path: Option<PathBuf>, pairs: &[(&str, &str)]) -> Result<AppContext, String> {
    AppContext::build_with_env(
        ColorChoice::Never,
        VerbosityLevel::Normal,
        path,
        env_of(pairs),
    )
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_verbosity_from_count() {
    assert_eq!(VerbosityLevel::from_count(0), VerbosityLevel::Normal);
    assert_eq!(VerbosityLevel::from_count(1), VerbosityLevel::Verbose);
    assert_eq!(VerbosityLevel::from_count(2), VerbosityLevel::VeryVerbose);
    assert_eq!(VerbosityLevel::from_count(3), VerbosityLevel::Trace);
    assert_eq!(VerbosityLevel::from_count(9), VerbosityLevel::Trace);
}

#[test]
fn test_verbosity_ordering() {
    assert!(VerbosityLevel::Trace > VerbosityLevel::VeryVerbose);
    assert!(VerbosityLevel::Verbose > VerbosityLevel::Normal);
}

#[test]
fn test_log_filter_per_level() {
    assert_eq!(VerbosityLevel::Normal.log_filter(), "warn");
    assert!(VerbosityLevel::Verbose.log_filter().contains("libcudex=info"));
    assert!(VerbosityLevel::VeryVerbose.log_filter().contains("libcudex=debug"));
    assert_eq!(VerbosityLevel::Trace.log_filter(), "trace");
}

#[test]
fn test_build_defaults() {
    let ctx = build(None, &[]).unwrap();

    assert_eq!(ctx.config, Config::default());
    assert!(ctx.config_path.is_none());
    assert!(ctx.credentials.is_none());
}

#[test]
fn test_config_file_overrides_defaults() {
    let file = config_file("catalog:\n  concurrency: 4\nregistry:\n  platform: linux/arm64\n");

    let ctx = build(Some(file.path().to_path_buf()), &[]).unwrap();

    assert_eq!(ctx.config.catalog.concurrency, 4);
    assert_eq!(ctx.config.registry.platform, "linux/arm64");
    assert_eq!(ctx.config.registry.image, "nvidia/cuda");
    assert_eq!(ctx.config_path.as_deref(), Some(file.path()));
}

#[test]
fn test_env_overrides_config_file() {
    let file = config_file("catalog:\n  concurrency: 4\n");

    let ctx = build(
        Some(file.path().to_path_buf()),
        &[
            (ENV_CONCURRENCY, "6"),
            (ENV_REGISTRY_URL, "http://localhost:5000"),
        ],
    )
    .unwrap();

    assert_eq!(ctx.config.catalog.concurrency, 6);
    assert_eq!(ctx.config.registry.url, "http://localhost:5000");
}

#[test]
fn test_flag_overrides_env() {
    let ctx = build(None, &[(ENV_CONCURRENCY, "6")])
        .unwrap()
        .with_concurrency(Some(2));

    assert_eq!(ctx.config.catalog.concurrency, 2);
}

#[test]
fn test_absent_flag_keeps_env_value() {
    let ctx = build(None, &[(ENV_CONCURRENCY, "6")])
        .unwrap()
        .with_concurrency(None);

    assert_eq!(ctx.config.catalog.concurrency, 6);
}

#[test]
fn test_invalid_env_concurrency() {
    let err = build(None, &[(ENV_CONCURRENCY, "many")]).unwrap_err();

    assert!(err.contains(ENV_CONCURRENCY));
    assert!(err.contains("many"));
}

#[test]
fn test_credentials_need_both_variables() {
    let ctx = build(None, &[(ENV_USERNAME, "me")]).unwrap();
    assert!(ctx.credentials.is_none());

    let ctx = build(None, &[(ENV_USERNAME, "me"), (ENV_PASSWORD, "secret")]).unwrap();
    assert_eq!(ctx.credentials, Some(Credentials::basic("me", "secret")));
}

#[test]
fn test_missing_explicit_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");

    assert!(build(Some(missing), &[]).is_err());
}

#[test]
fn test_cudex_rejects_zero_concurrency() {
    let ctx = build(None, &[]).unwrap().with_concurrency(Some(0));

    let err = ctx.cudex().err().unwrap();
    assert!(err.contains("concurrency"));
}

#[test]
fn test_default_config_path_name() {
    if let Some(path) = default_config_path() {
        assert!(path.ends_with("cudex/config.yaml"));
    }
}
