use super::*;

fn record(tag: &str, is_devel: bool, cuda: &str, cudnn: &str, os: &str) -> ImageRecord {
    ImageRecord {
        tag: tag.to_string(),
        is_devel,
        os_version: os.to_string(),
        toolkit_version: cuda.to_string(),
        lib_version: cudnn.to_string(),
    }
}

fn listing() -> CatalogListing {
    CatalogListing::new(vec![
        record("12.1.0-cudnn8-devel-ubuntu22.04", true, "12.1.0", "8", "22.04"),
        record("11.8.0-cudnn8-runtime-ubuntu20.04", false, "11.8.0", "8", "20.04"),
    ])
}

#[test]
fn test_catalog_row_from_record() {
    let row = CatalogRow::from(&record(
        "11.8.0-cudnn8-runtime-ubuntu20.04",
        false,
        "11.8.0",
        "8",
        "20.04",
    ));

    assert_eq!(row.cuda, "11.8.0");
    assert_eq!(row.cudnn, "8");
    assert_eq!(row.ubuntu, "20.04");
    assert_eq!(row.devel, "no");
}

#[test]
fn test_pretty_output_is_a_table_in_catalog_order() {
    let output = format::format_output(&listing(), OutputFormat::Pretty).unwrap();

    assert!(output.contains("TAG"));
    assert!(output.contains("CUDNN"));
    let first = output.find("12.1.0-cudnn8-devel-ubuntu22.04").unwrap();
    let second = output.find("11.8.0-cudnn8-runtime-ubuntu20.04").unwrap();
    assert!(first < second);
}

#[test]
fn test_json_output_is_a_list_of_records() {
    let output = format::format_output(&listing(), OutputFormat::Json).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();

    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["tag"], "12.1.0-cudnn8-devel-ubuntu22.04");
    assert_eq!(items[0]["isDevel"], true);
    assert_eq!(items[1]["toolkitVersion"], "11.8.0");
}

#[test]
fn test_yaml_output_round_trips() {
    let output = format::format_output(&listing(), OutputFormat::Yaml).unwrap();
    let records: Vec<ImageRecord> = serde_yaml::from_str(&output).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].os_version, "20.04");
}

#[test]
fn test_empty_listing() {
    let listing = CatalogListing::new(Vec::new());

    assert!(listing.is_empty());
    assert_eq!(format::format_output(&listing, OutputFormat::Json).unwrap(), "[]");
}

#[test]
fn test_write_output_adds_trailing_newline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    write_output(&path, "[]\n\n").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
}

#[test]
fn test_write_output_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("catalog.json");

    let err = write_output(&path, "[]").unwrap_err();
    assert!(err.contains("catalog.json"));
}
