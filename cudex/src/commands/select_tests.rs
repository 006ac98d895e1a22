use super::*;

fn selected() -> SelectedImage {
    SelectedImage::new(
        "nvidia/cuda",
        ImageRecord {
            tag: "11.8.0-cudnn8-devel-ubuntu22.04".to_string(),
            is_devel: true,
            os_version: "22.04".to_string(),
            toolkit_version: "11.8.0".to_string(),
            lib_version: "8".to_string(),
        },
    )
}

#[test]
fn test_pretty_output_is_the_image_reference() {
    let output = format::format_output(&selected(), OutputFormat::Pretty).unwrap();

    assert_eq!(output, "nvidia/cuda:11.8.0-cudnn8-devel-ubuntu22.04");
}

#[test]
fn test_json_output_flattens_record() {
    let output = format::format_output(&selected(), OutputFormat::Json).unwrap();
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(json["image"], "nvidia/cuda:11.8.0-cudnn8-devel-ubuntu22.04");
    assert_eq!(json["tag"], "11.8.0-cudnn8-devel-ubuntu22.04");
    assert_eq!(json["libVersion"], "8");
}

#[test]
fn test_describe_request() {
    assert_eq!(describe_request("12.4", None), "CUDA 12.4");
    assert_eq!(describe_request("12.4", Some("9")), "CUDA 12.4 with cuDNN 9");
}
