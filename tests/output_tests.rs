use editguard::{
    detect_extra_fields, format_report, DiffReport, EditableResource, GroupConfig, OutputFormat,
    OutputOptions,
};

fn typo_report() -> DiffReport {
    let object = EditableResource::from(GroupConfig::new("a", 3));
    detect_extra_fields("name: a\nsize: 3\nrol: node\n", &object).unwrap()
}

#[test]
fn test_format_plain_no_changes() {
    let output = format_report(
        &DiffReport::empty(),
        &OutputFormat::Plain,
        &OutputOptions::default(),
    )
    .unwrap();
    assert_eq!(output, "No discarded fields.");
}

#[test]
fn test_format_plain_with_discarded_key() {
    let output =
        format_report(&typo_report(), &OutputFormat::Plain, &OutputOptions::default()).unwrap();
    assert!(output.contains("+ rol: node"));
    assert!(output.contains("Summary: 1 discarded"));
    assert!(output.contains("Discarded: rol"));
}

#[test]
fn test_format_json() {
    let output =
        format_report(&typo_report(), &OutputFormat::Json, &OutputOptions::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["discarded"][0], "rol");
    assert_eq!(value["stats"]["discarded"], 1);
    assert_eq!(value["changes"][0]["edited"], "\"node\"");
}

#[test]
fn test_format_json_empty() {
    let output = format_report(
        &DiffReport::empty(),
        &OutputFormat::Json,
        &OutputOptions::default(),
    )
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["hunks"].as_array().map(Vec::len), Some(0));
}
