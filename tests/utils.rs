use svgsplit::{extract_str, SplitConfig};

pub fn extract(input: &str, label: &str) -> String {
    extract_str(input, label, &SplitConfig::default()).expect("extract failure")
}

#[allow(dead_code)]
pub fn contains(input: &str, label: &str, expected: &str) {
    let output = extract(input, label);
    assert!(
        output.contains(expected),
        "\n {}\nnot found in\n {}",
        expected,
        output
    );
}
