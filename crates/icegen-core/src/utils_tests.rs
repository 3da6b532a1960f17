use crate::utils::{custom_collection, find_metadata, has_directive};

fn md(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn find_metadata_strips_prefix() {
    let directives = md(&["ami", "java:type:java.util.LinkedList"]);
    assert_eq!(
        find_metadata(&directives, "java:type:"),
        Some("java.util.LinkedList")
    );
    assert_eq!(find_metadata(&directives, "cpp:"), None);
}

#[test]
fn member_directive_wins_over_definition() {
    let member = md(&["java:type:java.util.ArrayList"]);
    let definition = md(&["java:type:java.util.LinkedList"]);

    assert_eq!(
        custom_collection(&member, &definition),
        Some("java.util.ArrayList")
    );
    assert_eq!(
        custom_collection(&[], &definition),
        Some("java.util.LinkedList")
    );
    assert_eq!(custom_collection(&[], &[]), None);
}

#[test]
fn directive_must_match_exactly() {
    let directives = md(&["amd", "java:type:java.util.LinkedList"]);
    assert!(has_directive(&directives, "amd"));
    assert!(!has_directive(&directives, "ami"));
    assert!(!has_directive(&directives, "java:type"));
}
