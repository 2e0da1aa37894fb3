use std::fs;
use subscrape::merge_jsonl_files;

/// Each input is appended verbatim followed by one newline; the count is reported.
/// A = {"a":1}\n, B = {"b":2}\n → {"a":1}\n\n{"b":2}\n\n
#[test]
fn merge_appends_each_file_plus_newline() {
    let tmp = tempfile::tempdir().unwrap();
    let a = tmp.path().join("a.jsonl");
    let b = tmp.path().join("b.jsonl");
    fs::write(&a, "{\"a\":1}\n").unwrap();
    fs::write(&b, "{\"b\":2}\n").unwrap();
    let out = tmp.path().join("merged.jsonl");

    let n = merge_jsonl_files(&[&a, &b], &out).unwrap();
    assert_eq!(n, 2);
    assert_eq!(fs::read_to_string(&out).unwrap(), "{\"a\":1}\n\n{\"b\":2}\n\n");
}

/// Order follows the input list and nothing is validated or deduplicated.
#[test]
fn merge_keeps_order_and_duplicates() {
    let tmp = tempfile::tempdir().unwrap();
    let a = tmp.path().join("a.jsonl");
    let junk = tmp.path().join("junk.txt");
    fs::write(&a, "{\"x\":1}").unwrap();
    fs::write(&junk, "not json").unwrap();
    let out = tmp.path().join("merged.jsonl");

    let n = merge_jsonl_files(&[&junk, &a, &a], &out).unwrap();
    assert_eq!(n, 3);
    assert_eq!(fs::read_to_string(&out).unwrap(), "not json\n{\"x\":1}\n{\"x\":1}\n");
}

/// A missing input fails the whole merge.
#[test]
fn merge_fails_on_missing_input() {
    let tmp = tempfile::tempdir().unwrap();
    let a = tmp.path().join("a.jsonl");
    fs::write(&a, "{}\n").unwrap();
    let missing = tmp.path().join("nope.jsonl");

    let err = merge_jsonl_files(&[&a, &missing], &tmp.path().join("merged.jsonl")).unwrap_err();
    assert!(format!("{err:#}").contains("nope.jsonl"), "error should name the input: {err:#}");
}

/// No inputs: empty output, count 0.
#[test]
fn merge_of_nothing_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("merged.jsonl");
    let inputs: [&std::path::Path; 0] = [];
    assert_eq!(merge_jsonl_files(&inputs, &out).unwrap(), 0);
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}
