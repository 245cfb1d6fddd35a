mod helpers;

use helpers::{fixture, setup_export_dir, write_zip};
use idea_miner::parsers::{collect_export_files, load_exports};
use idea_miner::{Analyzer, Role};
use tempfile::TempDir;

#[test]
fn loads_chatgpt_list_export() {
    let records = load_exports(&[fixture("chatgpt_export.json")]).unwrap();
    assert_eq!(records.len(), 3);

    let toast = &records[0];
    assert_eq!(toast.id, "conv-toast");
    assert_eq!(toast.messages.len(), 3);
    assert_eq!(toast.messages[0].role, Role::User);
    assert!(toast.messages[0].text.starts_with("The Toast POS menu sync failed"));
    assert!(toast.created_at.is_some());
    assert!(toast.updated_at.is_some());
}

#[test]
fn loads_wrapper_and_single_objects() {
    let records = load_exports(&[
        fixture("wrapped_export.json"),
        fixture("single_conversation.json"),
    ])
    .unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "flat-1");
    assert_eq!(records[0].messages[2].role, Role::Assistant);
    assert!(records[0].participants.contains("tool"));
    assert_eq!(records[1].title, "React design system");
}

#[test]
fn zip_entries_in_archive_order() {
    let tmp = TempDir::new().unwrap();
    let archive = tmp.path().join("export.zip");
    write_zip(
        &archive,
        &["single_conversation.json", "chatgpt_export.json"],
        &[("README.txt", "not an export"), ("broken.json", "{ nope")],
    );

    let records = load_exports(&[archive]).unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["single-1", "conv-toast", "conv-n8n", "conv-strategy"]);
}

#[test]
fn directories_recurse_in_name_order() {
    let tmp = TempDir::new().unwrap();
    let dir = setup_export_dir(&tmp, &["wrapped_export.json"]);
    let nested = dir.join("a-nested");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::copy(fixture("single_conversation.json"), nested.join("single.json")).unwrap();
    std::fs::write(dir.join("notes.md"), "ignored").unwrap();

    let files = collect_export_files(&[dir.clone()]).unwrap();
    assert_eq!(
        files,
        vec![nested.join("single.json"), dir.join("wrapped_export.json")]
    );

    let records = load_exports(&[dir]).unwrap();
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["single-1", "flat-1"]);
}

#[test]
fn missing_path_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let err = load_exports(&[tmp.path().join("missing.json")]).unwrap_err();
    assert!(err.to_string().contains("path not found"));
}

#[test]
fn malformed_json_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let bad = tmp.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    assert!(load_exports(&[bad]).is_err());
}

#[test]
fn path_order_defines_tie_breaks() {
    let a = fixture("wrapped_export.json");
    let b = fixture("single_conversation.json");
    let analyzer = Analyzer::builtin();

    let ab = analyzer.analyze(&load_exports(&[a.clone(), b.clone()]).unwrap());
    let ab_again = analyzer.analyze(&load_exports(&[a.clone(), b.clone()]).unwrap());
    let ba = analyzer.analyze(&load_exports(&[b, a]).unwrap());

    assert_eq!(ab, ab_again);
    assert_eq!(ab.corpus_stats, ba.corpus_stats);
    assert_ne!(ab.top_keywords, ba.top_keywords);
}
