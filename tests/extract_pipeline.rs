//! Pipeline behavior over hand-built containers: collection, ordering,
//! classification, failure handling, and session lifecycle.

mod common;

use common::{build_zip, id3_bytes, pdf_bytes, source, stored};
use notepluck::attach::{
    Category, ExtractError, ExtractOptions, Session, collect, extract,
};

#[tokio::test]
async fn collect_filters_to_attachment_files_in_order() {
    let a = stored(&[
        ("attachments/one", b"xx"),
        ("Attachments/Two", b"yy"),
        ("attachments/", b""),
        ("pages/p1", b"zz"),
    ]);
    let b = stored(&[("backup/attachments/three", b"ww")]);
    let sources = vec![source("a.goodnotes", a), source("b.goodnotes", b)];

    let candidates = collect(&sources).await.unwrap();

    let paths: Vec<_> = candidates.iter().map(|c| c.entry.path.as_str()).collect();
    assert_eq!(
        paths,
        ["attachments/one", "Attachments/Two", "backup/attachments/three"]
    );
    assert_eq!(candidates[0].source_index, 0);
    assert_eq!(candidates[1].source_index, 0);
    assert_eq!(candidates[2].source_index, 1);
    assert_eq!(candidates[2].source_name, "b.goodnotes");
}

#[tokio::test]
async fn end_to_end_mp3_and_pdf() {
    let container = stored(&[
        ("metadata.json", b"{}"),
        ("attachments/a1b2c3", &id3_bytes(2000, 0xAA)),
        ("attachments/d4e5f6", &pdf_bytes(500)),
    ]);
    let sources = vec![source("bio.goodnotes", container)];

    let results = extract(&sources, &ExtractOptions::default()).await.unwrap();

    assert_eq!(results.len(), 2);

    assert_eq!(results[0].id, "file_0");
    assert_eq!(results[0].rank, 0);
    assert_eq!(results[0].size, 2000);
    assert_eq!(results[0].kind.extension, "mp3");
    assert_eq!(results[0].kind.mime_type, "audio/mpeg");
    assert_eq!(results[0].kind.category, Category::Audio);
    assert_eq!(results[0].source, "bio");
    assert_eq!(results[0].bytes, id3_bytes(2000, 0xAA));

    assert_eq!(results[1].id, "file_1");
    assert_eq!(results[1].rank, 1);
    assert_eq!(results[1].size, 500);
    assert_eq!(results[1].kind.extension, "pdf");
    assert_eq!(results[1].kind.category, Category::Document);
}

#[tokio::test]
async fn size_sort_ties_keep_collection_order() {
    // Collection order: sizes 10, 50, 10, 30. Expected output order:
    // 50, 30, then the two 10s in their original relative order.
    let container = stored(&[
        ("attachments/e0", &id3_bytes(10, b'a')),
        ("attachments/e1", &id3_bytes(50, b'x')),
        ("attachments/e2", &id3_bytes(10, b'b')),
        ("attachments/e3", &id3_bytes(30, b'y')),
    ]);
    let sources = vec![source("n.goodnotes", container)];

    let results = extract(&sources, &ExtractOptions::default()).await.unwrap();

    let sizes: Vec<_> = results.iter().map(|r| r.size).collect();
    assert_eq!(sizes, [50, 30, 10, 10]);
    assert_eq!(results[2].bytes, id3_bytes(10, b'a'));
    assert_eq!(results[3].bytes, id3_bytes(10, b'b'));

    let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["file_0", "file_1", "file_2", "file_3"]);
}

#[tokio::test]
async fn no_attachment_entries_is_empty_not_error() {
    let container = stored(&[("pages/p1", b"content"), ("metadata.json", b"{}")]);
    let sources = vec![source("empty.goodnotes", container)];

    let results = extract(&sources, &ExtractOptions::default()).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn unknown_content_defaults_to_audio() {
    let container = stored(&[("attachments/blob", &[0u8; 64])]);
    let sources = vec![source("n.goodnotes", container)];

    let results = extract(&sources, &ExtractOptions::default()).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind.extension, "mp3");
    assert_eq!(results[0].kind.category, Category::Audio);
}

#[tokio::test]
async fn strict_mode_drops_unknown_content() {
    let container = stored(&[("attachments/blob", &[0u8; 64])]);
    let sources = vec![source("n.goodnotes", container)];

    let options = ExtractOptions {
        assume_audio: false,
    };
    let results = extract(&sources, &options).await.unwrap();
    assert!(results.is_empty(), "all rejected should be empty-state");
}

#[tokio::test]
async fn unreadable_entry_is_skipped_not_fatal() {
    // Method 99 is undecodable; the good entry must still come through,
    // with contiguous ranks.
    let container = build_zip(&[
        ("attachments/broken", &[1u8; 800], 99),
        ("attachments/good", &id3_bytes(100, 0), 0),
    ]);
    let sources = vec![source("n.goodnotes", container)];

    let results = extract(&sources, &ExtractOptions::default()).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].rank, 0);
    assert_eq!(results[0].id, "file_0");
    assert_eq!(results[0].size, 100);
}

#[tokio::test]
async fn invalid_container_is_a_decode_error() {
    let garbage = b"this is definitely not a zip container at all".to_vec();
    let sources = vec![source("broken.goodnotes", garbage)];

    let err = extract(&sources, &ExtractOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::Decode { ref name, .. } if name == "broken.goodnotes"));
}

#[tokio::test]
async fn provenance_spans_archives_and_strips_suffix() {
    // Equal sizes across two containers: submission order breaks the tie.
    let a = stored(&[("attachments/m", &id3_bytes(40, 1))]);
    let b = stored(&[("attachments/c", &id3_bytes(40, 2))]);
    let sources = vec![source("math.goodnotes", a), source("chem", b)];

    let results = extract(&sources, &ExtractOptions::default()).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].source, "math");
    assert_eq!(results[1].source, "chem");
}

#[tokio::test]
async fn rerun_releases_prior_session_handles() {
    let first = stored(&[("attachments/a", &id3_bytes(64, 0))]);
    let sources = vec![source("one.goodnotes", first)];
    let results = extract(&sources, &ExtractOptions::default()).await.unwrap();

    let mut session = Session::new().unwrap();
    session.replace(results).unwrap();

    let prior_paths: Vec<_> = session
        .registry()
        .all()
        .map(|a| a.handle.as_ref().unwrap().path().to_path_buf())
        .collect();
    assert!(prior_paths.iter().all(|p| p.exists()));

    let second = stored(&[("attachments/b", &pdf_bytes(128))]);
    let sources = vec![source("two.goodnotes", second)];
    let results = extract(&sources, &ExtractOptions::default()).await.unwrap();
    session.replace(results).unwrap();

    for path in &prior_paths {
        assert!(!path.exists(), "prior session handle leaked: {path:?}");
    }
    assert_eq!(session.registry().len(), 1);
    assert_eq!(
        session.registry().get("file_0").unwrap().kind.extension,
        "pdf"
    );
}
