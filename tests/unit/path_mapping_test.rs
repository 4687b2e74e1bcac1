//! Table-driven tests pinning the base path boundary behavior
#![cfg(unix)]

use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tplconv::mapping::{compute_base_path, map_path, ExtensionPolicy, PathMapper};

#[test]
fn test_compute_base_path_table() {
    let cases = [
        // diverging roots keep the first differing segment
        ("/a/b/src", "/a/b/dest", "/a/b/src"),
        ("a/b/src", "a/b/out", "a/b/src"),
        // destination runs out: the current segment is still kept
        ("/a/b/c", "/a", "/a/b"),
        ("/a/b/c/d", "/a/b", "/a/b/c"),
        // source runs out: every source segment matched
        ("/a", "/a/b/c", "/a"),
        ("/a/b", "/a/b", "/a/b"),
        // nothing in common
        ("/x/y", "/p/q", "/x"),
        ("src", "dest", "src"),
        // absolute-ness follows the source root only
        ("/a/b", "a/b", "/a/b"),
        ("a/b", "/a/c", "a/b"),
        // repeated and trailing separators are ignored
        ("/a//b/", "/a/b/c", "/a/b"),
        ("/a/b/src/", "/a/b/dest/", "/a/b/src"),
        // degenerate roots
        ("/", "/dest", "/"),
        ("", "/dest", ""),
    ];

    for (source, dest, expected) in cases {
        assert_eq!(
            compute_base_path(source, dest),
            expected,
            "compute_base_path({:?}, {:?})",
            source,
            dest
        );
    }
}

#[test]
fn test_shared_prefix_of_length_k() {
    let shared = ["srv", "www", "site", "app"];

    for k in 0..=shared.len() {
        let prefix = shared[..k].join("/");
        let (source, dest) = if k == 0 {
            ("/left".to_string(), "/right".to_string())
        } else {
            (format!("/{}/left", prefix), format!("/{}/right", prefix))
        };

        let expected = if k == 0 {
            "/left".to_string()
        } else {
            format!("/{}/left", prefix)
        };
        assert_eq!(compute_base_path(&source, &dest), expected);

        // same pair without the leading separator
        let relative = compute_base_path(&source[1..], &dest[1..]);
        assert_eq!(relative, expected[1..]);
    }
}

#[test]
fn test_map_path_replaces_first_occurrence_only() {
    assert_eq!(
        map_path("/src/a/src/x.tpl", "/src", "/out"),
        "/out/a/src/x.tpl"
    );
}

#[test]
fn test_map_path_unmatched_is_unchanged() {
    assert_eq!(map_path("/other/x.tpl", "/a/b/src", "/a/b/dest"), "/other/x.tpl");
}

#[test]
fn test_map_path_is_idempotent_without_reoccurrence() {
    let base = compute_base_path("/a/b/src", "/a/b/dest");
    let once = map_path("/a/b/src/sub/y.tpl", &base, "/a/b/dest");
    let twice = map_path(&once, &base, "/a/b/dest");
    assert_eq!(once, "/a/b/dest/sub/y.tpl");
    assert_eq!(once, twice);
}

#[test]
fn test_relative_mapping_agrees_with_substring_mapping() {
    let pairs = [
        ("/a/b/src", "/a/b/dest"),
        ("/a", "/a/b"),
        ("site/pug", "site/out"),
    ];

    for (source, dest) in pairs {
        let mapper = PathMapper::new(source, dest);
        let file = format!("{}/nested/page.pug", source);

        let relative = mapper.map(Path::new(&file)).unwrap();
        let substring = map_path(&file, mapper.base_path(), dest);
        assert_eq!(relative, PathBuf::from(substring), "{} -> {}", source, dest);
    }
}

#[test]
fn test_relative_mapping_when_dest_is_ancestor_of_source() {
    // Substring rewriting lands in the wrong place here; relative mapping
    // does not.
    let mapper = PathMapper::new("/a/b/c", "/a");
    assert_eq!(mapper.base_path(), "/a/b");
    assert_eq!(map_path("/a/b/c/x.tpl", mapper.base_path(), "/a"), "/a/c/x.tpl");
    assert_eq!(
        mapper.map(Path::new("/a/b/c/x.tpl")).unwrap(),
        PathBuf::from("/a/x.tpl")
    );
}

#[test]
fn test_relative_mapping_when_roots_share_nothing() {
    let mapper = PathMapper::new("/x/templates", "/y/html");
    assert_eq!(mapper.base_path(), "/x");
    assert_eq!(
        map_path("/x/templates/page.pug", mapper.base_path(), "/y/html"),
        "/y/html/templates/page.pug"
    );
    assert_eq!(
        mapper.map(Path::new("/x/templates/page.pug")).unwrap(),
        PathBuf::from("/y/html/page.pug")
    );
}

#[test]
fn test_relative_mapping_with_forced_extension() {
    let mapper = PathMapper::new("/a/b/src", "/a/b/dest")
        .with_extension(ExtensionPolicy::Force("html".to_string()));
    assert_eq!(
        mapper.map(Path::new("/a/b/src/sub/y.tpl")).unwrap(),
        PathBuf::from("/a/b/dest/sub/y.html")
    );
}
