// tests/resolver_test.rs
use release_ci::domain::Version;
use release_ci::resolver::{extra_tags, parse_base_version, ResolveOptions, VersionResolver};
use release_ci::warning::Warning;
use release_ci::CiError;

fn resolve(tags: &[&str], options: ResolveOptions) -> (Version, Version) {
    let resolved = VersionResolver::new(options).resolve(tags).unwrap();
    (resolved.current, resolved.next)
}

#[test]
fn test_prerelease_excluded_by_default() {
    let (current, next) = resolve(&["v1.2.3", "v1.2.4", "v1.3.0-beta"], ResolveOptions::default());
    assert_eq!(current, Version::new(1, 2, 4));
    assert_eq!(next, Version::new(1, 2, 5));
}

#[test]
fn test_prerelease_included_on_request() {
    let resolved = VersionResolver::new(ResolveOptions {
        include_prerelease: true,
        ..Default::default()
    })
    .resolve(&["v1.2.3", "v1.2.4", "v1.3.0-beta"])
    .unwrap();

    assert_eq!(resolved.current, Version::with_pre(1, 3, 0, "beta"));
    assert_eq!(resolved.current_tag.as_deref(), Some("v1.3.0-beta"));
    assert_eq!(resolved.next, Version::new(1, 3, 1));
}

#[test]
fn test_base_version_without_tags() {
    let (current, next) = resolve(
        &[],
        ResolveOptions {
            base_version: Some(Version::new(2, 0, 0)),
            ..Default::default()
        },
    );
    assert_eq!(current, Version::new(2, 0, 0));
    assert_eq!(next, Version::new(2, 0, 1));
}

#[test]
fn test_base_version_above_tags_becomes_next() {
    let (current, next) = resolve(
        &["v1.4.2"],
        ResolveOptions {
            base_version: Some(Version::new(2, 0, 0)),
            ..Default::default()
        },
    );
    assert_eq!(current, Version::new(1, 4, 2));
    assert_eq!(next, Version::new(2, 0, 0));
}

#[test]
fn test_base_version_below_tags_is_ignored() {
    let (_, next) = resolve(
        &["v3.1.0"],
        ResolveOptions {
            base_version: Some(Version::new(2, 0, 0)),
            ..Default::default()
        },
    );
    assert_eq!(next, Version::new(3, 1, 1));
}

#[test]
fn test_use_current_tag() {
    let (current, next) = resolve(
        &["v1.0.0"],
        ResolveOptions {
            use_current_tag: true,
            ..Default::default()
        },
    );
    assert_eq!(current, Version::new(1, 0, 0));
    assert_eq!(next, current);
}

#[test]
fn test_no_tags_no_base() {
    let (current, next) = resolve(&[], ResolveOptions::default());
    assert_eq!(current, Version::zero());
    assert_eq!(next, Version::new(0, 0, 1));
}

#[test]
fn test_garbage_tags_skipped() {
    let (current, _) = resolve(
        &["latest", "release-candidate", "v1.0.0", "deploy/prod", "v1.1"],
        ResolveOptions::default(),
    );
    assert_eq!(current, Version::new(1, 0, 0));
}

#[test]
fn test_next_is_always_greater_than_current() {
    let cases: &[&[&str]] = &[&[], &["v0.0.1"], &["v9.9.9", "v10.0.0"], &["1.0.0", "v0.9.0"]];
    for tags in cases {
        let (current, next) = resolve(tags, ResolveOptions::default());
        assert!(next > current, "{:?}: {} !> {}", tags, next, current);
    }
}

#[test]
fn test_tag_order_does_not_matter() {
    let forward = resolve(&["v1.0.0", "v1.10.0", "v1.9.0"], ResolveOptions::default());
    let backward = resolve(&["v1.9.0", "v1.10.0", "v1.0.0"], ResolveOptions::default());
    assert_eq!(forward, backward);
    assert_eq!(forward.0, Version::new(1, 10, 0));
}

#[test]
fn test_duplicate_normalized_tags_warn() {
    let resolved = VersionResolver::new(ResolveOptions::default())
        .resolve(&["v1.0.0", "1.0.0"])
        .unwrap();
    assert_eq!(resolved.current_tag.as_deref(), Some("v1.0.0"));
    assert_eq!(
        resolved.warnings,
        vec![Warning::DuplicateVersion {
            version: "1.0.0".to_string(),
            kept: "v1.0.0".to_string(),
            ignored: "1.0.0".to_string(),
        }]
    );
}

#[test]
fn test_patch_overflow_is_an_error() {
    let result = VersionResolver::new(ResolveOptions::default()).resolve(&["v1.0.18446744073709551615"]);
    assert!(matches!(result, Err(CiError::Version(_))));

    // The same tag is fine when no bump is needed
    let resolved = VersionResolver::new(ResolveOptions {
        use_current_tag: true,
        ..Default::default()
    })
    .resolve(&["v1.0.18446744073709551615"])
    .unwrap();
    assert_eq!(resolved.next, resolved.current);
}

#[test]
fn test_extra_tags_against_allow_list() {
    let reconciliation = extra_tags(&["v1.0.0", "v1.1.0"], &["v1.0.0", "v1.1.0", "v0.9.9"]);
    assert_eq!(reconciliation.extra, vec!["v0.9.9"]);
    assert!(reconciliation.warnings.is_empty());
}

#[test]
fn test_extra_tags_normalizes_prefix() {
    let reconciliation = extra_tags(&["1.0.0"], &["v1.0.0", "v2.0.0", "v1.5.0", "nightly"]);
    assert_eq!(reconciliation.extra, vec!["v2.0.0", "v1.5.0"]);
}

#[test]
fn test_extra_tags_warns_on_bad_allow_list_entry() {
    let reconciliation = extra_tags(&["v1.0.0", "not-a-version"], &["v1.0.0"]);
    assert!(reconciliation.extra.is_empty());
    assert!(matches!(
        reconciliation.warnings.as_slice(),
        [Warning::UnparsableKnownTag { tag, .. }] if tag == "not-a-version"
    ));
}

#[test]
fn test_parse_base_version_error() {
    assert!(matches!(
        parse_base_version("next"),
        Err(CiError::InvalidBaseVersion(_))
    ));
    assert_eq!(parse_base_version("v2.0.0").unwrap(), Version::new(2, 0, 0));
}
