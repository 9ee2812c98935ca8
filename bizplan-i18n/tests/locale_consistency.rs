use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use bizplan_i18n::{
    CheckConfig, FillReport, I18nError, LocaleDir, LocaleReport, RunSummary, TreeLoader,
    build_type_map, compare_types, extract_keys, fill_locales, fill_missing, validate_locales,
    validate_with,
};
use serde_json::{Value, json};

fn temp_locales(label: &str, files: &[(&str, Value)]) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "bizplan-i18n-it-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));
    for (name, tree) in files {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string_pretty(tree).unwrap()).unwrap();
    }
    dir
}

fn comparison<'a>(
    reports: &'a [LocaleReport],
    locale: &str,
) -> &'a bizplan_i18n::ComparisonResult {
    reports
        .iter()
        .find(|r| r.locale() == locale)
        .and_then(LocaleReport::comparison)
        .unwrap_or_else(|| panic!("no comparison for {locale}"))
}

#[test]
fn flattening_yields_one_key_per_leaf() {
    let tree = json!({ "a": { "b": 1, "c": [2, 3] }, "d": "x" });
    let keys: HashSet<String> = extract_keys(&tree, "").into_iter().collect();
    let expected: HashSet<String> = ["a.b", "a.c.0", "a.c.1", "d"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(keys, expected);
}

#[test]
fn missing_keys_are_reported_per_locale() {
    let base = json!({ "bp": { "title": "t", "sections": { "one": "1", "two": "2" } } });
    let dir = temp_locales(
        "missing",
        &[
            ("en.json", base),
            ("de.json", json!({ "bp": { "title": "T", "sections": { "one": "Eins" } } })),
            (
                "fr.json",
                json!({ "bp": { "title": "Titre", "sections": { "one": "Un", "two": "Deux" } } }),
            ),
        ],
    );

    let reports = validate_locales(&dir, "en").unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(comparison(&reports, "de").missing_keys, vec!["bp.sections.two"]);
    assert!(comparison(&reports, "fr").missing_keys.is_empty());
}

#[test]
fn primitive_type_mismatches() {
    let base = json!({ "content": { "title": "Hello", "tags": ["a", "b"] } });
    let target = json!({ "content": { "title": ["Hallo"], "tags": "x" } });
    let keys: HashSet<String> = compare_types(&build_type_map(&base), &target)
        .into_iter()
        .map(|m| m.key)
        .collect();
    let expected: HashSet<String> = ["content.title", "content.tags"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(keys, expected);
}

#[test]
fn array_element_type_mismatch_is_reported_once() {
    let dir = temp_locales(
        "elements",
        &[
            ("en.json", json!({ "list": ["a", "b"] })),
            ("de.json", json!({ "list": [{ "x": 1 }] })),
        ],
    );
    let reports = validate_locales(&dir, "en").unwrap();
    let mismatches = &comparison(&reports, "de").type_mismatches;
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].key, "list[*]");
    assert_eq!(mismatches[0].expected.to_string(), "string");
    assert_eq!(mismatches[0].actual.to_string(), "object");
}

#[test]
fn empty_target_arrays_are_exempt() {
    let base = json!({ "features": [{ "name": "x" }] });
    let target = json!({ "features": [] });
    let mismatches = compare_types(&build_type_map(&base), &target);
    assert!(!mismatches.iter().any(|m| m.key.starts_with("features")));
}

#[test]
fn lists_of_different_lengths_are_reconciled() {
    let dir = temp_locales(
        "lengths",
        &[
            ("en.json", json!({ "market": { "bullets": ["a", "b", "c"] } })),
            ("de.json", json!({ "market": { "bullets": ["x"] } })),
        ],
    );
    let reports = validate_locales(&dir, "en").unwrap();
    assert!(comparison(&reports, "de").missing_keys.is_empty());
}

#[test]
fn missing_base_locale_is_fatal() {
    let dir = temp_locales("no-base", &[("de.json", json!({ "a": "b" }))]);
    let err = validate_locales(&dir, "en").unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("base locale"));
}

#[test]
fn malformed_base_locale_is_fatal() {
    let dir = temp_locales("bad-base", &[("de.json", json!({}))]);
    fs::write(dir.join("en.json"), "{ \"a\": ").unwrap();
    let err = validate_locales(&dir, "en").unwrap_err();
    assert!(matches!(err, I18nError::BaseLocale { .. }));
}

#[test]
fn malformed_target_locale_does_not_stop_the_run() {
    let base = json!({ "bp": { "title": "t" } });
    let dir = temp_locales("bad-target", &[("en.json", base.clone()), ("de.json", base)]);
    fs::write(dir.join("fr.json"), "not json").unwrap();

    let reports = validate_locales(&dir, "en").unwrap();
    assert!(reports[0].is_clean(false));
    assert!(matches!(
        &reports[1],
        LocaleReport::Failed { locale, reason } if locale == "fr" && reason.contains("invalid JSON")
    ));
    let summary = RunSummary::from_reports(&reports);
    assert_eq!((summary.locales_compared, summary.locales_failed), (1, 1));
}

#[test]
fn extra_keys_only_count_under_sensitive_prefixes() {
    let dir = temp_locales(
        "extra",
        &[
            ("en.json", json!({ "tables": { "a": "1" }, "bp": { "t": "x" } })),
            (
                "de.json",
                json!({ "tables": { "a": "1", "b": "2" }, "bp": { "t": "x", "local": "y" } }),
            ),
        ],
    );
    let reports = validate_locales(&dir, "en").unwrap();
    assert_eq!(comparison(&reports, "de").extra_keys, vec!["tables.b"]);

    let config = CheckConfig {
        sensitive_prefixes: vec!["bp.".to_string()],
        ..CheckConfig::default()
    };
    let reports = validate_with(&LocaleDir::new(&dir), &config).unwrap();
    assert_eq!(comparison(&reports, "de").extra_keys, vec!["bp.local"]);
}

#[test]
fn placeholder_drift_is_a_warning_unless_strict() {
    let dir = temp_locales(
        "placeholders",
        &[
            ("en.json", json!({ "greeting": "Hello {{name}}, you have {count} plans" })),
            ("de.json", json!({ "greeting": "Hallo {{name}}" })),
        ],
    );
    let reports = validate_locales(&dir, "en").unwrap();
    let de = comparison(&reports, "de");
    assert_eq!(de.placeholder_mismatches.len(), 1);
    assert_eq!(de.placeholder_mismatches[0].expected, vec!["count", "name"]);
    assert!(de.is_clean(false));
    assert!(!de.is_clean(true));
}

#[test]
fn jsonc_and_namespaced_locales_are_checked() {
    let en = json!({ "finance": { "title": "Finance", "kpi": "Revenue" } });
    let dir = temp_locales("jsonc", &[("en.json", en)]);
    fs::create_dir_all(dir.join("de")).unwrap();
    fs::write(
        dir.join("de").join("finance.json"),
        "{\n  // reviewed\n  \"title\": \"Finanzen\"\n}\n",
    )
    .unwrap();

    let reports = validate_locales(&dir, "en").unwrap();
    assert_eq!(comparison(&reports, "de").missing_keys, vec!["finance.kpi"]);
}

#[test]
fn fill_locales_backfills_and_preserves_translations() {
    let base = json!({
        "bp": { "title": "Plan", "sections": { "one": "1", "two": "2" } },
        "team": [{ "name": "CEO", "bio": "Founder" }]
    });
    let dir = temp_locales(
        "fill",
        &[
            ("en.json", base.clone()),
            (
                "de.json",
                json!({
                    "bp": { "title": "Plan DE", "sections": { "one": " " } },
                    "local": { "note": "nur DE" }
                }),
            ),
        ],
    );
    let locales = LocaleDir::new(&dir);

    let reports = fill_locales(&locales, &CheckConfig::default(), false).unwrap();
    let FillReport::Filled { backfilled_keys, written, .. } = &reports[0] else {
        panic!("fill failed: {reports:?}");
    };
    assert!(*written);
    assert!(backfilled_keys.contains(&"bp.sections.two".to_string()));

    let filled = locales.load_tree("de").unwrap();
    assert_eq!(filled["bp"]["title"], json!("Plan DE"));
    assert_eq!(filled["bp"]["sections"]["one"], json!("1"));
    assert_eq!(filled["local"]["note"], json!("nur DE"));
    assert_eq!(filled["team"], base["team"]);

    let validated = validate_locales(&dir, "en").unwrap();
    assert!(validated[0].is_clean(true));

    let again = fill_locales(&locales, &CheckConfig::default(), false).unwrap();
    assert!(matches!(
        &again[0],
        FillReport::Filled { backfilled_keys, written: false, .. } if backfilled_keys.is_empty()
    ));
}

#[test]
fn filler_properties_hold_for_site_shaped_trees() {
    let bases = [
        json!({ "hero": { "title": "Plan", "cta": "Start" }, "figures": { "count": 3 } }),
        json!({ "tables": { "rows": [["Year", 2025], ["Revenue", 1.5]] }, "labels": ["a", "b"] }),
        json!({ "team": [{ "name": "CEO", "links": { "web": "x" } }], "draft": false }),
    ];
    let targets = [
        json!({}),
        json!({ "hero": { "title": "" }, "extra": { "k": [1, 2] } }),
        json!({ "team": [], "draft": true, "labels": "broken" }),
    ];

    for base in &bases {
        let from_empty = fill_missing(base, Some(&json!({})));
        let filled_keys: HashSet<String> = extract_keys(&from_empty, "").into_iter().collect();
        for key in extract_keys(base, "") {
            assert!(filled_keys.contains(&key), "{key} missing after filling {base}");
        }

        for target in &targets {
            let once = fill_missing(base, Some(target));
            assert_eq!(fill_missing(base, Some(&once)), once);
            if let (Some(extra), Value::Object(map)) = (target.get("extra"), &once) {
                assert_eq!(map.get("extra"), Some(extra));
            }
        }
    }
}

#[test]
fn config_and_schema_files_beside_locales_are_not_checked() {
    let base = json!({ "bp": { "title": "Plan" } });
    let dir = temp_locales(
        "strays",
        &[
            ("en.json", base.clone()),
            ("de.json", base),
            ("check.json", json!({ "strict": true })),
            ("schemas/locale.json", json!({ "type": "object" })),
        ],
    );

    let reports = validate_locales(&dir, "en").unwrap();
    let locales: Vec<&str> = reports.iter().map(LocaleReport::locale).collect();
    assert_eq!(locales, vec!["de"]);
    assert!(reports[0].is_clean(true));
}
