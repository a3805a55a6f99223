use raidbot_i18n::{AuditReport, Catalog, KeyScanner, Locale, OutputFormat};
use std::fs;
use std::path::Path;

fn write(root: &Path, relative: &str, body: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn catalog() -> Catalog {
    Catalog::from_sources([(
        Locale::En,
        r#"{
            "global": {"home": "Home", "login": "Log in", "logout": "Log out"},
            "faq": {"items": {"setup": {"question": "Q", "answer": "A"}}},
            "pricing": {"free": {"title": "Free"}, "premium": {"title": "Premium"}}
        }"#,
    )])
    .unwrap()
}

#[test]
fn test_audit_scans_tree_and_skips_build_output() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write(root, "src/nav.rs", r#"let home = t.t("global.home");"#);
    write(
        root,
        "src/faq.rs",
        r#"let items: Option<Value> = catalog.lookup_value(locale, "faq.items").cloned();"#,
    );
    write(root, "web/Pricing.tsx", "const title = t(`pricing.${plan}.title`)");
    write(root, "target/debug/gen.rs", r#"t("global.login")"#);
    write(root, "node_modules/lib/index.js", r#"t("global.login")"#);
    write(root, ".cache/old.ts", r#"t("global.login")"#);
    write(root, "src/notes.md", r#"t("global.logout")"#);

    let scanner = KeyScanner::new().unwrap();
    let report = AuditReport::audit(&catalog(), &scanner, &[root]).unwrap();

    assert_eq!(report.files_scanned, 3);
    assert_eq!(report.total_keys, 7);
    assert_eq!(report.used_keys, 3);
    assert_eq!(report.unused_keys, 2);

    let global = report.namespaces.iter().find(|n| n.namespace == "global").unwrap();
    assert_eq!(global.unused_keys, vec!["global.login", "global.logout"]);

    let pricing = report.namespaces.iter().find(|n| n.namespace == "pricing").unwrap();
    assert_eq!(pricing.dynamic_keys.len(), 2);
    assert_eq!(pricing.unused, 0);
}

#[test]
fn test_audit_with_custom_extensions_and_missing_roots() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "page.hbs", r#"{{ t "ignored" }} i18nKey="global.logout""#);
    write(dir.path(), "page.rs", r#"t("global.home")"#);

    let scanner = KeyScanner::new().unwrap().with_extensions(["hbs"]);
    let missing = dir.path().join("missing");
    let report = AuditReport::audit(&catalog(), &scanner, &[dir.path(), missing.as_path()]).unwrap();

    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.used_keys, 1);

    let text = report
        .only_namespace("global")
        .render(OutputFormat::Console, false)
        .unwrap();
    assert!(text.contains("Namespace: global"));
    assert!(text.contains("  - global.home"));
    assert!(!text.contains("  - global.logout"));
}
