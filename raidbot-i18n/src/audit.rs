//! Unused translation key auditor.
//!
//! Flattens the default locale's tree into dotted keys, scans source files
//! for translation calls and reports which keys nothing references.

use crate::{Catalog, I18nError, Result};
use raidbot_log::{debug, trace};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use walkdir::WalkDir;

/// Dotted path of every leaf in `tree`. Arrays contribute their indices.
pub fn collect_keys(tree: &Value) -> Vec<String> {
    fn visit(node: &Value, prefix: &str, out: &mut BTreeSet<String>) {
        let join = |segment: &str| {
            if prefix.is_empty() {
                segment.to_string()
            } else {
                format!("{}.{}", prefix, segment)
            }
        };
        match node {
            Value::Object(map) => {
                for (name, child) in map {
                    visit(child, &join(name), out);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    visit(child, &join(&index.to_string()), out);
                }
            }
            _ if !prefix.is_empty() => {
                out.insert(prefix.to_string());
            }
            _ => {}
        }
    }

    let mut keys = BTreeSet::new();
    visit(tree, "", &mut keys);
    keys.into_iter().collect()
}

/// Keys referenced by scanned sources.
#[derive(Debug, Clone, Default)]
pub struct KeyUsage {
    /// Keys passed literally to a translation call
    pub used: BTreeSet<String>,
    /// Keys fetched as whole containers; every child counts as used
    pub containers: BTreeSet<String>,
    /// Static prefixes of keys built at runtime
    pub dynamic_prefixes: BTreeSet<String>,
    pub files_scanned: usize,
}

impl KeyUsage {
    pub fn is_used(&self, key: &str) -> bool {
        self.used.contains(key)
            || self.containers.iter().any(|parent| {
                key == parent
                    || key
                        .strip_prefix(parent.as_str())
                        .is_some_and(|rest| rest.starts_with('.'))
            })
    }

    pub fn is_dynamic(&self, key: &str) -> bool {
        self.dynamic_prefixes
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()))
    }
}

const CALL: &str =
    r#"\b(?:t|t_args|translate)\s*\(\s*(?:[^()"'`,]*,\s*)?["']([A-Za-z0-9_.\-]+)["']"#;
const CONTAINER: &str = r#"\b(?:lookup_value|lookup_as(?:::<[^(]*>)?|value)\s*\(\s*(?:[^()"'`,]*,\s*)?["']([A-Za-z0-9_.\-]+)["']"#;
const RETURN_OBJECTS: &str = r#"\bt\s*\(\s*["']([^"']+)["']\s*,\s*\{[^}]*returnObjects\s*:\s*true"#;
const TRANS_COMPONENT: &str = r#"i18nKey=["']([^"']+)["']"#;
const DYNAMIC_FORMAT: &str = r#"\b(?:t|t_args|translate|lookup_value|lookup_as(?:::<[^(]*>)?|value)\s*\(\s*(?:[^()"'`,]*,\s*)?&?format!\(\s*"([A-Za-z0-9_.\-]*)\{"#;
const DYNAMIC_TEMPLATE: &str = r#"\bt\s*\(\s*`([^`$]*)\$\{"#;

/// Finds translation key references in source trees.
pub struct KeyScanner {
    extensions: Vec<String>,
    skip_dirs: Vec<String>,
    call: Regex,
    container: Regex,
    return_objects: Regex,
    trans_component: Regex,
    dynamic_format: Regex,
    dynamic_template: Regex,
}

impl KeyScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            extensions: ["rs", "ts", "tsx", "js", "jsx", "html", "hbs"]
                .map(String::from)
                .to_vec(),
            skip_dirs: ["target", "node_modules", "build", "dist"]
                .map(String::from)
                .to_vec(),
            call: Regex::new(CALL)?,
            container: Regex::new(CONTAINER)?,
            return_objects: Regex::new(RETURN_OBJECTS)?,
            trans_component: Regex::new(TRANS_COMPONENT)?,
            dynamic_format: Regex::new(DYNAMIC_FORMAT)?,
            dynamic_template: Regex::new(DYNAMIC_TEMPLATE)?,
        })
    }

    /// Replace the scanned file extensions.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Record the references found in one source text.
    pub fn scan_source(&self, source: &str, usage: &mut KeyUsage) {
        let captures = |re: &Regex| -> Vec<String> {
            re.captures_iter(source)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .collect()
        };

        usage.used.extend(captures(&self.call));
        usage.used.extend(captures(&self.trans_component));
        usage.containers.extend(captures(&self.container));
        usage.containers.extend(captures(&self.return_objects));
        usage.dynamic_prefixes.extend(
            captures(&self.dynamic_format)
                .into_iter()
                .chain(captures(&self.dynamic_template))
                .filter(|prefix| !prefix.is_empty()),
        );
    }

    /// Walk every root and scan matching files.
    ///
    /// Hidden directories and build output are skipped. Missing roots are
    /// ignored.
    pub fn scan_roots<P: AsRef<Path>>(&self, roots: &[P]) -> Result<KeyUsage> {
        let mut usage = KeyUsage::default();

        for root in roots.iter().map(AsRef::as_ref) {
            if !root.exists() {
                debug!("Skipping missing source root {}", root.display());
                continue;
            }

            let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
                entry.depth() == 0 || !entry.file_type().is_dir() || !self.skip_dir(entry.file_name())
            });

            for entry in walker {
                let entry = entry?;
                if !entry.file_type().is_file() || !self.wants_file(entry.path()) {
                    continue;
                }

                let source = match fs::read_to_string(entry.path()) {
                    Ok(source) => source,
                    Err(err) => {
                        debug!("Skipping unreadable {}: {}", entry.path().display(), err);
                        continue;
                    }
                };
                trace!("Scanning {}", entry.path().display());
                self.scan_source(&source, &mut usage);
                usage.files_scanned += 1;
            }
        }

        Ok(usage)
    }

    fn skip_dir(&self, name: &std::ffi::OsStr) -> bool {
        let name = name.to_string_lossy();
        name.starts_with('.') || self.skip_dirs.iter().any(|skip| name == skip.as_str())
    }

    fn wants_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|want| want == ext))
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "console" | "text" => Ok(OutputFormat::Console),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(I18nError::ParseError(format!("unknown output format '{}'", other))),
        }
    }
}

/// Usage figures for one top-level namespace.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceReport {
    pub namespace: String,
    pub total: usize,
    pub used: usize,
    pub unused: usize,
    pub usage_percent: u32,
    pub unused_keys: Vec<String>,
    /// Not referenced literally but covered by a dynamic prefix
    pub dynamic_keys: Vec<String>,
    #[serde(skip)]
    used_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub total_keys: usize,
    pub used_keys: usize,
    pub unused_keys: usize,
    pub usage_percent: u32,
    pub files_scanned: usize,
    pub dynamic_prefixes: Vec<String>,
    pub namespaces: Vec<NamespaceReport>,
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        100
    } else {
        ((part as f64 / total as f64) * 100.0).round() as u32
    }
}

impl AuditReport {
    /// Compare catalog keys against the recorded usage.
    pub fn build(keys: &[String], usage: &KeyUsage) -> Self {
        let mut grouped: BTreeMap<&str, Vec<&String>> = BTreeMap::new();
        for key in keys {
            let namespace = key.split('.').next().unwrap_or(key.as_str());
            grouped.entry(namespace).or_default().push(key);
        }

        let namespaces: Vec<NamespaceReport> = grouped
            .into_iter()
            .map(|(namespace, keys)| {
                let mut used_keys = Vec::new();
                let mut unused_keys = Vec::new();
                let mut dynamic_keys = Vec::new();
                for key in keys {
                    if usage.is_used(key) {
                        used_keys.push(key.clone());
                    } else if usage.is_dynamic(key) {
                        dynamic_keys.push(key.clone());
                    } else {
                        unused_keys.push(key.clone());
                    }
                }
                let total = used_keys.len() + unused_keys.len() + dynamic_keys.len();
                NamespaceReport {
                    namespace: namespace.to_string(),
                    total,
                    used: used_keys.len(),
                    unused: unused_keys.len(),
                    usage_percent: percent(used_keys.len(), total),
                    unused_keys,
                    dynamic_keys,
                    used_keys,
                }
            })
            .collect();

        let mut report = Self {
            total_keys: 0,
            used_keys: 0,
            unused_keys: 0,
            usage_percent: 100,
            files_scanned: usage.files_scanned,
            dynamic_prefixes: usage.dynamic_prefixes.iter().cloned().collect(),
            namespaces,
        };
        report.recount();
        report
    }

    /// Scan `roots` and audit the default locale of `catalog`.
    pub fn audit<P: AsRef<Path>>(catalog: &Catalog, scanner: &KeyScanner, roots: &[P]) -> Result<Self> {
        let keys = collect_keys(catalog.default_tree());
        let usage = scanner.scan_roots(roots)?;
        debug!(
            "Scanned {} files, {} literal keys, {} containers, {} dynamic prefixes",
            usage.files_scanned,
            usage.used.len(),
            usage.containers.len(),
            usage.dynamic_prefixes.len()
        );
        Ok(Self::build(&keys, &usage))
    }

    fn recount(&mut self) {
        self.total_keys = self.namespaces.iter().map(|n| n.total).sum();
        self.used_keys = self.namespaces.iter().map(|n| n.used).sum();
        self.unused_keys = self.namespaces.iter().map(|n| n.unused).sum();
        self.usage_percent = percent(self.used_keys, self.total_keys);
    }

    /// Keep a single namespace.
    pub fn only_namespace(mut self, namespace: &str) -> Self {
        self.namespaces.retain(|n| n.namespace == namespace);
        self.recount();
        self
    }

    /// Keep namespaces whose usage is at or below `threshold` percent. `0` keeps all.
    pub fn below_threshold(mut self, threshold: u32) -> Self {
        if threshold > 0 {
            self.namespaces.retain(|n| n.usage_percent <= threshold);
            self.recount();
        }
        self
    }

    pub fn render(&self, format: OutputFormat, verbose: bool) -> Result<String> {
        match format {
            OutputFormat::Console => Ok(self.render_console(verbose)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
            OutputFormat::Csv => Ok(self.render_csv()),
        }
    }

    fn render_console(&self, verbose: bool) -> String {
        const LIMIT: usize = 10;
        let rule = "=".repeat(60);
        let mut out = String::new();

        let _ = writeln!(out, "{}\nTranslation Keys Analysis Report\n{}", rule, rule);
        for ns in &self.namespaces {
            let _ = writeln!(
                out,
                "\nNamespace: {}\n  Total keys: {}\n  Used keys: {}\n  Unused keys: {}\n  Usage: {}%",
                ns.namespace, ns.total, ns.used, ns.unused, ns.usage_percent
            );
        }

        let _ = writeln!(
            out,
            "\n{}\nSummary:\n{}\nTotal translation keys: {}\nUsed keys: {}\nUnused keys: {}\nOverall usage: {}%",
            rule, rule, self.total_keys, self.used_keys, self.unused_keys, self.usage_percent
        );

        if !self.dynamic_prefixes.is_empty() {
            let _ = writeln!(out, "\n{}\nDynamic Key Patterns Detected:\n{}", rule, rule);
            for prefix in &self.dynamic_prefixes {
                let _ = writeln!(out, "  - {}*", prefix);
            }
        }

        if self.unused_keys > 0 {
            let _ = writeln!(out, "\n{}\nUnused Translation Keys by Namespace:\n{}", rule, rule);
            for ns in self.namespaces.iter().filter(|n| n.unused > 0) {
                let _ = writeln!(out, "\n{}: ({} unused keys)", ns.namespace, ns.unused);
                let shown = if verbose { ns.unused_keys.len() } else { LIMIT };
                for key in ns.unused_keys.iter().take(shown) {
                    let _ = writeln!(out, "  - {}", key);
                }
                if ns.unused_keys.len() > shown {
                    let _ = writeln!(out, "  ... and {} more", ns.unused_keys.len() - shown);
                }
            }
        }

        out
    }

    fn render_csv(&self) -> String {
        let mut out = String::from("Namespace,Key,Status\n");
        for ns in &self.namespaces {
            let rows = ns
                .used_keys
                .iter()
                .map(|k| (k, "used"))
                .chain(ns.dynamic_keys.iter().map(|k| (k, "dynamic")))
                .chain(ns.unused_keys.iter().map(|k| (k, "unused")));
            let mut rows: Vec<_> = rows.collect();
            rows.sort();
            for (key, status) in rows {
                let _ = writeln!(out, "{},{},{}", ns.namespace, key, status);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scanner() -> KeyScanner {
        KeyScanner::new().unwrap()
    }

    #[test]
    fn test_collect_keys_flattens_leaves() {
        let tree = json!({
            "a": {"b": "x", "c": ["one", {"d": "two"}]},
            "e": 1,
            "empty": {}
        });
        assert_eq!(collect_keys(&tree), vec!["a.b", "a.c.0", "a.c.1.d", "e"]);
        assert!(collect_keys(&json!("scalar root")).is_empty());
    }

    #[test]
    fn test_scan_literal_calls() {
        let mut usage = KeyUsage::default();
        scanner().scan_source(
            r#"
            let title = t.t("header.title");
            let x = catalog.translate(Locale::Ko, "global.home", &[]);
            let y = translator.t_args('footer.rights', &[("year", "2024")]);
            <Trans i18nKey="license.title" />
            let dynamic = t(key);
            "#,
            &mut usage,
        );
        let used: Vec<_> = usage.used.iter().map(String::as_str).collect();
        assert_eq!(used, vec!["footer.rights", "global.home", "header.title", "license.title"]);
    }

    #[test]
    fn test_scan_containers_and_dynamic() {
        let mut usage = KeyUsage::default();
        scanner().scan_source(
            r#"
            let items: Vec<FaqItem> = catalog.lookup_as::<Vec<FaqItem>>(locale, "faq.items")?;
            const bullets = t("features.community.bullets", { returnObjects: true })
            let meta = catalog.lookup_as(locale, &format!("pages.{}.meta", page));
            const label = t(`pricing.${plan}.title`)
            "#,
            &mut usage,
        );
        assert!(usage.containers.contains("faq.items"));
        assert!(usage.containers.contains("features.community.bullets"));
        assert!(usage.dynamic_prefixes.contains("pages."));
        assert!(usage.dynamic_prefixes.contains("pricing."));

        assert!(usage.is_used("faq.items.setup.question"));
        assert!(!usage.is_used("faq.itemsX"));
        assert!(usage.is_dynamic("pages.home.meta.title"));
    }

    #[test]
    fn test_report_groups_by_namespace() {
        let keys: Vec<String> = ["global.home", "global.login", "pages.home.meta.title", "meta.title"]
            .map(String::from)
            .to_vec();
        let mut usage = KeyUsage::default();
        usage.used.insert("global.home".to_string());
        usage.dynamic_prefixes.insert("pages.".to_string());

        let report = AuditReport::build(&keys, &usage);
        assert_eq!(report.total_keys, 4);
        assert_eq!(report.used_keys, 1);
        assert_eq!(report.unused_keys, 2);

        let global = &report.namespaces[0];
        assert_eq!(global.namespace, "global");
        assert_eq!(global.usage_percent, 50);
        assert_eq!(global.unused_keys, vec!["global.login"]);
        assert_eq!(report.namespaces[2].dynamic_keys, vec!["pages.home.meta.title"]);

        let only = report.clone().only_namespace("meta");
        assert_eq!(only.namespaces.len(), 1);
        assert_eq!(only.usage_percent, 0);

        let low = report.below_threshold(10);
        let names: Vec<_> = low.namespaces.iter().map(|n| n.namespace.as_str()).collect();
        assert_eq!(names, vec!["meta", "pages"]);
    }

    #[test]
    fn test_render_formats() {
        let keys = vec!["global.home".to_string(), "global.login".to_string()];
        let mut usage = KeyUsage::default();
        usage.used.insert("global.home".to_string());
        let report = AuditReport::build(&keys, &usage);

        let csv = report.render(OutputFormat::Csv, false).unwrap();
        assert_eq!(csv, "Namespace,Key,Status\nglobal,global.home,used\nglobal,global.login,unused\n");

        let json: Value = serde_json::from_str(&report.render(OutputFormat::Json, false).unwrap()).unwrap();
        assert_eq!(json["usagePercent"], 50);
        assert_eq!(json["namespaces"][0]["unusedKeys"][0], "global.login");

        let text = report.render(OutputFormat::Console, true).unwrap();
        assert!(text.contains("Overall usage: 50%"));
        assert!(text.contains("  - global.login"));

        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
