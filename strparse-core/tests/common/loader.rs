//! YAML fixture files under `tests/fixtures/`

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One fixture case.
///
/// Which expectations are present depends on the fixture kind: JSON cases
/// carry a `trace` and usually a `canonical` form, query cases a `trace`,
/// address cases a list of `[name, email]` pairs.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    pub input: String,
    #[serde(default)]
    pub trace: Option<String>,
    #[serde(default)]
    pub canonical: Option<String>,
    #[serde(default)]
    pub addresses: Option<Vec<(String, String)>>,
}

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(format!("{name}.yaml"))
}

/// Cases of `tests/fixtures/<name>.yaml`, in file order. Panics on a
/// missing or malformed file.
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = fixture_path(name);
    let text = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    serde_yaml::from_str(&text).unwrap_or_else(|e| panic!("cannot parse {}: {e}", path.display()))
}
