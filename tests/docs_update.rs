//! Integration tests for the documentation updater
//!
//! Each test lays out CSV exports in a temporary scripts directory and
//! checks the Markdown documents written to a temporary docs directory.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vultr_catalog::docs::DocsUpdater;
use vultr_catalog::CatalogError;

const PLANS_CSV: &str = "\
id,bandwidth,disk,locations,monthly_cost,ram,type,vcpu_count
vc2-1c-1gb,1024,25,\"[\"\"ewr\"\",\"\"lhr\"\"]\",5.0,1024,vc2,1
vhf-1c-1gb,1024,32,[],6.0,1024,vhf,1
";

const REGIONS_CSV: &str = "\
id,city,continent,country,options
ewr,New Jersey,North America,US,\"[\"\"ddos_protection\"\"]\"
lhr,London,Europe,GB,[]
";

const OS_CSV: &str = "\
id,arch,family,name
387,x64,ubuntu,Ubuntu 22.04 x64
2136,x64,debian,Debian 12 x64
";

struct Workspace {
    scripts: TempDir,
    docs: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            scripts: tempfile::tempdir().unwrap(),
            docs: tempfile::tempdir().unwrap(),
        }
    }

    fn write_csv(&self, name: &str, content: &str) {
        fs::write(self.scripts.path().join(name), content).unwrap();
    }

    fn with_all_exports(self) -> Self {
        self.write_csv("vultr_plans_20240101_000000.csv", PLANS_CSV);
        self.write_csv("vultr_regions_20240101_000000.csv", REGIONS_CSV);
        self.write_csv("vultr_os_20240101_000000.csv", OS_CSV);
        self
    }

    fn updater(&self) -> DocsUpdater {
        DocsUpdater::new(self.scripts.path(), self.docs.path())
    }

    fn doc(&self, name: &str) -> String {
        fs::read_to_string(self.docs.path().join(name)).unwrap()
    }

    fn has_doc(&self, name: &str) -> bool {
        self.docs.path().join(name).exists()
    }
}

fn csv_count(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "csv"))
        .count()
}

#[test]
fn test_all_documents_are_written_and_csvs_removed() {
    let ws = Workspace::new().with_all_exports();

    let summary = ws.updater().run(false).unwrap();

    assert_eq!(summary.updated.len(), 3);
    assert_eq!(summary.deleted.len(), 3);
    assert_eq!(csv_count(ws.scripts.path()), 0);

    let plans = ws.doc("PLAN_IDS.md");
    assert!(plans.contains("- **Total Plans:** 2"));
    assert!(plans.contains("- [VC2](#vc2-plans) (1 plans)"));
    assert!(plans.contains("| `vc2-1c-1gb` | vc2 | 1 | 1.0 | 25 | 1024 | $5.0 |"));

    let regions = ws.doc("REGION_CODES.md");
    assert!(regions.contains("| `ewr` | New Jersey | US | ddos_protection |"));
    assert!(regions.contains("| `lhr` | London | GB | N/A |"));

    let os = ws.doc("OS_IDS.md");
    assert!(os.contains("- **OS Families:** 2"));
    assert!(os.contains("## Debian"));
    assert!(os.contains("## Ubuntu"));
}

#[test]
fn test_keep_csv_leaves_exports() {
    let ws = Workspace::new().with_all_exports();

    let summary = ws.updater().run(true).unwrap();

    assert!(summary.kept);
    assert!(summary.deleted.is_empty());
    assert_eq!(csv_count(ws.scripts.path()), 3);
}

#[test]
fn test_missing_export_aborts_without_writing_that_document() {
    let ws = Workspace::new();
    ws.write_csv("vultr_plans_20240101_000000.csv", PLANS_CSV);
    ws.write_csv("vultr_os_20240101_000000.csv", OS_CSV);

    let err = ws.updater().run(false).unwrap_err();

    match err.downcast_ref::<CatalogError>() {
        Some(CatalogError::NotFound { pattern, .. }) => {
            assert_eq!(pattern, "vultr_regions_*.csv")
        }
        other => panic!("expected NotFound, got {:?}", other),
    }

    // Earlier categories stay written, nothing after the failure is
    assert!(ws.has_doc("PLAN_IDS.md"));
    assert!(!ws.has_doc("REGION_CODES.md"));
    assert!(!ws.has_doc("OS_IDS.md"));

    // No cleanup happens on failure
    assert_eq!(csv_count(ws.scripts.path()), 2);
}

#[test]
fn test_empty_export_still_produces_a_document() {
    let ws = Workspace::new().with_all_exports();
    ws.write_csv("vultr_plans_20240101_000000.csv", "id,monthly_cost\n");

    ws.updater().run(true).unwrap();

    let plans = ws.doc("PLAN_IDS.md");
    assert!(plans.contains("- **Total Plans:** 0"));
    assert!(plans.contains("_No records available._"));
}

#[test]
fn test_width_override_applies_to_extra_columns() {
    let ws = Workspace::new().with_all_exports();
    ws.write_csv(
        "vultr_plans_20240101_000000.csv",
        "id,locations,type\nvc2-1c-1gb,ams-atl-blr-bom,vc2\n",
    );

    ws.updater().with_max_cell_width(Some(10)).run(true).unwrap();

    assert!(ws.doc("PLAN_IDS.md").contains("| ams-atl... |"));
}
