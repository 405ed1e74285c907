use std::collections::HashSet;
use std::path::Path;

const MARKER_STATES: [&str; 3] = ["any", "het", "hom"];

fn main() {
    let rules_path = Path::new("catalogs/pgx_diplotype_rules.json");
    validate_rules_file(rules_path);
    set_build_dependencies();
}

fn validate_rules_file(rules_path: &Path) {
    // Ensure the rule set exists at build time
    assert!(
        rules_path.exists(),
        "\n\nRULES BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the diplotype rule set before building.\n",
        rules_path.display()
    );

    let contents = std::fs::read_to_string(rules_path).unwrap_or_else(|e| {
        panic!(
            "\n\nRULES BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            rules_path.display()
        );
    });

    let rules: serde_json::Value = serde_json::from_str(&contents).unwrap_or_else(|e| {
        panic!(
            "\n\nRULES BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            rules_path.display()
        );
    });

    validate_rules_structure(&rules);
}

fn validate_rules_structure(rules: &serde_json::Value) {
    assert!(
        rules.is_object(),
        "\n\nRULES BUILD ERROR: Root must be a JSON object\n\
         Got: {rules}\n"
    );

    let genes = rules
        .get("genes")
        .and_then(|g| g.as_array())
        .unwrap_or_else(|| {
            panic!(
                "\n\nRULES BUILD ERROR: Missing 'genes' array\n\
                 The rule set must have a top-level 'genes' array.\n"
            );
        });

    assert!(
        !genes.is_empty(),
        "\n\nRULES BUILD ERROR: 'genes' is empty\n"
    );

    let mut seen = HashSet::new();
    let mut total_rules = 0;
    for (i, gene) in genes.iter().enumerate() {
        let name = gene
            .get("gene")
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| {
                panic!("\n\nRULES BUILD ERROR: Gene at index {i} missing 'gene' field\n")
            });
        assert!(
            seen.insert(name.to_string()),
            "\n\nRULES BUILD ERROR: Gene '{name}' is defined twice\n"
        );
        total_rules += validate_branches(gene, name);
    }

    println!(
        "cargo:warning=Validated diplotype rules: {} genes, {total_rules} rules",
        genes.len()
    );
}

fn validate_branches(gene: &serde_json::Value, name: &str) -> usize {
    let branches = gene
        .get("branches")
        .and_then(|b| b.as_array())
        .unwrap_or_else(|| {
            panic!("\n\nRULES BUILD ERROR: Gene '{name}' missing 'branches' array\n")
        });

    let mut total = 0;
    for (j, branch) in branches.iter().enumerate() {
        let trigger = branch.get("trigger").and_then(|t| t.as_array());
        assert!(
            trigger.is_some_and(|t| !t.is_empty()),
            "\n\nRULES BUILD ERROR: Gene '{name}' branch {j} needs a non-empty 'trigger'\n"
        );

        let rules = branch
            .get("rules")
            .and_then(|r| r.as_array())
            .unwrap_or_else(|| {
                panic!("\n\nRULES BUILD ERROR: Gene '{name}' branch {j} missing 'rules'\n")
            });

        for (k, rule) in rules.iter().enumerate() {
            validate_rule(rule, name, j, k);
        }
        total += rules.len();
    }
    total
}

fn validate_rule(rule: &serde_json::Value, name: &str, branch: usize, index: usize) {
    let diplotype = rule.get("diplotype").and_then(|d| d.as_str());
    assert!(
        diplotype.is_some_and(|d| !d.trim().is_empty()),
        "\n\nRULES BUILD ERROR: Gene '{name}' branch {branch} rule {index} missing 'diplotype'\n"
    );

    if let Some(markers) = rule.get("markers").and_then(|m| m.as_object()) {
        for (rs, state) in markers {
            let state = state.as_str().unwrap_or_default();
            assert!(
                MARKER_STATES.contains(&state),
                "\n\nRULES BUILD ERROR: Gene '{name}' branch {branch} rule {index}: \
                 marker '{rs}' has state '{state}', expected one of {MARKER_STATES:?}\n"
            );
        }
    }
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the rule set changes
    println!("cargo:rerun-if-changed=catalogs/pgx_diplotype_rules.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
