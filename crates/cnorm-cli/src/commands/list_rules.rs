//! List rules command implementation.

use cnorm_core::{catalog, RuleDef, StyleVersion};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<15} {:<9} {:<11} {:<7} Description",
        "Code", "Severity", "Versions", "Strict"
    );
    println!("{}", "-".repeat(100));

    for def in catalog() {
        println!("{}", row(&def));
    }

    println!("\nSuppress a rule with --no-<CODE>, e.g.:");
    println!("  cnorm --no-F6 --no-C1 src");
    println!("  cnorm --cs-2020 --strict");
}

fn row(def: &RuleDef) -> String {
    let versions: Vec<&str> = def.style_versions().into_iter().map(StyleVersion::year).collect();
    format!(
        "{:<15} {:<9} {:<11} {:<7} {}",
        def.code.as_str(),
        def.severity.to_string(),
        versions.join(","),
        if def.strict_only { "yes" } else { "no" },
        description(def)
    )
}

/// Description under the default style, or the only one the rule has.
fn description(def: &RuleDef) -> &'static str {
    def.description(StyleVersion::default())
        .or_else(|| StyleVersion::ALL.into_iter().find_map(|v| def.description(v)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnorm_core::RuleCode;

    #[test]
    fn rows_show_versions_and_strictness() {
        let h3 = row(&RuleCode::H3.def());
        assert!(h3.starts_with("H3 "));
        assert!(h3.contains(" minor "));
        assert!(h3.contains(" 2020 "));
        assert!(h3.contains(" yes "));

        let f2 = row(&RuleCode::F2.def());
        assert!(f2.contains("2020,2021"));
        assert!(f2.ends_with("function name should be in snake_case"));
    }

    #[test]
    fn version_only_rules_keep_their_description() {
        assert_eq!(
            description(&RuleCode::ImplicitLf.def()),
            "line endings must be done in UNIX style (LF) (CS2020)"
        );
        assert!(description(&RuleCode::G7.def()).ends_with("(CS2021)"));
    }
}
