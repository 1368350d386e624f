use crate::model::PackageRecord;
use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Package")]
    identity: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Fixed In")]
    fixed_in: String,
    #[tabled(rename = "Issues")]
    issues: String,
}

pub fn format_records_table(records: &[PackageRecord]) -> String {
    if records.is_empty() {
        return "No packages found.".to_string();
    }

    let rows: Vec<RecordRow> = records
        .iter()
        .map(|r| RecordRow {
            identity: truncate(&r.identity(), 50),
            name: truncate(&r.package.name, 40),
            fixed_in: format_fixed_in(r),
            issues: r.fixed_issue_count().to_string(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn print_records_table(records: &[PackageRecord]) -> Result<()> {
    println!();
    println!("{}", format_records_table(records));
    println!();

    let with_fixes = records.iter().filter(|r| !r.secfixes.is_empty()).count();
    let issues: usize = records.iter().map(PackageRecord::fixed_issue_count).sum();
    println!(
        "{} packages, {} with secfixes, {} fixed issues",
        records.len(),
        with_fixes,
        issues
    );

    Ok(())
}

fn format_fixed_in(record: &PackageRecord) -> String {
    if record.secfixes.is_empty() {
        "-".to_string()
    } else {
        let versions: Vec<&str> = record.secfixes.keys().map(String::as_str).collect();
        truncate(&versions.join(", "), 40)
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
