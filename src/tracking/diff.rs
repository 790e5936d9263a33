//! Unified-diff style rendering of reconciliation results
//!
//! ```text
//! --- remote/<package>/<channel>
//! +++ local/<package>/<channel>
//! @@ -1,<only remote> +1,<only local> @@
//! -<version>    published remotely, missing locally
//! +<version>    held locally only
//!  <version>    on both sides
//! ```

use crate::tracking::reconcile::{ReconciliationResult, VersionState};

/// Render a result as diff lines, versions in ascending semver order
pub fn render(result: &ReconciliationResult) -> Vec<String> {
    let mut lines = Vec::with_capacity(result.all_versions.len() + 3);

    lines.push(format!("--- remote/{}/{}", result.package, result.channel));
    lines.push(format!("+++ local/{}/{}", result.package, result.channel));
    lines.push(format!(
        "@@ -1,{} +1,{} @@",
        result.only_remote.len(),
        result.only_local.len()
    ));

    for (version, state) in result.walk() {
        let marker = match state {
            VersionState::OnlyRemote => '-',
            VersionState::OnlyLocal => '+',
            VersionState::Both => ' ',
        };
        lines.push(format!("{}{}", marker, version));
    }

    lines
}

/// Render several results into one report, skipping results without a
/// delta unless `include_noop` is set
pub fn render_report(results: &[ReconciliationResult], include_noop: bool) -> String {
    let mut report = String::new();
    for result in results {
        if result.is_noop() && !include_noop {
            continue;
        }
        for line in render(result) {
            report.push_str(&line);
            report.push('\n');
        }
    }
    report
}
