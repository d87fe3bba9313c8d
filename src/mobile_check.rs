//! Mobile responsiveness checklist for the page embedding the explorer.
//!
//! Purely textual: each check looks for a marker in the HTML source. Missing
//! critical markers are errors, missing enhancements are warnings.

use std::fmt::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Severity {
    Error,
    Warning,
}

struct Check {
    severity: Severity,
    passed: &'static str,
    failed: &'static str,
    test: fn(&str) -> bool,
}

const CHECKS: &[Check] = &[
    Check {
        severity: Severity::Error,
        passed: "Viewport meta tag is correctly configured",
        failed: "Viewport meta tag is missing or incorrect",
        test: |html| {
            html.contains("<meta name=\"viewport\"")
                && html.contains("width=device-width")
                && html.contains("initial-scale=1")
        },
    },
    Check {
        severity: Severity::Error,
        passed: "Media queries for breakpoints are present",
        failed: "Missing required media query breakpoints",
        test: |html| {
            html.contains("@media (max-width: 840px)") && html.contains("@media (max-width: 480px)")
        },
    },
    Check {
        severity: Severity::Warning,
        passed: "Responsive height constraints are set",
        failed: "Responsive height constraints may be incomplete",
        test: |html| {
            (html.contains("min-height: 500px") || html.contains("min-height:450px"))
                && (html.contains("max-height: 80vh") || html.contains("max-height:75vh"))
        },
    },
    Check {
        severity: Severity::Error,
        passed: "resizeChart function is defined",
        failed: "resizeChart function is missing",
        test: |html| html.contains("function resizeChart") || html.contains("resizeChart()"),
    },
    Check {
        severity: Severity::Error,
        passed: "Window resize listener is attached",
        failed: "Window resize listener is missing",
        test: |html| {
            html.contains("addEventListener('resize'") || html.contains("addEventListener(\"resize\"")
        },
    },
    Check {
        severity: Severity::Error,
        passed: "Orientation change listener is attached",
        failed: "Orientation change listener is missing",
        test: |html| html.contains("orientationchange"),
    },
    Check {
        severity: Severity::Warning,
        passed: "Visual viewport API is used (modern browsers)",
        failed: "Visual viewport API not used (may affect mobile browsers with dynamic UI)",
        test: |html| html.contains("visualViewport"),
    },
    Check {
        severity: Severity::Warning,
        passed: "MatchMedia API is used for breakpoint detection",
        failed: "MatchMedia API not used (may affect breakpoint detection)",
        test: |html| html.contains("matchMedia"),
    },
    Check {
        severity: Severity::Error,
        passed: "Iframe element is present",
        failed: "Iframe element is missing",
        test: |html| html.contains("<iframe"),
    },
    Check {
        severity: Severity::Warning,
        passed: "Iframe has lazy loading attribute",
        failed: "Iframe missing lazy loading attribute",
        test: |html| html.contains("loading=\"lazy\"") || html.contains("loading='lazy'"),
    },
    Check {
        severity: Severity::Warning,
        passed: "Iframe has accessibility title",
        failed: "Iframe missing accessibility title",
        test: |html| html.contains("title=\"Interactive Dataset Explorer\""),
    },
    Check {
        severity: Severity::Warning,
        passed: "Touch action CSS is configured",
        failed: "Touch action CSS not configured",
        test: |html| html.contains("touch-action"),
    },
    Check {
        severity: Severity::Warning,
        passed: "WebKit overflow scrolling is enabled",
        failed: "WebKit overflow scrolling not enabled",
        test: |html| html.contains("-webkit-overflow-scrolling"),
    },
];

/// Outcome of running every check against one page
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MobileReport {
    pub passes: Vec<&'static str>,
    pub warnings: Vec<&'static str>,
    pub errors: Vec<&'static str>,
}

impl MobileReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Process exit status: 0 without errors, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.is_ok() { 0 } else { 1 }
    }

    /// Human-readable report
    pub fn render(&self) -> String {
        let mut out = String::from("Validation Results:\n\n");
        let sections = [
            ("PASSED CHECKS:", "✓", &self.passes),
            ("WARNINGS:", "⚠", &self.warnings),
            ("ERRORS:", "✗", &self.errors),
        ];
        for (title, mark, items) in sections {
            if items.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{title}");
            for item in items.iter() {
                let _ = writeln!(out, "  {mark} {item}");
            }
            out.push('\n');
        }

        let _ = writeln!(
            out,
            "Summary: {} passed, {} warnings, {} errors\n",
            self.passes.len(),
            self.warnings.len(),
            self.errors.len()
        );
        if self.is_ok() {
            out.push_str("All critical checks passed! The page should work well on mobile devices.\n");
            out.push_str("Review warnings for potential improvements.\n");
        } else {
            out.push_str("Some critical checks failed. Please fix errors before deploying.\n");
        }
        out
    }
}

/// Run the checklist against HTML source.
pub fn validate_html(html: &str) -> MobileReport {
    let mut report = MobileReport::default();
    for check in CHECKS {
        if (check.test)(html) {
            report.passes.push(check.passed);
        } else {
            match check.severity {
                Severity::Error => report.errors.push(check.failed),
                Severity::Warning => report.warnings.push(check.failed),
            }
        }
    }
    report
}
