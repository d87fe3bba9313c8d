//! Snapshot tests for user-facing text output.
//!
//! Run `cargo insta review` after intentional changes to these formats.

use crate::helpers::{row, WORDS_CSV};
use lexiscatter::chart::DatasetSpec;
use lexiscatter::data::{group_by_relationship, parse_csv_bytes, ColumnMap, validate_record, LoadError};
use lexiscatter::error::ExplorerError;
use lexiscatter::error_presenter::ErrorPresenter;
use lexiscatter::mobile_check::validate_html;
use lexiscatter::settings::ColumnNames;
use lexiscatter::types::FilteredDataset;

fn words_dataset() -> FilteredDataset {
    let table = parse_csv_bytes(WORDS_CSV.as_bytes()).unwrap();
    let columns = ColumnMap::resolve(&table, &ColumnNames::default());
    FilteredDataset::new(
        table
            .records
            .iter()
            .filter_map(|r| validate_record(r, &columns).ok())
            .collect(),
    )
}

#[test]
fn test_series_summary() {
    let summary: Vec<String> = group_by_relationship(&words_dataset())
        .iter()
        .map(|s| format!("{} | {} | {} | {}", s.key, s.label, s.fill, s.len()))
        .collect();

    insta::assert_snapshot!(summary.join("\n"), @r"
    cognates | Cognates | rgba(10, 61, 98, 0.6) | 2
    false_friends | False Friends | rgba(255, 107, 53, 0.7) | 2
    unknown | Unknown | rgba(128, 128, 128, 0.6) | 1
    ");
}

#[test]
fn test_dataset_config_json() {
    let mut hotel = row(Some("cognates"), 1.0, 2.1);
    hotel.english_word = "hotel".into();
    hotel.spanish_word = "hotel".into();
    hotel.cultural_domain = Some("travel".into());
    let series = group_by_relationship(&FilteredDataset::new(vec![hotel]));

    let json = serde_json::to_string_pretty(&DatasetSpec::from_series(&series[0])).unwrap();
    insta::assert_snapshot!(json, @r#"
    {
      "label": "Cognates",
      "data": [
        {
          "x": 1.0,
          "y": 2.1,
          "english_word": "hotel",
          "spanish_word": "hotel",
          "relationship_type": "cognates",
          "cultural_domain": "travel"
        }
      ],
      "backgroundColor": "rgba(10, 61, 98, 0.6)",
      "borderColor": "rgba(10, 61, 98, 0.6)",
      "pointRadius": 3.0,
      "pointHoverRadius": 5.0
    }
    "#);
}

#[test]
fn test_network_failure_block() {
    let presenter = ErrorPresenter::new("chart-container", "words.csv");
    let err = ExplorerError::from(LoadError::network(404));

    insta::assert_snapshot!(presenter.diagnostic_html(&err), @r#"
    <div class="chart-error" role="alert">
    <p>Error loading dataset. Please check the CSV file path.</p>
    <p class="chart-error-message">HTTP error! status: 404</p>
    <p class="chart-error-path">Expected path: words.csv</p>
    </div>
    "#);
}

#[test]
fn test_mobile_report_text() {
    let html = r#"<meta name="viewport" content="width=device-width, initial-scale=1">
<iframe loading="lazy" title="Interactive Dataset Explorer"></iframe>"#;

    insta::assert_snapshot!(validate_html(html).render(), @r"
    Validation Results:

    PASSED CHECKS:
      ✓ Viewport meta tag is correctly configured
      ✓ Iframe element is present
      ✓ Iframe has lazy loading attribute
      ✓ Iframe has accessibility title

    WARNINGS:
      ⚠ Responsive height constraints may be incomplete
      ⚠ Visual viewport API not used (may affect mobile browsers with dynamic UI)
      ⚠ MatchMedia API not used (may affect breakpoint detection)
      ⚠ Touch action CSS not configured
      ⚠ WebKit overflow scrolling not enabled

    ERRORS:
      ✗ Missing required media query breakpoints
      ✗ resizeChart function is missing
      ✗ Window resize listener is missing
      ✗ Orientation change listener is missing

    Summary: 4 passed, 5 warnings, 4 errors

    Some critical checks failed. Please fix errors before deploying.
    ");
}
