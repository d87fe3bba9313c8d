//! Unit tests for turning parsed records into rows.

use lexiscatter::data::{parse_csv_content, validate_record, ColumnMap, Rejection, ScoreField};
use lexiscatter::settings::ColumnNames;
use lexiscatter::types::{ParsedTable, Row};

fn table(body: &str) -> (ParsedTable, ColumnMap) {
    let table = parse_csv_content(body, ',').unwrap();
    let columns = ColumnMap::resolve(&table, &ColumnNames::default());
    (table, columns)
}

fn validate_all(body: &str) -> Vec<Result<Row, Rejection>> {
    let (table, columns) = table(body);
    table
        .records
        .iter()
        .map(|record| validate_record(record, &columns))
        .collect()
}

const HEADER: &str = "english_word,spanish_word,relationship_type,cultural_domain,levenshtein_similarity,complexity_overall_complexity";

#[test]
fn test_numeric_forms_are_accepted() {
    let body = format!("{HEADER}\na,b,c,d, 0.5 ,3\na,b,c,d,1e-3,-2.5\na,b,c,d,.75,4.\n");
    let rows: Vec<Row> = validate_all(&body).into_iter().map(Result::unwrap).collect();

    assert_eq!((rows[0].similarity, rows[0].complexity), (0.5, 3.0));
    assert_eq!((rows[1].similarity, rows[1].complexity), (0.001, -2.5));
    assert_eq!((rows[2].similarity, rows[2].complexity), (0.75, 4.0));
}

#[test]
fn test_non_finite_spellings_stay_text() {
    let body = format!("{HEADER}\na,b,c,d,inf,1\na,b,c,d,0.5,NaN\n");
    let results = validate_all(&body);

    assert_eq!(
        results[0],
        Err(Rejection::NotNumeric {
            field: ScoreField::Similarity,
            value: "inf".into()
        })
    );
    assert!(matches!(
        results[1],
        Err(Rejection::NotNumeric { field: ScoreField::Complexity, .. })
    ));
}

#[test]
fn test_similarity_is_checked_first() {
    let body = format!("{HEADER}\na,b,c,d,,\n");
    assert_eq!(validate_all(&body)[0], Err(Rejection::Missing(ScoreField::Similarity)));
}

#[test]
fn test_short_records_use_empty_trailing_cells() {
    let body = format!("{HEADER}\nhotel,hotel,cognates\n");
    assert_eq!(validate_all(&body)[0], Err(Rejection::Missing(ScoreField::Similarity)));
}

#[test]
fn test_column_order_does_not_matter() {
    let body = "complexity_overall_complexity,cultural_domain,levenshtein_similarity,english_word\n2.0,food,0.9,taco\n";
    let row = validate_all(body).remove(0).unwrap();

    assert_eq!(row.english_word, "taco");
    assert_eq!(row.spanish_word, "");
    assert_eq!(row.relationship_type, None);
    assert_eq!(row.cultural_domain.as_deref(), Some("food"));
    assert_eq!((row.similarity, row.complexity), (0.9, 2.0));
}

#[test]
fn test_numeric_words_keep_their_text() {
    let body = format!("{HEADER}\n1984,1984,cognates,,1,1\n");
    let row = validate_all(&body).remove(0).unwrap();
    assert_eq!(row.english_word, "1984");
}

#[test]
fn test_missing_columns_are_reported() {
    let (_, columns) = table("english_word,levenshtein_similarity\n");
    let names = ColumnNames::default();
    assert_eq!(
        columns.missing(&names),
        vec![
            "spanish_word",
            "relationship_type",
            "cultural_domain",
            "complexity_overall_complexity"
        ]
    );
}

#[test]
fn test_rejection_messages() {
    assert_eq!(Rejection::Missing(ScoreField::Complexity).to_string(), "missing complexity score");
    assert_eq!(
        Rejection::NotNumeric {
            field: ScoreField::Similarity,
            value: "high".into()
        }
        .to_string(),
        "similarity score \"high\" is not a number"
    );
    assert_eq!(
        Rejection::NotFinite(ScoreField::Similarity).to_string(),
        "similarity score is not finite"
    );
}
