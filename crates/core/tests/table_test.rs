use gridline_core::{ExtractionSettings, Table, Tabular, TextFragment, make_table};

fn word(top: f64, left: f64, width: f64, text: &str) -> TextFragment {
    TextFragment::new(top, left, width, 10.0, None, 10.0, text, 3.0)
}

#[test]
fn test_separators_from_wide_row_bucket_narrow_row() {
    let fragments = vec![
        word(0.0, 0.0, 40.0, "Name"),
        word(0.0, 100.0, 20.0, "Age"),
        word(20.0, 0.0, 90.0, "Alexander"),
        word(20.0, 95.0, 5.0, "7"),
    ];
    let table = make_table(fragments, &ExtractionSettings::default());
    assert_eq!(table.separators(), &[90.0]);
    assert_eq!(table.to_rows(), vec![vec!["Name", "Age"], vec!["Alexander", "7"]]);
    assert_eq!(
        table,
        Table::from_rows(&[vec!["Name", "Age"], vec!["Alexander", "7"]])
    );
}

#[test]
fn test_missing_cells_are_empty() {
    let fragments = vec![
        word(0.0, 0.0, 30.0, "a"),
        word(0.0, 50.0, 30.0, "b"),
        word(0.0, 100.0, 30.0, "c"),
        word(20.0, 100.0, 30.0, "z"),
    ];
    let table = make_table(fragments, &ExtractionSettings::default());
    assert_eq!(table.to_rows(), vec![vec!["a", "b", "c"], vec!["", "", "z"]]);
}

#[test]
fn test_rows_ordered_top_down() {
    let fragments = vec![
        word(40.0, 0.0, 30.0, "third"),
        word(0.0, 0.0, 30.0, "first"),
        word(20.0, 0.0, 30.0, "second"),
    ];
    let table = make_table(fragments, &ExtractionSettings::default());
    assert_eq!(table.to_rows(), vec![vec!["first"], vec!["second"], vec!["third"]]);
}

#[test]
fn test_glyphs_are_merged_before_bucketing() {
    let glyphs: Vec<TextFragment> = "Qty"
        .chars()
        .enumerate()
        .map(|(i, c)| word(0.0, i as f64 * 7.0, 6.0, &c.to_string()))
        .chain([word(0.0, 60.0, 10.0, "12")])
        .collect();
    let table = make_table(glyphs.clone(), &ExtractionSettings::default());
    assert_eq!(table.to_rows(), vec![vec!["Qty", "12"]]);

    let settings = ExtractionSettings {
        merge_words: false,
        ..ExtractionSettings::default()
    };
    let unmerged = make_table(glyphs, &settings);
    assert_eq!(unmerged.to_rows()[0].len(), 4);
}

#[test]
fn test_round_trip_through_rows() {
    let rows = vec![
        vec!["", "x", "y"],
        vec!["", "", "z"],
        vec!["", "w", ""],
    ];
    let table = Table::from_rows(&rows);
    assert_eq!(table.to_rows(), rows);
    assert_eq!(
        table,
        Table::from_rows(&[vec!["x", "y"], vec!["", "z"], vec!["w"]])
    );
}

#[test]
fn test_tsv_output() {
    let table = Table::from_rows(&[vec!["a b", "c"], vec!["d"]]);
    assert_eq!(table.to_tsv().unwrap(), "a b\tc\r\nd\r\n");
}

#[test]
fn test_empty_input() {
    let table = make_table(Vec::new(), &ExtractionSettings::default());
    assert!(table.rows().is_empty());
    assert_eq!(table.to_csv().unwrap(), "");
}
