use std::fs;

use tabclean_common::{column_names, column_strings};
use tabclean_ingest::{
    DelimitedOptions, MultilevelHeader, TableOptions, read_delimited_table, read_raw_lines,
    remove_unnamed,
};
use tempfile::tempdir;

#[test]
fn test_export_with_preamble_and_blank_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("suppliers_20240101.csv");
    fs::write(
        &path,
        "Exported 2024-01-01\nNIF,Name,,Total\n500100200,Costa,,\"1.234,50\"\n",
    )
    .unwrap();

    let options = DelimitedOptions::new(",", Some("\""), "UTF-8")
        .unwrap()
        .with_table(TableOptions {
            header_row: Some(1),
            ..TableOptions::default()
        });
    let df = read_delimited_table(&path, &options).unwrap();
    assert_eq!(column_names(&df), vec!["NIF", "Name", "Unnamed: 2", "Total"]);

    let df = remove_unnamed(&df).unwrap();
    assert_eq!(column_names(&df), vec!["NIF", "Name", "Total"]);
    assert_eq!(column_strings(&df, "Total").unwrap(), vec!["1.234,50"]);
}

#[test]
fn test_multilevel_text_header_is_flattened() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("budget.csv");
    fs::write(
        &path,
        "Entity;Budget 2023;;Budget 2024;\n;plan;real;plan;real\nA;1;2;3;4\nB;5;6;7;8\n",
    )
    .unwrap();

    let options = DelimitedOptions::new(";", None, "UTF-8")
        .unwrap()
        .with_table(TableOptions {
            multilevel: Some(MultilevelHeader {
                macro_tags: vec!["Entity".to_string(), "Budget".to_string()],
                micro_tags: vec!["ent".to_string(), "bud".to_string()],
                duplicated_macro_tag: Some("year".to_string()),
            }),
            ..TableOptions::default()
        });
    let df = read_delimited_table(&path, &options).unwrap();
    assert_eq!(
        column_names(&df),
        vec![
            "ent_",
            "bud_plan_2023",
            "bud_real_2023",
            "bud_plan_2024",
            "bud_real_2024"
        ]
    );
    assert_eq!(df.height(), 2);
    assert_eq!(column_strings(&df, "bud_real_2024").unwrap(), vec!["4", "8"]);
}

#[test]
fn test_raw_lines_keep_malformed_rows_intact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("contacts.txt");
    fs::write(&path, b"ID|NAME\r\n1|\"A|B\"|x\r\n".as_slice()).unwrap();

    let lines = read_raw_lines(&path, "ANSI").unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].text, "1|\"A|B\"|x");
}
