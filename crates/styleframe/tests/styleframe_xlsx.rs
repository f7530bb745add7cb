//! End-to-end tests: style a frame, save it as xlsx, read it back

use pretty_assertions::assert_eq;
use styleframe::prelude::*;
use styleframe::utils::{colors, number_formats};
use tempfile::TempDir;

fn numbers_frame() -> StyleFrame {
    StyleFrame::from_columns(vec![("a", vec![1, 2, 3]), ("b", vec![1, 2, 3])], None).unwrap()
}

fn save(sf: &StyleFrame, options: &ExportOptions) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xlsx");
    sf.to_excel_file(&path, options).unwrap();
    (dir, path)
}

#[test]
fn test_column_style_reaches_every_body_cell() {
    let mut sf = numbers_frame();
    let style = StyleOptions::new()
        .bg_color(colors::BLUE)
        .bold(true)
        .font("Impact")
        .font_color(colors::YELLOW)
        .font_size(20)
        .underline("single")
        .build()
        .unwrap();
    let options = ColumnStyleOptions {
        style_header: true,
        width: Some(10.0),
        ..Default::default()
    };
    sf.apply_column_style(["a"], &style, &options).unwrap();

    let (_dir, path) = save(&sf, &ExportOptions::default());
    let wb = Workbook::open(&path).unwrap();
    let ws = wb.worksheet(0).unwrap();

    let expected = style.to_native_style();
    for row in 1..=3 {
        assert_eq!(ws.cell_style_at(row, 0), &expected, "row {row}");
        assert_eq!(ws.cell_style_at(row, 1), &Styler::default().to_native_style());
    }
    assert_eq!(ws.custom_column_widths().get(&0), Some(&10.0));
    assert_eq!(ws.custom_column_widths().get(&1), None);
}

#[test]
fn test_width_is_saved() {
    let mut sf = numbers_frame();
    sf.set_column_width(["b"], 20).unwrap();
    let (_dir, path) = save(&sf, &ExportOptions::default());
    let wb = Workbook::open(&path).unwrap();
    assert_eq!(wb.worksheet(0).unwrap().column_width(1), 20.0);
}

#[test]
fn test_read_back_values_and_styles() {
    let mut sf = StyleFrame::from_columns(
        vec![
            ("name", vec![Value::from("x"), Value::from("y")]),
            (
                "when",
                vec![
                    Value::from(chrono::NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()),
                    Value::Null,
                ],
            ),
        ],
        None,
    )
    .unwrap();
    let italic = StyleOptions::new()
        .italic(true)
        .comment_author("me")
        .comment_text("checked")
        .build()
        .unwrap();
    sf.apply_style_by_indexes(0usize, &italic, &IndexStyleOptions::default())
        .unwrap();
    sf.set_row_height([1], 28).unwrap();

    let (_dir, path) = save(&sf, &ExportOptions::new().sheet_name("data"));
    let options = ReadOptions::new()
        .sheet("data")
        .read_style(true)
        .read_comments(true);
    let back = StyleFrame::read_excel(&path, &options).unwrap();

    assert_eq!(back.len(), 2);
    assert_eq!(
        back.iloc(0, 1).unwrap().value,
        Value::from(chrono::NaiveDate::from_ymd_opt(2024, 5, 17).unwrap())
    );
    assert_eq!(back.iloc(1, 1).unwrap().value, Value::Null);

    let first = back.iloc(0, 0).unwrap().style.get();
    assert!(first.italic);
    assert_eq!(first.comment_author.as_deref(), Some("me"));
    assert_eq!(first.comment_text.as_deref(), Some("checked"));
    assert!(!back.iloc(1, 0).unwrap().style.borrow().italic);
    assert_eq!(back.rows_height().get(&1), Some(&28.0));
    assert_eq!(
        back.iloc(0, 1).unwrap().style.borrow().number_format,
        number_formats::DEFAULT_DATE_FORMAT
    );
}

#[test]
fn test_template_keeps_styles() {
    let mut template = numbers_frame();
    let green = StyleOptions::new().bg_color("green").build().unwrap();
    template
        .apply_column_style(["b"], &green, &ColumnStyleOptions::default())
        .unwrap();
    let (_dir, path) = save(&template, &ExportOptions::default());

    let table = Table::from_columns(vec![("x", vec![10, 20]), ("y", vec![30, 40])]).unwrap();
    let sf = StyleFrame::read_excel_as_template(&path, &table, true, &ReadOptions::default())
        .unwrap();

    assert_eq!(sf.len(), 2);
    assert_eq!(sf.columns()[1].value, Value::from("y"));
    assert_eq!(sf.iloc(1, 1).unwrap().value, Value::from(40));
    assert_eq!(sf.iloc(1, 1).unwrap().style.borrow().bg_color, green.bg_color);
}

#[test]
fn test_sheet_options_survive_save() {
    let mut sf = numbers_frame();
    sf.add_color_scale_conditional_formatting(
        ColorScaleStop::new(CfValueType::Min, "red"),
        ColorScaleStop::new(CfValueType::Max, "green"),
        None,
        None,
    )
    .unwrap();
    let options = ExportOptions::new()
        .columns_and_rows_to_freeze("A2")
        .row_to_add_filters(0)
        .allow_protection(true)
        .columns_to_hide(["b"])
        .na_rep("-");
    let (_dir, path) = save(&sf, &options);

    let wb = Workbook::open(&path).unwrap();
    let ws = wb.worksheet(0).unwrap();
    let panes = ws.freeze_panes().unwrap();
    assert_eq!((panes.row, panes.col), (1, 0));
    assert_eq!(ws.auto_filter().unwrap().to_a1_string(), "A1:B1");
    assert!(ws.protection().unwrap().protected);
    assert!(ws.is_column_hidden(1));
    assert_eq!(ws.color_scales().len(), 1);
    assert_eq!(ws.color_scales()[0].ranges[0].to_a1_string(), "A1:B4");
}

#[test]
fn test_several_frames_in_one_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("two.xlsx");
    let mut writer = ExcelWriter::new(&path);
    numbers_frame()
        .to_excel(&mut writer, &ExportOptions::new().sheet_name("first"))
        .unwrap();
    numbers_frame()
        .to_excel(&mut writer, &ExportOptions::new().sheet_name("second"))
        .unwrap();
    writer.save().unwrap();

    let wb = Workbook::open(&path).unwrap();
    let names: Vec<_> = wb.worksheets().map(|ws| ws.name().to_string()).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let err = numbers_frame()
        .to_excel_file(dir.path().join("out.ods"), &ExportOptions::default())
        .unwrap_err();
    assert!(matches!(err, StyleFrameError::InvalidValue(_)));
}
