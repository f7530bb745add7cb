//! Building workbooks from JSON documents

use pretty_assertions::assert_eq;
use styleframe::prelude::*;
use styleframe::utils::{borders, colors, fonts};
use styleframe_cli::{CommandLineInterface, Input};

const DOCUMENT: &str = r#"[
  {
    "sheet_name": "Sheet1",
    "default_styles": {"headers": {"font_size": 17, "bg_color": "yellow"}},
    "columns": [
      {
        "col_name": "col_a",
        "style": {"bg_color": "blue", "font_color": "yellow"},
        "cells": [
          {"value": 1},
          {"value": 2, "style": {"bold": true, "font": "Arial", "font_size": 30,
                                 "font_color": "green", "border_type": "double"}},
          {"value": 3}
        ]
      },
      {
        "col_name": "col_b",
        "width": 30,
        "cells": [
          {"value": "a"},
          {"value": "b", "style": {"bold": true, "font": "Arial", "font_size": 16}},
          {"value": "c", "style": {}}
        ]
      }
    ],
    "row_heights": {"3": 40},
    "extra_features": {"row_to_add_filters": 0, "columns_and_rows_to_freeze": "A2"}
  },
  {
    "sheet_name": "Sheet2",
    "default_styles": {"cells": {"italic": true}},
    "columns": [{"col_name": "x", "cells": [{"value": null}, {"value": 1.5}]}]
  }
]"#;

fn loaded(dir: &tempfile::TempDir) -> CommandLineInterface {
    let mut cli = CommandLineInterface::new(
        Some(Input::Json(DOCUMENT.to_string())),
        dir.path().join("out.xlsx"),
    );
    cli.load().unwrap();
    cli
}

#[test]
fn test_cell_style_overrides_column_style() {
    let dir = tempfile::tempdir().unwrap();
    let cli = loaded(&dir);
    let sf = cli.frame("Sheet1").unwrap();

    let column_style = StyleOptions::new()
        .bg_color(colors::BLUE)
        .font_color(colors::YELLOW)
        .build()
        .unwrap();
    let override_style = StyleOptions::new()
        .bold(true)
        .font(fonts::ARIAL)
        .font_size(30)
        .font_color(colors::GREEN)
        .border_type(borders::DOUBLE)
        .build()
        .unwrap();

    assert_eq!(sf.iloc(0, 0).unwrap().style.get(), column_style);
    assert_eq!(sf.iloc(1, 0).unwrap().style.get(), override_style);
    assert_eq!(sf.iloc(2, 0).unwrap().style.get(), column_style);
    assert_ne!(
        sf.iloc(1, 0).unwrap().style.get().to_native_style(),
        sf.iloc(0, 0).unwrap().style.get().to_native_style()
    );

    let col_b_cell = StyleOptions::new()
        .bold(true)
        .font(fonts::ARIAL)
        .font_size(16)
        .build()
        .unwrap();
    assert_eq!(sf.iloc(1, 1).unwrap().style.get(), col_b_cell);
    // An empty style object falls through to the defaults
    assert_eq!(sf.iloc(2, 1).unwrap().style.get(), Styler::default());
}

#[test]
fn test_headers_dimensions_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cli = loaded(&dir);
    let sf = cli.frame("Sheet1").unwrap();

    assert!(sf.has_custom_headers_style());
    assert_eq!(sf.columns()[0].style.borrow().font_size, 17.0);
    assert_eq!(sf.columns_width(), &[(Value::from("col_b"), 30.0)]);
    assert_eq!(sf.rows_height().get(&3), Some(&40.0));

    let sheet2 = cli.frame("Sheet2").unwrap();
    assert!(sheet2.iloc(0, 0).unwrap().style.borrow().italic);
    assert_eq!(sheet2.iloc(1, 0).unwrap().value, Value::from(1.5));
}

#[test]
fn test_saved_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.xlsx");
    let mut cli = CommandLineInterface::new(Some(Input::Json(DOCUMENT.to_string())), &path);
    cli.parse_as_json().unwrap();

    let wb = Workbook::open(&path).unwrap();
    let ws = wb.worksheet_by_name("Sheet1").unwrap();
    assert_eq!(ws.column_width(1), 30.0);
    assert_eq!(ws.custom_row_heights().get(&2), Some(&40.0));
    assert_eq!(ws.auto_filter().unwrap().to_a1_string(), "A1:B1");
    assert!(ws.freeze_panes().is_some());
    assert!(ws.cell_style_at(2, 0).font.bold);
    assert!(wb.worksheet_by_name("Sheet2").is_some());
}

#[test]
fn test_json_file_input() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("in.json");
    std::fs::write(&json_path, DOCUMENT).unwrap();
    let mut cli = CommandLineInterface::new(Some(Input::Path(json_path)), dir.path().join("o.xlsx"));
    cli.load().unwrap();
    assert!(cli.frame("Sheet2").is_some());
}

#[test]
fn test_invalid_document_is_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.xlsx");
    let json = r#"[{"sheet_name": "s", "columns": [{"col_name": "a",
        "cells": [{"value": 1, "style": {"underline": "wavy"}}]}]}]"#;
    let mut cli = CommandLineInterface::new(Some(Input::Json(json.to_string())), &path);
    cli.parse_as_json().unwrap();
    assert!(!path.exists());
}

#[test]
fn test_conflicting_style_is_reported_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.xlsx");
    let json = r#"[{"sheet_name": "s", "columns": [{"col_name": "a",
        "style": {"border_type": "default_grid", "bg_color": "red"},
        "cells": [{"value": 1}]}]}]"#;
    let mut cli = CommandLineInterface::new(Some(Input::Json(json.to_string())), &path);
    assert!(matches!(cli.load(), Err(StyleFrameError::Configuration(_))));

    let mut cli = CommandLineInterface::new(Some(Input::Json(json.to_string())), &path);
    cli.parse_as_json().unwrap();
    assert!(!path.exists());
}

#[test]
fn test_uneven_columns_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"[{"sheet_name": "s", "columns": [
        {"col_name": "a", "cells": [{"value": 1}, {"value": 2}]},
        {"col_name": "b", "cells": [{"value": 1}]}]}]"#;
    let mut cli =
        CommandLineInterface::new(Some(Input::Json(json.to_string())), dir.path().join("x.xlsx"));
    assert!(matches!(cli.load(), Err(StyleFrameError::InvalidValue(_))));
}
