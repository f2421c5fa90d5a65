//! Line-oriented commands applied to a [`Document`].

use gridsheet_core::{Document, Selection};
use gridsheet_engine::builtins::BUILTINS;
use gridsheet_engine::engine::{
    CellRange, CellRef, StylePatch, TextAlign, cell_label, parse_column_label, parse_range,
};
use log::{debug, warn};

use crate::error::{CommandError, Result};

/// One parsed command line
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Set(CellRef, String),
    Get(CellRef),
    Style(CellRef, StylePatch),
    Select(Selection),
    Deselect,
    Active(Option<CellRef>),
    Edit(Option<CellRef>),
    Bar(String),
    Toolbar(StylePatch),
    Apply,
    InsertRow(usize),
    DeleteRow(usize),
    InsertColumn(usize),
    DeleteColumn(usize),
    Undo,
    Redo,
    Replace {
        find: String,
        replace: String,
        range: Option<CellRange>,
    },
    Dedup(CellRange),
    Print,
    Dims,
    Functions,
}

/// Parse a cell label, accepting lowercase letters
fn parse_cell(text: &str) -> Result<CellRef> {
    Ok(CellRef::from_label(&text.to_ascii_uppercase())?)
}

fn parse_optional_cell(text: &str) -> Result<Option<CellRef>> {
    if text.eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        parse_cell(text).map(Some)
    }
}

/// 1-based row number as shown to users
fn parse_row(text: &str) -> Result<usize> {
    text.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| CommandError::InvalidRow(text.to_string()))
}

fn parse_column(text: &str) -> Result<usize> {
    Ok(parse_column_label(&text.to_ascii_uppercase())?)
}

/// `""` stands for the empty string
fn literal(token: &str) -> String {
    if token == "\"\"" {
        String::new()
    } else {
        token.to_string()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(CommandError::InvalidStyle(format!("{}={}", key, value))),
    }
}

/// Parse `key=value` pairs into a style patch
pub fn parse_style_patch<'a>(settings: impl IntoIterator<Item = &'a str>) -> Result<StylePatch> {
    let mut patch = StylePatch::default();
    for setting in settings {
        let (key, value) = setting
            .split_once('=')
            .ok_or_else(|| CommandError::InvalidStyle(setting.to_string()))?;
        let invalid = || CommandError::InvalidStyle(setting.to_string());
        match key {
            "bold" => patch.bold = Some(parse_bool(key, value)?),
            "italic" => patch.italic = Some(parse_bool(key, value)?),
            "font_size" => patch.font_size = Some(value.parse().map_err(|_| invalid())?),
            "color" => patch.color = Some(value.to_string()),
            "background_color" => patch.background_color = Some(value.to_string()),
            "text_align" => {
                patch.text_align = Some(value.parse::<TextAlign>().map_err(|_| invalid())?)
            }
            _ => return Err(invalid()),
        }
    }
    Ok(patch)
}

impl Command {
    /// Parse one line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match (name, args.as_slice()) {
            ("set", [cell, ..]) => {
                let text = rest[cell.len()..].trim_start();
                Command::Set(parse_cell(cell)?, text.to_string())
            }
            ("set", _) => return Err(CommandError::Usage("set <cell> <text...>")),
            ("get", [cell]) => Command::Get(parse_cell(cell)?),
            ("get", _) => return Err(CommandError::Usage("get <cell>")),
            ("style", [cell, settings @ ..]) if !settings.is_empty() => Command::Style(
                parse_cell(cell)?,
                parse_style_patch(settings.iter().copied())?,
            ),
            ("style", _) => return Err(CommandError::Usage("style <cell> key=value...")),
            ("select", [start, end]) => {
                Command::Select(Selection::new(parse_cell(start)?, parse_cell(end)?))
            }
            ("select", [start, end, active]) => Command::Select(
                Selection::new(parse_cell(start)?, parse_cell(end)?)
                    .with_active(parse_cell(active)?),
            ),
            ("select", _) => return Err(CommandError::Usage("select <cell> <cell> [active]")),
            ("deselect", []) => Command::Deselect,
            ("active", [cell]) => Command::Active(parse_optional_cell(cell)?),
            ("active", _) => return Err(CommandError::Usage("active <cell>|none")),
            ("edit", [cell]) => Command::Edit(parse_optional_cell(cell)?),
            ("edit", _) => return Err(CommandError::Usage("edit <cell>|none")),
            ("bar", _) => Command::Bar(rest.to_string()),
            ("toolbar", settings) if !settings.is_empty() => {
                Command::Toolbar(parse_style_patch(settings.iter().copied())?)
            }
            ("toolbar", _) => return Err(CommandError::Usage("toolbar key=value...")),
            ("apply", []) => Command::Apply,
            ("insert-row", [row]) => Command::InsertRow(parse_row(row)?),
            ("insert-row", _) => return Err(CommandError::Usage("insert-row <row>")),
            ("delete-row", [row]) => Command::DeleteRow(parse_row(row)?),
            ("delete-row", _) => return Err(CommandError::Usage("delete-row <row>")),
            ("insert-col", [col]) => Command::InsertColumn(parse_column(col)?),
            ("insert-col", _) => return Err(CommandError::Usage("insert-col <col>")),
            ("delete-col", [col]) => Command::DeleteColumn(parse_column(col)?),
            ("delete-col", _) => return Err(CommandError::Usage("delete-col <col>")),
            ("undo", []) => Command::Undo,
            ("redo", []) => Command::Redo,
            ("replace", [find, replace]) => Command::Replace {
                find: literal(find),
                replace: literal(replace),
                range: None,
            },
            ("replace", [find, replace, range]) => Command::Replace {
                find: literal(find),
                replace: literal(replace),
                range: Some(parse_range(&range.to_ascii_uppercase())?),
            },
            ("replace", _) => return Err(CommandError::Usage("replace <find> <replace> [range]")),
            ("dedup", [range]) => Command::Dedup(parse_range(&range.to_ascii_uppercase())?),
            ("dedup", _) => return Err(CommandError::Usage("dedup <range>")),
            ("print", []) => Command::Print,
            ("dims", []) => Command::Dims,
            ("functions", []) => Command::Functions,
            ("deselect" | "apply" | "undo" | "redo" | "print" | "dims" | "functions", _) => {
                return Err(CommandError::Usage("command takes no arguments"));
            }
            _ => return Err(CommandError::UnknownCommand(name.to_string())),
        };
        Ok(Some(command))
    }

    /// Apply the command to `doc`, returning lines to print.
    pub fn execute(self, doc: &mut Document) -> Result<Vec<String>> {
        debug!("execute {:?}", self);
        let output = match self {
            Command::Set(cell, text) => {
                doc.set_cell_input(cell, &text);
                Vec::new()
            }
            Command::Get(cell) => vec![doc.display(&cell).to_string()],
            Command::Style(cell, patch) => {
                doc.set_cell_style(cell, &patch);
                Vec::new()
            }
            Command::Select(selection) => {
                doc.set_selection(Some(selection));
                Vec::new()
            }
            Command::Deselect => {
                doc.set_selection(None);
                Vec::new()
            }
            Command::Active(cell) => {
                doc.set_active_cell(cell);
                Vec::new()
            }
            Command::Edit(cell) => {
                doc.set_editing_cell(cell);
                Vec::new()
            }
            Command::Bar(text) => {
                doc.set_formula_bar_value(&text);
                Vec::new()
            }
            Command::Toolbar(patch) => {
                doc.update_toolbar(&patch);
                Vec::new()
            }
            Command::Apply => {
                let styled = doc.apply_toolbar_to_selection();
                vec![format!("Styled {} cells", styled)]
            }
            Command::InsertRow(row) => {
                doc.insert_row(row);
                Vec::new()
            }
            Command::DeleteRow(row) => {
                doc.delete_row(row);
                Vec::new()
            }
            Command::InsertColumn(col) => {
                doc.insert_column(col);
                Vec::new()
            }
            Command::DeleteColumn(col) => {
                doc.delete_column(col);
                Vec::new()
            }
            Command::Undo => {
                if !doc.undo() {
                    warn!("nothing to undo");
                }
                Vec::new()
            }
            Command::Redo => {
                if !doc.redo() {
                    warn!("nothing to redo");
                }
                Vec::new()
            }
            Command::Replace {
                find,
                replace,
                range,
            } => {
                let changed = doc.find_and_replace(&find, &replace, range)?;
                vec![format!("Replaced in {} cells", changed)]
            }
            Command::Dedup(range) => {
                let removed = doc.remove_duplicates(range);
                vec![format!("Removed {} duplicate rows", removed)]
            }
            Command::Print => doc
                .sheet()
                .iter()
                .filter(|(_, cell)| !cell.display.is_empty())
                .map(|(cell_ref, cell)| {
                    format!("{}\t{}", cell_label(cell_ref.row, cell_ref.col), cell.display)
                })
                .collect(),
            Command::Dims => {
                let dims = doc.dimensions();
                vec![format!("{}x{}", dims.rows, dims.cols)]
            }
            Command::Functions => BUILTINS
                .iter()
                .map(|b| format!("{}\t{}", b.name, b.description))
                .collect(),
        };
        Ok(output)
    }
}

/// Parse and execute one line.
pub fn run_line(doc: &mut Document, line: &str) -> Result<Vec<String>> {
    match Command::parse(line)? {
        Some(command) => command.execute(doc),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(label: &str) -> CellRef {
        CellRef::from_label(label).unwrap()
    }

    fn run_all(doc: &mut Document, lines: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        for line in lines {
            out.extend(run_line(doc, line).unwrap());
        }
        out
    }

    #[test]
    fn test_parse_set_keeps_spacing() {
        let parsed = Command::parse("set a1   hello  world").unwrap();
        assert_eq!(
            parsed,
            Some(Command::Set(cell("A1"), "hello  world".to_string()))
        );
    }

    #[test]
    fn test_parse_blank_and_comment_lines() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(Command::parse("# note").unwrap(), None);
    }

    #[test]
    fn test_parse_rows_and_columns_are_user_facing() {
        assert_eq!(
            Command::parse("insert-row 1").unwrap(),
            Some(Command::InsertRow(0))
        );
        assert_eq!(
            Command::parse("delete-col AA").unwrap(),
            Some(Command::DeleteColumn(26))
        );
        assert!(matches!(
            Command::parse("delete-row 0"),
            Err(CommandError::InvalidRow(_))
        ));
    }

    #[test]
    fn test_parse_style_patch() {
        let patch = parse_style_patch(["bold=true", "font_size=16", "text_align=right"]).unwrap();
        assert_eq!(patch.bold, Some(true));
        assert_eq!(patch.font_size, Some(16));
        assert_eq!(patch.text_align, Some(TextAlign::Right));
        assert_eq!(patch.italic, None);

        assert!(parse_style_patch(["weight=900"]).is_err());
        assert!(parse_style_patch(["bold"]).is_err());
        assert!(parse_style_patch(["font_size=big"]).is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Command::parse("frobnicate"),
            Err(CommandError::UnknownCommand(_))
        ));
        assert!(matches!(Command::parse("get"), Err(CommandError::Usage(_))));
        assert!(matches!(
            Command::parse("get 1A"),
            Err(CommandError::Address(_))
        ));
        assert!(matches!(Command::parse("undo now"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn test_session() {
        let mut doc = Document::new(10, 5);
        let out = run_all(
            &mut doc,
            &[
                "set A1 4",
                "set A2 6",
                "set A3 =SUM(A1:A2)",
                "get A3",
                "insert-row 1",
                "get A4",
                "undo",
                "get A3",
                "dims",
            ],
        );
        assert_eq!(out, vec!["10", "10", "10", "10x5"]);
    }

    #[test]
    fn test_formula_bar_and_toolbar_commands() {
        let mut doc = Document::new(5, 5);
        run_all(
            &mut doc,
            &[
                "active B2",
                "bar =2*21",
                "select A1 B1",
                "toolbar bold=true color=#ff0000",
                "apply",
            ],
        );
        assert_eq!(doc.display(&cell("B2")), "42");
        assert!(doc.cell(&cell("A1")).unwrap().style.bold);
        assert_eq!(doc.cell(&cell("B1")).unwrap().style.color, "#ff0000");
        assert!(doc.cell(&cell("C1")).is_none());
    }

    #[test]
    fn test_replace_and_dedup_report_counts() {
        let mut doc = Document::new(5, 2);
        let out = run_all(
            &mut doc,
            &[
                "set A1 x",
                "set A2 x",
                "set A3 y",
                "dedup A1:A3",
                "replace y z",
                "print",
            ],
        );
        assert_eq!(
            out,
            vec![
                "Removed 1 duplicate rows",
                "Replaced in 1 cells",
                "A1\tx",
                "A2\tz",
            ]
        );
    }

    #[test]
    fn test_functions_lists_builtins() {
        let mut doc = Document::new(1, 1);
        let out = run_all(&mut doc, &["functions"]);
        assert_eq!(out.len(), BUILTINS.len());
        assert_eq!(out[0], "SUM\tSum of numeric-coerced values");
        assert!(out.iter().any(|line| line.starts_with("LOWER\t")));
    }

    #[test]
    fn test_arithmetic_over_infinite_cells() {
        let mut doc = Document::new(2, 5);
        let out = run_all(
            &mut doc,
            &[
                "set A1 =1/0",
                "set B1 =SUM(A1)",
                "set C1 =A1+1",
                "set D1 1e400",
                "set E1 =D1*2",
                "print",
            ],
        );
        assert_eq!(
            out,
            vec![
                "A1\tInfinity",
                "B1\tInfinity",
                "C1\tInfinity",
                "D1\t1e400",
                "E1\tInfinity",
            ]
        );
    }

    #[test]
    fn test_replace_invalid_pattern_is_error() {
        let mut doc = Document::new(2, 2);
        let err = run_line(&mut doc, "replace [ x").unwrap_err();
        assert!(matches!(err, CommandError::Document(_)));
    }
}
