use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader};

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{OptionLetter, QuestionContent},
        dto::response::SkippedRow,
    },
};

/// Container formats accepted for question uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Workbook, // xlsx, xlsm, xls, xlsb, ods
}

impl SheetFormat {
    /// Picks the parser from an explicit format, the file name extension or the
    /// content type, in that order.
    pub fn detect(
        format: Option<&str>,
        filename: Option<&str>,
        content_type: Option<&str>,
    ) -> AppResult<Self> {
        let extension = filename
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext);

        if let Some(hint) = format.or(extension) {
            return match hint.trim().to_lowercase().as_str() {
                "csv" => Ok(SheetFormat::Csv),
                "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(SheetFormat::Workbook),
                other => Err(AppError::ValidationError(format!(
                    "Unsupported spreadsheet format '{}'",
                    other
                ))),
            };
        }

        match content_type.map(|ct| ct.to_lowercase()) {
            Some(ct) if ct.starts_with("text/csv") => Ok(SheetFormat::Csv),
            Some(ct) if ct.contains("spreadsheet") || ct.contains("ms-excel") => {
                Ok(SheetFormat::Workbook)
            }
            _ => Err(AppError::ValidationError(
                "Cannot tell the spreadsheet format; pass ?filename= or ?format=".to_string(),
            )),
        }
    }
}

/// A spreadsheet row with its 1-based row number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub number: usize,
    pub cells: Vec<String>,
}

pub fn read_rows(bytes: &[u8], format: SheetFormat) -> AppResult<Vec<SheetRow>> {
    match format {
        SheetFormat::Csv => read_csv_rows(bytes),
        SheetFormat::Workbook => read_workbook_rows(bytes),
    }
}

fn read_csv_rows(bytes: &[u8]) -> AppResult<Vec<SheetRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    // Blank lines yield no record and quoted cells may span lines, so the
    // row number is the line the record starts on.
    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| AppError::ValidationError(format!("Unreadable CSV: {}", e)))?;
        let number = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 1);
        rows.push(SheetRow {
            number,
            cells: record.iter().map(str::to_string).collect(),
        });
    }

    Ok(rows)
}

fn read_workbook_rows(bytes: &[u8]) -> AppResult<Vec<SheetRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::ValidationError(format!("Unreadable spreadsheet: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::ValidationError("Spreadsheet has no sheets".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        AppError::ValidationError(format!("Unreadable sheet '{}': {}", sheet_name, e))
    })?;

    // Ranges start at the first used cell, not at A1.
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    Ok(range
        .rows()
        .enumerate()
        .map(|(index, row)| SheetRow {
            number: first_row + index + 1,
            cells: row.iter().map(|cell| cell.to_string().trim().to_string()).collect(),
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Question,
    Option(OptionLetter),
    Correct,
    Explanation,
}

fn classify_header(cell: &str) -> Option<Column> {
    let key: String = cell
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    let column = match key.as_str() {
        "question" | "questions" | "q" | "questiontext" | "stem" => Column::Question,
        "optiona" | "opta" | "a" | "option1" | "choicea" | "choice1" => {
            Column::Option(OptionLetter::A)
        }
        "optionb" | "optb" | "b" | "option2" | "choiceb" | "choice2" => {
            Column::Option(OptionLetter::B)
        }
        "optionc" | "optc" | "c" | "option3" | "choicec" | "choice3" => {
            Column::Option(OptionLetter::C)
        }
        "optiond" | "optd" | "d" | "option4" | "choiced" | "choice4" => {
            Column::Option(OptionLetter::D)
        }
        "correct" | "correctanswer" | "correctoption" | "answer" | "ans" | "answerkey"
        | "rightanswer" => Column::Correct,
        "explanation" | "explain" | "reason" | "solution" | "rationale" => Column::Explanation,
        _ => return None,
    };

    Some(column)
}

#[derive(Debug, Default)]
struct ColumnMap {
    question: Option<usize>,
    options: [Option<usize>; 4],
    correct: Option<usize>,
    explanation: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> Self {
        let mut map = ColumnMap::default();

        for (index, cell) in header.iter().enumerate() {
            let slot = match classify_header(cell) {
                Some(Column::Question) => &mut map.question,
                Some(Column::Option(letter)) => &mut map.options[letter.index()],
                Some(Column::Correct) => &mut map.correct,
                Some(Column::Explanation) => &mut map.explanation,
                None => continue,
            };
            // First matching column wins.
            slot.get_or_insert(index);
        }

        map
    }

    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.question.is_none() {
            missing.push("question");
        }
        for letter in OptionLetter::ALL {
            if self.options[letter.index()].is_none() {
                missing.push(match letter {
                    OptionLetter::A => "option A",
                    OptionLetter::B => "option B",
                    OptionLetter::C => "option C",
                    OptionLetter::D => "option D",
                });
            }
        }
        if self.correct.is_none() {
            missing.push("correct answer");
        }
        missing
    }
}

/// Outcome of mapping sheet rows onto questions.
#[derive(Debug, Default)]
pub struct ParsedSheet {
    pub questions: Vec<QuestionContent>,
    pub skipped: Vec<SkippedRow>,
}

/// Resolves the correct-answer cell: first as a letter spelling, then as the
/// literal text of one of the options.
pub fn resolve_correct_option(cell: &str, options: &[String; 4]) -> Option<OptionLetter> {
    if let Some(letter) = OptionLetter::normalize(cell) {
        return Some(letter);
    }

    let wanted = cell.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }

    OptionLetter::ALL
        .into_iter()
        .find(|letter| options[letter.index()].trim().to_lowercase() == wanted)
}

/// Maps rows onto question content. The first non-empty row is the header.
pub fn parse_question_rows(rows: &[SheetRow]) -> AppResult<ParsedSheet> {
    let mut rows = rows
        .iter()
        .filter(|row| row.cells.iter().any(|c| !c.trim().is_empty()));

    let header = rows
        .next()
        .ok_or_else(|| AppError::ValidationError("Spreadsheet is empty".to_string()))?;

    let columns = ColumnMap::from_header(&header.cells);
    let missing = columns.missing();
    if !missing.is_empty() {
        return Err(AppError::ValidationError(format!(
            "Spreadsheet is missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut parsed = ParsedSheet::default();

    for row in rows {
        let cell = |index: Option<usize>| -> String {
            index
                .and_then(|i| row.cells.get(i))
                .map(|c| c.trim().to_string())
                .unwrap_or_default()
        };

        match row_to_content(&columns, cell) {
            Ok(content) => parsed.questions.push(content),
            Err(reason) => parsed.skipped.push(SkippedRow {
                row: row.number,
                reason,
            }),
        }
    }

    Ok(parsed)
}

fn row_to_content(
    columns: &ColumnMap,
    cell: impl Fn(Option<usize>) -> String,
) -> Result<QuestionContent, String> {
    let question = cell(columns.question);
    if question.is_empty() {
        return Err("Missing question text".to_string());
    }

    let options = OptionLetter::ALL.map(|letter| cell(columns.options[letter.index()]));
    if let Some(letter) = OptionLetter::ALL
        .into_iter()
        .find(|letter| options[letter.index()].is_empty())
    {
        return Err(format!("Missing option {}", letter));
    }

    let raw_correct = cell(columns.correct);
    let correct_option = resolve_correct_option(&raw_correct, &options)
        .ok_or_else(|| format!("Unrecognised correct answer '{}'", raw_correct))?;

    let explanation = Some(cell(columns.explanation)).filter(|e| !e.is_empty());

    Ok(QuestionContent {
        question,
        options,
        correct_option,
        explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<SheetRow> {
        data.iter()
            .enumerate()
            .map(|(i, cells)| SheetRow {
                number: i + 1,
                cells: cells.iter().map(|c| c.to_string()).collect(),
            })
            .collect()
    }

    #[test]
    fn detect_prefers_explicit_format_then_extension() {
        assert_eq!(
            SheetFormat::detect(Some("CSV"), Some("a.xlsx"), None).unwrap(),
            SheetFormat::Csv
        );
        assert_eq!(
            SheetFormat::detect(None, Some("questions.final.xlsx"), None).unwrap(),
            SheetFormat::Workbook
        );
        assert_eq!(
            SheetFormat::detect(None, None, Some("text/csv; charset=utf-8")).unwrap(),
            SheetFormat::Csv
        );
        assert!(SheetFormat::detect(None, Some("notes.pdf"), None).is_err());
        assert!(SheetFormat::detect(None, None, None).is_err());
    }

    #[test]
    fn header_matching_is_flexible() {
        let sheet = rows(&[
            &["Q", "Option A", "option_b", "OPTION-C", "Choice 4", "Correct Answer", "Reason"],
            &["2 + 2?", "3", "4", "5", "6", "B)", "basic arithmetic"],
        ]);

        let parsed = parse_question_rows(&sheet).expect("sheet should parse");

        assert_eq!(parsed.questions.len(), 1);
        let q = &parsed.questions[0];
        assert_eq!(q.question, "2 + 2?");
        assert_eq!(q.options[3], "6");
        assert_eq!(q.correct_option, OptionLetter::B);
        assert_eq!(q.explanation.as_deref(), Some("basic arithmetic"));
    }

    #[test]
    fn missing_required_column_rejects_upload() {
        let sheet = rows(&[&["question", "a", "b", "c", "answer"], &["x", "1", "2", "3", "A"]]);

        let err = parse_question_rows(&sheet).unwrap_err();
        match err {
            AppError::ValidationError(msg) => assert!(msg.contains("option D")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn correct_answer_spellings_normalize() {
        let sheet = rows(&[
            &["question", "a", "b", "c", "d", "answer"],
            &["one", "w", "x", "y", "z", "a"],
            &["two", "w", "x", "y", "z", "OPTION_B"],
            &["three", "w", "x", "y", "z", "3"],
            &["four", "w", "x", "y", "z", "(d)"],
            &["five", "Paris", "Rome", "Oslo", "Bern", "oslo"],
        ]);

        let parsed = parse_question_rows(&sheet).expect("sheet should parse");
        let letters: Vec<OptionLetter> =
            parsed.questions.iter().map(|q| q.correct_option).collect();

        assert_eq!(
            letters,
            vec![
                OptionLetter::A,
                OptionLetter::B,
                OptionLetter::C,
                OptionLetter::D,
                OptionLetter::C
            ]
        );
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn invalid_rows_are_skipped_with_reasons() {
        let sheet = rows(&[
            &["question", "a", "b", "c", "d", "answer"],
            &["ok", "1", "2", "3", "4", "A"],
            &["", "1", "2", "3", "4", "A"],
            &["bad answer", "1", "2", "3", "4", "E"],
            &["", "", "", "", "", ""],
            &["short row", "1", "2"],
        ]);

        let parsed = parse_question_rows(&sheet).expect("sheet should parse");

        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(
            parsed.skipped,
            vec![
                SkippedRow {
                    row: 3,
                    reason: "Missing question text".to_string()
                },
                SkippedRow {
                    row: 4,
                    reason: "Unrecognised correct answer 'E'".to_string()
                },
                SkippedRow {
                    row: 6,
                    reason: "Missing option C".to_string()
                },
            ]
        );
    }

    #[test]
    fn numeric_answer_matches_position_before_option_text() {
        let options = ["2".to_string(), "1".to_string(), "3".to_string(), "4".to_string()];
        // "1" is a position spelling, so it wins over the option whose text is "1".
        assert_eq!(resolve_correct_option("1", &options), Some(OptionLetter::A));
        assert_eq!(resolve_correct_option("  ", &options), None);
    }

    #[test]
    fn csv_rows_are_read_with_row_numbers() {
        let csv = "question,a,b,c,d,answer\n\"Largest planet?\",Mars,Jupiter,Venus,Earth,B\n";

        let sheet = read_rows(csv.as_bytes(), SheetFormat::Csv).expect("csv should read");
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet[1].number, 2);
        assert_eq!(sheet[1].cells[0], "Largest planet?");

        let parsed = parse_question_rows(&sheet).expect("sheet should parse");
        assert_eq!(parsed.questions[0].correct_option, OptionLetter::B);
    }

    #[test]
    fn csv_row_numbers_follow_sheet_lines() {
        let csv = "question,a,b,c,d,answer\n\n\"Two\nlines\",1,2,3,4,A\nbad,1,2,3,4,E\n";

        let sheet = read_rows(csv.as_bytes(), SheetFormat::Csv).expect("csv should read");
        let numbers: Vec<usize> = sheet.iter().map(|row| row.number).collect();
        assert_eq!(numbers, vec![1, 3, 5]);
        assert_eq!(sheet[1].cells[0], "Two\nlines");

        let parsed = parse_question_rows(&sheet).expect("sheet should parse");
        assert_eq!(parsed.questions.len(), 1);
        assert_eq!(
            parsed.skipped,
            vec![SkippedRow {
                row: 5,
                reason: "Unrecognised correct answer 'E'".to_string()
            }]
        );
    }

    #[test]
    fn garbage_workbook_bytes_are_a_validation_error() {
        let result = read_rows(b"definitely not a zip archive", SheetFormat::Workbook);
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
