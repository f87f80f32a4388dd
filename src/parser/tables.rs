use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".wikitable").unwrap());
static TH_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tbody > tr").unwrap());
static TD_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"State|Country|Police|Fire|Ambulance|Notes").unwrap());

/// Semantic column, derived from header cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    State,
    Country,
    Police,
    Fire,
    Ambulance,
    Notes,
}

impl Field {
    fn from_name(name: &str) -> Option<Field> {
        match name {
            "state" => Some(Field::State),
            "country" => Some(Field::Country),
            "police" => Some(Field::Police),
            "fire" => Some(Field::Fire),
            "ambulance" => Some(Field::Ambulance),
            "notes" => Some(Field::Notes),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub span: usize,
}

/// One body row, before the country is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub country: String,
    pub police: Option<String>,
    pub fire: Option<String>,
    pub ambulance: Option<String>,
    pub notes: Option<String>,
}

/// Why a body row could not be mapped onto the header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowDefect {
    /// No `td` cells at all (header or separator rows).
    Empty,
    /// A merge layout other than police+fire+ambulance or fire+ambulance.
    UnknownSpan(Vec<usize>),
    /// Fewer cells than the span layout consumes.
    MissingCells { needed: usize, found: usize },
}

impl fmt::Display for RowDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowDefect::Empty => write!(f, "no data cells"),
            RowDefect::UnknownSpan(spans) => write!(f, "unsupported column spans {:?}", spans),
            RowDefect::MissingCells { needed, found } => {
                write!(f, "expected {} cells, found {}", needed, found)
            }
        }
    }
}

fn cell_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Tables whose header cells mention "Police".
pub fn select_tables(doc: &Html) -> Vec<ElementRef<'_>> {
    doc.select(&TABLE_SEL).filter(|t| has_police_header(*t)).collect()
}

pub fn has_police_header(table: ElementRef) -> bool {
    table.select(&TH_SEL).any(|th| cell_text(th).contains("Police"))
}

/// Header fields in column order. Cells without a keyword are skipped,
/// so positions follow the filtered order, not the raw column index.
pub fn header_fields(table: ElementRef) -> Vec<Field> {
    table
        .select(&TH_SEL)
        .filter_map(|th| field_for_header(&cell_text(th)))
        .collect()
}

/// Field named by the leftmost keyword in a header text.
pub fn field_for_header(text: &str) -> Option<Field> {
    let m = HEADER_RE.find(text)?;
    Field::from_name(&m.as_str().to_lowercase())
}

pub fn body_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    table.select(&ROW_SEL)
}

pub fn row_cells(row: ElementRef) -> Vec<Cell> {
    row.select(&TD_SEL)
        .map(|td| Cell {
            text: cell_text(td),
            span: td
                .value()
                .attr("colspan")
                .and_then(|s| s.trim().parse::<usize>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(1),
        })
        .collect()
}

/// Map a row's cells onto `headers[1..=4]`, expanding merged service cells.
///
/// Source tables merge identical numbers across neighbouring services, so
/// three layouts are accepted:
/// - cell 1 spans 3: police, fire and ambulance share cell 1, notes is cell 2
/// - cell 2 spans 2: police is cell 1, fire and ambulance share cell 2, notes is cell 3
/// - no merge: cells 1 to 4 in order
///
/// Anything else is reported rather than guessed.
pub fn map_row(headers: &[Field], cells: &[Cell]) -> Result<RawRecord, RowDefect> {
    let Some(country) = cells.first() else {
        return Err(RowDefect::Empty);
    };

    let span = |i: usize| cells.get(i).map(|c| c.span);
    // (cell index per slot, index of the merged cell if any)
    let (layout, merged): ([usize; 4], Option<usize>) = if span(1) == Some(3) {
        ([1, 1, 1, 2], Some(1))
    } else if span(2) == Some(2) {
        ([1, 2, 2, 3], Some(2))
    } else {
        ([1, 2, 3, 4], None)
    };

    let needed = layout[3] + 1;
    let irregular = (1..needed.min(cells.len())).any(|i| Some(i) != merged && cells[i].span != 1);
    if irregular {
        return Err(RowDefect::UnknownSpan(cells.iter().map(|c| c.span).collect()));
    }
    if cells.len() < needed {
        return Err(RowDefect::MissingCells { needed, found: cells.len() });
    }

    let mut record = RawRecord {
        country: country.text.clone(),
        ..Default::default()
    };
    for (field, idx) in headers.iter().skip(1).zip(layout) {
        let text = Some(cells[idx].text.clone());
        match field {
            Field::Police => record.police = text,
            Field::Fire => record.fire = text,
            Field::Ambulance => record.ambulance = text,
            Field::Notes => record.notes = text,
            Field::State | Field::Country => {}
        }
    }
    Ok(record)
}
