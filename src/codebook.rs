//! Textual codebook exchanged between encoder and decoder.
//!
//! One record per line:
//!
//! ```text
//! "<symbol>",<count>,<probability>,"<codeword>",<self-information>
//! ```
//!
//! Both floating point fields carry 15 fractional digits. Codewords read
//! root to leaf with '0' for a left edge and '1' for a right edge. Only the
//! symbol and codeword matter for decoding; the rest is kept for inspection.

use std::fmt;
use std::io::Write;

use crate::error::{HuffmanError, HuffmanResult};
use crate::hufftree::CodeTable;
use crate::statistics::SymbolStatistics;
use crate::symbol::{Codeword, Symbol};

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolRecord {
    pub symbol: Symbol,
    pub count: u64,
    pub probability: f64,
    pub codeword: Codeword,
    pub self_information: f64,
}

impl fmt::Display for SymbolRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\",{},{:.15},\"{}\",{:.15}",
            self.symbol, self.count, self.probability, self.codeword, self.self_information
        )
    }
}

/// The part of a record the decoder needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodebookEntry {
    pub symbol: Symbol,
    pub codeword: Codeword,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Codebook {
    records: Vec<SymbolRecord>,
}

impl Codebook {
    /// Pair every counted symbol with its codeword, in canonical order
    /// (count ascending, then symbol ascending).
    pub fn new(stats: &SymbolStatistics, table: &CodeTable) -> Self {
        let records = stats
            .frequencies()
            .into_iter()
            .filter_map(|f| {
                let codeword = table[f.symbol.index()].clone()?;
                Some(SymbolRecord {
                    symbol: f.symbol,
                    count: f.count,
                    probability: f.probability,
                    self_information: f.self_information(),
                    codeword,
                })
            })
            .collect();
        Codebook { records }
    }

    pub fn records(&self) -> &[SymbolRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, symbol: Symbol) -> Option<&SymbolRecord> {
        self.records.iter().find(|r| r.symbol == symbol)
    }

    pub fn entries(&self) -> Vec<CodebookEntry> {
        self.records
            .iter()
            .map(|r| CodebookEntry {
                symbol: r.symbol,
                codeword: r.codeword.clone(),
            })
            .collect()
    }

    /// Expected self-information in bits per symbol.
    pub fn entropy(&self) -> f64 {
        self.records
            .iter()
            .map(|r| r.probability * r.self_information)
            .sum()
    }

    /// Expected codeword length in bits per symbol.
    pub fn average_code_length(&self) -> f64 {
        self.records
            .iter()
            .map(|r| r.probability * r.codeword.len() as f64)
            .sum()
    }

    pub fn render(&self) -> String {
        self.records.iter().map(|r| format!("{}\n", r)).collect()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> HuffmanResult<()> {
        for record in &self.records {
            writeln!(writer, "{}", record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// A line the parser dropped, with a short description of why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_number: usize,
    pub reason: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCodebook {
    /// Usable records, in file order.
    pub records: Vec<SymbolRecord>,
    pub skipped: Vec<SkippedLine>,
}

impl ParsedCodebook {
    pub fn entries(&self) -> Vec<CodebookEntry> {
        self.records
            .iter()
            .map(|r| CodebookEntry {
                symbol: r.symbol,
                codeword: r.codeword.clone(),
            })
            .collect()
    }

    /// Keep the records, in file order, for their statistics.
    pub fn into_codebook(self) -> Codebook {
        Codebook {
            records: self.records,
        }
    }
}

/// Parse codebook text.
///
/// Lines that do not have the five-field shape are skipped and reported in
/// [`ParsedCodebook::skipped`]. A codeword made of anything but '0' and '1'
/// is an error.
pub fn parse(text: &str) -> HuffmanResult<ParsedCodebook> {
    let mut parsed = ParsedCodebook::default();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        match parse_line(line) {
            Ok(fields) => {
                let codeword = fields.codeword.parse::<Codeword>().map_err(|digit| {
                    HuffmanError::InvalidCodewordDigit {
                        line: line_number,
                        digit: digit.0,
                    }
                })?;
                parsed.records.push(SymbolRecord {
                    symbol: fields.symbol,
                    count: fields.count,
                    probability: fields.probability,
                    codeword,
                    self_information: fields.self_information,
                });
            }
            Err(reason) => parsed.skipped.push(SkippedLine { line_number, reason }),
        }
    }

    Ok(parsed)
}

struct RawRecord<'a> {
    symbol: Symbol,
    count: u64,
    probability: f64,
    codeword: &'a str,
    self_information: f64,
}

fn parse_line(line: &str) -> Result<RawRecord<'_>, &'static str> {
    let line = line.trim_end();
    if line.is_empty() {
        return Err("blank line");
    }

    let rest = line.strip_prefix('"').ok_or("missing opening quote")?;
    // the symbol text is never empty, so searching for the closing `",` from
    // the second byte on also handles the quote character itself (`"""`)
    let end = rest
        .get(1..)
        .and_then(|tail| tail.find("\","))
        .map(|i| i + 1)
        .ok_or("unterminated symbol field")?;
    let symbol = Symbol::parse(&rest[..end]).ok_or("unknown symbol")?;
    let rest = &rest[end + 2..];

    let (count, rest) = rest.split_once(',').ok_or("missing count")?;
    let count = count.parse::<u64>().map_err(|_| "bad count")?;
    let (probability, rest) = rest.split_once(',').ok_or("missing probability")?;
    let probability = probability.parse::<f64>().map_err(|_| "bad probability")?;

    let rest = rest.strip_prefix('"').ok_or("missing codeword")?;
    let (codeword, rest) = rest.split_once("\",").ok_or("unterminated codeword field")?;
    if codeword.is_empty() {
        return Err("empty codeword");
    }
    let self_information = rest.parse::<f64>().map_err(|_| "bad self-information")?;

    Ok(RawRecord {
        symbol,
        count,
        probability,
        codeword,
        self_information,
    })
}
