//! Entropy and code length figures of a coded alphabet, plus the tabular
//! report printed by the `stats` command.

use std::fmt;

use super::{CodeTable, CodeWord, FrequencyTable, Symbol};

fn probability(frequency: usize, total: usize) -> f64 {
    frequency as f64 / total as f64
}

/// Shannon entropy H = sum p(x) log2(1 / p(x)) in bits per symbol
pub fn entropy<S>(table: &FrequencyTable<S>) -> f64 {
    let total = table.total();
    if total == 0 {
        return 0.0;
    }
    table
        .iter()
        .map(|entry| {
            let p = probability(entry.frequency, total);
            p * (1.0 / p).log2()
        })
        .sum()
}

/// Expected code length sum p(x) len(code(x)) in bits per symbol
pub fn average_code_length<S: Symbol>(table: &FrequencyTable<S>, codes: &CodeTable<S>) -> f64 {
    let total = table.total();
    if total == 0 {
        return 0.0;
    }
    table
        .iter()
        .map(|entry| {
            let length = codes
                .get(&entry.symbol)
                .map(CodeWord::length)
                .unwrap_or(0);
            probability(entry.frequency, total) * length as f64
        })
        .sum()
}

pub struct ReportRow<'a, S> {
    pub symbol: &'a S,
    pub frequency: usize,
    pub probability: f64,
    pub code_word: CodeWord,
}

pub struct SymbolReport<'a, S> {
    rows: Vec<ReportRow<'a, S>>,
    total: usize,
    distinct: usize,
    entropy: f64,
    average_code_length: f64,
}

impl<'a, S: Symbol> SymbolReport<'a, S> {
    /// Keeps the `top` most frequent symbols; equal frequencies stay in
    /// first-occurrence order.
    pub fn new(table: &'a FrequencyTable<S>, codes: &CodeTable<S>, top: usize) -> Self {
        let total = table.total();
        let mut rows: Vec<ReportRow<'a, S>> = table
            .iter()
            .filter_map(|entry| {
                codes.get(&entry.symbol).map(|&code_word| ReportRow {
                    symbol: &entry.symbol,
                    frequency: entry.frequency,
                    probability: probability(entry.frequency, total),
                    code_word,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        rows.truncate(top);
        Self {
            rows,
            total,
            distinct: table.len(),
            entropy: entropy(table),
            average_code_length: average_code_length(table, codes),
        }
    }
}

impl<S> SymbolReport<'_, S> {
    pub fn rows(&self) -> &[ReportRow<'_, S>] {
        &self.rows
    }

    pub fn entropy(&self) -> f64 {
        self.entropy
    }

    pub fn average_code_length(&self) -> f64 {
        self.average_code_length
    }

    /// Entropy divided by average code length, 1 for a perfect code
    pub fn efficiency(&self) -> f64 {
        if self.average_code_length == 0.0 {
            1.0
        } else {
            self.entropy / self.average_code_length
        }
    }
}

const RULE: &str =
    "==============================================================================";

impl<S: fmt::Debug> fmt::Display for SymbolReport<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(
            f,
            "| {:<14} | {:>12} | {:>14} | {:<26} |",
            "Symbol", "Frequency", "Probability", "Code"
        )?;
        writeln!(f, "{}", RULE)?;
        for row in &self.rows {
            writeln!(
                f,
                "| {:<14} | {:>12} | {:>14.8} | {:<26} |",
                format!("{:?}", row.symbol),
                row.frequency,
                row.probability,
                row.code_word.to_string()
            )?;
        }
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Total number of symbols (N): {}", self.total)?;
        writeln!(f, "Distinct symbols:            {}", self.distinct)?;
        writeln!(f, "Entropy (H):                 {:.8} bits/symbol", self.entropy)?;
        writeln!(
            f,
            "Average code length (L):     {:.8} bits/symbol",
            self.average_code_length
        )?;
        writeln!(f, "Efficiency (H/L):            {:.8}", self.efficiency())
    }
}
