//! Terminal output
//!
//! Records print as an aligned table, JSON or CSV.

use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};

use crate::model::{Lease, Payment, Property, PropertyRef, User};

/// How command output is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// A record that can be printed as one row
pub trait Tabular: Serialize {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

fn optional_id(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

impl Tabular for Property {
    fn headers() -> &'static [&'static str] {
        &["ID", "Address", "Type", "Status", "Area (m²)", "Rooms"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.address.clone(),
            self.property_type.label().to_string(),
            self.status.label().to_string(),
            self.area.to_string(),
            self.num_of_rooms.to_string(),
        ]
    }
}

impl Tabular for Lease {
    fn headers() -> &'static [&'static str] {
        &["ID", "Property", "Tenant", "Start", "End", "Rate", "Active"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.property
                .as_ref()
                .map(PropertyRef::describe)
                .unwrap_or_else(|| "-".to_string()),
            optional_id(self.tenant),
            self.start_date.to_string(),
            self.end_date.to_string(),
            self.rate_amount.to_string(),
            yes_no(self.active_lease),
        ]
    }
}

impl Tabular for Payment {
    fn headers() -> &'static [&'static str] {
        &["ID", "Lease", "Amount", "Date", "Paid"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            optional_id(self.lease),
            self.amount.to_string(),
            self.payment_date.to_string(),
            yes_no(self.is_paid),
        ]
    }
}

impl Tabular for User {
    fn headers() -> &'static [&'static str] {
        &["ID", "Username", "Email", "Name"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.email.clone(),
            format!("{} {}", self.first_name, self.last_name).trim().to_string(),
        ]
    }
}

/// Print `items` in `format`
pub fn render<T: Tabular, W: Write>(items: &[T], format: OutputFormat, out: &mut W) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, items)?;
            writeln!(out)
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(T::headers())?;
            for item in items {
                writer.write_record(item.row())?;
            }
            writer.flush()
        }
        OutputFormat::Table => write_table(T::headers(), items.iter().map(Tabular::row), out),
    }
}

fn write_table<W: Write>(
    headers: &[&str],
    rows: impl Iterator<Item = Vec<String>>,
    out: &mut W,
) -> io::Result<()> {
    let rows: Vec<Vec<String>> = rows.collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    writeln!(out, "{}", line(headers.to_vec()))?;
    writeln!(out, "{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)))?;
    for row in &rows {
        writeln!(out, "{}", line(row.iter().map(String::as_str).collect()))?;
    }
    Ok(())
}
