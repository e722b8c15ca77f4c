//! Receipt

use std::{fmt::Write, io};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{checkout::OptimisationResult, discounts::percent_points};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Terminal rendering of an [`OptimisationResult`].
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'r, 'a> {
    result: &'r OptimisationResult<'a>,
}

impl<'r, 'a> Receipt<'r, 'a> {
    /// Wrap a result for rendering.
    pub fn new(result: &'r OptimisationResult<'a>) -> Self {
        Receipt { result }
    }

    /// Savings as a fraction of the original subtotal; zero for an empty cart.
    pub fn savings_percent(&self) -> Percentage {
        let original = self.result.original_subtotal().to_minor_units();

        if original == 0 {
            return Percentage::from(0.0);
        }

        let savings =
            Decimal::from_i64(self.result.savings().to_minor_units()).unwrap_or(Decimal::ZERO);
        let original = Decimal::from_i64(original).unwrap_or(Decimal::ONE);

        Percentage::from(savings / original)
    }

    /// Write the selected lines as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Qty", "Unit Price", "Weight", "Value", "Line Total"]);

        for (idx, line) in self.result.lines().iter().enumerate() {
            let product = line.product();
            let currency = product.price.currency();

            builder.push_record([
                format!("#{:<3}", idx + 1),
                product.name.clone(),
                line.quantity().to_string(),
                format!("{}", product.price),
                format!("{}", product.weight.times(line.quantity())),
                u32::from(product.value_score.get())
                    .saturating_mul(line.quantity())
                    .to_string(),
                format!("{}", Money::from_minor(line.line_total_minor(), currency)),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..7), Alignment::right());
        table.modify(Columns::new(4..5), color_dark_grey());

        writeln!(out, "\n{}", colorize_borders(&table.to_string())).map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let result = self.result;

        let coupon_label = match result.applied_coupon() {
            Some(coupon) => format!(" Coupon {}:", coupon.code),
            None => " Coupon:".to_string(),
        };

        let rows = [
            (" Cart subtotal:".to_string(), money_cell(result.original_subtotal())),
            (" Optimised subtotal:".to_string(), money_cell(result.total_price())),
            (coupon_label, format!("-{}", money_cell(result.discount()))),
            (
                " \x1b[1mTotal:\x1b[0m".to_string(),
                format!("\x1b[1m{}\x1b[0m", money_cell(result.final_amount())),
            ),
            (
                " Savings:".to_string(),
                format!(
                    "({:.2}%) {}",
                    percent_points(&self.savings_percent()),
                    money_cell(result.savings())
                ),
            ),
            (" Value:".to_string(), format!("{}  ", result.total_value())),
            (" Weight:".to_string(), format!("{}  ", result.total_weight())),
            (" Method:".to_string(), format!("{}  ", result.method())),
        ];

        let label_width = rows
            .iter()
            .map(|(label, _)| visible_width(label))
            .max()
            .unwrap_or(0);

        let value_width = rows
            .iter()
            .map(|(_, value)| visible_width(value))
            .max()
            .unwrap_or(0);

        for (label, value) in &rows {
            write_summary_line(out, label, value, label_width, value_width)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

fn money_cell(amount: Money<'_, Currency>) -> String {
    format!("{amount}  ")
}

/// Wraps runs of box-drawing characters (U+2500..U+257F) in dark grey.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Width of a string once ANSI escapes are stripped.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Right-aligned label, then the value right-aligned in its own column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {}{value}",
        "",
        " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}
