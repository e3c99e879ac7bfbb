//! Receipt

use std::{fmt::Write, io};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::pricing::{LinePrice, PriceResult, PricingError, round_to_minor};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// A line amount could not be converted for display.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Printable summary of a priced basket.
#[derive(Debug, Clone)]
pub struct Receipt<'r> {
    /// Priced lines, in basket order
    lines: &'r [LinePrice],

    /// Total cost before any offers
    subtotal: Money<'static, Currency>,

    /// Total amount paid after offers
    total: Money<'static, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'r> Receipt<'r> {
    /// Build a receipt for a pricing result.
    #[must_use]
    pub fn from_price_result(result: &'r PriceResult) -> Self {
        Self {
            lines: result.lines(),
            subtotal: result.sub_total(),
            total: result.total(),
            currency: result.currency(),
        }
    }

    /// Total cost before any offers
    #[must_use]
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// Total amount paid
    #[must_use]
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Priced lines on the receipt.
    #[must_use]
    pub fn lines(&self) -> &[LinePrice] {
        self.lines
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the savings made by applying offers.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'static, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Savings as a fraction of the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings_minor = self.savings()?.to_minor_units();
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Ok(Percentage::from(Decimal::ZERO));
        }

        Ok(Percentage::from(
            Decimal::from(savings_minor) / Decimal::from(subtotal_minor),
        ))
    }

    /// Writes the receipt as a table followed by the basket totals.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be formatted or the output cannot
    /// be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "Product",
            "Qty",
            "Unit Price",
            "Subtotal",
            "Discount",
            "Total",
            "Offers",
        ]);

        let mut discounted_rows: SmallVec<[usize; 16]> = SmallVec::new();

        for (idx, line) in self.lines.iter().enumerate() {
            if line.discount() > Decimal::ZERO {
                discounted_rows.push(idx + 1);
            }

            builder.push_record([
                line.product().to_string(),
                line.quantity().to_string(),
                self.format_amount(line.unit_price())?,
                self.format_amount(line.sub_total())?,
                self.format_discount(line.discount())?,
                self.format_amount(line.total())?,
                offers_cell(line),
            ]);
        }

        write_receipt_table(&mut out, builder, self.lines.len(), &discounted_rows)?;

        write_receipt_summary(&mut out, self)
    }

    fn format_amount(&self, amount: Decimal) -> Result<String, ReceiptError> {
        Ok(Money::from_minor(round_to_minor(amount, self.currency)?, self.currency).to_string())
    }

    fn format_discount(&self, discount: Decimal) -> Result<String, ReceiptError> {
        if discount.is_zero() {
            return Ok(String::new());
        }

        Ok(format!("-{}", self.format_amount(discount)?))
    }
}

/// One row per offer applied to the line, e.g. `2 x Buy 3, get 1 free`.
fn offers_cell(line: &LinePrice) -> String {
    line.applications()
        .iter()
        .map(|application| format!("{} x {}", application.times, application.offer))
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_receipt_table(
    out: &mut impl io::Write,
    builder: Builder,
    line_count: usize,
    discounted_rows: &[usize],
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    // One separator above every basket line after the first.
    for row in 2..=line_count {
        theme.insert_horizontal_line(row, separator);
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..6), Alignment::right());

    for &row in discounted_rows {
        table.modify((row, 4), Color::FG_GREEN);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

fn write_receipt_summary(
    out: &mut impl io::Write,
    receipt: &Receipt<'_>,
) -> Result<(), ReceiptError> {
    let savings = receipt.savings()?;
    let savings_percent_points =
        percent_points_from_fractional_percentage(receipt.savings_percent()?);

    let subtotal_label = " Subtotal:";
    let total_label = " \x1b[1mTotal:\x1b[0m";
    let savings_label = " Savings:";

    let subtotal_val = format!("{}  ", receipt.subtotal());
    let total_val = format!("{}  ", receipt.total());
    let savings_val = format!("({savings_percent_points:.2}%) {savings}  ");

    let label_width = visible_width(subtotal_label)
        .max(visible_width(total_label))
        .max(visible_width(savings_label));

    let value_width = subtotal_val
        .len()
        .max(total_val.len())
        .max(savings_val.len());

    write_summary_line(out, subtotal_label, &subtotal_val, label_width, value_width)?;
    write_summary_line(
        out,
        total_label,
        &format!("\x1b[1m{total_val}\x1b[0m"),
        label_width,
        value_width,
    )?;
    write_summary_line(out, savings_label, &savings_val, label_width, value_width)?;

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
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

/// Returns the visible (non-ANSI) width of a string.
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
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{
        basket::Basket,
        catalog::ProductCatalog,
        offers::{FreeProductsOffer, OfferIndex, PercentageDiscountOffer, offer},
        pricing::calculate_price,
        products::Product,
    };

    use super::*;

    fn catalog() -> TestResult<ProductCatalog<'static>> {
        Ok(ProductCatalog::with_products(
            [
                Product::new("shampoo", Money::from_minor(250, GBP)),
                Product::new("sardines", Money::from_minor(189, GBP)),
                Product::new("biscuits", Money::from_minor(120, GBP)),
            ],
            GBP,
        )?)
    }

    fn priced() -> TestResult<PriceResult> {
        let offers = OfferIndex::new([
            offer(FreeProductsOffer::new("shampoo", 3, 1)?),
            offer(PercentageDiscountOffer::new(
                "sardines",
                1,
                Percentage::try_from("0.25")?,
            )?),
        ]);

        let mut basket = Basket::new(GBP);
        basket.add("shampoo", 3)?.add("sardines", 2)?.add("biscuits", 1)?;

        Ok(calculate_price(&basket, &catalog()?, &offers)?)
    }

    #[test]
    fn receipt_takes_totals_from_result() -> TestResult {
        let result = priced()?;
        let receipt = Receipt::from_price_result(&result);

        // 7.50 + 3.78 + 1.20 = 12.48; 2.50 + 0.945 = 3.445 -> 3.45
        assert_eq!(receipt.subtotal(), Money::from_minor(1248, GBP));
        assert_eq!(receipt.total(), Money::from_minor(903, GBP));
        assert_eq!(receipt.savings()?, Money::from_minor(345, GBP));
        assert_eq!(receipt.lines().len(), 3);
        assert_eq!(receipt.currency(), GBP);

        Ok(())
    }

    #[test]
    fn savings_percent_is_relative_to_subtotal() -> TestResult {
        let result = priced()?;
        let receipt = Receipt::from_price_result(&result);

        let points = percent_points_from_fractional_percentage(receipt.savings_percent()?);

        assert_eq!(points, Decimal::new(2764, 2));

        Ok(())
    }

    #[test]
    fn savings_percent_of_empty_basket_is_zero() -> TestResult {
        let result = PriceResult::empty(GBP);
        let receipt = Receipt::from_price_result(&result);

        assert_eq!(
            percent_points_from_fractional_percentage(receipt.savings_percent()?),
            Decimal::ZERO
        );

        Ok(())
    }

    #[test]
    fn write_to_renders_lines_and_summary() -> TestResult {
        let result = priced()?;
        let mut out = Vec::new();

        Receipt::from_price_result(&result).write_to(&mut out)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("shampoo"));
        assert!(rendered.contains("sardines"));
        assert!(rendered.contains("biscuits"));
        assert!(rendered.contains("1 x Buy 3, get 1 free"));
        assert!(rendered.contains("2 x 25% off"));
        assert!(rendered.contains("Subtotal:"));
        assert!(rendered.contains("Savings:"));
        assert!(rendered.contains("27.64%"));

        Ok(())
    }

    #[test]
    fn visible_width_ignores_ansi_sequences() {
        assert_eq!(visible_width("\x1b[1mTotal:\x1b[0m"), 6);
    }

    #[test]
    fn colorize_borders_wraps_box_runs() {
        assert_eq!(colorize_borders("──a"), "\x1b[90m──\x1b[0ma");
    }
}
