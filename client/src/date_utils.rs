//! Date helpers for the entry form.
//!
//! The UI displays dates as `DD/MM/YYYY`; the wire format is
//! `YYYY-MM-DD`. Conversion happens here, in both directions.

use chrono::NaiveDate;

/// Display format shown in the date field.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Wire format used by the API.
pub const WIRE_FORMAT: &str = "%Y-%m-%d";

/// Convert a complete `DD/MM/YYYY` input into the `YYYY-MM-DD` wire form.
///
/// Returns None unless the text is a complete, zero-padded, valid
/// calendar date. Partial or malformed input is inert by design: no
/// request fires and no error surfaces until the text is corrected.
pub fn display_to_wire(text: &str) -> Option<String> {
    let parsed = NaiveDate::parse_from_str(text, DISPLAY_FORMAT).ok()?;
    // Round-trip comparison rejects shorthand like "1/2/2024".
    if parsed.format(DISPLAY_FORMAT).to_string() != text {
        return None;
    }
    Some(parsed.format(WIRE_FORMAT).to_string())
}

/// Convert a `YYYY-MM-DD` wire date into the `DD/MM/YYYY` display form.
///
/// Falls back to the input on malformed dates, so a surprising server
/// value still renders rather than vanishing.
pub fn wire_to_display(date: &str) -> String {
    match NaiveDate::parse_from_str(date, WIRE_FORMAT) {
        Ok(parsed) => parsed.format(DISPLAY_FORMAT).to_string(),
        Err(_) => date.to_string(),
    }
}
