//! Drive a date input session from a script of user actions, logging with `tracing`.
//!
//! Run with `RUST_LOG=date_input_core=trace` to see caret capture/restore.

use chrono::{Datelike, NaiveDate, Weekday};
use date_input_core::{DateFormat, DateInput, DateInputEvent, HeadlessField, TextField};
use std::sync::mpsc;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let start = NaiveDate::from_ymd_opt(2024, 1, 15)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start date");
    let format = DateFormat::new("ddd DD.MM.YYYY").expect("valid pattern");

    let mut input = DateInput::new(format, Some(start))
        .with_placeholder("ddd DD.MM.YYYY")
        .with_clear("Clear", true)
        .with_disabled_date(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun));
    let mut field = HeadlessField::new(input.current_text());

    let (tx, rx) = mpsc::channel();
    input.subscribe(move |event| {
        let _ = tx.send(event.clone());
    });

    field.focus();
    for text in ["Mon 15.01.2024", "Tue 16.01.2024", "Sat 20.01.2024", "Sat 20.01.20"] {
        field.type_text(text, 4);
        let outcome = input.handle_input(text);
        println!("{text:>16} -> {outcome:?} ({:?})", input.field_state());

        // The owner adopts every committed value, as a form would.
        while let Ok(event) = rx.try_recv() {
            if let DateInputEvent::Change(value) = event {
                input.sync_external(value, &mut field);
            }
        }
    }

    input.clear(&mut field);
    for event in rx.try_iter() {
        println!("owner received {event:?}");
    }
    println!("final view: {:?}", input.view());
}
