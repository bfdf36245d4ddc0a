//! Text card display for readings.
//!
//! Renders a reading as a vertical card: the user's concern, then the
//! structured result grouped by section. Empty sections are skipped.

use std::io::{self, Write};

use serde_json::{Value, json};
use shinai_core::{Branch, FortuneResponse};

use crate::session::Reading;

// ── Section labels ──

const CONCERN: &str = "전해주신 고민";
const RESULT: &str = "사주 점사 결과";
const MESSAGE_RESULT: &str = "점사 결과";

const OVERVIEW: &str = "전체 운";
const LOVE: &str = "연애/관계";
const CAREER: &str = "일/커리어";
const HEALTH: &str = "건강/리듬";
const RECOMMENDATIONS: &str = "실행 제안";

const BANNER_TEXT: &str = "천지선녀가 기도중";

// ── Public API ──

/// Write a reading as a human-readable card.
pub fn write_reading(out: &mut impl Write, user_input: &str, reading: &Reading) -> io::Result<()> {
    match reading {
        Reading::Fortune(fortune) => write_fortune_card(out, user_input, fortune),
        Reading::Message(text) => {
            writeln!(out, "=== {MESSAGE_RESULT} ===")?;
            writeln!(out, "{text}")
        }
    }
}

/// Machine-readable form of a reading for `--json`.
pub fn reading_json(reading: &Reading) -> Value {
    match reading {
        Reading::Fortune(fortune) => json!(fortune),
        Reading::Message(text) => json!({ "message": text }),
    }
}

/// Read back a reading written by `--json`.
///
/// An object with a string `message` is a message reading; anything else
/// must parse as a fortune.
pub fn parse_saved_reading(text: &str) -> serde_json::Result<Reading> {
    let value: Value = serde_json::from_str(text)?;
    if let Some(message) = value.get("message").and_then(Value::as_str) {
        return Ok(Reading::Message(message.to_string()));
    }
    Ok(Reading::Fortune(serde_json::from_value(value)?))
}

/// Print the branch table, one choice per line.
pub fn write_branch_table(out: &mut impl Write) -> io::Result<()> {
    for (i, branch) in Branch::ALL.iter().enumerate() {
        writeln!(
            out,
            "  {i:>2}  {:<6} {:<6} {}",
            branch.label(),
            branch.clock_time(),
            branch.range()
        )?;
    }
    Ok(())
}

fn write_fortune_card(
    out: &mut impl Write,
    user_input: &str,
    fortune: &FortuneResponse,
) -> io::Result<()> {
    if !user_input.trim().is_empty() {
        writeln!(out, "=== {CONCERN} ===")?;
        writeln!(out, "{user_input}")?;
        writeln!(out)?;
    }

    writeln!(out, "=== {RESULT} ===")?;
    writeln!(
        out,
        "띠: {} / 출생 시(지지): {}시",
        fortune.zodiac, fortune.earthly_branch_hour
    )?;
    if !fortune.summary.is_empty() {
        writeln!(out, "{}", fortune.summary)?;
    }
    writeln!(out)?;

    let sections = &fortune.sections;
    write_section(out, OVERVIEW, &sections.overview)?;
    write_section(out, LOVE, &sections.love)?;
    write_section(out, CAREER, &sections.career)?;
    write_section(out, HEALTH, &sections.health)?;

    if !fortune.recommendations.is_empty() {
        writeln!(out, "{RECOMMENDATIONS}")?;
        for r in &fortune.recommendations {
            writeln!(out, "  • {r}")?;
        }
    }
    Ok(())
}

fn write_section(out: &mut impl Write, header: &str, body: &str) -> io::Result<()> {
    if body.trim().is_empty() {
        return Ok(());
    }
    writeln!(out, "{header}")?;
    for line in body.lines() {
        writeln!(out, "  {line}")?;
    }
    writeln!(out)
}

// ── Waiting banner ──

/// "Praying" banner shown while a reading loads; the trailing dots cycle
/// through zero, one and two.
#[derive(Debug, Default)]
pub struct PrayerBanner {
    dots: usize,
}

impl PrayerBanner {
    /// Advance one frame and return its text.
    pub fn next_frame(&mut self) -> String {
        let frame = format!("{BANNER_TEXT}{}", ".".repeat(self.dots));
        self.dots = if self.dots >= 2 { 0 } else { self.dots + 1 };
        frame
    }

    /// Redraw the banner in place.
    pub fn draw(&mut self, out: &mut impl Write) -> io::Result<()> {
        let frame = self.next_frame();
        write!(out, "\r{frame:<width$}", width = BANNER_TEXT.chars().count() + 2)?;
        out.flush()
    }

    /// Erase the banner line.
    pub fn clear(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "\r\x1b[2K")?;
        out.flush()
    }
}
