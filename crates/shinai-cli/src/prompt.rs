//! Interactive form for `shinai ask`.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use rustyline::DefaultEditor;
use shinai_core::{Branch, FortuneForm, InputError};

use crate::display::write_branch_table;

/// Parse a branch answer: blank means unknown, a number picks from the
/// listed table, anything else goes through the label parser.
pub fn parse_branch_choice(input: &str) -> Result<Branch, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Branch::Unknown);
    }
    if let Ok(i) = input.parse::<usize>() {
        return Branch::ALL
            .get(i)
            .copied()
            .ok_or_else(|| InputError::UnknownBranch(input.to_string()));
    }
    input.parse()
}

/// Parse a birth date answer; blank means today.
pub fn parse_birth_date(input: &str, today: NaiveDate) -> Result<NaiveDate, chrono::ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(today);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
}

/// Ask for every form field in turn, re-asking on malformed dates and
/// branches. Empty names and concerns are left for form validation.
pub fn read_form() -> anyhow::Result<FortuneForm> {
    let mut rl = DefaultEditor::new().context("opening line editor")?;
    let today = Local::now().date_naive();

    let name = rl.readline("이름: ")?;

    let birth_date = loop {
        let line = rl.readline("생년월일 (YYYY-MM-DD, 비우면 오늘): ")?;
        match parse_birth_date(&line, today) {
            Ok(date) => break date,
            Err(e) => eprintln!("  날짜 형식이 올바르지 않습니다: {e}"),
        }
    };

    println!("출생 시간대:");
    write_branch_table(&mut std::io::stdout())?;
    let branch = loop {
        let line = rl.readline("번호 또는 이름 (비우면 모름): ")?;
        match parse_branch_choice(&line) {
            Ok(branch) => break branch,
            Err(e) => eprintln!("  {e}"),
        }
    };

    let concern = rl.readline("고민: ")?;

    Ok(FortuneForm {
        name,
        birth_date,
        branch,
        concern,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_choice_by_index_and_name() {
        assert_eq!(parse_branch_choice("").unwrap(), Branch::Unknown);
        assert_eq!(parse_branch_choice("0").unwrap(), Branch::Unknown);
        assert_eq!(parse_branch_choice("1").unwrap(), Branch::Ja);
        assert_eq!(parse_branch_choice("12").unwrap(), Branch::Hae);
        assert_eq!(parse_branch_choice("미시").unwrap(), Branch::Mi);
        assert!(matches!(
            parse_branch_choice("13"),
            Err(InputError::UnknownBranch(_))
        ));
    }

    #[test]
    fn birth_date_blank_is_today() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(parse_birth_date("  ", today).unwrap(), today);
        assert_eq!(
            parse_birth_date("1990-05-01", today).unwrap(),
            NaiveDate::from_ymd_opt(1990, 5, 1).unwrap()
        );
        assert!(parse_birth_date("1990/05/01", today).is_err());
    }
}
