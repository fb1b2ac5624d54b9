//! Day, month and year inputs.
//!
//! Inputs use the form formats (`MM/DD/YYYY`, `MM/YYYY`, `YYYY`, ranges joined
//! by `;`); outputs use the warehouse formats (`YYYYMMDD`, `YYYYMM`, `YYYY`).

use chrono::NaiveDate;

/// First year covered by the events dataset.
pub const MIN_YEAR: u32 = 1979;
/// Last year covered by the events dataset.
pub const MAX_YEAR: u32 = 2019;

const RANGE_SEPARATOR: char = ';';

fn number(s: &str) -> Result<u32, &'static str> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err("Wrong number format");
    }
    s.parse().map_err(|_| "Wrong number format")
}

fn month(s: &str) -> Result<u32, &'static str> {
    let m = number(s)?;
    if !(1..=12).contains(&m) {
        return Err("Wrong month");
    }
    Ok(m)
}

fn year(s: &str) -> Result<u32, &'static str> {
    let y = number(s)?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&y) {
        return Err("Wrong year");
    }
    Ok(y)
}

/// `MM/DD/YYYY` -> `YYYYMMDD`.
pub fn parse_date(s: &str) -> Result<String, &'static str> {
    if s.len() != 10 {
        return Err("Wrong date length");
    }
    if !s.is_ascii() || &s[2..3] != "/" || &s[5..6] != "/" {
        return Err("Wrong date format");
    }
    let m = month(&s[..2])?;
    let y = year(&s[6..])?;
    let d = number(&s[3..5])?;
    if NaiveDate::from_ymd_opt(y as i32, m, d).is_none() {
        return Err("Wrong day");
    }
    Ok(format!("{}{}{}", &s[6..], &s[..2], &s[3..5]))
}

/// `MM/YYYY` -> `YYYYMM`.
pub fn parse_month(s: &str) -> Result<String, &'static str> {
    if s.len() != 7 {
        return Err("Wrong date length");
    }
    if !s.is_ascii() || &s[2..3] != "/" {
        return Err("Wrong date format");
    }
    month(&s[..2])?;
    year(&s[3..])?;
    Ok(format!("{}{}", &s[3..], &s[..2]))
}

/// `YYYY` -> `YYYY`.
pub fn parse_year(s: &str) -> Result<String, &'static str> {
    if s.len() != 4 {
        return Err("Wrong date length");
    }
    year(s)?;
    Ok(s.to_string())
}

fn split_range(s: &str, part_len: usize) -> Result<(&str, &str), &'static str> {
    if s.len() != part_len * 2 + 1 {
        return Err("Wrong date length");
    }
    if !s.is_ascii() || s.matches(RANGE_SEPARATOR).count() != 1 {
        return Err("Wrong date format");
    }
    match s.split_once(RANGE_SEPARATOR) {
        Some((a, b)) if a.len() == part_len => Ok((a, b)),
        _ => Err("Wrong date format"),
    }
}

fn ordered(a: String, b: String) -> Result<(String, String), &'static str> {
    // Same-width digit strings compare chronologically.
    if a > b {
        return Err("Wrong range order");
    }
    Ok((a, b))
}

pub fn parse_date_range(s: &str) -> Result<(String, String), &'static str> {
    let (a, b) = split_range(s, 10)?;
    ordered(parse_date(a)?, parse_date(b)?)
}

pub fn parse_month_range(s: &str) -> Result<(String, String), &'static str> {
    let (a, b) = split_range(s, 7)?;
    ordered(parse_month(a)?, parse_month(b)?)
}

pub fn parse_year_range(s: &str) -> Result<(String, String), &'static str> {
    let (a, b) = split_range(s, 4)?;
    ordered(parse_year(a)?, parse_year(b)?)
}

/// `YYYYMMDD` -> `MM/DD/YYYY`.
pub fn format_date(sql: &str) -> Option<String> {
    if sql.len() != 8 || !sql.is_ascii() {
        return None;
    }
    Some(format!("{}/{}/{}", &sql[4..6], &sql[6..], &sql[..4]))
}

/// `YYYYMM` -> `MM/YYYY`.
pub fn format_month(sql: &str) -> Option<String> {
    if sql.len() != 6 || !sql.is_ascii() {
        return None;
    }
    Some(format!("{}/{}", &sql[4..], &sql[..4]))
}

/// Join two formatted bounds the way range inputs expect them.
pub fn join_range(a: Option<String>, b: Option<String>) -> Option<String> {
    Some(format!("{}{}{}", a?, RANGE_SEPARATOR, b?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_converts_to_sql_format() {
        assert_eq!(parse_date("03/15/2013").unwrap(), "20130315");
        assert_eq!(parse_date("02/29/2016").unwrap(), "20160229");
    }

    #[test]
    fn date_errors_match_form_messages() {
        assert_eq!(parse_date("3/15/2013"), Err("Wrong date length"));
        assert_eq!(parse_date("03-15-2013"), Err("Wrong date format"));
        assert_eq!(parse_date("13/15/2013"), Err("Wrong month"));
        assert_eq!(parse_date("01/15/1978"), Err("Wrong year"));
        assert_eq!(parse_date("01/15/2020"), Err("Wrong year"));
        assert_eq!(parse_date("02/29/2015"), Err("Wrong day"));
        assert_eq!(parse_date("01/00/2015"), Err("Wrong day"));
        assert_eq!(parse_date("ab/15/2013"), Err("Wrong number format"));
        assert_eq!(parse_date("01/+5/2013"), Err("Wrong number format"));
    }

    #[test]
    fn non_ascii_input_does_not_panic() {
        assert_eq!(parse_date("01/é5/201"), Err("Wrong date format"));
        assert_eq!(parse_month("é1/2013"), Err("Wrong date length"));
        assert_eq!(parse_month_range("01/2013;0é/201"), Err("Wrong date format"));
    }

    #[test]
    fn month_and_year() {
        assert_eq!(parse_month("05/2019").unwrap(), "201905");
        assert_eq!(parse_month("5/2019"), Err("Wrong date length"));
        assert_eq!(parse_month("00/2019"), Err("Wrong month"));
        assert_eq!(parse_year("1979").unwrap(), "1979");
        assert_eq!(parse_year("79"), Err("Wrong date length"));
        assert_eq!(parse_year("19x9"), Err("Wrong number format"));
    }

    #[test]
    fn ranges() {
        assert_eq!(
            parse_date_range("01/01/2013;01/01/2019").unwrap(),
            ("20130101".to_string(), "20190101".to_string())
        );
        assert_eq!(
            parse_month_range("01/2013;06/2019").unwrap(),
            ("201301".to_string(), "201906".to_string())
        );
        assert_eq!(
            parse_year_range("2001;2005").unwrap(),
            ("2001".to_string(), "2005".to_string())
        );
        assert_eq!(parse_month_range("01/2013,06/2019"), Err("Wrong date format"));
        assert_eq!(parse_month_range("01/2013;06/2019;"), Err("Wrong date length"));
        assert_eq!(parse_year_range("2005;2001"), Err("Wrong range order"));
        assert_eq!(parse_date_range("01/01/2013;13/01/2019"), Err("Wrong month"));
    }

    #[test]
    fn defaults_format_back_to_inputs() {
        assert_eq!(format_date("20130101").as_deref(), Some("01/01/2013"));
        assert_eq!(format_month("201906").as_deref(), Some("06/2019"));
        assert_eq!(
            join_range(format_month("201301"), format_month("201906")).as_deref(),
            Some("01/2013;06/2019")
        );
        assert_eq!(format_date("2013"), None);
    }
}
