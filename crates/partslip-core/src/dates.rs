//! Week header dates, from `JANUARY 5-11` to `1月5-11日`.
//!
//! Headers are matched against an ordered list of shapes (cross-month range,
//! same-month range, single date). The first shape that consumes the whole
//! header wins; a header that matches none is returned unchanged.

use serde::{Deserialize, Serialize};

const MONTHS: [(&str, &str); 12] = [
    ("JANUARY", "1月"),
    ("FEBRUARY", "2月"),
    ("MARCH", "3月"),
    ("APRIL", "4月"),
    ("MAY", "5月"),
    ("JUNE", "6月"),
    ("JULY", "7月"),
    ("AUGUST", "8月"),
    ("SEPTEMBER", "9月"),
    ("OCTOBER", "10月"),
    ("NOVEMBER", "11月"),
    ("DECEMBER", "12月"),
];

const DAY_SUFFIX: &str = "日";

/// How the first day of a range spanning two months is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossMonthStyle {
    /// `1月26-2月1日`
    #[default]
    Compact,
    /// `1月26日-2月1日`
    SuffixBoth,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateTransliterator {
    pub cross_month: CrossMonthStyle,
}

/// Transliterate with the default `Compact` cross-month style.
pub fn transliterate(header: &str) -> String {
    DateTransliterator::default().transliterate(header)
}

impl DateTransliterator {
    pub fn new(cross_month: CrossMonthStyle) -> Self {
        Self { cross_month }
    }

    pub fn transliterate(&self, header: &str) -> String {
        let normalized: String = header
            .trim()
            .chars()
            .map(|c| if matches!(c, '\u{2012}'..='\u{2015}' | '\u{2212}') { '-' } else { c })
            .collect();

        match SHAPES.iter().find_map(|shape| shape(&normalized)) {
            Some(DateShape::CrossMonth { month1, day1, month2, day2 }) => {
                let first_suffix = match self.cross_month {
                    CrossMonthStyle::Compact => "",
                    CrossMonthStyle::SuffixBoth => DAY_SUFFIX,
                };
                format!(
                    "{}{}{}-{}{}{}",
                    month_token(month1),
                    day1,
                    first_suffix,
                    month_token(month2),
                    day2,
                    DAY_SUFFIX
                )
            }
            Some(DateShape::SameMonth { month, from, to }) => {
                format!("{}{}-{}{}", month_token(month), from, to, DAY_SUFFIX)
            }
            Some(DateShape::Single { month, day }) => {
                format!("{}{}{}", month_token(month), day, DAY_SUFFIX)
            }
            None => header.to_string(),
        }
    }
}

/// Target-locale token for a month word; unknown words are echoed as-is.
fn month_token(word: &str) -> &str {
    MONTHS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(word))
        .map(|(_, token)| *token)
        .unwrap_or(word)
}

#[derive(Debug, PartialEq, Eq)]
enum DateShape<'a> {
    CrossMonth {
        month1: &'a str,
        day1: &'a str,
        month2: &'a str,
        day2: &'a str,
    },
    SameMonth {
        month: &'a str,
        from: &'a str,
        to: &'a str,
    },
    Single {
        month: &'a str,
        day: &'a str,
    },
}

/// Shape matchers in priority order.
const SHAPES: [for<'a> fn(&'a str) -> Option<DateShape<'a>>; 3] = [cross_month, same_month, single];

fn cross_month(s: &str) -> Option<DateShape<'_>> {
    let mut cur = Cursor::new(s);
    let month1 = cur.word()?;
    cur.gap()?;
    let day1 = cur.number()?;
    cur.dash()?;
    let month2 = cur.word()?;
    cur.gap()?;
    let day2 = cur.number()?;
    cur.finish()?;
    Some(DateShape::CrossMonth { month1, day1, month2, day2 })
}

fn same_month(s: &str) -> Option<DateShape<'_>> {
    let mut cur = Cursor::new(s);
    let month = cur.word()?;
    cur.gap()?;
    let from = cur.number()?;
    cur.dash()?;
    let to = cur.number()?;
    cur.finish()?;
    Some(DateShape::SameMonth { month, from, to })
}

fn single(s: &str) -> Option<DateShape<'_>> {
    let mut cur = Cursor::new(s);
    let month = cur.word()?;
    cur.gap()?;
    let day = cur.number()?;
    cur.finish()?;
    Some(DateShape::Single { month, day })
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let end = self
            .rest
            .char_indices()
            .find(|&(_, c)| !pred(c))
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (taken, rest) = self.rest.split_at(end);
        self.rest = rest;
        taken
    }

    fn non_empty(s: &'a str) -> Option<&'a str> {
        (!s.is_empty()).then_some(s)
    }

    fn word(&mut self) -> Option<&'a str> {
        Self::non_empty(self.take_while(char::is_alphabetic))
    }

    fn number(&mut self) -> Option<&'a str> {
        Self::non_empty(self.take_while(|c| c.is_ascii_digit()))
    }

    /// At least one whitespace character.
    fn gap(&mut self) -> Option<()> {
        Self::non_empty(self.take_while(char::is_whitespace)).map(|_| ())
    }

    /// A hyphen with optional whitespace on either side.
    fn dash(&mut self) -> Option<()> {
        self.take_while(char::is_whitespace);
        self.rest = self.rest.strip_prefix('-')?;
        self.take_while(char::is_whitespace);
        Some(())
    }

    fn finish(&self) -> Option<()> {
        self.rest.is_empty().then_some(())
    }
}
