mod budget;
mod checkpoint;
mod config;
mod oneoff;
mod overrides;
mod profile;
mod reports;
mod series;
mod system;
mod window;

use chrono::NaiveDate;

use cashflow_domain::{parse_tags, Cadence, Identifiable, Money};

use crate::cli::context::CommandError;
use crate::cli::registry::CommandRegistry;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(profile::definitions())
        .chain(series::definitions())
        .chain(oneoff::definitions())
        .chain(checkpoint::definitions())
        .chain(overrides::definitions())
        .chain(budget::definitions())
        .chain(window::definitions())
        .chain(config::definitions())
        .chain(reports::definitions())
    {
        registry.register(entry);
    }
}

/// Splits `args` into the sub-action and its remaining arguments.
pub(crate) fn split_action<'a>(args: &'a [&'a str]) -> (Option<String>, &'a [&'a str]) {
    match args.split_first() {
        Some((action, rest)) => (Some(action.to_lowercase()), rest),
        None => (None, args),
    }
}

pub(crate) fn usage(text: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {text}"))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw}` is not a date (expected YYYY-MM-DD)"))
    })
}

/// `-` or a missing argument means "no date".
pub(crate) fn parse_optional_date(raw: Option<&&str>) -> Result<Option<NaiveDate>, CommandError> {
    match raw {
        None => Ok(None),
        Some(value) if value.trim() == "-" => Ok(None),
        Some(value) => parse_date(value).map(Some),
    }
}

pub(crate) fn parse_money(raw: &str) -> Result<Money, CommandError> {
    Ok(Money::parse(raw)?)
}

pub(crate) fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, CommandError> {
    raw.trim()
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid {what}")))
}

pub(crate) fn parse_cadence(days: &str, months: &str) -> Result<Cadence, CommandError> {
    let days: i64 = parse_number(days, "day count")?;
    let months: i64 = parse_number(months, "month count")?;
    Ok(Cadence::try_from_signed(days, months)?)
}

pub(crate) fn tags_argument(raw: Option<&&str>) -> Vec<String> {
    raw.map(|value| parse_tags(value)).unwrap_or_default()
}

pub(crate) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Finds a record by 1-based list position, full id or unique id prefix.
pub(crate) fn resolve<'a, T: Identifiable>(
    records: &'a [T],
    token: &str,
    kind: &str,
) -> Result<&'a T, CommandError> {
    if let Ok(position) = token.parse::<usize>() {
        if let Some(record) = position.checked_sub(1).and_then(|index| records.get(index)) {
            return Ok(record);
        }
    }
    if let Some(record) = records.iter().find(|record| record.id() == token) {
        return Ok(record);
    }
    let mut matches = records.iter().filter(|record| record.id().starts_with(token));
    match (matches.next(), matches.next()) {
        (Some(record), None) => Ok(record),
        (Some(_), Some(_)) => Err(CommandError::InvalidArguments(format!(
            "`{token}` matches several {kind} records; use a longer id"
        ))),
        _ => Err(CommandError::InvalidArguments(format!("no {kind} matches `{token}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashflow_domain::OneOff;

    fn one_off(id: &str) -> OneOff {
        let mut record = OneOff::new(
            "Everyday",
            "coffee",
            Money::from_cents(450),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        );
        record.id = id.to_string();
        record
    }

    #[test]
    fn records_resolve_by_position_and_prefix() {
        let records = vec![one_off("ab12cd"), one_off("ab99ff"), one_off("ff0011")];
        assert_eq!(resolve(&records, "2", "one-off").unwrap().id, "ab99ff");
        assert_eq!(resolve(&records, "ff", "one-off").unwrap().id, "ff0011");
        assert!(resolve(&records, "ab", "one-off").is_err());
        assert!(resolve(&records, "zz", "one-off").is_err());
    }

    #[test]
    fn dash_means_no_date() {
        assert_eq!(parse_optional_date(Some(&"-")).unwrap(), None);
        assert!(parse_optional_date(Some(&"2024-13-01")).is_err());
        assert_eq!(
            parse_optional_date(Some(&"2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn negative_cadence_is_rejected() {
        assert!(matches!(
            parse_cadence("-7", "0"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert_eq!(parse_cadence("0", "1").unwrap(), Cadence::new(0, 1));
    }
}
