use chrono::NaiveDate;

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Every day from `start` to `end`, both included.
pub fn generate_range(start: &str, end: &str) -> Result<Vec<NaiveDate>, String> {
    let start_date = parse_date(start).ok_or_else(|| format!("Invalid date: {}", start))?;
    let end_date = parse_date(end).ok_or_else(|| format!("Invalid date: {}", end))?;

    if end_date < start_date {
        return Err(format!("Range end {} is before start {}", end, start));
    }

    let mut out = Vec::new();
    let mut d = start_date;
    while d <= end_date {
        out.push(d);
        match d.succ_opt() {
            Some(next) => d = next,
            None => break,
        }
    }

    Ok(out)
}

/// Expand a list of `YYYY-MM-DD` or `YYYY-MM-DD:YYYY-MM-DD` items,
/// sorted and without duplicates.
pub fn expand_dates(items: &[String]) -> Result<Vec<NaiveDate>, String> {
    let mut out = Vec::new();

    for item in items {
        if let Some((a, b)) = item.split_once(':') {
            out.extend(generate_range(a, b)?);
        } else {
            out.push(parse_date(item).ok_or_else(|| format!("Invalid date: {}", item))?);
        }
    }

    out.sort();
    out.dedup();
    Ok(out)
}
