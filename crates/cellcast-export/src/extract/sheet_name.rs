use once_cell::sync::Lazy;
use regex::Regex;

static MARK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|\s*([_a-zA-Z]\w*)").expect("export mark pattern"));
static MAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|\s*map(\d*)").expect("map pattern"));

/// What a sheet name such as `Monsters|monster|map2<<` declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetAnnotation {
    pub mark: String,
    /// Key depth of a map-keyed item sheet.
    pub map_level: Option<usize>,
    pub opens_group: bool,
    pub closes_group: bool,
}

/// `None` when the sheet carries no export mark and is not exported.
pub fn parse_sheet_name(name: &str) -> Option<SheetAnnotation> {
    let caps = MARK_RE.captures(name)?;
    let mark = caps.get(1)?;
    let rest = &name[mark.end()..];
    let map_level = MAP_RE.captures(rest).map(|m| {
        m.get(1)
            .and_then(|d| d.as_str().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1)
    });
    Some(SheetAnnotation {
        mark: mark.as_str().to_string(),
        map_level,
        opens_group: name.ends_with("<<"),
        closes_group: name.ends_with(">>"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_mark() {
        let a = parse_sheet_name("Items | item").unwrap();
        assert_eq!(a.mark, "item");
        assert_eq!(a.map_level, None);
        assert!(!a.opens_group && !a.closes_group);
    }

    #[test]
    fn unmarked_sheets_are_skipped() {
        assert!(parse_sheet_name("Notes").is_none());
        assert!(parse_sheet_name("Notes|").is_none());
        assert!(parse_sheet_name("Notes|1abc").is_none());
    }

    #[test]
    fn map_levels() {
        assert_eq!(parse_sheet_name("M|monster|map").unwrap().map_level, Some(1));
        assert_eq!(parse_sheet_name("M|monster|map2").unwrap().map_level, Some(2));
        assert_eq!(parse_sheet_name("M|monster|mapping").unwrap().map_level, Some(1));
    }

    #[test]
    fn group_markers() {
        assert!(parse_sheet_name("Hero|hero<<").unwrap().opens_group);
        assert!(parse_sheet_name("Skills|skill>>").unwrap().closes_group);
    }
}
