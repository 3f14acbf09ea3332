//! Name-level parsing of derived query methods.
//!
//! Works on words only; field names are resolved against an entity later.

use super::{Comparator, QueryError, Subject};
use crate::sort::Direction;

/// A predicate before its field is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NamedPredicate {
    pub field: String,
    pub comparator: Comparator,
}

/// A parsed method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedName {
    pub subject: Subject,
    /// OR of AND-groups
    pub groups: Vec<Vec<NamedPredicate>>,
    pub order: Vec<(String, Direction)>,
}

/// Comparator keywords, matched as word suffixes in table order.
const COMPARATORS: &[(&[&str], Comparator)] = &[
    (&["Is", "Not", "Null"], Comparator::IsNotNull),
    (&["Not", "Null"], Comparator::IsNotNull),
    (&["Is", "Null"], Comparator::IsNull),
    (&["Null"], Comparator::IsNull),
    (&["Greater", "Than", "Equal"], Comparator::GreaterThanEqual),
    (&["Greater", "Than"], Comparator::GreaterThan),
    (&["After"], Comparator::GreaterThan),
    (&["Less", "Than", "Equal"], Comparator::LessThanEqual),
    (&["Less", "Than"], Comparator::LessThan),
    (&["Before"], Comparator::LessThan),
    (&["Not", "In"], Comparator::NotIn),
    (&["In"], Comparator::In),
    (&["Containing"], Comparator::Containing),
    (&["Contains"], Comparator::Containing),
    (&["Starting", "With"], Comparator::StartingWith),
    (&["Starts", "With"], Comparator::StartingWith),
    (&["Ending", "With"], Comparator::EndingWith),
    (&["Ends", "With"], Comparator::EndingWith),
    (&["Is", "Not"], Comparator::Not),
    (&["Not"], Comparator::Not),
    (&["Equals"], Comparator::Equal),
    (&["Is"], Comparator::Equal),
];

pub(crate) fn parse(name: &str) -> Result<ParsedName, QueryError> {
    let malformed = |reason: &str| QueryError::Malformed {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let words = split_words(name).ok_or_else(|| malformed("only ASCII letters and digits are allowed"))?;
    let (first, rest) = words
        .split_first()
        .ok_or_else(|| QueryError::UnknownSubject(name.to_string()))?;
    let subject = subject_of(first).ok_or_else(|| QueryError::UnknownSubject(name.to_string()))?;

    let (predicates, ordering) = sections(rest);
    if predicates.is_some_and(|words| words.is_empty()) && ordering.is_none() {
        return Err(malformed("nothing follows `By`"));
    }

    let groups = parse_predicates(predicates.unwrap_or_default()).map_err(malformed)?;
    let order = parse_order(ordering).map_err(malformed)?;

    Ok(ParsedName {
        subject,
        groups,
        order,
    })
}

/// Split a camelCase name into words: `findByCntGreaterThan` ->
/// `find`, `By`, `Cnt`, `Greater`, `Than`.
fn split_words(name: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();

    for ch in name.chars() {
        if !ch.is_ascii_alphanumeric() {
            return None;
        }
        if ch.is_ascii_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }

    Some(words)
}

fn subject_of(word: &str) -> Option<Subject> {
    match word {
        "find" | "read" | "get" | "query" | "search" => Some(Subject::Find),
        "exists" => Some(Subject::Exists),
        "count" => Some(Subject::Count),
        "delete" | "remove" => Some(Subject::Delete),
        _ => None,
    }
}

fn is_order_by(words: &[String], i: usize) -> bool {
    words.get(i).map(String::as_str) == Some("Order") && words.get(i + 1).map(String::as_str) == Some("By")
}

/// Split the words after the subject into the predicate and `OrderBy` parts.
///
/// Anything between the subject and `By` only describes the result
/// (`findAllBy`, `findBoardsBy`) and is skipped.
fn sections(words: &[String]) -> (Option<&[String]>, Option<&[String]>) {
    for i in 0..words.len() {
        if is_order_by(words, i) {
            return (None, Some(&words[i + 2..]));
        }
        if words[i] == "By" {
            let section = &words[i + 1..];
            return match (0..section.len()).find(|&j| is_order_by(section, j)) {
                Some(j) => (Some(&section[..j]), Some(&section[j + 2..])),
                None => (Some(section), None),
            };
        }
    }
    (None, None)
}

fn parse_predicates(words: &[String]) -> Result<Vec<Vec<NamedPredicate>>, &'static str> {
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let mut groups: Vec<Vec<NamedPredicate>> = vec![Vec::new()];
    let mut segment: Vec<&str> = Vec::new();

    for word in words {
        match word.as_str() {
            "And" | "Or" => {
                let predicate = parse_predicate(&segment)?;
                if let Some(group) = groups.last_mut() {
                    group.push(predicate);
                }
                segment.clear();
                if word == "Or" {
                    groups.push(Vec::new());
                }
            }
            other => segment.push(other),
        }
    }

    let predicate = parse_predicate(&segment)?;
    if let Some(group) = groups.last_mut() {
        group.push(predicate);
    }

    Ok(groups)
}

fn parse_predicate(words: &[&str]) -> Result<NamedPredicate, &'static str> {
    if words.is_empty() {
        return Err("empty predicate around `And`/`Or`");
    }

    for (keyword, comparator) in COMPARATORS {
        if words.len() > keyword.len() && words.ends_with(keyword) {
            return Ok(NamedPredicate {
                field: words[..words.len() - keyword.len()].concat(),
                comparator: *comparator,
            });
        }
    }

    Ok(NamedPredicate {
        field: words.concat(),
        comparator: Comparator::Equal,
    })
}

fn parse_order(words: Option<&[String]>) -> Result<Vec<(String, Direction)>, &'static str> {
    let words = match words {
        Some([]) => return Err("nothing follows `OrderBy`"),
        Some(words) => words,
        None => return Ok(Vec::new()),
    };

    let mut order = Vec::new();
    let mut field = String::new();

    for word in words {
        let direction = match word.as_str() {
            "Asc" => Some(Direction::Asc),
            "Desc" => Some(Direction::Desc),
            _ => None,
        };
        match direction {
            Some(_) if field.is_empty() => return Err("sort direction without a field"),
            Some(direction) => order.push((std::mem::take(&mut field), direction)),
            None => field.push_str(word),
        }
    }
    if !field.is_empty() {
        order.push((field, Direction::Asc));
    }

    Ok(order)
}
