//! Pure line-protocol codec: `COMMAND|NAME|DEPLIST\n` in, a [`Command`]
//! or a [`ParseError`] out. No I/O, no shared state — the Connection
//! Handler owns framing (where does one line end) and calls [`parse`]
//! once it has a candidate line in hand.

const PIPE: u8 = b'|';
const COMMA: u8 = b',';
const NEWLINE: u8 = b'\n';

/// The three commands the wire grammar recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Index,
    Remove,
    Query,
}

/// A parsed request. Lives only for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub tag: Tag,
    pub name: Vec<u8>,
    pub deps: Vec<Vec<u8>>,
}

/// Why a line failed to parse. Carries no data beyond its kind — the
/// wire surface only ever emits a bare `ERROR\n` regardless of which
/// variant fired; the kind exists for optional diagnostics logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Line did not end in exactly one `\n`, or contained an embedded
    /// `\n` before the terminator.
    MissingTerminator,
    /// Splitting on `|` did not yield exactly three fields.
    WrongFieldCount,
    /// Field 0 was not one of `INDEX`, `REMOVE`, `QUERY`.
    UnknownCommand,
    /// Field 1 (`NAME`) was empty.
    EmptyName,
}

/// Parse one wire line, `line` including its trailing `\n`.
///
/// See spec §4.2 for the full grammar. The dependency list tolerates a
/// leading, trailing, or doubled comma: empty segments it produces are
/// silently dropped rather than rejected.
pub fn parse(line: &[u8]) -> Result<Command, ParseError> {
    let Some((&NEWLINE, body)) = line.split_last() else {
        return Err(ParseError::MissingTerminator);
    };
    if body.contains(&NEWLINE) {
        return Err(ParseError::MissingTerminator);
    }

    let fields: Vec<&[u8]> = body.split(|&b| b == PIPE).collect();
    let [command, name, deplist] = fields.as_slice() else {
        return Err(ParseError::WrongFieldCount);
    };

    let tag = match *command {
        b"INDEX" => Tag::Index,
        b"REMOVE" => Tag::Remove,
        b"QUERY" => Tag::Query,
        _ => return Err(ParseError::UnknownCommand),
    };

    if name.is_empty() {
        return Err(ParseError::EmptyName);
    }

    let deps = if deplist.is_empty() {
        Vec::new()
    } else {
        deplist
            .split(|&b| b == COMMA)
            .filter(|segment| !segment.is_empty())
            .map(<[u8]>::to_vec)
            .collect()
    };

    Ok(Command {
        tag,
        name: name.to_vec(),
        deps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(s: &str) -> Result<Command, ParseError> {
        parse(s.as_bytes())
    }

    #[test]
    fn bare_index() {
        let cmd = parse_str("INDEX|a|\n").unwrap();
        assert_eq!(cmd.tag, Tag::Index);
        assert_eq!(cmd.name, b"a");
        assert!(cmd.deps.is_empty());
    }

    #[test]
    fn trailing_comma_tolerance() {
        let cmd = parse_str("INDEX|r|p,q,\n").unwrap();
        assert_eq!(cmd.deps, vec![b"p".to_vec(), b"q".to_vec()]);
    }

    #[test]
    fn doubled_and_leading_comma_tolerance() {
        let cmd = parse_str("INDEX|r|,p,,q\n").unwrap();
        assert_eq!(cmd.deps, vec![b"p".to_vec(), b"q".to_vec()]);
    }

    #[test]
    fn missing_terminator_is_rejected() {
        assert_eq!(parse_str("INDEX|a|"), Err(ParseError::MissingTerminator));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert_eq!(parse_str("BLINDEX|p|\n"), Err(ParseError::UnknownCommand));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(parse_str("INDEX||\n"), Err(ParseError::EmptyName));
    }

    #[test]
    fn missing_third_field_is_rejected() {
        assert_eq!(parse_str("INDEX|p\n"), Err(ParseError::WrongFieldCount));
    }

    #[test]
    fn extra_field_is_rejected() {
        assert_eq!(
            parse_str("INDEX|p|a|extra\n"),
            Err(ParseError::WrongFieldCount)
        );
    }

    #[test]
    fn remove_and_query_accept_but_ignore_a_deplist() {
        let cmd = parse_str("QUERY|p|a,b\n").unwrap();
        assert_eq!(cmd.tag, Tag::Query);
        assert_eq!(cmd.deps, vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn non_utf8_name_is_accepted() {
        let mut line = b"INDEX|".to_vec();
        line.push(0xFF);
        line.extend_from_slice(b"|\n");
        let cmd = parse(&line).unwrap();
        assert_eq!(cmd.name, vec![0xFF]);
    }
}
