use crate::code::Code;
use crate::parse_error::ParseError;
use nom::bytes::complete::is_not;
use nom::character::complete::{char, multispace0};
use nom::combinator::map;
use nom::multi::many0;
use nom::sequence::terminated;
use nom::IResult;

/// Parses a Push program into its top-level `Code` list.
///
/// The grammar makes no attempt to classify tokens: every non-parenthesis,
/// non-whitespace run of characters becomes an atom verbatim, and type
/// (integer, float, boolean, instruction, or name) is resolved later, at
/// execution time, by the interpreter's dispatch loop.
pub fn parse_code(input: &str) -> Result<Code, ParseError> {
    let (rest, _): (&str, &str) =
        multispace0(input).map_err(ParseError::new::<nom::error::Error<&str>>)?;
    let (rest, children) = many0(terminated(parse_element, multispace0))(rest)
        .map_err(ParseError::new::<nom::error::Error<&str>>)?;
    if !rest.is_empty() {
        return Err(ParseError::unbalanced_parentheses());
    }
    Ok(Code::List(children))
}

fn parse_element(input: &str) -> IResult<&str, Code> {
    nom::branch::alt((parse_list, parse_atom))(input)
}

fn parse_atom(input: &str) -> IResult<&str, Code> {
    map(atom_token, |token: &str| Code::Atom(token.to_string()))(input)
}

fn atom_token(input: &str) -> IResult<&str, &str> {
    is_not(" \t\r\n()")(input)
}

fn parse_list(input: &str) -> IResult<&str, Code> {
    let (input, _) = char('(')(input)?;
    let (input, _) = multispace0(input)?;
    let (input, children) = many0(terminated(parse_element, multispace0))(input)?;
    let (input, _) = char(')')(input)?;
    Ok((input, Code::List(children)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_atoms() {
        let c = parse_code("1 2 TRUE").unwrap();
        assert_eq!(
            c,
            Code::List(vec![Code::atom("1"), Code::atom("2"), Code::atom("TRUE")])
        );
    }

    #[test]
    fn parses_nested_lists() {
        let c = parse_code("( 1 ( 2 3 ) 4 )").unwrap();
        assert_eq!(
            c,
            Code::List(vec![Code::list(vec![
                Code::atom("1"),
                Code::list(vec![Code::atom("2"), Code::atom("3")]),
                Code::atom("4"),
            ])])
        );
    }

    #[test]
    fn preserves_token_case() {
        let c = parse_code("MyName").unwrap();
        assert_eq!(c, Code::List(vec![Code::atom("MyName")]));
    }

    #[test]
    fn empty_parens_parse_as_empty_list() {
        let c = parse_code("( )").unwrap();
        assert_eq!(c, Code::List(vec![Code::empty_list()]));
    }

    #[test]
    fn unbalanced_open_paren_is_an_error() {
        assert!(parse_code("( 1 2").is_err());
    }

    #[test]
    fn unbalanced_close_paren_is_an_error() {
        assert!(parse_code("1 2 )").is_err());
    }

    #[test]
    fn blank_input_parses_as_empty_top_level_list() {
        let c = parse_code("   ").unwrap();
        assert_eq!(c, Code::List(vec![]));
    }

    #[test]
    fn print_parse_round_trip() {
        let c = Code::list(vec![
            Code::atom("1"),
            Code::list(vec![Code::atom("2"), Code::atom("3")]),
        ]);
        let printed = format!("{}", c);
        let reparsed = parse_code(&printed).unwrap();
        // parse_code always yields a fresh top-level wrapper list.
        assert_eq!(reparsed, Code::List(vec![c]));
    }
}
