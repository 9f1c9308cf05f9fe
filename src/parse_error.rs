#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new<E: std::fmt::Debug>(err: nom::Err<E>) -> ParseError {
        ParseError {
            message: err.to_string(),
        }
    }

    pub fn new_with_message<S: ToString>(msg: S) -> ParseError {
        ParseError {
            message: msg.to_string(),
        }
    }

    pub fn unbalanced_parentheses() -> ParseError {
        ParseError::new_with_message("unbalanced parentheses")
    }

    pub fn unknown_parameter(name: &str) -> ParseError {
        ParseError::new_with_message(format!("unknown configuration parameter: {}", name))
    }

    pub fn missing_value(name: &str) -> ParseError {
        ParseError::new_with_message(format!("missing value for configuration parameter: {}", name))
    }

    pub fn invalid_value(name: &str, value: &str) -> ParseError {
        ParseError::new_with_message(format!(
            "invalid value `{}` for configuration parameter `{}`",
            value, name
        ))
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}
