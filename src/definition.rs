//! Line model for message definitions
//!
//! Language files declare one message per line, either in the legacy form
//!
//! ```text
//! #define MSG_BACKLASH             _UxGT("Backlash") // comment
//! ```
//!
//! or in the storage form the rewrite produces
//!
//! ```text
//! PROGMEM Language_Str MSG_BACKLASH = _UxGT("Backlash"); // comment
//! ```
//!
//! Matching is done per line with regular expressions; anything that does
//! not match is left alone by the callers.

use regex::Regex;
use std::sync::OnceLock;

/// Keyword sequence of the storage form
pub const LANGUAGE_STR_KEYWORD: &str = "PROGMEM Language_Str";

/// Pattern of a message symbol inside a value expression. `#` is allowed so
/// token-pasted names such as `MSG_##N` stay one token.
pub const SYMBOL_PATTERN: &str = r"MSG_[\w#]*";

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($re).expect("definition pattern is valid"))
        }
    };
}

pattern!(
    define_with_comment,
    r"^(\s*)#define(\s*)(MSG_\w*)(\s*)(.*?)(\s*)(//.*)$"
);
pattern!(define_without_comment, r"^(\s*)#define(\s*)(MSG_\w*)(\s*)(.*)$");
pattern!(
    language_str_with_comment,
    r"^(\s*)PROGMEM Language_Str (MSG_\w*)(\s*)= (.*?);(\s*)(//.*)$"
);
pattern!(
    language_str_without_comment,
    r"^(\s*)PROGMEM Language_Str (MSG_\w*)(\s*)= (.*);(.*)$"
);
pattern!(symbol_token, SYMBOL_PATTERN);

/// Regex matching message symbols in free text
pub fn symbol_regex() -> &'static Regex {
    symbol_token()
}

/// How a definition was declared in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationForm {
    /// `#define`
    Define,
    /// `PROGMEM Language_Str`
    LanguageStr,
}

/// A `//` comment trailing the definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailingComment {
    /// Whitespace between the value (or `;`) and the comment
    pub gap: String,
    /// The comment itself, including the `//`
    pub text: String,
}

/// One parsed definition line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub indent: String,
    pub form: DeclarationForm,
    pub identifier: String,
    /// Whitespace between the identifier and the value or `=`
    pub spacing: String,
    pub value: String,
    pub comment: Option<TrailingComment>,
    /// Text after the final `;` of an uncommented storage-form line
    pub tail: String,
    /// Line terminator of the input line (`\n`, `\r\n` or empty)
    pub eol: String,
}

impl Definition {
    /// Parse a line in either declaration form
    pub fn parse(line: &str) -> Option<Self> {
        let (body, eol) = split_eol(line);
        parse_define(body, eol).or_else(|| parse_language_str(body, eol))
    }

    /// Whether the line used the legacy `#define` form
    pub fn is_legacy(&self) -> bool {
        self.form == DeclarationForm::Define
    }

    /// Parse a line in the storage form only
    pub fn parse_language_str(line: &str) -> Option<Self> {
        let (body, eol) = split_eol(line);
        parse_language_str(body, eol)
    }

    /// Render the definition in the storage form
    pub fn render(&self) -> String {
        let mut out = format!(
            "{}{} {}{}= {};",
            self.indent, LANGUAGE_STR_KEYWORD, self.identifier, self.spacing, self.value
        );
        match &self.comment {
            Some(comment) => {
                out.push_str(&comment.gap);
                out.push_str(&comment.text);
            }
            None => out.push_str(&self.tail),
        }
        out.push_str(&self.eol);
        out
    }
}

fn parse_define(body: &str, eol: &str) -> Option<Definition> {
    if let Some(caps) = define_with_comment().captures(body) {
        return Some(Definition {
            indent: caps[1].to_string(),
            form: DeclarationForm::Define,
            identifier: caps[3].to_string(),
            spacing: caps[4].to_string(),
            value: caps[5].to_string(),
            comment: Some(TrailingComment {
                gap: caps[6].to_string(),
                text: caps[7].to_string(),
            }),
            tail: String::new(),
            eol: eol.to_string(),
        });
    }

    let caps = define_without_comment().captures(body)?;
    Some(Definition {
        indent: caps[1].to_string(),
        form: DeclarationForm::Define,
        identifier: caps[3].to_string(),
        spacing: caps[4].to_string(),
        value: caps[5].to_string(),
        comment: None,
        tail: String::new(),
        eol: eol.to_string(),
    })
}

fn parse_language_str(body: &str, eol: &str) -> Option<Definition> {
    if let Some(caps) = language_str_with_comment().captures(body) {
        return Some(Definition {
            indent: caps[1].to_string(),
            form: DeclarationForm::LanguageStr,
            identifier: caps[2].to_string(),
            spacing: caps[3].to_string(),
            value: caps[4].to_string(),
            comment: Some(TrailingComment {
                gap: caps[5].to_string(),
                text: caps[6].to_string(),
            }),
            tail: String::new(),
            eol: eol.to_string(),
        });
    }

    let caps = language_str_without_comment().captures(body)?;
    Some(Definition {
        indent: caps[1].to_string(),
        form: DeclarationForm::LanguageStr,
        identifier: caps[2].to_string(),
        spacing: caps[3].to_string(),
        value: caps[4].to_string(),
        comment: None,
        tail: caps[5].to_string(),
        eol: eol.to_string(),
    })
}

/// Split a line into its body and terminator
pub fn split_eol(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_define_with_comment() {
        let def = Definition::parse("  #define MSG_BACKLASH   _UxGT(\"Backlash\")  // axis\n").unwrap();
        assert_eq!(def.indent, "  ");
        assert_eq!(def.form, DeclarationForm::Define);
        assert_eq!(def.identifier, "MSG_BACKLASH");
        assert_eq!(def.spacing, "   ");
        assert_eq!(def.value, "_UxGT(\"Backlash\")");
        let comment = def.comment.as_ref().unwrap();
        assert_eq!(comment.gap, "  ");
        assert_eq!(comment.text, "// axis");
        assert_eq!(def.eol, "\n");
    }

    #[test]
    fn test_parse_define_without_comment() {
        let def = Definition::parse("#define MSG_E1 \" E1\"\n").unwrap();
        assert_eq!(def.identifier, "MSG_E1");
        assert_eq!(def.value, "\" E1\"");
        assert!(def.comment.is_none());
    }

    #[test]
    fn test_parse_language_str() {
        let line = "PROGMEM Language_Str MSG_BACKLASH = _UxGT(\"Ruckschlag\");\n";
        let def = Definition::parse(line).unwrap();
        assert_eq!(def.form, DeclarationForm::LanguageStr);
        assert_eq!(def.identifier, "MSG_BACKLASH");
        assert_eq!(def.spacing, " ");
        assert_eq!(def.value, "_UxGT(\"Ruckschlag\")");
        assert_eq!(def.render(), line);
    }

    #[test]
    fn test_language_str_comment_round_trip() {
        let line = "  PROGMEM Language_Str MSG_HOME    = _UxGT(\"Home\");   // short\r\n";
        let def = Definition::parse(line).unwrap();
        assert_eq!(def.render(), line);

        let reparsed = Definition::parse(&def.render()).unwrap();
        assert_eq!(reparsed.identifier, def.identifier);
        assert_eq!(reparsed.comment, def.comment);
    }

    #[test]
    fn test_define_renders_storage_form() {
        let def = Definition::parse("#define MSG_HOME  _UxGT(\"Home\") // c\n").unwrap();
        assert_eq!(
            def.render(),
            "PROGMEM Language_Str MSG_HOME  = _UxGT(\"Home\"); // c\n"
        );
    }

    #[test]
    fn test_non_definitions_do_not_parse() {
        assert!(Definition::parse("#define LCD_WIDTH 20\n").is_none());
        assert!(Definition::parse("// #define MSG_X \"x\"\n").is_none());
        assert!(Definition::parse("namespace Language_de {\n").is_none());
        assert!(Definition::parse_language_str("#define MSG_X \"x\"\n").is_none());
    }

    #[test]
    fn test_split_eol() {
        assert_eq!(split_eol("a\r\n"), ("a", "\r\n"));
        assert_eq!(split_eol("a\n"), ("a", "\n"));
        assert_eq!(split_eol("a"), ("a", ""));
    }

    #[test]
    fn test_symbol_regex_includes_paste_marker() {
        let found: Vec<_> = symbol_regex()
            .find_iter("MSG_MOVE_##N _UxGT(\"x\") MSG_E1")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["MSG_MOVE_##N", "MSG_E1"]);
    }
}
