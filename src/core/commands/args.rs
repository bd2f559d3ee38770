/// Arguments of one command, split into flags and operands.
///
/// Tokens starting with `-` are flags wherever they appear, except the bare
/// `-` and anything after a `--` terminator. Combined short flags expand, so
/// `-rl` becomes `r` and `l`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    flags: Vec<char>,
    long_flags: Vec<String>,
    pub operands: Vec<String>,
}

impl ParsedArgs {
    pub fn parse(tokens: &[String]) -> Self {
        let mut parsed = ParsedArgs::default();
        let mut flags_done = false;

        for token in tokens {
            if flags_done || token == "-" || !token.starts_with('-') {
                parsed.operands.push(token.clone());
            } else if token == "--" {
                flags_done = true;
            } else if let Some(long) = token.strip_prefix("--") {
                parsed.long_flags.push(long.to_string());
            } else {
                parsed.flags.extend(token.chars().skip(1));
            }
        }

        parsed
    }

    pub fn has(&self, flag: char) -> bool {
        self.flags.contains(&flag)
    }

    pub fn has_any(&self, flags: &[char]) -> bool {
        flags.iter().any(|f| self.has(*f))
    }

    pub fn has_long(&self, name: &str) -> bool {
        self.long_flags.iter().any(|f| f == name)
    }

    pub fn recursive(&self) -> bool {
        self.has_any(&['r', 'R']) || self.has_long("recursive")
    }
}
