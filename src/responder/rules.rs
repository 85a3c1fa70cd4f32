//! Canned replies for the AT commands the stub understands.

/// How a rule decides whether a line is meant for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// The whole line equals the pattern.
    Exact(&'static str),
    /// The line starts with the pattern.
    Prefix(&'static str),
}

impl Matcher {
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Self::Exact(pattern) => line == *pattern,
            Self::Prefix(pattern) => line.starts_with(*pattern),
        }
    }

    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Exact(pattern) | Self::Prefix(pattern) => *pattern,
        }
    }
}

/// One (matcher, reply) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseRule {
    pub matcher: Matcher,
    /// Sent verbatim; no terminator is appended.
    pub reply: &'static str,
}

impl ResponseRule {
    pub const fn exact(pattern: &'static str, reply: &'static str) -> Self {
        Self {
            matcher: Matcher::Exact(pattern),
            reply,
        }
    }

    pub const fn prefix(pattern: &'static str, reply: &'static str) -> Self {
        Self {
            matcher: Matcher::Prefix(pattern),
            reply,
        }
    }

    pub fn matches(&self, line: &str) -> bool {
        self.matcher.matches(line)
    }
}

/// The ESP8266 subset: reset, station mode, multiplexing, join AP, open a
/// TCP connection, status, and the send prompt for HTTP posts.
pub const ESP8266_RULES: [ResponseRule; 8] = [
    ResponseRule::exact("AT+RST", "ready"),
    ResponseRule::exact("AT+CWMODE=1", "\n\n\n"),
    ResponseRule::exact("AT+CIPMUX=1", "\n\n\n"),
    ResponseRule::exact("AT+CWJAP=\"xxxx\",\"xxxxxxxx\"", "OK"),
    ResponseRule::exact("AT+CIPSTART=0,\"TCP\",\"23.203.214.89\",80", "OK"),
    ResponseRule::exact("AT+CIPSTATUS", "OK"),
    ResponseRule::prefix("AT+CIPSEND=0,", ">"),
    ResponseRule::prefix("POST ", "OK"),
];

/// Ordered rule list; the first rule that matches wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    rules: &'static [ResponseRule],
}

impl RuleSet {
    pub const fn new(rules: &'static [ResponseRule]) -> Self {
        Self { rules }
    }

    pub const fn esp8266() -> Self {
        Self::new(&ESP8266_RULES)
    }

    /// First rule matching `line`, if any.
    pub fn find(&self, line: &str) -> Option<&'static ResponseRule> {
        self.rules.iter().find(|rule| rule.matches(line))
    }

    /// Reply bytes for `line`, if any rule matches.
    pub fn reply_for(&self, line: &str) -> Option<&'static [u8]> {
        self.find(line).map(|rule| rule.reply.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::esp8266()
    }
}
