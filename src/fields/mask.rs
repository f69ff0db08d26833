//! Display-mask templates for checkout input fields.
//!
//! A template such as `{{9999}} {{9999}} {{9999}} {{9999}}` describes how raw
//! keystrokes are grouped for display. Characters inside `{{`/`}}` runs are
//! placeholders, each consuming exactly one raw character; characters outside
//! runs are literals emitted verbatim. Templates format, they never validate:
//! a placeholder accepts whatever character the user typed, and validation is
//! a separate concern handled by
//! [`FieldValidator`](crate::validation::FieldValidator).

use crate::error::{Result, VaultError};

/// One parsed element of a mask template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaskToken {
    /// Emitted verbatim between input groups.
    Literal(char),
    /// Consumes one raw input character. The declared character (`9` in
    /// observed templates) is retained but not enforced against input.
    Placeholder(char),
}

/// A parsed, reusable display mask.
///
/// Parsing is strict: unbalanced delimiters fail immediately with
/// [`VaultError::MaskTemplate`] so a broken field definition is caught at
/// registration rather than mid-checkout. A `{` or `}` that does not form a
/// `{{`/`}}` pair outside a run is an ordinary literal.
///
/// # Examples
///
/// ```
/// use checkout_vault::MaskTemplate;
///
/// # fn main() -> checkout_vault::Result<()> {
/// let template = MaskTemplate::parse("{{9999}} {{9999}} {{9999}} {{9999}}")?;
///
/// assert_eq!(template.apply("4111111111111111"), "4111 1111 1111 1111");
/// assert_eq!(template.strip("4111 1111 1111 1111"), "4111111111111111");
/// assert_eq!(template.wildcard(), "**** **** **** ****");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskTemplate {
    tokens: Vec<MaskToken>,
    source: String,
}

impl MaskTemplate {
    /// Parses a template string.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::MaskTemplate`] when a placeholder run is left
    /// unterminated, a run opens inside another run, a `}}` appears without a
    /// matching `{{`, or a lone brace appears inside a run.
    pub fn parse(template: &str) -> Result<Self> {
        let mut tokens = Vec::with_capacity(template.len());
        let mut chars = template.chars().peekable();
        let mut in_run = false;

        while let Some(c) = chars.next() {
            if in_run {
                match c {
                    '{' => {
                        return Err(VaultError::MaskTemplate(format!(
                            "nested `{{{{` inside placeholder run in `{template}`"
                        )));
                    }
                    '}' => {
                        if chars.peek() == Some(&'}') {
                            chars.next();
                            in_run = false;
                        } else {
                            return Err(VaultError::MaskTemplate(format!(
                                "lone `}}` inside placeholder run in `{template}`"
                            )));
                        }
                    }
                    placeholder => tokens.push(MaskToken::Placeholder(placeholder)),
                }
            } else {
                match c {
                    '{' if chars.peek() == Some(&'{') => {
                        chars.next();
                        in_run = true;
                    }
                    '}' if chars.peek() == Some(&'}') => {
                        return Err(VaultError::MaskTemplate(format!(
                            "`}}}}` without matching `{{{{` in `{template}`"
                        )));
                    }
                    literal => tokens.push(MaskToken::Literal(literal)),
                }
            }
        }

        if in_run {
            return Err(VaultError::MaskTemplate(format!(
                "unterminated placeholder run in `{template}`"
            )));
        }

        Ok(Self { tokens, source: template.to_owned() })
    }

    /// Formats raw input progressively.
    ///
    /// Placeholders consume raw characters one by one; a literal is emitted
    /// only while raw characters remain to be placed, so partially typed
    /// input never grows a dangling separator. Raw input beyond the
    /// template's capacity is truncated, and exhausted input stops emission
    /// immediately (the output is never padded).
    #[must_use]
    pub fn apply(&self, raw: &str) -> String {
        let mut raw_chars = raw.chars().peekable();
        let mut masked = String::with_capacity(self.source.len());

        for token in &self.tokens {
            if raw_chars.peek().is_none() {
                break;
            }
            match token {
                MaskToken::Placeholder(_) => {
                    if let Some(c) = raw_chars.next() {
                        masked.push(c);
                    }
                }
                MaskToken::Literal(literal) => masked.push(*literal),
            }
        }

        masked
    }

    /// Recovers raw input from a masked string.
    ///
    /// Only characters at placeholder positions are extracted. A literal
    /// advances past the corresponding masked character only when that
    /// character actually matches, so a display string with missing
    /// separators still strips cleanly; trailing characters beyond the
    /// template are ignored. This never fails.
    #[must_use]
    pub fn strip(&self, masked: &str) -> String {
        let mut masked_chars = masked.chars().peekable();
        let mut raw = String::with_capacity(masked.len());

        for token in &self.tokens {
            match token {
                MaskToken::Placeholder(_) => match masked_chars.next() {
                    Some(c) => raw.push(c),
                    None => break,
                },
                MaskToken::Literal(literal) => {
                    if masked_chars.peek() == Some(literal) {
                        masked_chars.next();
                    }
                }
            }
        }

        raw
    }

    /// Renders the template with every placeholder replaced by `*`.
    ///
    /// Literal positions are preserved, which makes the result suitable for
    /// displaying stored account-on-file values without revealing them.
    #[must_use]
    pub fn wildcard(&self) -> String {
        self.tokens
            .iter()
            .map(|token| match token {
                MaskToken::Placeholder(_) => '*',
                MaskToken::Literal(literal) => *literal,
            })
            .collect()
    }

    /// Number of raw characters the template can hold.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.tokens
            .iter()
            .filter(|token| matches!(token, MaskToken::Placeholder(_)))
            .count()
    }

    /// The original template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Display for MaskTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
