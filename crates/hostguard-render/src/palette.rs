use console::Style;

/// Styles for the few roles the transcript colors.
///
/// A plain palette forces styling off, so painting returns the text unchanged whatever the
/// terminal supports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub pass: Style,
    pub fail: Style,
    pub skip: Style,
    pub warn: Style,
    pub bold: Style,
    pub underline: Style,
    styled: bool,
}

impl Palette {
    pub fn plain() -> Self {
        Self::build(false)
    }

    pub fn ansi() -> Self {
        Self::build(true)
    }

    fn build(styled: bool) -> Self {
        let base = || Style::new().force_styling(styled);
        Self {
            pass: base().green().bright(),
            fail: base().red().bright(),
            skip: base().blue().bright(),
            warn: base().yellow().bright(),
            bold: base().bold(),
            underline: base().underlined(),
            styled,
        }
    }

    pub fn is_styled(&self) -> bool {
        self.styled
    }

    pub fn paint(&self, style: &Style, text: &str) -> String {
        style.apply_to(text).to_string()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::plain()
    }
}
